//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::error::Error;
use crate::types::{ColorWord, StripConfig};

/// Trait für den Transport eines Pixel-Buffers auf die Datenleitung
///
/// Abstrahiert die DMA/PWM/SPI/PCM-Engine, die das Signal erzeugt.
///
/// # Implementierungen
/// - **Production:** `Ws281xTransport` (rpi_ws281x über `rs_ws281x`, Crate `tm1814-rpi`)
/// - **Simulation:** [`SimulatedTransport`](crate::sim::SimulatedTransport) (in-memory)
///
/// # Helligkeit
/// [`set_brightness`](Transport::set_brightness) speichert den Wert sofort,
/// sichtbar wird er erst mit dem nächsten [`flush`](Transport::flush).
/// Beide Implementierungen halten sich daran.
pub trait Transport {
    /// Baut den Transport für eine Konfiguration, ohne Hardware zu belegen
    fn from_config(config: &StripConfig) -> Result<Self, Error>
    where
        Self: Sized;

    /// Belegt DMA-Kanal, Pin und Bus exklusiv
    ///
    /// # Fehlerbehandlung
    /// Gibt `Error::ResourceUnavailable` zurück wenn die Ressource belegt
    /// oder im System nicht aktiviert ist.
    fn initialize(&mut self) -> Result<(), Error>;

    fn pixel_count(&self) -> usize;

    /// Schreibt ein Wort in den Buffer, ohne Wirkung auf die LEDs
    ///
    /// Ein Index außerhalb des Buffers wird ignoriert.
    fn set_raw_pixel(&mut self, index: usize, word: ColorWord);

    /// Liest ein Wort aus dem Buffer
    fn raw_pixel(&self, index: usize) -> Option<ColorWord>;

    /// Überträgt den ganzen Buffer und blockiert bis zum Ende der Übertragung
    fn flush(&mut self) -> Result<(), Error>;

    fn set_brightness(&mut self, level: u8);

    fn brightness(&self) -> u8;
}
