//! Fehler-Typen für Konfiguration, Hardware-Zugriff und Lebenszyklus

use alloc::string::String;

use derive_more::{Display, Error, From};

use crate::types::TransportFamily;

/// Ungültige Strip-Konfiguration, erkannt beim Konstruieren
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    #[display("a strip needs at least one pixel")]
    ZeroPixels,
    #[display("{count} pixels exceed the supported maximum of {max}")]
    TooManyPixels { count: usize, max: usize },
    #[display("GPIO {pin} cannot drive a TM1814 strip (use 10/SPI, 12|13|18|19/PWM or 21/PCM)")]
    UnsupportedPin { pin: u8 },
    #[display("channel {channel} does not exist (use 0 or 1)")]
    InvalidChannel { channel: u8 },
    #[display("GPIO {pin} ({family}) runs on channel {expected}, not channel {channel}")]
    ChannelMismatch {
        pin: u8,
        family: TransportFamily,
        channel: u8,
        expected: u8,
    },
    #[display("DMA channel {dma} is not usable (0..=14, never 5)")]
    DmaChannel { dma: u8 },
    #[display("configuration asks for {expected} pixels but the transport holds {actual}")]
    PixelCountMismatch { expected: usize, actual: usize },
}

/// Fehler-Typ für alle Treiber-Operationen
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum Error {
    /// Konfiguration ungültig, der Treiber wird nicht gebaut
    #[from]
    #[display("invalid strip configuration: {_0}")]
    Config(ConfigError),
    /// DMA-Kanal, Pin oder Bus belegt bzw. nicht aktiviert
    ///
    /// Wird nicht automatisch wiederholt.
    #[display("{family} transport unavailable: {reason} (hint: {})", family.deployment_hint())]
    ResourceUnavailable {
        family: TransportFamily,
        reason: String,
    },
    /// Übertragung des Frames fehlgeschlagen
    #[display("frame transfer failed: {reason}")]
    Transfer { reason: String },
    #[display("driver not started, call begin() first")]
    NotStarted,
    #[display("driver already started")]
    AlreadyStarted,
    #[display("driver already released by cleanup()")]
    Released,
}
