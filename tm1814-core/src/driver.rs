//! TM1814 Treiber
//!
//! Besitzt die Buffer-Semantik, das RGBW-Packen und den Lebenszyklus.
//! Der Transport wird über den Typ-Parameter explizit gewählt.
//!
//! Kein internes Locking: wer den Treiber aus mehreren Threads steuert,
//! muss Schreiben + `show()` selbst unter einem Lock serialisieren.

use smart_leds_trait::{RGBW, SmartLedsWrite};
use tracing::{debug, trace, warn};

use crate::error::{ConfigError, Error};
use crate::traits::Transport;
use crate::types::{ColorWord, DriverState, StripConfig, TransportFamily};

/// Treiber für einen TM1814 RGBW-Strip
///
/// ```
/// # use tm1814_core::{StripConfig, Tm1814, SimulatedTransport, ColorWord};
/// let mut strip = Tm1814::<SimulatedTransport>::new(StripConfig::new(3))?;
/// strip.begin()?;
/// strip.set_pixel(0, 255, 0, 0, 0)?;
/// strip.set_pixel(1, 0, 255, 0, 128)?;
/// strip.show()?;
/// assert_eq!(strip.pixel(1), Some(ColorWord(0x8000_FF00)));
/// strip.cleanup();
/// # Ok::<(), tm1814_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Tm1814<T: Transport> {
    config: StripConfig,
    family: TransportFamily,
    transport: T,
    state: DriverState,
}

impl<T: Transport> Tm1814<T> {
    /// Prüft die Konfiguration und baut den Transport, ohne Hardware zu belegen
    ///
    /// # Fehlerbehandlung
    /// Gibt `Error::Config` zurück wenn Pin, Kanal, DMA oder Pixelzahl
    /// ungültig sind.
    pub fn new(config: StripConfig) -> Result<Self, Error> {
        config.validate()?;
        let transport = T::from_config(&config)?;
        Self::with_transport(config, transport)
    }

    /// Wie [`new`](Self::new), aber mit einem vom Aufrufer gebauten Transport
    pub fn with_transport(config: StripConfig, transport: T) -> Result<Self, Error> {
        let family = config.validate()?;
        if transport.pixel_count() != config.num_pixels() {
            return Err(ConfigError::PixelCountMismatch {
                expected: config.num_pixels(),
                actual: transport.pixel_count(),
            }
            .into());
        }
        debug!(
            pixels = config.num_pixels(),
            pin = config.pin(),
            %family,
            "tm1814 configured"
        );
        Ok(Self {
            config,
            family,
            transport,
            state: DriverState::Configured,
        })
    }

    /// Belegt die Hardware; genau einmal vor allen Pixel-Operationen aufrufen
    ///
    /// Schlägt `initialize()` fehl, bleibt der Treiber `Configured`.
    pub fn begin(&mut self) -> Result<(), Error> {
        match self.state {
            DriverState::Configured => {}
            DriverState::Active => return Err(Error::AlreadyStarted),
            DriverState::Released => return Err(Error::Released),
        }
        if let Err(err) = self.transport.initialize() {
            warn!(%err, "tm1814 begin failed");
            return Err(err);
        }
        self.state = DriverState::Active;
        debug!(family = %self.family, "tm1814 active");
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.transport.pixel_count()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn family(&self) -> TransportFamily {
        self.family
    }

    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Schreibt ein bereits gepacktes Wort (kompatibel zu `setPixelColor`)
    pub fn set_raw_pixel(&mut self, index: usize, word: u32) -> Result<(), Error> {
        self.write_slot(index, ColorWord(word))
    }

    /// Setzt ein Pixel aus einzelnen RGBW-Komponenten
    ///
    /// Der Wertebereich 0-255 ist durch `u8` garantiert.
    pub fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8, w: u8) -> Result<(), Error> {
        self.write_slot(index, ColorWord::pack(r, g, b, w))
    }

    /// Setzt ein Pixel aus `RGB8`, `RGBW<u8>` oder einem [`ColorWord`]
    pub fn set_color(&mut self, index: usize, color: impl Into<ColorWord>) -> Result<(), Error> {
        self.write_slot(index, color.into())
    }

    /// Liest ein Pixel aus dem Buffer (unskaliert)
    pub fn pixel(&self, index: usize) -> Option<ColorWord> {
        self.transport.raw_pixel(index)
    }

    /// Überträgt den Buffer auf den Strip
    ///
    /// Blockiert bis die Übertragung fertig ist. Erst danach darf der Buffer
    /// wieder beschrieben werden, sonst entsteht ein gemischter Frame.
    pub fn show(&mut self) -> Result<(), Error> {
        self.ensure_active()?;
        self.transport.flush()
    }

    /// Schaltet alle LEDs aus: Buffer auf 0, dann genau ein `show()`
    pub fn clear(&mut self) -> Result<(), Error> {
        self.ensure_active()?;
        self.fill(ColorWord::OFF);
        self.show()
    }

    /// Setzt die globale Helligkeit (0-255)
    ///
    /// Der Wert wird sofort gespeichert, sichtbar erst beim nächsten `show()`.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error> {
        if self.state == DriverState::Released {
            return Err(Error::Released);
        }
        self.transport.set_brightness(level);
        Ok(())
    }

    pub fn brightness(&self) -> u8 {
        self.transport.brightness()
    }

    /// Räumt auf und schaltet alle LEDs aus
    ///
    /// Wirft nie: Fehler eines defekten Transports werden geloggt und
    /// verschluckt. Danach ist der Treiber immer `Released`.
    pub fn cleanup(&mut self) {
        match self.state {
            DriverState::Released => return,
            DriverState::Active => {
                if let Err(err) = self.clear() {
                    warn!(%err, "tm1814 cleanup could not switch LEDs off");
                }
            }
            // Hardware nie belegt, es gibt nichts zu übertragen
            DriverState::Configured => self.fill(ColorWord::OFF),
        }
        self.state = DriverState::Released;
        debug!("tm1814 released");
    }

    fn ensure_active(&self) -> Result<(), Error> {
        match self.state {
            DriverState::Active => Ok(()),
            DriverState::Configured => Err(Error::NotStarted),
            DriverState::Released => Err(Error::Released),
        }
    }

    fn write_slot(&mut self, index: usize, word: ColorWord) -> Result<(), Error> {
        self.ensure_active()?;
        if index >= self.pixel_count() {
            trace!(index, pixels = self.pixel_count(), "write out of range ignored");
            return Ok(());
        }
        self.transport.set_raw_pixel(index, word);
        Ok(())
    }

    fn fill(&mut self, word: ColorWord) {
        for index in 0..self.transport.pixel_count() {
            self.transport.set_raw_pixel(index, word);
        }
    }
}

impl<T: Transport> Drop for Tm1814<T> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Schnittstelle für generische Strip-Aufrufer (`smart-leds`)
///
/// Schreibt ab Pixel 0, überzählige Farben werden verworfen, danach `show()`.
impl<T: Transport> SmartLedsWrite for Tm1814<T> {
    type Error = Error;
    type Color = RGBW<u8>;

    fn write<It, C>(&mut self, iterator: It) -> Result<(), Self::Error>
    where
        It: IntoIterator<Item = C>,
        C: Into<Self::Color>,
    {
        self.ensure_active()?;
        let count = self.pixel_count();
        for (index, color) in iterator.into_iter().take(count).enumerate() {
            self.transport.set_raw_pixel(index, ColorWord::from(color.into()));
        }
        self.show()
    }
}
