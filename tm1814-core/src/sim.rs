//! In-memory Transport für Rechner ohne Peripherie
//!
//! Zeichnet Schreibzugriffe und gerenderte Frames auf, ohne Hardware
//! anzufassen. Wird explizit gewählt, nie als stiller Fallback.

use alloc::vec;
use alloc::vec::Vec;

use tracing::trace;

use crate::error::Error;
use crate::logic::{encode_frame, scale_word};
use crate::traits::Transport;
use crate::types::{ColorWord, StripConfig, TransportFamily};

/// Ein übertragener Frame, wie er auf der Leitung ankäme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Pixel nach Helligkeits-Skalierung
    pub words: Vec<ColorWord>,
    /// Kodierter Symbol-Datenstrom inklusive Reset-Pause, Polarität angewendet
    pub wire: Vec<u8>,
    /// Helligkeit, mit der gerendert wurde
    pub brightness: u8,
}

/// Simulierter Transport
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    family: TransportFamily,
    invert: bool,
    pixels: Vec<ColorWord>,
    brightness: u8,
    claimed: bool,
    flush_count: usize,
    last_frame: Option<Frame>,
    /// Simuliere eine belegte Ressource beim nächsten initialize()
    pub claim_error: Option<&'static str>,
    /// Simuliere Fehler beim nächsten flush()
    pub fail_next_flush: bool,
}

impl SimulatedTransport {
    pub fn family(&self) -> TransportFamily {
        self.family
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Aktueller Buffer-Inhalt (noch nicht skaliert)
    pub fn pixels(&self) -> &[ColorWord] {
        &self.pixels
    }

    /// Anzahl erfolgreicher flush() Aufrufe
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }
}

impl Transport for SimulatedTransport {
    fn from_config(config: &StripConfig) -> Result<Self, Error> {
        let family = config.validate()?;
        Ok(Self {
            family,
            invert: config.invert(),
            pixels: vec![ColorWord::OFF; config.num_pixels()],
            brightness: config.brightness(),
            claimed: false,
            flush_count: 0,
            last_frame: None,
            claim_error: None,
            fail_next_flush: false,
        })
    }

    fn initialize(&mut self) -> Result<(), Error> {
        if self.claimed {
            return Err(Error::ResourceUnavailable {
                family: self.family,
                reason: "already claimed".into(),
            });
        }
        if let Some(reason) = self.claim_error.take() {
            return Err(Error::ResourceUnavailable {
                family: self.family,
                reason: reason.into(),
            });
        }
        self.claimed = true;
        Ok(())
    }

    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_raw_pixel(&mut self, index: usize, word: ColorWord) {
        match self.pixels.get_mut(index) {
            Some(slot) => *slot = word,
            None => trace!(index, "simulated write out of range ignored"),
        }
    }

    fn raw_pixel(&self, index: usize) -> Option<ColorWord> {
        self.pixels.get(index).copied()
    }

    fn flush(&mut self) -> Result<(), Error> {
        if !self.claimed {
            return Err(Error::NotStarted);
        }
        if self.fail_next_flush {
            self.fail_next_flush = false;
            return Err(Error::Transfer {
                reason: "simulated transfer failure".into(),
            });
        }

        let words: Vec<ColorWord> = self
            .pixels
            .iter()
            .map(|&word| scale_word(word, self.brightness))
            .collect();
        let wire = encode_frame(&words, self.invert);
        self.last_frame = Some(Frame {
            words,
            wire,
            brightness: self.brightness,
        });
        self.flush_count += 1;
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::frame_bytes;

    fn claimed(config: StripConfig) -> SimulatedTransport {
        let mut sim = SimulatedTransport::from_config(&config).unwrap();
        sim.initialize().unwrap();
        sim
    }

    #[test]
    fn test_from_config_claims_nothing() {
        let sim = SimulatedTransport::from_config(&StripConfig::new(4)).unwrap();
        assert!(!sim.is_claimed());
        assert_eq!(sim.pixel_count(), 4);
        assert_eq!(sim.family(), TransportFamily::Spi);
        assert!(sim.pixels().iter().all(|&word| word == ColorWord::OFF));
    }

    #[test]
    fn test_from_config_rejects_invalid_pin() {
        let result = SimulatedTransport::from_config(&StripConfig::new(4).with_pin(3));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_second_initialize_reports_claimed_resource() {
        let mut sim = claimed(StripConfig::new(1));
        assert!(matches!(
            sim.initialize(),
            Err(Error::ResourceUnavailable {
                family: TransportFamily::Spi,
                ..
            })
        ));
    }

    #[test]
    fn test_claim_error_is_reported_once() {
        let mut sim = SimulatedTransport::from_config(&StripConfig::new(1)).unwrap();
        sim.claim_error = Some("spidev0.0 missing");
        let err = sim.initialize().unwrap_err();
        assert_eq!(
            err,
            Error::ResourceUnavailable {
                family: TransportFamily::Spi,
                reason: "spidev0.0 missing".into(),
            }
        );
        assert!(sim.initialize().is_ok());
    }

    #[test]
    fn test_out_of_range_write_is_ignored() {
        let mut sim = claimed(StripConfig::new(2));
        sim.set_raw_pixel(2, ColorWord(0xFFFF_FFFF));
        sim.set_raw_pixel(usize::MAX, ColorWord(0xFFFF_FFFF));
        assert_eq!(sim.pixels(), [ColorWord::OFF, ColorWord::OFF]);
        assert_eq!(sim.raw_pixel(2), None);
    }

    #[test]
    fn test_flush_before_initialize_fails() {
        let mut sim = SimulatedTransport::from_config(&StripConfig::new(1)).unwrap();
        assert_eq!(sim.flush(), Err(Error::NotStarted));
        assert_eq!(sim.flush_count(), 0);
    }

    #[test]
    fn test_flush_records_encoded_frame() {
        let mut sim = claimed(StripConfig::new(3).with_invert(false));
        sim.set_raw_pixel(1, ColorWord(0x8000_0000));
        sim.flush().unwrap();

        let frame = sim.last_frame().unwrap();
        assert_eq!(frame.wire.len(), frame_bytes(3));
        assert_eq!(frame.wire[12..15], [0xD2, 0x49, 0x24]);
        assert_eq!(sim.flush_count(), 1);
    }

    #[test]
    fn test_brightness_applies_at_next_flush() {
        let mut sim = claimed(StripConfig::new(1));
        sim.set_raw_pixel(0, ColorWord::pack(200, 0, 0, 0));
        sim.flush().unwrap();

        sim.set_brightness(127);
        assert_eq!(sim.brightness(), 127);
        // Noch der alte Frame
        assert_eq!(sim.last_frame().unwrap().words[0], ColorWord::pack(200, 0, 0, 0));
        // Buffer bleibt unskaliert
        assert_eq!(sim.raw_pixel(0), Some(ColorWord::pack(200, 0, 0, 0)));

        sim.flush().unwrap();
        let frame = sim.last_frame().unwrap();
        assert_eq!(frame.words[0], ColorWord::pack(100, 0, 0, 0));
        assert_eq!(frame.brightness, 127);
    }

    #[test]
    fn test_fail_next_flush_recovers() {
        let mut sim = claimed(StripConfig::new(1));
        sim.fail_next_flush = true;
        assert!(matches!(sim.flush(), Err(Error::Transfer { .. })));
        assert_eq!(sim.flush_count(), 0);
        assert!(sim.flush().is_ok());
        assert_eq!(sim.flush_count(), 1);
    }
}
