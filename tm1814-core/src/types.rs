//! Core Types für den TM1814-Treiber
//!
//! Datenstrukturen ohne Hardware-Dependencies

use derive_more::Display;
use rgb::RGB8;
use smart_leds_trait::{RGBW, White};

use crate::error::ConfigError;
use crate::logic::{pack_wrgb, unpack_wrgb};

// ============================================================================
// Chip-Konstanten (TM1814)
// ============================================================================

/// Bitrate der Datenleitung in Hz (fest für die TM1814-Familie)
pub const FREQ_HZ: u32 = 800_000;

/// Datenbits pro Pixel (W, R, G, B je 8 Bit)
pub const BITS_PER_PIXEL: u32 = 32;

/// Reset/Latch-Pause nach dem letzten Bit in Mikrosekunden
pub const RESET_GAP_US: u32 = 280;

/// Strip-Typ, den die Backing-Library erwartet.
///
/// Muss zu [`ColorWord::pack`] passen (WRGB-Reihenfolge).
pub const STRIP_TYPE: StripType = StripType::Sk6812Rgbw;

/// Größte Pixelzahl (rpi_ws281x zählt LEDs als C `int`)
pub const MAX_PIXELS: usize = i32::MAX as usize;

/// Höchster DMA-Kanal des BCM283x
pub const MAX_DMA: u8 = 14;

/// DMA-Kanal 5 korrumpiert auf mehreren Pi-Modellen die SD-Karte
pub const FORBIDDEN_DMA: u8 = 5;

pub const DEFAULT_BRIGHTNESS: u8 = 255;
pub const DEFAULT_INVERT: bool = true;
pub const DEFAULT_PIN: u8 = 10;
pub const DEFAULT_DMA: u8 = 10;
pub const DEFAULT_CHANNEL: u8 = 0;

// ============================================================================
// Strip-Typ und Transport-Familie
// ============================================================================

/// Kanal-Layout des Strips
///
/// Der TM1814 hat keinen eigenen Typ in rpi_ws281x. `SK6812_STRIP_RGBW`
/// nutzt dieselbe 32-Bit-Struktur und ein kompatibles Timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StripType {
    #[display("SK6812_STRIP_RGBW")]
    Sk6812Rgbw,
}

impl StripType {
    /// Wert der C-Konstante in `ws2811.h`
    pub const fn raw(self) -> u32 {
        match self {
            Self::Sk6812Rgbw => 0x1810_0800,
        }
    }
}

/// Physikalischer Übertragungsweg, bestimmt durch den GPIO-Pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TransportFamily {
    #[display("SPI")]
    Spi,
    #[display("PWM")]
    Pwm,
    #[display("PCM")]
    Pcm,
}

impl TransportFamily {
    /// Ordnet einen BCM-Pin seiner Transport-Familie zu
    ///
    /// - 10: SPI (MOSI)
    /// - 12, 18: PWM0 / 13, 19: PWM1
    /// - 21: PCM (DOUT)
    pub const fn from_pin(pin: u8) -> Option<Self> {
        match pin {
            10 => Some(Self::Spi),
            12 | 13 | 18 | 19 => Some(Self::Pwm),
            21 => Some(Self::Pcm),
            _ => None,
        }
    }

    /// Kanal, auf dem ein Pin laufen muss
    pub const fn channel_for_pin(pin: u8) -> Option<u8> {
        match pin {
            10 | 12 | 18 | 21 => Some(0),
            13 | 19 => Some(1),
            _ => None,
        }
    }

    /// Systemvoraussetzung, die außerhalb des Prozesses erfüllt sein muss
    pub const fn deployment_hint(self) -> &'static str {
        match self {
            Self::Spi => {
                "enable SPI (dtparam=spi=on) and raise spidev.bufsiz to at least the frame size"
            }
            Self::Pwm => "disable analog audio (dtparam=audio=off) when driving GPIO 18 or 12",
            Self::Pcm => "make sure no I2S audio device is active",
        }
    }
}

// ============================================================================
// ColorWord
// ============================================================================

/// Gepacktes 32-Bit-Pixel: `(W << 24) | (R << 16) | (G << 8) | B`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorWord(pub u32);

impl ColorWord {
    pub const OFF: Self = Self(0);

    pub const fn pack(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self(pack_wrgb(r, g, b, w))
    }

    /// Zerlegt das Wort wieder in `(r, g, b, w)`
    pub const fn unpack(self) -> (u8, u8, u8, u8) {
        unpack_wrgb(self.0)
    }

    pub const fn red(self) -> u8 {
        self.unpack().0
    }

    pub const fn green(self) -> u8 {
        self.unpack().1
    }

    pub const fn blue(self) -> u8 {
        self.unpack().2
    }

    pub const fn white(self) -> u8 {
        self.unpack().3
    }

    pub const fn rgb(self) -> RGB8 {
        let (r, g, b, _) = self.unpack();
        RGB8 { r, g, b }
    }
}

impl From<u32> for ColorWord {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ColorWord> for u32 {
    fn from(word: ColorWord) -> Self {
        word.0
    }
}

impl From<RGB8> for ColorWord {
    fn from(color: RGB8) -> Self {
        Self::pack(color.r, color.g, color.b, 0)
    }
}

impl From<RGBW<u8>> for ColorWord {
    fn from(color: RGBW<u8>) -> Self {
        Self::pack(color.r, color.g, color.b, color.a.0)
    }
}

impl From<ColorWord> for RGBW<u8> {
    fn from(word: ColorWord) -> Self {
        let (r, g, b, w) = word.unpack();
        RGBW {
            r,
            g,
            b,
            a: White(w),
        }
    }
}

// ============================================================================
// StripConfig
// ============================================================================

/// Konfiguration eines Strips, fest ab Konstruktion
///
/// Frequenz und Strip-Typ kommen aus den Chip-Konstanten und sind nicht
/// setzbar.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct StripConfig {
    num_pixels: usize,
    #[cfg_attr(feature = "serde", serde(default = "serde_defaults::brightness"))]
    brightness: u8,
    #[cfg_attr(feature = "serde", serde(default = "serde_defaults::invert"))]
    invert: bool,
    #[cfg_attr(feature = "serde", serde(default = "serde_defaults::pin"))]
    pin: u8,
    #[cfg_attr(feature = "serde", serde(default = "serde_defaults::dma"))]
    dma: u8,
    #[cfg_attr(feature = "serde", serde(default = "serde_defaults::channel"))]
    channel: u8,
    #[cfg_attr(feature = "serde", serde(skip, default = "serde_defaults::freq_hz"))]
    freq_hz: u32,
    #[cfg_attr(feature = "serde", serde(skip, default = "serde_defaults::strip_type"))]
    strip_type: StripType,
}

impl StripConfig {
    /// Erstellt eine Konfiguration mit den Standardwerten
    /// (SPI auf GPIO 10, DMA 10, Kanal 0, invertiert, volle Helligkeit)
    pub const fn new(num_pixels: usize) -> Self {
        Self {
            num_pixels,
            brightness: DEFAULT_BRIGHTNESS,
            invert: DEFAULT_INVERT,
            pin: DEFAULT_PIN,
            dma: DEFAULT_DMA,
            channel: DEFAULT_CHANNEL,
            freq_hz: FREQ_HZ,
            strip_type: STRIP_TYPE,
        }
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    /// `true` bei direkter Verdrahtung oder nicht-invertierendem Pegelwandler,
    /// `false` bei Hardware-Inverter (z.B. 74HCT04)
    #[must_use]
    pub const fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    #[must_use]
    pub const fn with_pin(mut self, pin: u8) -> Self {
        self.pin = pin;
        self
    }

    #[must_use]
    pub const fn with_dma(mut self, dma: u8) -> Self {
        self.dma = dma;
        self
    }

    #[must_use]
    pub const fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub const fn num_pixels(&self) -> usize {
        self.num_pixels
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn invert(&self) -> bool {
        self.invert
    }

    pub const fn pin(&self) -> u8 {
        self.pin
    }

    pub const fn dma(&self) -> u8 {
        self.dma
    }

    pub const fn channel(&self) -> u8 {
        self.channel
    }

    pub const fn freq_hz(&self) -> u32 {
        self.freq_hz
    }

    pub const fn strip_type(&self) -> StripType {
        self.strip_type
    }

    /// Transport-Familie des Pins, `None` bei unbekanntem Pin
    pub const fn family(&self) -> Option<TransportFamily> {
        TransportFamily::from_pin(self.pin)
    }

    /// Prüft Pin, Kanal, DMA und Pixelzahl
    ///
    /// Gibt bei Erfolg die Transport-Familie zurück.
    pub fn validate(&self) -> Result<TransportFamily, ConfigError> {
        if self.num_pixels == 0 {
            return Err(ConfigError::ZeroPixels);
        }
        if self.num_pixels > MAX_PIXELS {
            return Err(ConfigError::TooManyPixels {
                count: self.num_pixels,
                max: MAX_PIXELS,
            });
        }

        let family = TransportFamily::from_pin(self.pin)
            .ok_or(ConfigError::UnsupportedPin { pin: self.pin })?;

        if self.channel > 1 {
            return Err(ConfigError::InvalidChannel {
                channel: self.channel,
            });
        }
        if let Some(expected) = TransportFamily::channel_for_pin(self.pin) {
            if expected != self.channel {
                return Err(ConfigError::ChannelMismatch {
                    pin: self.pin,
                    family,
                    channel: self.channel,
                    expected,
                });
            }
        }

        if self.dma > MAX_DMA || self.dma == FORBIDDEN_DMA {
            return Err(ConfigError::DmaChannel { dma: self.dma });
        }

        Ok(family)
    }
}

#[cfg(feature = "serde")]
mod serde_defaults {
    use super::*;

    pub(super) const fn brightness() -> u8 {
        DEFAULT_BRIGHTNESS
    }

    pub(super) const fn invert() -> bool {
        DEFAULT_INVERT
    }

    pub(super) const fn pin() -> u8 {
        DEFAULT_PIN
    }

    pub(super) const fn dma() -> u8 {
        DEFAULT_DMA
    }

    pub(super) const fn channel() -> u8 {
        DEFAULT_CHANNEL
    }

    pub(super) const fn freq_hz() -> u32 {
        FREQ_HZ
    }

    pub(super) const fn strip_type() -> StripType {
        STRIP_TYPE
    }
}

// ============================================================================
// Treiber-Zustand
// ============================================================================

/// Lebenszyklus des Treibers
///
/// `Configured --begin--> Active --cleanup--> Released`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DriverState {
    /// Konfiguration geprüft, Hardware noch nicht belegt
    Configured,
    /// Hardware belegt, Pixel-Operationen erlaubt
    Active,
    /// Aufgeräumt, alle Pixel aus
    Released,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_selects_family() {
        assert_eq!(TransportFamily::from_pin(10), Some(TransportFamily::Spi));
        for pin in [12, 13, 18, 19] {
            assert_eq!(TransportFamily::from_pin(pin), Some(TransportFamily::Pwm));
        }
        assert_eq!(TransportFamily::from_pin(21), Some(TransportFamily::Pcm));
        assert_eq!(TransportFamily::from_pin(4), None);
    }

    #[test]
    fn test_defaults_match_chip_family() {
        let config = StripConfig::new(30);
        assert_eq!(config.pin(), 10);
        assert_eq!(config.dma(), 10);
        assert_eq!(config.channel(), 0);
        assert_eq!(config.brightness(), 255);
        assert!(config.invert());
        assert_eq!(config.freq_hz(), 800_000);
        assert_eq!(config.strip_type(), StripType::Sk6812Rgbw);
        assert_eq!(config.validate(), Ok(TransportFamily::Spi));
    }

    #[test]
    fn test_validate_rejects_zero_pixels() {
        assert_eq!(StripConfig::new(0).validate(), Err(ConfigError::ZeroPixels));
    }

    #[test]
    fn test_validate_rejects_unknown_pin() {
        let config = StripConfig::new(8).with_pin(17);
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedPin { pin: 17 })
        );
    }

    #[test]
    fn test_validate_pwm1_pin_needs_channel_1() {
        let wrong = StripConfig::new(8).with_pin(13);
        assert_eq!(
            wrong.validate(),
            Err(ConfigError::ChannelMismatch {
                pin: 13,
                family: TransportFamily::Pwm,
                channel: 0,
                expected: 1,
            })
        );
        let right = StripConfig::new(8).with_pin(13).with_channel(1);
        assert_eq!(right.validate(), Ok(TransportFamily::Pwm));
    }

    #[test]
    fn test_validate_spi_only_on_channel_0() {
        let config = StripConfig::new(8).with_channel(1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ChannelMismatch { expected: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_channel_2() {
        let config = StripConfig::new(8).with_channel(2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidChannel { channel: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_dma_5_and_out_of_range() {
        for dma in [5, 15, 200] {
            let config = StripConfig::new(8).with_dma(dma);
            assert_eq!(config.validate(), Err(ConfigError::DmaChannel { dma }));
        }
        assert!(StripConfig::new(8).with_dma(14).validate().is_ok());
    }

    #[test]
    fn test_color_word_rgbw_conversion() {
        let word = ColorWord::pack(1, 2, 3, 4);
        let rgbw: RGBW<u8> = word.into();
        assert_eq!((rgbw.r, rgbw.g, rgbw.b, rgbw.a.0), (1, 2, 3, 4));
        assert_eq!(ColorWord::from(rgbw), word);
    }

    #[test]
    fn test_color_word_from_rgb8_has_no_white() {
        let word = ColorWord::from(RGB8 { r: 9, g: 8, b: 7 });
        assert_eq!(word, ColorWord(0x0009_0807));
        assert_eq!(word.white(), 0);
        assert_eq!(word.rgb(), RGB8 { r: 9, g: 8, b: 7 });
    }
}
