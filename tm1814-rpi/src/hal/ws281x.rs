// rpi_ws281x Transport
//
// Treibt den TM1814-Strip über die DMA-Engine von rpi_ws281x.
// Die Library wählt SPI, PWM oder PCM anhand des GPIO-Pins.

use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder, RawColor};
use tracing::{debug, instrument, trace};

use tm1814_core::{
    ColorWord, ConfigError, Error, StripConfig, StripType, Transport, TransportFamily,
    frame_bytes,
};

/// Wandelt ein [`ColorWord`] in das Speicherformat der Library
///
/// `ws2811_led_t` ist ein `uint32_t` (0xWWRRGGBB), im Speicher little-endian:
/// `[B, G, R, W]`.
pub fn to_raw_color(word: ColorWord) -> RawColor {
    word.0.to_le_bytes()
}

/// Umkehrung von [`to_raw_color`]
pub fn from_raw_color(raw: RawColor) -> ColorWord {
    ColorWord(u32::from_le_bytes(raw))
}

fn ws281x_strip_type(strip_type: StripType) -> rs_ws281x::StripType {
    match strip_type {
        StripType::Sk6812Rgbw => rs_ws281x::StripType::Sk6812Rgbw,
    }
}

/// Real Hardware Transport
///
/// Hält einen eigenen Buffer; der `Controller` der Library entsteht erst in
/// `initialize()`, weil er DMA-Kanal und Pin sofort belegt.
pub struct Ws281xTransport {
    config: StripConfig,
    family: TransportFamily,
    pixels: Vec<ColorWord>,
    brightness: u8,
    controller: Option<Controller>,
}

impl Ws281xTransport {
    pub fn is_claimed(&self) -> bool {
        self.controller.is_some()
    }

    #[instrument(skip_all)]
    fn build_controller(&self) -> Result<Controller, Error> {
        let count = i32::try_from(self.pixels.len()).map_err(|_| ConfigError::TooManyPixels {
            count: self.pixels.len(),
            max: i32::MAX as usize,
        })?;

        debug!(
            pin = self.config.pin(),
            dma = self.config.dma(),
            channel = self.config.channel(),
            invert = self.config.invert(),
            count,
            "building rpi_ws281x controller"
        );

        ControllerBuilder::new()
            .freq(self.config.freq_hz())
            .dma(i32::from(self.config.dma()))
            .channel(
                usize::from(self.config.channel()),
                ChannelBuilder::new()
                    .pin(i32::from(self.config.pin()))
                    .count(count)
                    .strip_type(ws281x_strip_type(self.config.strip_type()))
                    .invert(self.config.invert())
                    .brightness(self.brightness)
                    .build(),
            )
            .build()
            .map_err(|err| Error::ResourceUnavailable {
                family: self.family,
                reason: self.unavailable_reason(&err),
            })
    }

    fn unavailable_reason(&self, err: &impl core::fmt::Debug) -> String {
        match self.family {
            TransportFamily::Spi => format!(
                "{err:?}, frame needs {} bytes of SPI buffer",
                frame_bytes(self.pixels.len())
            ),
            TransportFamily::Pwm | TransportFamily::Pcm => format!("{err:?}"),
        }
    }
}

impl Transport for Ws281xTransport {
    fn from_config(config: &StripConfig) -> Result<Self, Error> {
        let family = config.validate()?;
        Ok(Self {
            config: config.clone(),
            family,
            pixels: vec![ColorWord::OFF; config.num_pixels()],
            brightness: config.brightness(),
            controller: None,
        })
    }

    fn initialize(&mut self) -> Result<(), Error> {
        if self.controller.is_some() {
            return Err(Error::ResourceUnavailable {
                family: self.family,
                reason: "controller already initialized".into(),
            });
        }
        self.controller = Some(self.build_controller()?);
        Ok(())
    }

    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_raw_pixel(&mut self, index: usize, word: ColorWord) {
        match self.pixels.get_mut(index) {
            Some(slot) => *slot = word,
            None => trace!(index, "ws281x write out of range ignored"),
        }
    }

    fn raw_pixel(&self, index: usize) -> Option<ColorWord> {
        self.pixels.get(index).copied()
    }

    /// Kopiert den Buffer in den DMA-Speicher, rendert und wartet auf das Ende
    fn flush(&mut self) -> Result<(), Error> {
        let channel = usize::from(self.config.channel());
        let controller = self.controller.as_mut().ok_or(Error::NotStarted)?;

        // rpi_ws281x skaliert beim Rendern
        controller.set_brightness(channel, self.brightness);
        for (led, word) in controller.leds_mut(channel).iter_mut().zip(&self.pixels) {
            *led = to_raw_color(*word);
        }

        controller
            .render()
            .and_then(|()| controller.wait())
            .map_err(|err| Error::Transfer {
                reason: format!("{err:?}"),
            })
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }
}

// ============================================================================
// Tests
// ============================================================================
