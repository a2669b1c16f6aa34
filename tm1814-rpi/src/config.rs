// Projekt-Konfiguration: Standardwerte und Umgebungsvariablen
//
// Werte kommen aus der Umgebung (optional über ein .env file).
// Fehlende Variablen nehmen den Standardwert, unlesbare sind ein Fehler.

use std::str::FromStr;

use derive_more::{Display, Error};
use tracing::debug;

use tm1814_core::StripConfig;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 60;

/// Dauer eines Schritts im Farb-Test in Millisekunden
pub const TEST_STEP_MS: u64 = 1000;

// ============================================================================
// Umgebungsvariablen
// ============================================================================

pub const ENV_NUM_PIXELS: &str = "TM1814_NUM_PIXELS";
pub const ENV_PIN: &str = "TM1814_PIN";
pub const ENV_DMA: &str = "TM1814_DMA";
pub const ENV_INVERT: &str = "TM1814_INVERT";
pub const ENV_CHANNEL: &str = "TM1814_CHANNEL";
pub const ENV_BRIGHTNESS: &str = "TM1814_BRIGHTNESS";
pub const ENV_BACKEND: &str = "TM1814_BACKEND";

/// Fehler beim Lesen der Konfiguration
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{key}={value:?} is not a valid {expected}")]
pub struct EnvError {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Welcher Transport den Strip treibt
///
/// Wird explizit gewählt, es gibt keinen automatischen Fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Backend {
    /// rpi_ws281x auf echter Hardware
    #[default]
    #[display("ws281x")]
    Ws281x,
    /// In-memory Simulation ohne Hardware
    #[display("sim")]
    Simulated,
}

impl FromStr for Backend {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "ws281x" => Ok(Self::Ws281x),
            "sim" => Ok(Self::Simulated),
            _ => Err(()),
        }
    }
}

/// Vollständige Laufzeit-Konfiguration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub strip: StripConfig,
    pub backend: Backend,
}

/// Lädt .env (falls vorhanden) und liest die Konfiguration aus der Umgebung
pub fn load_from_env() -> Result<Settings, EnvError> {
    if let Err(err) = dotenvy::dotenv() {
        debug!(%err, "no .env file loaded");
    }
    from_lookup(|key| std::env::var(key).ok())
}

/// Liest die Konfiguration über eine beliebige Lookup-Funktion
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings, EnvError> {
    let defaults = StripConfig::new(LED_COUNT);

    let num_pixels = parse(&lookup, ENV_NUM_PIXELS, "pixel count")?.unwrap_or(LED_COUNT);
    let pin = parse(&lookup, ENV_PIN, "GPIO pin")?.unwrap_or(defaults.pin());
    let dma = parse(&lookup, ENV_DMA, "DMA channel")?.unwrap_or(defaults.dma());
    let invert = parse(&lookup, ENV_INVERT, "boolean")?.unwrap_or(defaults.invert());
    let channel = parse(&lookup, ENV_CHANNEL, "channel")?.unwrap_or(defaults.channel());
    let brightness =
        parse(&lookup, ENV_BRIGHTNESS, "brightness (0-255)")?.unwrap_or(defaults.brightness());
    let backend = parse(&lookup, ENV_BACKEND, "backend (ws281x or sim)")?.unwrap_or_default();

    let strip = StripConfig::new(num_pixels)
        .with_pin(pin)
        .with_dma(dma)
        .with_invert(invert)
        .with_channel(channel)
        .with_brightness(brightness);

    Ok(Settings { strip, backend })
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    expected: &'static str,
) -> Result<Option<T>, EnvError> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value.trim().parse().map(Some).map_err(|_| EnvError {
        key,
        value,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let settings = from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.strip, StripConfig::new(LED_COUNT));
        assert_eq!(settings.backend, Backend::Ws281x);
    }

    #[test]
    fn test_environment_overrides() {
        let settings = from_lookup(lookup_from(&[
            (ENV_NUM_PIXELS, "144"),
            (ENV_PIN, "18"),
            (ENV_INVERT, "false"),
            (ENV_BRIGHTNESS, " 64 "),
            (ENV_BACKEND, "sim"),
        ]))
        .unwrap();
        assert_eq!(settings.strip.num_pixels(), 144);
        assert_eq!(settings.strip.pin(), 18);
        assert!(!settings.strip.invert());
        assert_eq!(settings.strip.brightness(), 64);
        assert_eq!(settings.backend, Backend::Simulated);
    }

    #[test]
    fn test_unparsable_value_is_an_error() {
        let err = from_lookup(lookup_from(&[(ENV_BRIGHTNESS, "300")])).unwrap_err();
        assert_eq!(err.key, ENV_BRIGHTNESS);
        assert_eq!(err.value, "300");
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let err = from_lookup(lookup_from(&[(ENV_BACKEND, "mock")])).unwrap_err();
        assert_eq!(err.key, ENV_BACKEND);
    }
}
