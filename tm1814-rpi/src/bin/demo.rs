// Farb-Test für einen TM1814-Strip
//
// Zeigt Rot, Grün, Blau und Weiß nacheinander auf allen Pixeln und schaltet
// danach alles aus. Konfiguration über TM1814_* Umgebungsvariablen.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tm1814_rpi::config::{Backend, TEST_STEP_MS, load_from_env};
use tm1814_rpi::{HardwareStrip, SimulatedStrip, Tm1814, Transport};

/// Test-Farben als (Name, r, g, b, w)
const TEST_COLORS: [(&str, u8, u8, u8, u8); 4] = [
    ("red", 255, 0, 0, 0),
    ("green", 0, 255, 0, 0),
    ("blue", 0, 0, 255, 0),
    ("white", 0, 0, 0, 255),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_from_env().context("could not read strip configuration")?;
    info!(backend = %settings.backend, pixels = settings.strip.num_pixels(), "starting color test");

    // Backend wird explizit gewählt, kein Fallback bei fehlender Hardware
    match settings.backend {
        Backend::Ws281x => run(HardwareStrip::new(settings.strip)?),
        Backend::Simulated => run(SimulatedStrip::new(settings.strip)?),
    }
}

fn run<T: Transport>(mut strip: Tm1814<T>) -> anyhow::Result<()> {
    strip
        .begin()
        .with_context(|| format!("could not claim the {} transport", strip.family()))?;

    let result = show_test_colors(&mut strip);

    // LEDs immer ausschalten, auch nach einem Fehler
    strip.cleanup();
    result
}

fn show_test_colors<T: Transport>(strip: &mut Tm1814<T>) -> anyhow::Result<()> {
    for (name, r, g, b, w) in TEST_COLORS {
        for index in 0..strip.pixel_count() {
            strip.set_pixel(index, r, g, b, w)?;
        }
        strip.show()?;
        info!(color = name, "frame shown");
        thread::sleep(Duration::from_millis(TEST_STEP_MS));
    }
    Ok(())
}
