// Library-Root: Raspberry-Pi-Anbindung für den TM1814-Treiber

// Module
pub mod config;
pub mod hal;

// Re-exports von tm1814-core
pub use tm1814_core::{
    ColorWord, ConfigError, DriverState, Error, SimulatedTransport, StripConfig, Tm1814,
    Transport, TransportFamily,
};

pub use hal::Ws281xTransport;

/// Treiber auf echter Hardware
pub type HardwareStrip = Tm1814<Ws281xTransport>;

/// Treiber auf dem simulierten Transport
pub type SimulatedStrip = Tm1814<SimulatedTransport>;
