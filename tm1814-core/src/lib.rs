//! TM1814 Core - Platform-agnostic Driver, Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert den Transport-Trait, das WRGB-Packen, die Leitungs-Kodierung,
//! einen simulierten Transport und den Treiber selbst.

#![no_std]

extern crate alloc;

pub mod driver;
pub mod error;
pub mod logic;
pub mod sim;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use driver::Tm1814;
pub use error::{ConfigError, Error};
pub use logic::{encode_frame, frame_bytes, frame_duration_us, pack_wrgb, unpack_wrgb};
pub use sim::{Frame, SimulatedTransport};
pub use traits::Transport;
pub use types::{
    ColorWord, DriverState, FREQ_HZ, RESET_GAP_US, STRIP_TYPE, StripConfig, StripType,
    TransportFamily,
};
