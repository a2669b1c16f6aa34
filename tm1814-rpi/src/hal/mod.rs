// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt den Hardware-Zugriff hinter dem Transport-Trait
// aus tm1814-core.

pub mod ws281x;

pub use ws281x::{Ws281xTransport, from_raw_color, to_raw_color};
