//! Drifting particle field that links nearby points into transient
//! constellations, with click-triggered propagation waves.

mod app;
pub mod config;
pub mod palette;
pub mod sim;

pub use app::ConstellationApp;
