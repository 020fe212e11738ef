//! Particle field simulation and the click-triggered propagation engine.
//!
//! Everything in here is single-threaded and frame-driven: the host calls
//! [`FrameDriver::tick`] once per animation frame and [`FrameDriver::draw`]
//! right after it. Rendering goes through the [`Canvas`] trait so the engine
//! never depends on a concrete painter.

mod canvas;
mod clock;
mod driver;
mod edge_graph;
mod field;
mod particle;
mod viewport;

pub use canvas::Canvas;
pub use clock::{FrameClock, RunHandle};
pub use driver::FrameDriver;
pub use edge_graph::{Edge, EdgeGraph};
pub use field::ParticleField;
pub use particle::Particle;
pub use viewport::Viewport;

#[cfg(test)]
pub(crate) use canvas::{DrawCall, RecordingCanvas};
