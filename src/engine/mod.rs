//! # Monitoring engine
//!
//! The single-threaded core of Panoptes: the sampling driver plus the window
//! and cooldown state machines it owns.

mod cooldown;
mod sampler;
mod window;

pub use cooldown::CooldownGate;
pub use sampler::Sampler;
pub use window::{ClosedWindow, WindowTracker};
