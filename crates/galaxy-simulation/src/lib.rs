//! # Galaxy Simulation Engine
//!
//! GPU backend for the galaxy: the all-pairs gravity step as a WGSL compute
//! shader, dispatched in fixed-size workgroups over buffers the renderer can
//! bind directly.

pub mod device;
pub mod error;
pub mod params;
pub mod simulation;

pub use device::*;
pub use error::{Result, SimulationError};
pub use params::*;
pub use simulation::*;
