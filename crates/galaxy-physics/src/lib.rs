//! # Galaxy Physics
//!
//! CPU side of the galaxy simulation: seedable sampling, spectral
//! classification, barred spiral generation, initial orbital velocities and a
//! reference all-pairs gravity step that runs on any [`ParallelFor`] backend.

pub mod config;
pub mod constants;
pub mod cpu;
pub mod error;
pub mod field;
pub mod galaxy;
pub mod gravity;
pub mod parallel;
pub mod random;
pub mod spectral;
pub mod velocity;

pub use config::*;
pub use cpu::*;
pub use error::{ConfigError, Result};
pub use field::*;
pub use galaxy::*;
pub use gravity::*;
pub use parallel::*;
pub use random::*;
pub use spectral::*;
pub use velocity::*;
