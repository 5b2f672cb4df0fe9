//! Startup configuration errors
//!
//! Numeric trouble during a run (coincident particles, a seed sitting on the
//! arm axis) is absorbed by softening and guarded math and never shows up here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("particle count is zero but {centers} galaxy center(s) were configured")]
    NoParticles { centers: usize },

    #[error("{particles} particles requested but no galaxy centers were configured")]
    NoCenters { particles: usize },

    #[error("spectral table has no entries")]
    EmptySpectralTable,

    #[error("spectral class {index} has invalid frequency weight {weight}")]
    InvalidFrequency { index: usize, weight: f32 },

    #[error("galaxy shape needs at least one spiral arm")]
    NoArms,

    #[error("tile size must be non-zero")]
    ZeroTileSize,

    #[error("{name} is out of range: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
