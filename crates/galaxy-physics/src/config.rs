//! Simulation configuration and startup validation

use crate::constants::*;
use crate::error::{ConfigError, Result};
use crate::galaxy::GalaxyShape;
use crate::gravity::GravityParams;
use crate::spectral::SpectralTable;
use crate::velocity::VelocityBands;
use glam::Vec3;

/// Everything needed to seed and run a star field
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Requested particle count. Each center gets `particle_count / centers.len()`.
    pub particle_count: usize,
    pub centers: Vec<Vec3>,
    pub shape: GalaxyShape,
    pub velocity: VelocityBands,
    pub spectral: SpectralTable,
    pub gravity: GravityParams,
    /// Particles per tile on the CPU backend
    pub tile_size: usize,
    /// `None` seeds from the operating system
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Defaults for `particle_count` particles around a single center
    pub fn with_particle_count(particle_count: usize) -> Self {
        Self {
            particle_count,
            gravity: GravityParams::for_particle_count(particle_count),
            ..Self::default()
        }
    }

    /// Particles per galaxy slice
    pub fn per_galaxy(&self) -> usize {
        if self.centers.is_empty() {
            0
        } else {
            self.particle_count / self.centers.len()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 && !self.centers.is_empty() {
            return Err(ConfigError::NoParticles {
                centers: self.centers.len(),
            });
        }
        if self.particle_count > 0 && self.centers.is_empty() {
            return Err(ConfigError::NoCenters {
                particles: self.particle_count,
            });
        }
        if self.spectral.is_empty() {
            return Err(ConfigError::EmptySpectralTable);
        }
        if self.shape.arm_count == 0 {
            return Err(ConfigError::NoArms);
        }
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        for center in &self.centers {
            if !center.is_finite() {
                let value = [center.x, center.y, center.z]
                    .into_iter()
                    .find(|c| !c.is_finite())
                    .unwrap_or(f32::NAN);
                return Err(ConfigError::InvalidParameter {
                    name: "center",
                    value,
                });
            }
        }
        self.gravity.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            centers: vec![Vec3::from_array(GALAXY_CENTER)],
            shape: GalaxyShape::default(),
            velocity: VelocityBands::default(),
            spectral: SpectralTable::default(),
            gravity: GravityParams::for_particle_count(PARTICLE_COUNT),
            tile_size: TILE_SIZE,
            seed: None,
        }
    }
}
