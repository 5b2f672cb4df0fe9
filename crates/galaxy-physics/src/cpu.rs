//! CPU simulation driver with the same step/pause contract as the GPU one

use crate::field::StarField;
use crate::gravity::{GravityIntegrator, GravityParams};
use crate::parallel::{ParallelFor, Rayon};

pub struct CpuSimulation<P = Rayon> {
    field: StarField,
    integrator: GravityIntegrator,
    backend: P,
    steps: u64,
}

impl<P: ParallelFor> CpuSimulation<P> {
    pub fn new(field: StarField, tile_size: usize, backend: P) -> Self {
        log::info!(
            "CPU simulation: {} particles, tile size {}",
            field.len(),
            tile_size
        );
        Self {
            field,
            integrator: GravityIntegrator::new(tile_size),
            backend,
            steps: 0,
        }
    }

    /// Advance one step unless paused. Returns once every particle has been
    /// written, so the field is consistent as soon as this returns.
    pub fn step(&mut self, params: &GravityParams, paused: bool) {
        if paused {
            return;
        }
        self.integrator.step(&mut self.field, params, &self.backend);
        self.steps += 1;
    }

    pub fn field(&self) -> &StarField {
        &self.field
    }

    pub fn into_field(self) -> StarField {
        self.field
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
