//! All-pairs gravity step
//!
//! CPU version of the compute kernel in `galaxy-simulation`. Both follow the
//! same force law, softening, Euler update and lighting law, so this one is
//! used to check the GPU results and as a fallback backend.
//!
//! The update is semi-implicit Euler: velocity first, then position with the
//! new velocity. It is not symplectic and slowly drifts in energy over long
//! runs, which is fine for a visual simulation.

use crate::constants::*;
use crate::error::{ConfigError, Result};
use crate::field::StarField;
use crate::parallel::ParallelFor;
use glam::{Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityParams {
    pub g: f32,
    pub particle_mass: f32,
    pub delta_time: f32,
    /// Added to the squared distance before the 3/2 power
    pub softening: f32,
    pub light_strength: f32,
    pub light_decay: f32,
    pub light_radius: f32,
}

impl GravityParams {
    /// Defaults with the particle mass scaled so the total mass stays constant
    /// (`10` per `2000` particles).
    pub fn for_particle_count(particle_count: usize) -> Self {
        Self {
            particle_mass: default_particle_mass(particle_count),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("g", self.g, self.g >= 0.0),
            ("particle_mass", self.particle_mass, self.particle_mass >= 0.0),
            ("delta_time", self.delta_time, self.delta_time >= 0.0),
            ("softening", self.softening, self.softening > 0.0),
            ("light_strength", self.light_strength, self.light_strength >= 0.0),
            (
                "light_decay",
                self.light_decay,
                (0.0..=1.0).contains(&self.light_decay),
            ),
            ("light_radius", self.light_radius, self.light_radius >= 0.0),
        ];
        for (name, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

impl Default for GravityParams {
    fn default() -> Self {
        Self {
            g: G,
            particle_mass: default_particle_mass(PARTICLE_COUNT),
            delta_time: DELTA_TIME,
            softening: SOFTENING,
            light_strength: LIGHT_STRENGTH,
            light_decay: LIGHT_DECAY,
            light_radius: LIGHT_RADIUS,
        }
    }
}

pub fn default_particle_mass(particle_count: usize) -> f32 {
    if particle_count == 0 {
        return MASS_PER_2000_PARTICLES;
    }
    MASS_PER_2000_PARTICLES / (particle_count as f32 / 2000.0)
}

/// What particle `i` feels from every other particle this step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interaction {
    pub acceleration: Vec3,
    /// Sum of `G * mass / (d² + softening)` over neighbours within `light_radius`
    pub encounter: f32,
}

/// Pairwise accumulation for one particle. Skips `j == i`. An `i` past the
/// end of `positions` feels nothing.
pub fn interaction(i: usize, positions: &[[f32; 4]], params: &GravityParams) -> Interaction {
    let Some(own) = positions.get(i) else {
        return Interaction::default();
    };
    let pi = Vec4::from_array(*own).truncate();
    let gm = params.g * params.particle_mass;
    let light_radius_sq = params.light_radius * params.light_radius;

    let mut acceleration = Vec3::ZERO;
    let mut encounter = 0.0;

    for (j, other) in positions.iter().enumerate() {
        if j == i {
            continue;
        }
        let d = Vec4::from_array(*other).truncate() - pi;
        let dist_sq = d.length_squared();
        let soft = (dist_sq + params.softening).max(f32::MIN_POSITIVE);
        acceleration += d * (gm / (soft * soft.sqrt()));
        if dist_sq < light_radius_sq {
            encounter += gm / soft;
        }
    }

    Interaction {
        acceleration,
        encounter,
    }
}

/// Post-step state of one particle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lane {
    pub position: [f32; 4],
    pub velocity: [f32; 4],
    pub light: [f32; 4],
}

/// Advance particle `i` by one step, reading only the frozen `positions`
/// snapshot and its own velocity/light slot. The padding components pass
/// through untouched.
///
/// # Panics
///
/// Panics if `i` is out of bounds for `positions`.
pub fn advance_particle(
    i: usize,
    positions: &[[f32; 4]],
    velocity: [f32; 4],
    light: [f32; 4],
    params: &GravityParams,
) -> Lane {
    let interaction = interaction(i, positions, params);

    let mut next_light = light;
    next_light[0] = light[0] * params.light_decay + params.light_strength * interaction.encounter;

    let position = positions[i];
    // Zero dt leaves both arrays bit-for-bit identical
    if params.delta_time == 0.0 {
        return Lane {
            position,
            velocity,
            light: next_light,
        };
    }

    let dt = params.delta_time;
    let v = Vec4::from_array(velocity).truncate() + interaction.acceleration * dt;
    let p = Vec4::from_array(position).truncate() + v * dt;

    Lane {
        position: p.extend(position[3]).to_array(),
        velocity: v.extend(velocity[3]).to_array(),
        light: next_light,
    }
}

/// Steps a [`StarField`] through any [`ParallelFor`] backend.
///
/// Every lane reads the same frozen position snapshot and writes one slot of
/// a scratch buffer. The scratch is copied back only after the dispatch has
/// returned, so no lane ever sees a position from the step in progress.
#[derive(Debug, Clone)]
pub struct GravityIntegrator {
    tile_size: usize,
    scratch: Vec<Lane>,
}

impl GravityIntegrator {
    pub fn new(tile_size: usize) -> Self {
        Self {
            tile_size: tile_size.max(1),
            scratch: Vec::new(),
        }
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    pub fn step<P: ParallelFor>(&mut self, field: &mut StarField, params: &GravityParams, backend: &P) {
        let n = field.len();
        if n == 0 {
            return;
        }
        self.scratch.resize(n, Lane::default());

        {
            let positions = field.positions();
            let velocities = field.velocities();
            let lighting = field.lighting();
            backend.run(&mut self.scratch, self.tile_size, |i, lane| {
                *lane = advance_particle(i, positions, velocities[i], lighting[i], params);
            });
        }

        let (positions, velocities, lighting) = field.dynamics_mut();
        for (i, lane) in self.scratch.iter().enumerate() {
            positions[i] = lane.position;
            velocities[i] = lane.velocity;
            lighting[i] = lane.light;
        }
    }
}

impl Default for GravityIntegrator {
    fn default() -> Self {
        Self::new(TILE_SIZE)
    }
}
