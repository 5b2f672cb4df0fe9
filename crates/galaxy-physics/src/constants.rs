//! Default constants for the galaxy simulation
//!
//! These are tuning values chosen for a good-looking simulation at the scale of
//! a few hundred world units, not physical constants. Every one of them can be
//! overridden through the configuration structs.

/// Gravitational constant in simulation units
pub const G: f32 = 1.0;

/// Softening term added to squared distances in the force law
pub const SOFTENING: f32 = 1.0;

/// Fixed time step used when the host does not supply frame timing
pub const DELTA_TIME: f32 = 1.0 / 60.0;

/// Total mass budget per 2000 particles (`mass = 10 / (N / 2000)`)
pub const MASS_PER_2000_PARTICLES: f32 = 10.0;

/// Scale applied to the close-encounter sum written into the lighting buffer
pub const LIGHT_STRENGTH: f32 = 0.5;

/// Fraction of last step's light kept before adding this step's encounters
pub const LIGHT_DECAY: f32 = 0.9;

/// Only neighbours closer than this contribute to the lighting scalar
pub const LIGHT_RADIUS: f32 = 10.0;

/// Particles per tile (GPU workgroup size, CPU dispatch chunk)
pub const TILE_SIZE: usize = 64;

/// Default particle count
pub const PARTICLE_COUNT: usize = 100_000;

/// Default location of the single galaxy
pub const GALAXY_CENTER: [f32; 3] = [-500.0, 0.0, 0.0];

// Galaxy shape

/// Core bulge spread along x and z
pub const CORE_SPREAD: f32 = 33.0;

/// Outer core / halo spread along x and z
pub const OUTER_CORE_SPREAD: f32 = 100.0;

/// Vertical spread shared by every region
pub const GALAXY_THICKNESS: f32 = 5.0;

pub const ARM_SPREAD_X: f32 = 100.0;
pub const ARM_SPREAD_Z: f32 = 50.0;
pub const ARM_MEAN_X: f32 = 200.0;
pub const ARM_MEAN_Z: f32 = 100.0;

/// Number of spiral arms
pub const ARM_COUNT: u32 = 2;

/// How many radians an arm winds per `ARM_SPREAD_X` of radius
pub const SPIRAL_WINDING: f32 = 3.0;

// Initial velocity bands

pub const OUTER_SPEED: f32 = 7.5;
pub const DISK_RADIUS: f32 = 200.0;
pub const DISK_SPEED_FACTOR: f32 = 0.05;
pub const CORE_RADIUS: f32 = 66.0;
/// Share of the total mass assumed to sit inside `CORE_RADIUS`
pub const CORE_MASS_FRACTION: f32 = 0.5;
pub const CORE_SPEED_DIVISOR: f32 = 125.0;
pub const INNER_RADIUS: f32 = 33.0;
pub const INNER_SPEED: f32 = 0.0;
