//! Index-aligned particle arrays
//!
//! Index `i` is the same star in every array. Each record is four `f32`s so the
//! arrays can be bound as std430 storage buffers without reformatting; only the
//! components documented on each accessor carry meaning.

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::galaxy::{GalaxyGenerator, RegionCounts};
use crate::random::RandomSource;
use crate::spectral::{radius_for_type, StarClassifier};
use crate::velocity::VelocityInitializer;
use glam::{Vec3, Vec4};
use rand::Rng;
use std::ops::Range;

/// Contiguous slice of the arrays owned by one galaxy
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxySlice {
    pub center: Vec3,
    pub range: Range<usize>,
}

/// Summary of the current state, for logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub count: usize,
    pub center_of_mass: Vec3,
    pub mean_speed: f32,
    pub kinetic_energy: f32,
    pub max_light: f32,
    /// False if any position or velocity component is NaN or infinite
    pub finite: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarField {
    positions: Vec<[f32; 4]>,
    velocities: Vec<[f32; 4]>,
    lighting: Vec<[f32; 4]>,
    base_colors: Vec<[f32; 4]>,
    radii: Vec<[f32; 4]>,
    star_types: Vec<u32>,
    galaxies: Vec<GalaxySlice>,
}

impl StarField {
    /// Generate, classify and set initial velocities for every galaxy.
    ///
    /// Galaxy `k` owns `k * per_galaxy ..`; when the per-galaxy count does not
    /// split evenly into regions the slices come out slightly shorter and the
    /// field holds fewer than `particle_count` stars.
    pub fn seed<R: Rng>(config: &SimulationConfig, random: &mut RandomSource<R>) -> Result<Self> {
        config.validate()?;

        let generator = GalaxyGenerator::new(config.shape);
        let classifier = StarClassifier::new(config.spectral.clone());
        let initializer = VelocityInitializer::new(config.velocity);
        let per_galaxy = config.per_galaxy();
        let mass = config.gravity.particle_mass;

        let mut field = Self::with_capacity(config.particle_count);

        for &center in &config.centers {
            let start = field.positions.len();
            for position in generator.generate(per_galaxy, center, random) {
                let p = Vec4::from_array(position).truncate();
                let star_type = classifier.sample(random);

                field.positions.push(position);
                field.velocities.push(initializer.velocity(
                    p,
                    center,
                    mass,
                    config.particle_count,
                ));
                field.lighting.push([0.0; 4]);
                field.base_colors.push(classifier.base_color(star_type));
                field.radii.push([radius_for_type(star_type), 0.0, 0.0, 0.0]);
                field.star_types.push(star_type as u32);
            }
            field.galaxies.push(GalaxySlice {
                center,
                range: start..field.positions.len(),
            });
        }

        if field.len() < config.particle_count {
            log::warn!(
                "Requested {} particles, generated {} (per-region counts truncate)",
                config.particle_count,
                field.len()
            );
        }
        let regions = RegionCounts::for_size(per_galaxy, config.shape.arm_count);
        log::info!(
            "Seeded {} stars across {} galaxies",
            field.len(),
            field.galaxies.len()
        );
        log::info!(
            "  per galaxy: {} core, {} outer core, {} arms x {}",
            regions.core,
            regions.outer_core,
            regions.arms,
            regions.per_arm
        );

        Ok(field)
    }

    /// Field from raw positions and velocities. Colors default to white,
    /// radii to 1, lighting to 0, and everything belongs to one galaxy at the
    /// origin.
    ///
    /// # Panics
    ///
    /// Panics if `positions` and `velocities` differ in length.
    pub fn from_dynamics(positions: Vec<[f32; 4]>, velocities: Vec<[f32; 4]>) -> Self {
        assert_eq!(
            positions.len(),
            velocities.len(),
            "positions and velocities must be index-aligned"
        );
        let n = positions.len();
        let white = Vec3::ONE.normalize().extend(1.0).to_array();
        Self {
            positions,
            velocities,
            lighting: vec![[0.0; 4]; n],
            base_colors: vec![white; n],
            radii: vec![[1.0, 0.0, 0.0, 0.0]; n],
            star_types: vec![0; n],
            galaxies: vec![GalaxySlice {
                center: Vec3::ZERO,
                range: 0..n,
            }],
        }
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            velocities: Vec::with_capacity(n),
            lighting: Vec::with_capacity(n),
            base_colors: Vec::with_capacity(n),
            radii: Vec::with_capacity(n),
            star_types: Vec::with_capacity(n),
            galaxies: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// xyz = position, w unused
    pub fn positions(&self) -> &[[f32; 4]] {
        &self.positions
    }

    /// xyz = velocity, w unused
    pub fn velocities(&self) -> &[[f32; 4]] {
        &self.velocities
    }

    /// x = light intensity, yzw unused
    pub fn lighting(&self) -> &[[f32; 4]] {
        &self.lighting
    }

    /// rgb = unit-length tint, a = 1
    pub fn base_colors(&self) -> &[[f32; 4]] {
        &self.base_colors
    }

    /// x = visual radius, yzw unused
    pub fn radii(&self) -> &[[f32; 4]] {
        &self.radii
    }

    /// Spectral table index per star
    pub fn star_types(&self) -> &[u32] {
        &self.star_types
    }

    pub fn galaxies(&self) -> &[GalaxySlice] {
        &self.galaxies
    }

    /// Index of the galaxy owning particle `i`
    pub fn galaxy_of(&self, i: usize) -> Option<usize> {
        self.galaxies.iter().position(|g| g.range.contains(&i))
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec4::from_array(self.positions[i]).truncate()
    }

    pub fn velocity(&self, i: usize) -> Vec3 {
        Vec4::from_array(self.velocities[i]).truncate()
    }

    /// Raw bytes of each array in upload order: positions, velocities,
    /// lighting, base colors, radii. 16-byte stride per record.
    pub fn buffers(&self) -> [&[u8]; 5] {
        [
            bytemuck::cast_slice(&self.positions),
            bytemuck::cast_slice(&self.velocities),
            bytemuck::cast_slice(&self.lighting),
            bytemuck::cast_slice(&self.base_colors),
            bytemuck::cast_slice(&self.radii),
        ]
    }

    /// Mutable position, velocity and lighting arrays. Colors and radii stay
    /// fixed after seeding.
    pub fn dynamics_mut(&mut self) -> (&mut [[f32; 4]], &mut [[f32; 4]], &mut [[f32; 4]]) {
        (&mut self.positions, &mut self.velocities, &mut self.lighting)
    }

    /// Number of stars per spectral type index
    pub fn type_counts(&self, classes: usize) -> Vec<usize> {
        let mut counts = vec![0; classes];
        for &t in &self.star_types {
            if let Some(c) = counts.get_mut(t as usize) {
                *c += 1;
            }
        }
        counts
    }

    pub fn stats(&self, particle_mass: f32) -> FieldStats {
        let n = self.len();
        let mut sum_pos = Vec3::ZERO;
        let mut sum_speed = 0.0;
        let mut kinetic_energy = 0.0;
        let mut max_light = 0.0f32;
        let mut finite = true;

        for i in 0..n {
            let p = self.position(i);
            let v = self.velocity(i);
            finite &= p.is_finite() && v.is_finite();
            sum_pos += p;
            sum_speed += v.length();
            kinetic_energy += 0.5 * particle_mass * v.length_squared();
            max_light = max_light.max(self.lighting[i][0]);
        }

        let denom = n.max(1) as f32;
        FieldStats {
            count: n,
            center_of_mass: sum_pos / denom,
            mean_speed: sum_speed / denom,
            kinetic_energy,
            max_light,
            finite,
        }
    }
}
