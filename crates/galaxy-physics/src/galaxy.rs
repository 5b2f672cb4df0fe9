//! Barred spiral point-cloud generator
//!
//! A galaxy of `n` points is built from three populations:
//! - `n / 4` core bulge points
//! - `n / 4` outer core / halo points
//! - `n / (2 * arms)` points per spiral arm
//!
//! Every coordinate is an independent Gaussian draw. Arm points start from an
//! offset seed cloud and are then wound onto a logarithmic-looking spiral.
//! When `n` does not divide evenly the integer divisions truncate and fewer
//! than `n` points come back.

use crate::constants::*;
use crate::random::RandomSource;
use glam::Vec3;
use rand::Rng;

/// Spread and arm parameters for one galaxy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyShape {
    pub core_spread: f32,
    pub outer_core_spread: f32,
    pub thickness: f32,
    pub arm_spread_x: f32,
    pub arm_spread_z: f32,
    pub arm_mean_x: f32,
    pub arm_mean_z: f32,
    pub arm_count: u32,
    pub spiral_winding: f32,
}

impl Default for GalaxyShape {
    fn default() -> Self {
        Self {
            core_spread: CORE_SPREAD,
            outer_core_spread: OUTER_CORE_SPREAD,
            thickness: GALAXY_THICKNESS,
            arm_spread_x: ARM_SPREAD_X,
            arm_spread_z: ARM_SPREAD_Z,
            arm_mean_x: ARM_MEAN_X,
            arm_mean_z: ARM_MEAN_Z,
            arm_count: ARM_COUNT,
            spiral_winding: SPIRAL_WINDING,
        }
    }
}

/// Which sampling phase produced a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Core,
    OuterCore,
    Arm(u32),
}

/// A generated point relative to its galaxy center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyPoint {
    pub region: Region,
    pub offset: Vec3,
}

/// Per-region counts for a requested size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCounts {
    pub core: usize,
    pub outer_core: usize,
    pub per_arm: usize,
    pub arms: usize,
}

impl RegionCounts {
    pub fn for_size(n: usize, arm_count: u32) -> Self {
        let arms = arm_count as usize;
        Self {
            core: n / 4,
            outer_core: n / 4,
            per_arm: if arms == 0 { 0 } else { n / (2 * arms) },
            arms,
        }
    }

    pub fn total(&self) -> usize {
        self.core + self.outer_core + self.per_arm * self.arms
    }
}

/// Map an arm seed offset onto its spiral.
///
/// The azimuth comes from `atan2`, which is defined for every quadrant and for
/// `x == 0`, so seeds at or behind the axis never produce NaN.
pub fn spiral_point(seed: Vec3, phase: f32, winding: f32, arm_spread_x: f32) -> Vec3 {
    let r = (seed.x * seed.x + seed.z * seed.z).sqrt();
    let mut theta = phase + seed.z.atan2(seed.x);
    if arm_spread_x > 0.0 {
        theta += (r / arm_spread_x) * winding;
    }
    Vec3::new(r * theta.cos(), seed.y, r * theta.sin())
}

/// Stateless galaxy generator
#[derive(Debug, Clone, Default)]
pub struct GalaxyGenerator {
    shape: GalaxyShape,
}

impl GalaxyGenerator {
    pub fn new(shape: GalaxyShape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &GalaxyShape {
        &self.shape
    }

    /// Points tagged with their region, before translation to a center.
    pub fn generate_local<R: Rng>(
        &self,
        n: usize,
        random: &mut RandomSource<R>,
    ) -> Vec<GalaxyPoint> {
        let s = &self.shape;
        let counts = RegionCounts::for_size(n, s.arm_count);
        let mut points = Vec::with_capacity(counts.total());

        for _ in 0..counts.core {
            points.push(GalaxyPoint {
                region: Region::Core,
                offset: Vec3::new(
                    random.gaussian(0.0, s.core_spread),
                    random.gaussian(0.0, s.thickness),
                    random.gaussian(0.0, s.core_spread),
                ),
            });
        }

        for _ in 0..counts.outer_core {
            points.push(GalaxyPoint {
                region: Region::OuterCore,
                offset: Vec3::new(
                    random.gaussian(0.0, s.outer_core_spread),
                    random.gaussian(0.0, s.thickness),
                    random.gaussian(0.0, s.outer_core_spread),
                ),
            });
        }

        for arm in 0..s.arm_count {
            let phase = arm as f32 * std::f32::consts::TAU / s.arm_count as f32;
            for _ in 0..counts.per_arm {
                let seed = Vec3::new(
                    random.gaussian(s.arm_mean_x, s.arm_spread_x),
                    random.gaussian(0.0, s.thickness),
                    random.gaussian(s.arm_mean_z, s.arm_spread_z),
                );
                points.push(GalaxyPoint {
                    region: Region::Arm(arm),
                    offset: spiral_point(seed, phase, s.spiral_winding, s.arm_spread_x),
                });
            }
        }

        points
    }

    /// World-space positions (w = 1) for a galaxy centered on `center`.
    pub fn generate<R: Rng>(
        &self,
        n: usize,
        center: Vec3,
        random: &mut RandomSource<R>,
    ) -> Vec<[f32; 4]> {
        self.generate_local(n, random)
            .into_iter()
            .map(|p| (p.offset + center).extend(1.0).to_array())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_counts_even() {
        let counts = RegionCounts::for_size(1000, 2);
        assert_eq!(counts.core, 250);
        assert_eq!(counts.outer_core, 250);
        assert_eq!(counts.per_arm, 250);
        assert_eq!(counts.total(), 1000);
    }

    #[test]
    fn test_region_counts_truncate() {
        // 1001 / 4 = 250, 1001 / 4 = 250 per arm with two arms
        let counts = RegionCounts::for_size(1001, 2);
        assert_eq!(counts.total(), 1000);

        // Three arms: 1000 / 6 = 166 per arm
        let counts = RegionCounts::for_size(1000, 3);
        assert_eq!(counts.per_arm, 166);
        assert_eq!(counts.total(), 998);
    }

    #[test]
    fn test_spiral_point_handles_axis_seeds() {
        for seed in [
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::new(-1e-30, 0.0, 1e-30),
        ] {
            let p = spiral_point(seed, 1.0, SPIRAL_WINDING, ARM_SPREAD_X);
            assert!(p.is_finite(), "{seed:?} -> {p:?}");
        }
    }

    #[test]
    fn test_spiral_point_preserves_radius_and_height() {
        let seed = Vec3::new(120.0, 3.0, -40.0);
        let p = spiral_point(seed, 0.7, SPIRAL_WINDING, ARM_SPREAD_X);
        let r_in = (seed.x * seed.x + seed.z * seed.z).sqrt();
        let r_out = (p.x * p.x + p.z * p.z).sqrt();
        assert!((r_in - r_out).abs() < 1e-3);
        assert_eq!(p.y, seed.y);
    }

    #[test]
    fn test_spiral_point_zero_winding_is_rotation() {
        let seed = Vec3::new(10.0, 0.0, 0.0);
        let p = spiral_point(seed, std::f32::consts::FRAC_PI_2, 0.0, ARM_SPREAD_X);
        assert!(p.x.abs() < 1e-4);
        assert!((p.z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_generate_translates_by_center() {
        let generator = GalaxyGenerator::default();
        let center = Vec3::new(500.0, -20.0, 3.0);

        let local = generator.generate_local(400, &mut RandomSource::seeded(5));
        let world = generator.generate(400, center, &mut RandomSource::seeded(5));

        assert_eq!(local.len(), world.len());
        for (l, w) in local.iter().zip(&world) {
            let expected = l.offset + center;
            assert!((Vec3::new(w[0], w[1], w[2]) - expected).length() < 1e-3);
        }
    }
}
