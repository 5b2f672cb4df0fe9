//! Initial orbital velocities
//!
//! The band thresholds and multipliers are hand-tuned so a freshly seeded
//! galaxy keeps rotating instead of collapsing or flying apart in the first
//! few seconds. They are not derived from a rotation curve.

use crate::constants::*;
use glam::Vec3;

/// Speed law by distance from the galaxy center.
///
/// Bands are checked from the innermost outwards:
/// - `dist < inner_radius`: `inner_speed`
/// - `dist < core_radius`: `sqrt(mass * N * core_mass_fraction * dist) / core_speed_divisor`
/// - `dist < disk_radius`: `disk_speed_factor * dist`
/// - otherwise: `outer_speed`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityBands {
    pub outer_speed: f32,
    pub disk_radius: f32,
    pub disk_speed_factor: f32,
    pub core_radius: f32,
    pub core_mass_fraction: f32,
    pub core_speed_divisor: f32,
    pub inner_radius: f32,
    pub inner_speed: f32,
}

impl Default for VelocityBands {
    fn default() -> Self {
        Self {
            outer_speed: OUTER_SPEED,
            disk_radius: DISK_RADIUS,
            disk_speed_factor: DISK_SPEED_FACTOR,
            core_radius: CORE_RADIUS,
            core_mass_fraction: CORE_MASS_FRACTION,
            core_speed_divisor: CORE_SPEED_DIVISOR,
            inner_radius: INNER_RADIUS,
            inner_speed: INNER_SPEED,
        }
    }
}

impl VelocityBands {
    pub fn speed(&self, dist: f32, particle_mass: f32, particle_count: usize) -> f32 {
        if dist < self.inner_radius {
            self.inner_speed
        } else if dist < self.core_radius {
            let enclosed = particle_mass * particle_count as f32 * self.core_mass_fraction;
            (enclosed * dist).max(0.0).sqrt() / self.core_speed_divisor
        } else if dist < self.disk_radius {
            self.disk_speed_factor * dist
        } else {
            self.outer_speed
        }
    }
}

/// Turns a position into a tangential starting velocity around its center
#[derive(Debug, Clone, Default)]
pub struct VelocityInitializer {
    bands: VelocityBands,
}

impl VelocityInitializer {
    pub fn new(bands: VelocityBands) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &VelocityBands {
        &self.bands
    }

    /// Unit tangent of the orbit around `center`, in the plane normal to +Y.
    ///
    /// Zero when the particle sits on the center or straight above/below it.
    pub fn orbit_direction(position: Vec3, center: Vec3) -> Vec3 {
        let inward = (center - position).normalize_or_zero();
        inward.cross(Vec3::Y).normalize_or_zero()
    }

    /// Initial velocity (w = 1) for one particle
    pub fn velocity(
        &self,
        position: Vec3,
        center: Vec3,
        particle_mass: f32,
        particle_count: usize,
    ) -> [f32; 4] {
        let dist = position.distance(center);
        let dir = Self::orbit_direction(position, center);
        let speed = self.bands.speed(dist, particle_mass, particle_count);
        (dir * speed).extend(1.0).to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        let bands = VelocityBands::default();
        let mass = 0.2;
        let n = 100_000;

        assert_eq!(bands.speed(10.0, mass, n), 0.0);
        let core = bands.speed(50.0, mass, n);
        assert!((core - (0.2f32 * 100_000.0 * 0.5 * 50.0).sqrt() / 125.0).abs() < 1e-4);
        assert!((bands.speed(100.0, mass, n) - 5.0).abs() < 1e-5);
        assert_eq!(bands.speed(500.0, mass, n), 7.5);
    }

    #[test]
    fn test_direction_is_tangential() {
        let center = Vec3::new(-500.0, 0.0, 0.0);
        let position = center + Vec3::new(120.0, 4.0, -35.0);
        let dir = VelocityInitializer::orbit_direction(position, center);

        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.dot(Vec3::Y).abs() < 1e-5);
        let radial = (position - center).normalize();
        // Perpendicular to the in-plane radial direction
        let radial_flat = Vec3::new(radial.x, 0.0, radial.z).normalize();
        assert!(dir.dot(radial_flat).abs() < 1e-5);
    }

    #[test]
    fn test_direction_degenerate() {
        let c = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(VelocityInitializer::orbit_direction(c, c), Vec3::ZERO);
        assert_eq!(
            VelocityInitializer::orbit_direction(c + Vec3::Y * 10.0, c),
            Vec3::ZERO
        );
    }

    #[test]
    fn test_particles_circulate_the_same_way() {
        let init = VelocityInitializer::default();
        let center = Vec3::ZERO;
        let mut spin = Vec::new();
        for p in [
            Vec3::new(300.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 300.0),
            Vec3::new(-300.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -300.0),
        ] {
            let v = init.velocity(p, center, 0.2, 1000);
            let v = Vec3::new(v[0], v[1], v[2]);
            spin.push(p.cross(v).y.signum());
        }
        assert!(spin.windows(2).all(|w| w[0] == w[1]));
    }
}
