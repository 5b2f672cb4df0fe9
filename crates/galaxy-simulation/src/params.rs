//! Uniform block for the gravity kernel

use bytemuck::{Pod, Zeroable};
use galaxy_physics::GravityParams;

/// Must match `GravityUniforms` in `shaders/gravity.wgsl`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GravityUniforms {
    // x: G, y: particle_mass, z: softening, w: delta_time
    pub constants: [f32; 4],

    // x: light_strength, y: light_decay, z: light_radius, w: padding
    pub lighting: [f32; 4],

    // x: particle_count, yzw: padding
    pub counts: [u32; 4],
}

impl GravityUniforms {
    pub fn new(params: &GravityParams, particle_count: u32) -> Self {
        Self {
            constants: [
                params.g,
                params.particle_mass,
                params.softening,
                params.delta_time,
            ],
            lighting: [
                params.light_strength,
                params.light_decay,
                params.light_radius,
                0.0, // padding
            ],
            counts: [particle_count, 0, 0, 0],
        }
    }
}

impl Default for GravityUniforms {
    fn default() -> Self {
        Self::new(&GravityParams::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_wgsl() {
        // Three vec4s, 16-byte aligned
        assert_eq!(std::mem::size_of::<GravityUniforms>(), 48);
        assert_eq!(std::mem::align_of::<GravityUniforms>(), 4);
    }

    #[test]
    fn test_packing() {
        let params = GravityParams {
            g: 2.0,
            particle_mass: 0.5,
            delta_time: 0.01,
            softening: 3.0,
            light_strength: 0.25,
            light_decay: 0.75,
            light_radius: 8.0,
        };
        let u = GravityUniforms::new(&params, 1234);
        assert_eq!(u.constants, [2.0, 0.5, 3.0, 0.01]);
        assert_eq!(u.lighting, [0.25, 0.75, 8.0, 0.0]);
        assert_eq!(u.counts, [1234, 0, 0, 0]);
    }
}
