//! Shader checks that need no GPU adapter

use galaxy_simulation::WORKGROUP_SIZE;
use naga::valid::{Capabilities, ValidationFlags, Validator};

const GRAVITY_WGSL: &str = include_str!("../src/shaders/gravity.wgsl");

fn parse() -> naga::Module {
    naga::front::wgsl::parse_str(GRAVITY_WGSL)
        .unwrap_or_else(|err| panic!("{}", err.emit_to_string(GRAVITY_WGSL)))
}

#[test]
fn test_gravity_shader_validates() {
    let module = parse();
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|err| panic!("gravity.wgsl failed validation: {err:?}"));
}

#[test]
fn test_gravity_shader_entry_point_matches_dispatch() {
    let module = parse();
    let main = module
        .entry_points
        .iter()
        .find(|ep| ep.name == "main")
        .expect("no `main` entry point");
    assert_eq!(main.stage, naga::ShaderStage::Compute);
    assert_eq!(main.workgroup_size, [WORKGROUP_SIZE, 1, 1]);
}
