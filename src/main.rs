//! Galaxy Simulation
//!
//! Seeds one or more barred spiral galaxies and integrates their mutual
//! gravity on the GPU (or the CPU reference), logging state as it goes.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use galaxy_physics::{
    constants, CpuSimulation, FieldStats, RandomSource, Rayon, SimulationConfig, StarField,
};
use galaxy_simulation::{request_compute_device, GravitySimulation};
use glam::Vec3;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Gpu,
    Cpu,
}

#[derive(Debug, Parser)]
#[command(version, about = "Galaxy N-body simulation")]
struct Args {
    /// Total number of stars, split evenly between galaxies
    #[arg(short = 'n', long, default_value_t = constants::PARTICLE_COUNT)]
    particles: usize,

    /// Frames to simulate before exiting
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Seed for the star field. Omit for a different galaxy every run.
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = Backend::Gpu)]
    backend: Backend,

    /// Time step per frame
    #[arg(long, default_value_t = constants::DELTA_TIME)]
    dt: f32,

    /// Start paused: frames are counted but nothing moves
    #[arg(long)]
    paused: bool,

    /// Galaxy center as `x,y,z`. Repeat for several galaxies.
    #[arg(short, long = "center", value_parser = parse_center)]
    centers: Vec<Vec3>,

    /// Particles per tile on the CPU backend
    #[arg(long, default_value_t = constants::TILE_SIZE)]
    tile_size: usize,

    /// Read back and log statistics every N frames (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn parse_center(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected x,y,z, got {s:?}")),
    }
}

impl Args {
    fn config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::with_particle_count(self.particles);
        if !self.centers.is_empty() {
            config.centers = self.centers.clone();
        }
        config.gravity.delta_time = self.dt;
        config.tile_size = self.tile_size;
        config.seed = self.seed;
        config
    }
}

fn report(frame: u64, stats: &FieldStats, started: Instant) {
    let elapsed = started.elapsed().as_secs_f32();
    log::info!(
        "frame {:>6} | {:.1} fps | com ({:.1}, {:.1}, {:.1}) | mean speed {:.3} | KE {:.3e} | max light {:.3}",
        frame,
        frame as f32 / elapsed.max(f32::EPSILON),
        stats.center_of_mass.x,
        stats.center_of_mass.y,
        stats.center_of_mass.z,
        stats.mean_speed,
        stats.kinetic_energy,
        stats.max_light,
    );
    if !stats.finite {
        log::warn!("frame {frame}: non-finite positions or velocities in the field");
    }
}

fn should_report(frame: u64, every: u64, frames: u64) -> bool {
    every > 0 && (frame % every == 0 || frame == frames)
}

fn run_gpu(args: &Args, config: &SimulationConfig, mut field: StarField) -> anyhow::Result<()> {
    let (device, queue) =
        pollster::block_on(request_compute_device()).context("no usable GPU adapter")?;
    let mut simulation = GravitySimulation::new(device, queue, &field);

    let started = Instant::now();
    for frame in 1..=args.frames {
        simulation.step(&config.gravity, args.paused);
        // Every dispatch of this frame finishes before the next frame reads
        simulation.wait()?;

        if should_report(frame, args.report_every, args.frames) {
            simulation.read_into(&mut field)?;
            report(frame, &field.stats(config.gravity.particle_mass), started);
        }
    }

    log::info!(
        "Finished {} frames ({} steps) in {:.2?}",
        args.frames,
        simulation.steps(),
        started.elapsed()
    );
    Ok(())
}

fn run_cpu(args: &Args, config: &SimulationConfig, field: StarField) -> anyhow::Result<()> {
    let mut simulation = CpuSimulation::new(field, config.tile_size, Rayon);

    let started = Instant::now();
    for frame in 1..=args.frames {
        simulation.step(&config.gravity, args.paused);

        if should_report(frame, args.report_every, args.frames) {
            let stats = simulation.field().stats(config.gravity.particle_mass);
            report(frame, &stats, started);
        }
    }

    log::info!(
        "Finished {} frames ({} steps) in {:.2?}",
        args.frames,
        simulation.steps(),
        started.elapsed()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();

    log::info!("Starting galaxy simulation...");
    log::info!(
        "  {} particles across {} galaxies, backend {:?}",
        config.particle_count,
        config.centers.len(),
        args.backend
    );

    let mut random = match config.seed {
        Some(seed) => {
            log::info!("  seed {seed}");
            RandomSource::seeded(seed)
        }
        None => RandomSource::from_os_rng(),
    };

    let field = StarField::seed(&config, &mut random).context("invalid simulation config")?;
    for (class, count) in config
        .spectral
        .classes()
        .iter()
        .zip(field.type_counts(config.spectral.len()))
    {
        log::debug!("  class {}: {} stars", class.name, count);
    }
    if args.paused {
        log::info!("  paused: the field will not advance");
    }

    match args.backend {
        Backend::Gpu => run_gpu(&args, &config, field),
        Backend::Cpu => run_cpu(&args, &config, field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_center() {
        assert_eq!(parse_center("1,2.5,-3").unwrap(), Vec3::new(1.0, 2.5, -3.0));
        assert_eq!(parse_center(" 0, 0 ,0").unwrap(), Vec3::ZERO);
        assert!(parse_center("1,2").is_err());
        assert!(parse_center("a,b,c").is_err());
    }

    #[test]
    fn test_args_build_config() {
        let args = Args::parse_from([
            "galaxy", "-n", "2000", "--center", "0,0,0", "--center", "1000,0,0", "--dt", "0",
            "--backend", "cpu", "--seed", "7",
        ]);
        let config = args.config();
        assert_eq!(config.particle_count, 2000);
        assert_eq!(config.centers.len(), 2);
        assert_eq!(config.gravity.delta_time, 0.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(args.backend, Backend::Cpu);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_report_schedule() {
        assert!(should_report(60, 60, 600));
        assert!(!should_report(61, 60, 600));
        assert!(should_report(7, 60, 7));
        assert!(!should_report(60, 0, 600));
    }
}
