//! GPU-based gravity simulation manager
//!
//! Positions live in two storage buffers. Each step reads the front buffer and
//! writes the back buffer, then the two swap, so a dispatch never reads a
//! position written during the same step. Velocity and lighting are updated in
//! place because invocation `i` is the only one that touches slot `i`.

use crate::error::{Result, SimulationError};
use crate::GravityUniforms;
use galaxy_physics::{GravityParams, StarField};
use wgpu::util::DeviceExt;

/// Must match `WORKGROUP_SIZE` in `shaders/gravity.wgsl`
pub const WORKGROUP_SIZE: u32 = 64;

/// Bytes per particle record (one `vec4<f32>`)
const RECORD_SIZE: u64 = 16;

/// GPU-backed gravity simulation
pub struct GravitySimulation {
    device: wgpu::Device,
    queue: wgpu::Queue,

    // Buffers
    position_buffers: [wgpu::Buffer; 2],
    velocity_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    base_color_buffer: wgpu::Buffer,
    radius_buffer: wgpu::Buffer,
    params_buffer: wgpu::Buffer,

    gravity_pipeline: wgpu::ComputePipeline,
    // bind_groups[k] reads position_buffers[k] and writes the other one
    bind_groups: [wgpu::BindGroup; 2],

    front: usize,
    particle_count: u32,
    steps: u64,
}

fn storage_buffer(device: &wgpu::Device, label: &str, contents: &[u8]) -> wgpu::Buffer {
    // Zero-sized storage bindings are invalid; an empty field still gets one record
    let empty = [0u8; RECORD_SIZE as usize];
    let contents = if contents.is_empty() { &empty[..] } else { contents };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_DST
            | wgpu::BufferUsages::COPY_SRC,
    })
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl GravitySimulation {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, field: &StarField) -> Self {
        log::info!("Initializing GravitySimulation...");
        let particle_count = field.len() as u32;
        let [positions, velocities, lighting, base_colors, radii] = field.buffers();

        let position_buffers = [
            storage_buffer(&device, "Position Buffer A", positions),
            storage_buffer(&device, "Position Buffer B", positions),
        ];
        let velocity_buffer = storage_buffer(&device, "Velocity Buffer", velocities);
        let lighting_buffer = storage_buffer(&device, "Lighting Buffer", lighting);
        // Colors and radii are never written by the kernel; they live here so
        // the renderer can bind them next to positions.
        let base_color_buffer = storage_buffer(&device, "Base Color Buffer", base_colors);
        let radius_buffer = storage_buffer(&device, "Radius Buffer", radii);

        let params = GravityUniforms::new(&GravityParams::default(), particle_count);
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gravity Params Buffer"),
            contents: bytemuck::cast_slice(&[params]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        log::info!("Buffers created");

        let gravity_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Gravity Compute Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gravity.wgsl").into()),
        });

        log::info!("Shaders loaded");

        let gravity_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Gravity Bind Group Layout"),
                entries: &[
                    storage_entry(0, true),
                    storage_entry(1, false),
                    storage_entry(2, false),
                    storage_entry(3, false),
                    wgpu::BindGroupLayoutEntry {
                        binding: 4,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let gravity_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Gravity Pipeline Layout"),
                bind_group_layouts: &[&gravity_bind_group_layout],
                push_constant_ranges: &[],
            });

        let gravity_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Gravity Pipeline"),
            layout: Some(&gravity_pipeline_layout),
            module: &gravity_shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        log::info!("Pipelines created");

        let make_bind_group = |label: &str, read: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &gravity_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: position_buffers[read].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: position_buffers[1 - read].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: velocity_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: lighting_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [
            make_bind_group("Gravity Bind Group A->B", 0),
            make_bind_group("Gravity Bind Group B->A", 1),
        ];

        log::info!("Bind groups created");

        Self {
            device,
            queue,
            position_buffers,
            velocity_buffer,
            lighting_buffer,
            base_color_buffer,
            radius_buffer,
            params_buffer,
            gravity_pipeline,
            bind_groups,
            front: 0,
            particle_count,
            steps: 0,
        }
    }

    /// Advance one step. Does nothing while paused or with no particles.
    ///
    /// The work is only submitted here; call [`wait`](Self::wait) (or read
    /// back) before touching the buffers from the CPU.
    pub fn step(&mut self, params: &GravityParams, paused: bool) {
        if paused || self.particle_count == 0 {
            return;
        }

        self.update_params(params);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Gravity Encoder"),
            });

        let workgroup_count = self.particle_count.div_ceil(WORKGROUP_SIZE);
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Gravity Compute Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.gravity_pipeline);
            compute_pass.set_bind_group(0, &self.bind_groups[self.front], &[]);
            compute_pass.dispatch_workgroups(workgroup_count, 1, 1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.front = 1 - self.front;
        self.steps += 1;
    }

    /// Block until every submitted step has finished on the GPU
    pub fn wait(&self) -> Result<()> {
        self.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })?;
        Ok(())
    }

    fn update_params(&self, params: &GravityParams) {
        let uniforms = GravityUniforms::new(params, self.particle_count);
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Copy one particle buffer back to the CPU
    fn read_buffer(&self, source: &wgpu::Buffer) -> Result<Vec<[f32; 4]>> {
        let size = self.particle_count as u64 * RECORD_SIZE;
        if size == 0 {
            return Ok(Vec::new());
        }

        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Staging Buffer"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_buffer_to_buffer(source, 0, &staging, 0, size);
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.wait()?;
        rx.recv()
            .map_err(|_| SimulationError::MapCallbackDropped)??;

        let records = {
            let data = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, [f32; 4]>(&data).to_vec()
        };
        staging.unmap();

        Ok(records)
    }

    /// Overwrite the field's positions, velocities and lighting with the GPU
    /// state. Colors and radii never change, so they are not read back.
    pub fn read_into(&self, field: &mut StarField) -> Result<()> {
        if field.len() != self.particle_count as usize {
            return Err(SimulationError::LengthMismatch {
                field: field.len(),
                gpu: self.particle_count as usize,
            });
        }

        let positions = self.read_buffer(self.position_buffer())?;
        let velocities = self.read_buffer(&self.velocity_buffer)?;
        let lighting = self.read_buffer(&self.lighting_buffer)?;

        let (p, v, l) = field.dynamics_mut();
        p.copy_from_slice(&positions);
        v.copy_from_slice(&velocities);
        l.copy_from_slice(&lighting);
        Ok(())
    }

    /// Buffer holding the latest positions. Changes after every unpaused step.
    pub fn position_buffer(&self) -> &wgpu::Buffer {
        &self.position_buffers[self.front]
    }

    pub fn velocity_buffer(&self) -> &wgpu::Buffer {
        &self.velocity_buffer
    }

    pub fn lighting_buffer(&self) -> &wgpu::Buffer {
        &self.lighting_buffer
    }

    pub fn base_color_buffer(&self) -> &wgpu::Buffer {
        &self.base_color_buffer
    }

    pub fn radius_buffer(&self) -> &wgpu::Buffer {
        &self.radius_buffer
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    /// Number of steps dispatched so far (paused frames excluded)
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
