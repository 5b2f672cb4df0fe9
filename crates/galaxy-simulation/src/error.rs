//! Errors from GPU setup and readback

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("GPU poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("failed to map readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("readback callback was dropped before completing")]
    MapCallbackDropped,

    #[error("star field has {field} particles, GPU buffers hold {gpu}")]
    LengthMismatch { field: usize, gpu: usize },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
