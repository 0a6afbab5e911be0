/// Graphics device module - the GPU capability consumed by the engine

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod buffer;
pub mod shader;
pub mod frame_buffer;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use buffer::*;
pub use shader::*;
pub use frame_buffer::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
