/// GraphicsDevice trait - the GPU backend capability
///
/// The engine never talks to a graphics API directly. Every texture, buffer,
/// framebuffer and shader object is created, bound and destroyed through this
/// trait, and identified by a plain handle the backend hands out.

use std::sync::{Arc, Mutex, MutexGuard};
use bitflags::bitflags;

use crate::error::Result;
use crate::graphics_device::{
    BufferUsage, FramebufferBinding, FramebufferDesc, FramebufferStatus,
    ProgramLink, ShaderStage, StageCompilation, TextureDesc, TextureKind,
    UniformValue, VertexLayout,
};

// ============================================================================
// Handles
// ============================================================================

macro_rules! device_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw backend id
            pub fn raw(&self) -> u32 {
                self.0
            }
        }
    };
}

device_handle!(
    /// Handle to a device texture object
    TextureHandle
);
device_handle!(
    /// Handle to a device buffer object (vertex or index data)
    BufferHandle
);
device_handle!(
    /// Handle to a vertex array (vertex layout + bound buffers)
    VertexArrayHandle
);
device_handle!(
    /// Handle to a framebuffer object
    FramebufferHandle
);
device_handle!(
    /// Handle to a single compiled shader stage
    ShaderStageHandle
);
device_handle!(
    /// Handle to a linked shader program
    ProgramHandle
);

/// Location of a uniform inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

bitflags! {
    /// Buffers cleared by `GraphicsDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Graphics device shared between resources and the render context.
///
/// Resources keep a clone only to release their handles on drop.
pub type SharedGraphicsDevice = Arc<Mutex<dyn GraphicsDevice>>;

/// Lock a shared device, turning a poisoned lock into an engine error
pub(crate) fn lock_device<'a>(
    graphics_device: &'a SharedGraphicsDevice,
    source: &str,
) -> Result<MutexGuard<'a, dyn GraphicsDevice + 'static>> {
    graphics_device
        .lock()
        .map_err(|_| crate::engine_err!(source, "Graphics device lock poisoned"))
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// GPU device capability
///
/// Implemented by backend crates (e.g. the OpenGL plugin). All calls must be
/// made from the thread that owns the graphics context.
pub trait GraphicsDevice: Send + Sync {
    /// Maximum number of texture units usable by a single program
    fn max_texture_units(&self) -> u32;

    // ===== TEXTURES =====

    /// Create a texture and optionally upload its initial pixel data
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle>;

    /// Destroy a texture
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, unit: u32, kind: TextureKind, texture: TextureHandle);

    /// Make `unit` the active texture unit without binding anything
    fn select_texture_unit(&mut self, unit: u32);

    // ===== BUFFERS =====

    /// Create a buffer filled with `data`
    fn create_buffer(&mut self, usage: BufferUsage, data: &[u8]) -> Result<BufferHandle>;

    /// Destroy a buffer
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Create a vertex array describing how `vertex_buffer` is read,
    /// with `index_buffer` as its element source
    fn create_vertex_array(
        &mut self,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> Result<VertexArrayHandle>;

    /// Destroy a vertex array
    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    // ===== FRAMEBUFFERS =====

    /// Create a framebuffer and attach the given textures
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<FramebufferHandle>;

    /// Query the completeness status of a framebuffer
    fn framebuffer_status(&mut self, framebuffer: FramebufferHandle) -> FramebufferStatus;

    /// Bind a framebuffer (`None` = the default on-screen backbuffer)
    fn bind_framebuffer(&mut self, binding: FramebufferBinding, framebuffer: Option<FramebufferHandle>);

    /// Destroy a framebuffer (attached textures are not destroyed)
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle);

    // ===== FIXED FUNCTION STATE =====

    /// Enable or disable depth testing
    fn set_depth_test(&mut self, enabled: bool);

    /// Set the viewport rectangle
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Clear the currently bound framebuffer
    fn clear(&mut self, color: [f32; 4], flags: ClearFlags);

    // ===== SHADERS =====

    /// Compile one shader stage.
    ///
    /// A source that fails to compile still yields a stage handle; the
    /// backend diagnostic is returned in `StageCompilation::log`. Only a
    /// failure to create the stage object is an `Err`.
    fn compile_shader_stage(&mut self, stage: ShaderStage, source: &str) -> Result<StageCompilation>;

    /// Destroy a shader stage
    fn destroy_shader_stage(&mut self, stage: ShaderStageHandle);

    /// Link a vertex and a fragment stage into a program.
    ///
    /// Same failure policy as `compile_shader_stage`.
    fn link_program(&mut self, vertex: ShaderStageHandle, fragment: ShaderStageHandle) -> Result<ProgramLink>;

    /// Destroy a program
    fn destroy_program(&mut self, program: ProgramHandle);

    /// Make a program current (`None` = no program)
    fn use_program(&mut self, program: Option<ProgramHandle>);

    /// Look up a uniform by name (`None` if the program has no such uniform)
    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Write a uniform of the current program
    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue);

    // ===== DRAW =====

    /// Draw `index_count` indices as triangles
    fn draw_indexed(&mut self, vertex_array: VertexArrayHandle, index_count: u32);
}
