/// RenderContext - owner of the GPU binding state
///
/// Everything that is "current" on the device lives here: the active shader
/// program, the texture units handed out since that program was activated,
/// the bound render target and the depth-test switch. Operations that change
/// binding state take `&mut RenderContext`, so there is exactly one place
/// that knows what is bound.

use std::fmt;

use crate::config::Config;
use crate::engine_err;
use crate::error::Result;
use crate::graphics_device::{
    lock_device, ClearFlags, FramebufferBinding, FramebufferHandle, ProgramHandle,
    SharedGraphicsDevice, UniformValue, VertexArrayHandle,
};
use crate::resource::{Color, RenderTarget, ShaderProgram, Texture};
use crate::utils::SlotAllocator;

const SOURCE: &str = "ember3d::RenderContext";

pub struct RenderContext {
    graphics_device: SharedGraphicsDevice,
    active_program: Option<ProgramHandle>,
    texture_slots: SlotAllocator,
    bound_target: Option<FramebufferHandle>,
    depth_test: bool,
}

impl RenderContext {
    /// Create a context for `graphics_device`.
    ///
    /// The number of texture slots is the device's unit count, capped by
    /// `config.max_texture_slots`.
    pub fn new(graphics_device: SharedGraphicsDevice, config: &Config) -> Result<Self> {
        let device_units = lock_device(&graphics_device, SOURCE)?.max_texture_units();
        let capacity = device_units.min(config.max_texture_slots);

        crate::engine_debug!(SOURCE, "Render context created with {} texture slots (device: {})",
            capacity, device_units);

        Ok(Self {
            graphics_device,
            active_program: None,
            texture_slots: SlotAllocator::new(capacity),
            bound_target: None,
            depth_test: false,
        })
    }

    pub fn graphics_device(&self) -> &SharedGraphicsDevice {
        &self.graphics_device
    }

    // ===== PROGRAMS =====

    /// Make `program` the active program and start texture slots over at 0
    pub fn activate(&mut self, program: &ShaderProgram) -> Result<()> {
        lock_device(&self.graphics_device, SOURCE)?.use_program(Some(program.handle()));
        self.active_program = Some(program.handle());
        self.texture_slots.reset();
        Ok(())
    }

    /// Currently active program
    pub fn active_program(&self) -> Option<ProgramHandle> {
        self.active_program
    }

    /// Write a uniform of `program`.
    ///
    /// The location is looked up on every call. A name the program does not
    /// declare (or optimized out) is silently ignored.
    pub fn set_uniform(
        &mut self,
        program: &ShaderProgram,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<()> {
        self.set_program_uniform(program.handle(), name, value.into())
    }

    pub(crate) fn set_program_uniform(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: UniformValue,
    ) -> Result<()> {
        if self.active_program != Some(program) {
            crate::engine_warn!(SOURCE, "Setting uniform '{}' on program {} which is not active",
                name, program.raw());
        }

        let mut device = lock_device(&self.graphics_device, SOURCE)?;
        match device.uniform_location(program, name) {
            Some(location) => device.set_uniform(location, &value),
            None => crate::engine_trace!(SOURCE, "Uniform '{}' not found in program {}", name, program.raw()),
        }
        Ok(())
    }

    // ===== TEXTURES =====

    /// Bind `texture` to the next free slot and point the sampler `name` at it.
    ///
    /// Returns the slot used.
    pub fn bind_texture(&mut self, program: &ShaderProgram, name: &str, texture: &Texture) -> Result<u32> {
        self.bind_program_texture(program.handle(), name, texture)
    }

    pub(crate) fn bind_program_texture(
        &mut self,
        program: ProgramHandle,
        name: &str,
        texture: &Texture,
    ) -> Result<u32> {
        let slot = self.activate_texture(texture)?;
        // slot < capacity <= device units, which always fit in i32
        self.set_program_uniform(program, name, UniformValue::Int(slot as i32))?;
        Ok(slot)
    }

    /// Bind `texture` to the next free slot and return that slot.
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if the texture is not uploaded
    /// - `InvalidResource` if every slot is taken
    pub fn activate_texture(&mut self, texture: &Texture) -> Result<u32> {
        let (handle, kind) = match (texture.handle(), texture.kind()) {
            (Some(handle), Some(kind)) => (handle, kind),
            _ => {
                return Err(engine_err!(SOURCE, InvalidResource,
                    "Cannot bind a texture that has not been uploaded"));
            }
        };

        let slot = self.texture_slots.alloc().ok_or_else(|| {
            engine_err!(SOURCE, InvalidResource,
                "Texture slots exhausted ({} available)", self.texture_slots.capacity())
        })?;

        lock_device(&self.graphics_device, SOURCE)?.bind_texture(slot, kind, handle);
        Ok(slot)
    }

    /// Release every texture slot and select unit 0; the next bind uses slot 0
    pub fn clear_textures(&mut self) -> Result<()> {
        self.texture_slots.reset();
        lock_device(&self.graphics_device, SOURCE)?.select_texture_unit(0);
        Ok(())
    }

    /// Slot the next texture bind will use
    pub fn next_texture_slot(&self) -> u32 {
        self.texture_slots.len()
    }

    /// Total texture slots available per program
    pub fn texture_slot_capacity(&self) -> u32 {
        self.texture_slots.capacity()
    }

    /// Release slots handed out after `mark` (a `next_texture_slot()` value)
    pub(crate) fn rewind_texture_slots(&mut self, mark: u32) {
        self.texture_slots.rewind(mark);
    }

    // ===== RENDER TARGETS =====

    /// Bind `target` with its binding mode and enable depth testing
    pub fn enable_target(&mut self, target: &RenderTarget) -> Result<()> {
        let mut device = lock_device(&self.graphics_device, SOURCE)?;
        device.bind_framebuffer(target.binding(), Some(target.handle()));
        device.set_depth_test(true);
        self.bound_target = Some(target.handle());
        self.depth_test = true;
        Ok(())
    }

    /// Bind the default (on-screen) framebuffer and disable depth testing
    pub fn disable_to_default(&mut self) -> Result<()> {
        let mut device = lock_device(&self.graphics_device, SOURCE)?;
        device.bind_framebuffer(FramebufferBinding::Draw, None);
        device.set_depth_test(false);
        self.bound_target = None;
        self.depth_test = false;
        Ok(())
    }

    /// Bound render target (`None` = default framebuffer)
    pub fn bound_target(&self) -> Option<FramebufferHandle> {
        self.bound_target
    }

    pub fn depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    /// Clear color, depth and stencil of the bound framebuffer
    pub fn clear(&mut self, color: Color) -> Result<()> {
        lock_device(&self.graphics_device, SOURCE)?.clear(color.to_array(), ClearFlags::all());
        Ok(())
    }

    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        lock_device(&self.graphics_device, SOURCE)?.set_viewport(x, y, width, height);
        Ok(())
    }

    // ===== DRAW =====

    pub(crate) fn draw_indexed(&mut self, vertex_array: VertexArrayHandle, index_count: u32) -> Result<()> {
        lock_device(&self.graphics_device, SOURCE)?.draw_indexed(vertex_array, index_count);
        Ok(())
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("active_program", &self.active_program)
            .field("texture_slots", &self.texture_slots)
            .field("bound_target", &self.bound_target)
            .field("depth_test", &self.depth_test)
            .finish()
    }
}

#[cfg(test)]
#[path = "render_context_tests.rs"]
mod tests;
