/// Shader program resource.
///
/// Compiles a vertex and a fragment stage and links them into a program.
/// Compilation is fail-soft: a stage or link failure is logged and recorded
/// in `diagnostics()`, and a (possibly unusable) program is still returned.
/// Only failing to create the device objects themselves is an error.

use std::fmt;
use std::path::Path;

use crate::engine_err;
use crate::error::Result;
use crate::graphics_device::{
    lock_device, GraphicsDevice, ProgramHandle, SharedGraphicsDevice, ShaderStage,
    ShaderStageHandle, UniformValue,
};
use crate::render::RenderContext;
use crate::resource::Texture;

const SOURCE: &str = "ember3d::ShaderProgram";

/// Longest display name kept (longer names are truncated)
pub const MAX_SHADER_NAME_LEN: usize = 31;

/// Step of the build that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticStage {
    Vertex,
    Fragment,
    Link,
}

impl DiagnosticStage {
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticStage::Vertex => ShaderStage::Vertex.label(),
            DiagnosticStage::Fragment => ShaderStage::Fragment.label(),
            DiagnosticStage::Link => "link",
        }
    }
}

impl From<ShaderStage> for DiagnosticStage {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => DiagnosticStage::Vertex,
            ShaderStage::Fragment => DiagnosticStage::Fragment,
        }
    }
}

/// Backend message for a failed stage or link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDiagnostic {
    pub stage: DiagnosticStage,
    pub message: String,
}

/// A linked vertex + fragment program
pub struct ShaderProgram {
    graphics_device: SharedGraphicsDevice,
    handle: ProgramHandle,
    name: String,
    diagnostics: Vec<ShaderDiagnostic>,
}

impl ShaderProgram {
    /// Compile and link a program from GLSL sources.
    ///
    /// `name` is only used in log messages and truncated to
    /// `MAX_SHADER_NAME_LEN` characters.
    pub fn compile(
        graphics_device: &SharedGraphicsDevice,
        name: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self> {
        let name: String = name.chars().take(MAX_SHADER_NAME_LEN).collect();
        let mut diagnostics = Vec::new();

        let handle = {
            let mut device = lock_device(graphics_device, SOURCE)?;
            let device: &mut dyn GraphicsDevice = &mut *device;

            let vertex = Self::compile_stage(device, &name, ShaderStage::Vertex, vertex_source, &mut diagnostics)?;
            let fragment = match Self::compile_stage(device, &name, ShaderStage::Fragment, fragment_source, &mut diagnostics) {
                Ok(fragment) => fragment,
                Err(error) => {
                    device.destroy_shader_stage(vertex);
                    return Err(error);
                }
            };

            let link = device.link_program(vertex, fragment);

            // Stages are no longer needed once linked (or once linking failed)
            device.destroy_shader_stage(vertex);
            device.destroy_shader_stage(fragment);

            let link = link?;
            if let Some(log) = link.log {
                crate::engine_warn!(SOURCE, "[{}] link\n{}", name, log);
                diagnostics.push(ShaderDiagnostic { stage: DiagnosticStage::Link, message: log });
            }
            link.handle
        };

        if diagnostics.is_empty() {
            crate::engine_debug!(SOURCE, "[{}] compiled and linked", name);
        }

        Ok(Self {
            graphics_device: graphics_device.clone(),
            handle,
            name,
            diagnostics,
        })
    }

    fn compile_stage(
        device: &mut dyn GraphicsDevice,
        name: &str,
        stage: ShaderStage,
        source: &str,
        diagnostics: &mut Vec<ShaderDiagnostic>,
    ) -> Result<ShaderStageHandle> {
        let compiled = device.compile_shader_stage(stage, source)?;
        if let Some(log) = compiled.log {
            crate::engine_warn!(SOURCE, "[{}] {}\n{}", name, stage.label(), log);
            diagnostics.push(ShaderDiagnostic { stage: stage.into(), message: log });
        }
        Ok(compiled.handle)
    }

    /// Read both sources from disk, then `compile()`
    pub fn compile_files(
        graphics_device: &SharedGraphicsDevice,
        name: &str,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let vertex_source = read_source(vertex_path.as_ref())?;
        let fragment_source = read_source(fragment_path.as_ref())?;
        Self::compile(graphics_device, name, &vertex_source, &fragment_source)
    }

    // ===== ACCESSORS =====

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Display name (truncated)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage and link failures, in build order
    pub fn diagnostics(&self) -> &[ShaderDiagnostic] {
        &self.diagnostics
    }

    /// Whether every stage compiled and the program linked
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    // ===== BINDING =====

    /// Make this the active program (see `RenderContext::activate`)
    pub fn activate(&self, ctx: &mut RenderContext) -> Result<()> {
        ctx.activate(self)
    }

    /// Write a uniform (see `RenderContext::set_uniform`)
    pub fn set_uniform(&self, ctx: &mut RenderContext, name: &str, value: impl Into<UniformValue>) -> Result<()> {
        ctx.set_uniform(self, name, value)
    }

    /// Bind a texture to a sampler (see `RenderContext::bind_texture`)
    pub fn bind_texture(&self, ctx: &mut RenderContext, name: &str, texture: &Texture) -> Result<u32> {
        ctx.bind_texture(self, name, texture)
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        engine_err!(SOURCE, Decode, "Failed to read shader source '{}': {}", path.display(), e)
    })
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if let Ok(mut device) = self.graphics_device.lock() {
            device.destroy_program(self.handle);
        }
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
