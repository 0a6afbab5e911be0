/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every call in `calls` and keeps enough state (live objects,
/// bindings, uniform values, draws) for resource and render-context tests
/// to assert on. Uniforms are discovered by scanning the stage sources for
/// `uniform <type> <name>;` declarations, so unknown names resolve to `None`
/// like they would on a real driver.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::graphics_device::{
    BufferHandle, BufferUsage, ClearFlags, FramebufferAttachment, FramebufferBinding,
    FramebufferDesc, FramebufferHandle, FramebufferStatus, GraphicsDevice, ProgramHandle,
    ProgramLink, ShaderStage, ShaderStageHandle, StageCompilation, TextureDesc,
    TextureFormat, TextureHandle, TextureKind, UniformLocation, UniformValue,
    VertexArrayHandle, VertexLayout,
};
use crate::engine_bail;

// ============================================================================
// Mock objects
// ============================================================================

#[derive(Debug, Clone)]
pub struct MockTexture {
    pub kind: TextureKind,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub data_len: Option<usize>,
    pub mipmaps: bool,
}

#[derive(Debug, Clone)]
pub struct MockBuffer {
    pub usage: BufferUsage,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MockVertexArray {
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub layout: VertexLayout,
}

#[derive(Debug, Clone)]
pub struct MockFramebuffer {
    pub binding: FramebufferBinding,
    pub attachments: Vec<FramebufferAttachment>,
}

#[derive(Debug, Clone)]
pub struct MockStage {
    pub stage: ShaderStage,
    pub uniforms: Vec<String>,
    pub failed: bool,
}

#[derive(Debug, Clone)]
pub struct MockProgram {
    pub uniforms: FxHashMap<String, UniformLocation>,
}

// ============================================================================
// MockGraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    /// Every call, in order (e.g. "bind_texture(unit=0, 3)")
    pub calls: Vec<String>,

    pub max_units: u32,
    next_id: u32,
    next_location: i32,

    pub textures: FxHashMap<TextureHandle, MockTexture>,
    pub buffers: FxHashMap<BufferHandle, MockBuffer>,
    pub vertex_arrays: FxHashMap<VertexArrayHandle, MockVertexArray>,
    pub framebuffers: FxHashMap<FramebufferHandle, MockFramebuffer>,
    pub stages: FxHashMap<ShaderStageHandle, MockStage>,
    pub programs: FxHashMap<ProgramHandle, MockProgram>,

    /// Texture bound per unit
    pub bound_textures: FxHashMap<u32, TextureHandle>,
    /// Last selected texture unit
    pub active_unit: u32,
    pub draw_framebuffer: Option<FramebufferHandle>,
    pub read_framebuffer: Option<FramebufferHandle>,
    pub current_program: Option<ProgramHandle>,
    pub depth_test: bool,
    pub viewport: (i32, i32, u32, u32),
    /// Last value written per uniform location
    pub uniform_values: FxHashMap<UniformLocation, UniformValue>,
    /// (vertex array, index count) per draw call
    pub draws: Vec<(VertexArrayHandle, u32)>,
    pub clears: Vec<([f32; 4], ClearFlags)>,

    /// Status returned by `framebuffer_status` (Complete by default)
    pub framebuffer_status: FramebufferStatus,
    /// Fail every `create_texture` call
    pub fail_texture_creation: bool,
    /// Fail every `compile_shader_stage` call at object creation
    pub fail_stage_creation: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            max_units: 16,
            next_id: 1,
            next_location: 0,
            textures: FxHashMap::default(),
            buffers: FxHashMap::default(),
            vertex_arrays: FxHashMap::default(),
            framebuffers: FxHashMap::default(),
            stages: FxHashMap::default(),
            programs: FxHashMap::default(),
            bound_textures: FxHashMap::default(),
            active_unit: 0,
            draw_framebuffer: None,
            read_framebuffer: None,
            current_program: None,
            depth_test: false,
            viewport: (0, 0, 0, 0),
            uniform_values: FxHashMap::default(),
            draws: Vec::new(),
            clears: Vec::new(),
            framebuffer_status: FramebufferStatus::Complete,
            fail_texture_creation: false,
            fail_stage_creation: false,
        }
    }

    pub fn with_max_units(mut self, max_units: u32) -> Self {
        self.max_units = max_units;
        self
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Value last written to `name` in `program`
    pub fn uniform_value(&self, program: ProgramHandle, name: &str) -> Option<UniformValue> {
        let location = self.programs.get(&program)?.uniforms.get(name)?;
        self.uniform_values.get(location).copied()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|call| call.starts_with(prefix)).count()
    }

    /// Extract `uniform <type> <name>;` declarations from a GLSL source
    fn parse_uniforms(source: &str) -> Vec<String> {
        source
            .lines()
            .filter_map(|line| {
                let mut words = line.trim().trim_end_matches(';').split_whitespace();
                if words.next()? != "uniform" {
                    return None;
                }
                let _ty = words.next()?;
                words.next().map(|name| name.trim_end_matches(';').to_string())
            })
            .collect()
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn max_texture_units(&self) -> u32 {
        self.max_units
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle> {
        if self.fail_texture_creation {
            engine_bail!("ember3d::MockGraphicsDevice", "Texture creation disabled");
        }
        let handle = TextureHandle(self.next_id());
        self.calls.push(format!(
            "create_texture({:?}, {:?}, {}x{}x{})",
            desc.kind, desc.format, desc.width, desc.height, desc.depth
        ));
        self.textures.insert(handle, MockTexture {
            kind: desc.kind,
            format: desc.format,
            width: desc.width,
            height: desc.height,
            depth: desc.depth,
            data_len: desc.data.map(|data| data.len()),
            mipmaps: desc.generate_mipmaps,
        });
        Ok(handle)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.calls.push(format!("destroy_texture({})", texture.0));
        self.textures.remove(&texture);
    }

    fn bind_texture(&mut self, unit: u32, _kind: TextureKind, texture: TextureHandle) {
        self.calls.push(format!("bind_texture(unit={}, {})", unit, texture.0));
        self.active_unit = unit;
        self.bound_textures.insert(unit, texture);
    }

    fn select_texture_unit(&mut self, unit: u32) {
        self.calls.push(format!("select_texture_unit({})", unit));
        self.active_unit = unit;
    }

    fn create_buffer(&mut self, usage: BufferUsage, data: &[u8]) -> Result<BufferHandle> {
        let handle = BufferHandle(self.next_id());
        self.calls.push(format!("create_buffer({:?}, {} bytes)", usage, data.len()));
        self.buffers.insert(handle, MockBuffer { usage, data: data.to_vec() });
        Ok(handle)
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        self.calls.push(format!("destroy_buffer({})", buffer.0));
        self.buffers.remove(&buffer);
    }

    fn create_vertex_array(
        &mut self,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> Result<VertexArrayHandle> {
        if !self.buffers.contains_key(&vertex_buffer) || !self.buffers.contains_key(&index_buffer) {
            engine_bail!("ember3d::MockGraphicsDevice", InvalidResource,
                "Vertex array references unknown buffers");
        }
        let handle = VertexArrayHandle(self.next_id());
        self.calls.push(format!("create_vertex_array({}, {})", vertex_buffer.0, index_buffer.0));
        self.vertex_arrays.insert(handle, MockVertexArray {
            vertex_buffer,
            index_buffer,
            layout: layout.clone(),
        });
        Ok(handle)
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.calls.push(format!("destroy_vertex_array({})", vertex_array.0));
        self.vertex_arrays.remove(&vertex_array);
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<FramebufferHandle> {
        let handle = FramebufferHandle(self.next_id());
        self.calls.push(format!("create_framebuffer({:?}, {} attachments)",
            desc.binding, desc.attachments.len()));
        self.framebuffers.insert(handle, MockFramebuffer {
            binding: desc.binding,
            attachments: desc.attachments.to_vec(),
        });
        Ok(handle)
    }

    fn framebuffer_status(&mut self, framebuffer: FramebufferHandle) -> FramebufferStatus {
        self.calls.push(format!("framebuffer_status({})", framebuffer.0));
        self.framebuffer_status
    }

    fn bind_framebuffer(&mut self, binding: FramebufferBinding, framebuffer: Option<FramebufferHandle>) {
        self.calls.push(format!("bind_framebuffer({:?}, {:?})", binding, framebuffer.map(|f| f.0)));
        match binding {
            FramebufferBinding::Read => self.read_framebuffer = framebuffer,
            FramebufferBinding::Draw => self.draw_framebuffer = framebuffer,
            FramebufferBinding::ReadDraw => {
                self.read_framebuffer = framebuffer;
                self.draw_framebuffer = framebuffer;
            }
        }
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.calls.push(format!("destroy_framebuffer({})", framebuffer.0));
        self.framebuffers.remove(&framebuffer);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(format!("set_depth_test({})", enabled));
        self.depth_test = enabled;
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.calls.push(format!("set_viewport({}, {}, {}, {})", x, y, width, height));
        self.viewport = (x, y, width, height);
    }

    fn clear(&mut self, color: [f32; 4], flags: ClearFlags) {
        self.calls.push(format!("clear({:?})", flags));
        self.clears.push((color, flags));
    }

    fn compile_shader_stage(&mut self, stage: ShaderStage, source: &str) -> Result<StageCompilation> {
        if self.fail_stage_creation {
            engine_bail!("ember3d::MockGraphicsDevice", Compile, "Shader object creation disabled");
        }
        let handle = ShaderStageHandle(self.next_id());
        self.calls.push(format!("compile_shader_stage({:?})", stage));

        // `#error` is the conventional way to force a GLSL compile failure
        let failed = source.contains("#error");
        let log = failed.then(|| format!("0:1: '#error' : {} stage rejected", stage.label()));

        self.stages.insert(handle, MockStage {
            stage,
            uniforms: Self::parse_uniforms(source),
            failed,
        });
        Ok(StageCompilation { handle, log })
    }

    fn destroy_shader_stage(&mut self, stage: ShaderStageHandle) {
        self.calls.push(format!("destroy_shader_stage({})", stage.0));
        self.stages.remove(&stage);
    }

    fn link_program(&mut self, vertex: ShaderStageHandle, fragment: ShaderStageHandle) -> Result<ProgramLink> {
        let handle = ProgramHandle(self.next_id());
        self.calls.push(format!("link_program({}, {})", vertex.0, fragment.0));

        let mut failed = false;
        let mut names = Vec::new();
        for stage in [vertex, fragment] {
            match self.stages.get(&stage) {
                Some(mock) if !mock.failed => names.extend(mock.uniforms.iter().cloned()),
                _ => failed = true,
            }
        }

        let mut uniforms = FxHashMap::default();
        if !failed {
            for name in names {
                if !uniforms.contains_key(&name) {
                    uniforms.insert(name, UniformLocation(self.next_location));
                    self.next_location += 1;
                }
            }
        }

        self.programs.insert(handle, MockProgram { uniforms });
        let log = failed.then(|| "error: attached shaders failed to compile".to_string());
        Ok(ProgramLink { handle, log })
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        self.calls.push(format!("destroy_program({})", program.0));
        self.programs.remove(&program);
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.calls.push(format!("use_program({:?})", program.map(|p| p.0)));
        self.current_program = program;
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.programs.get(&program)?.uniforms.get(name).copied()
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        self.calls.push(format!("set_uniform({}, {:?})", location.0, value));
        self.uniform_values.insert(location, *value);
    }

    fn draw_indexed(&mut self, vertex_array: VertexArrayHandle, index_count: u32) {
        self.calls.push(format!("draw_indexed({}, {})", vertex_array.0, index_count));
        self.draws.push((vertex_array, index_count));
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
