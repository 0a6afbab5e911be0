/// GlGraphicsDevice - OpenGL 3.3 core implementation of GraphicsDevice
///
/// Engine handles are the raw GL object names. Every call must happen on
/// the thread that owns the current GL context.

use std::ffi::{c_void, CStr, CString};
use std::ptr;

use ember_3d_engine::ember3d::{Config, GraphicsDevice, Result};
use ember_3d_engine::ember3d::device::{
    BufferHandle, BufferUsage, ClearFlags, FramebufferBinding, FramebufferDesc,
    FramebufferHandle, FramebufferStatus, ProgramHandle, ProgramLink, ShaderStage,
    ShaderStageHandle, StageCompilation, TextureDesc, TextureHandle, TextureKind,
    UniformLocation, UniformValue, VertexArrayHandle, VertexLayout,
};
use ember_3d_engine::{engine_bail, engine_debug, engine_info, engine_warn};
use gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use rustc_hash::FxHashMap;

use crate::gl_format;

const SOURCE: &str = "ember3d::gl";

pub struct GlGraphicsDevice {
    max_texture_units: u32,
    /// Drain glGetError after each device call (`Config::enable_validation`)
    validation: bool,
    validation_errors: u32,
    /// Binding point each framebuffer was created for
    framebuffer_bindings: FxHashMap<FramebufferHandle, FramebufferBinding>,
}

impl GlGraphicsDevice {
    /// Load the GL entry points through `loader` and query device limits.
    ///
    /// The GL context must be current on the calling thread. With
    /// `config.enable_validation`, GL errors raised by device calls are logged
    /// as warnings and counted.
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the required entry points are missing.
    pub fn new<F>(loader: F, config: &Config) -> Result<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        if !gl::GetIntegerv::is_loaded() || !gl::CreateShader::is_loaded() || !gl::GenVertexArrays::is_loaded() {
            engine_bail!(SOURCE, InitializationFailed, "OpenGL 3.3 entry points could not be loaded");
        }

        let mut units: GLint = 0;
        unsafe {
            gl::GetIntegerv(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, &mut units);
            // image rows are tightly packed
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        }

        engine_info!(SOURCE, "OpenGL {} ({}), {} texture units, validation {}",
            gl_string(gl::VERSION), gl_string(gl::RENDERER), units,
            if config.enable_validation { "on" } else { "off" });

        Ok(Self {
            max_texture_units: units.max(0) as u32,
            validation: config.enable_validation,
            validation_errors: 0,
            framebuffer_bindings: FxHashMap::default(),
        })
    }

    /// GL errors seen since creation (always 0 without validation)
    pub fn validation_errors(&self) -> u32 {
        self.validation_errors
    }

    /// Log and count pending GL errors raised by `call`
    fn check_errors(&mut self, call: &str) {
        if !self.validation {
            return;
        }
        for code in gl_format::drain_errors(|| unsafe { gl::GetError() }) {
            self.validation_errors += 1;
            engine_warn!(SOURCE, "{} raised {}", call, gl_format::error_name(code));
        }
    }
}

// ===== HELPERS =====

fn gl_string(name: GLenum) -> String {
    unsafe {
        let value = gl::GetString(name);
        if value.is_null() {
            return String::from("unknown");
        }
        CStr::from_ptr(value as *const GLchar).to_string_lossy().into_owned()
    }
}

unsafe fn shader_info_log(shader: GLuint) -> String {
    let mut len: GLint = 0;
    gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);

    let mut log = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    gl::GetShaderInfoLog(shader, len, &mut written, log.as_mut_ptr() as *mut GLchar);
    log.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&log).into_owned()
}

unsafe fn program_info_log(program: GLuint) -> String {
    let mut len: GLint = 0;
    gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);

    let mut log = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    gl::GetProgramInfoLog(program, len, &mut written, log.as_mut_ptr() as *mut GLchar);
    log.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&log).into_owned()
}

// ===== GRAPHICS DEVICE =====

impl GraphicsDevice for GlGraphicsDevice {
    fn max_texture_units(&self) -> u32 {
        self.max_texture_units
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle> {
        let layers = match desc.kind {
            TextureKind::Tex2D => 1,
            TextureKind::Tex3D => desc.depth.max(1),
        };

        if let Some(data) = desc.data {
            let channels = desc.format.channels() as usize;
            let expected = desc.width as usize * desc.height as usize * layers as usize * channels;
            if channels == 0 || data.len() < expected {
                engine_bail!(SOURCE, InvalidResource,
                    "Texture data has {} bytes, {:?} {}x{}x{} needs {}",
                    data.len(), desc.format, desc.width, desc.height, layers, expected);
            }
        }

        let target = gl_format::texture_target(desc.kind);
        let (internal, format, ty) = gl_format::texture_format(desc.format);
        let pixels = desc.data.map_or(ptr::null(), |data| data.as_ptr() as *const c_void);

        let mut id: GLuint = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            if id == 0 {
                engine_bail!(SOURCE, "glGenTextures returned no texture");
            }

            gl::BindTexture(target, id);
            match desc.kind {
                TextureKind::Tex2D => gl::TexImage2D(target, 0, internal,
                    desc.width as GLsizei, desc.height as GLsizei, 0, format, ty, pixels),
                TextureKind::Tex3D => gl::TexImage3D(target, 0, internal,
                    desc.width as GLsizei, desc.height as GLsizei, layers as GLsizei, 0, format, ty, pixels),
            }

            gl::TexParameteri(target, gl::TEXTURE_MIN_FILTER,
                gl_format::min_filter(desc.min_filter, desc.generate_mipmaps));
            gl::TexParameteri(target, gl::TEXTURE_MAG_FILTER, gl_format::mag_filter(desc.mag_filter));

            if desc.generate_mipmaps {
                gl::GenerateMipmap(target);
            }
            gl::BindTexture(target, 0);
        }
        self.check_errors("glTexImage");

        Ok(TextureHandle(id))
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        unsafe { gl::DeleteTextures(1, &texture.0) };
    }

    fn bind_texture(&mut self, unit: u32, kind: TextureKind, texture: TextureHandle) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl_format::texture_target(kind), texture.0);
        }
        self.check_errors("glBindTexture");
    }

    fn select_texture_unit(&mut self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) };
        self.check_errors("glActiveTexture");
    }

    fn create_buffer(&mut self, usage: BufferUsage, data: &[u8]) -> Result<BufferHandle> {
        let target = gl_format::buffer_target(usage);

        let mut id: GLuint = 0;
        unsafe {
            gl::GenBuffers(1, &mut id);
            if id == 0 {
                engine_bail!(SOURCE, "glGenBuffers returned no buffer");
            }

            // an element buffer bound while a vertex array is bound would be captured by it
            gl::BindVertexArray(0);
            gl::BindBuffer(target, id);
            gl::BufferData(target, data.len() as GLsizeiptr, data.as_ptr() as *const c_void, gl::STATIC_DRAW);
            gl::BindBuffer(target, 0);
        }
        self.check_errors("glBufferData");

        Ok(BufferHandle(id))
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        unsafe { gl::DeleteBuffers(1, &buffer.0) };
    }

    fn create_vertex_array(
        &mut self,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        layout: &VertexLayout,
    ) -> Result<VertexArrayHandle> {
        let mut id: GLuint = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut id);
            if id == 0 {
                engine_bail!(SOURCE, "glGenVertexArrays returned no vertex array");
            }

            gl::BindVertexArray(id);
            gl::BindBuffer(gl::ARRAY_BUFFER, vertex_buffer.0);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, index_buffer.0);

            for attribute in &layout.attributes {
                gl::EnableVertexAttribArray(attribute.location);
                gl::VertexAttribPointer(
                    attribute.location,
                    attribute.format.component_count() as GLint,
                    gl::FLOAT,
                    gl::FALSE,
                    layout.stride as GLsizei,
                    attribute.offset as usize as *const c_void,
                );
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }
        self.check_errors("glVertexAttribPointer");

        Ok(VertexArrayHandle(id))
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array.0) };
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<FramebufferHandle> {
        // DrawBuffer/ReadBuffer apply to the framebuffers on both binding points
        let target = gl_format::framebuffer_target(FramebufferBinding::ReadDraw);
        let color_buffer = gl_format::color_buffer(desc.attachments);

        let mut id: GLuint = 0;
        unsafe {
            gl::GenFramebuffers(1, &mut id);
            if id == 0 {
                engine_bail!(SOURCE, "glGenFramebuffers returned no framebuffer");
            }

            gl::BindFramebuffer(target, id);
            for attachment in desc.attachments {
                gl::FramebufferTexture2D(target, gl_format::attachment_point(attachment.point),
                    gl::TEXTURE_2D, attachment.texture.0, 0);
            }
            gl::DrawBuffer(color_buffer);
            gl::ReadBuffer(color_buffer);
            gl::BindFramebuffer(target, 0);
        }
        self.check_errors("glFramebufferTexture2D");

        let handle = FramebufferHandle(id);
        self.framebuffer_bindings.insert(handle, desc.binding);
        engine_debug!(SOURCE, "Framebuffer {} created with {} attachments", id, desc.attachments.len());
        Ok(handle)
    }

    fn framebuffer_status(&mut self, framebuffer: FramebufferHandle) -> FramebufferStatus {
        let binding = self
            .framebuffer_bindings
            .get(&framebuffer)
            .copied()
            .unwrap_or(FramebufferBinding::ReadDraw);
        let target = gl_format::framebuffer_target(binding);

        let status = unsafe {
            gl::BindFramebuffer(target, framebuffer.0);
            gl::CheckFramebufferStatus(target)
        };
        gl_format::framebuffer_status(status)
    }

    fn bind_framebuffer(&mut self, binding: FramebufferBinding, framebuffer: Option<FramebufferHandle>) {
        let name = framebuffer.map_or(0, |framebuffer| framebuffer.0);
        unsafe { gl::BindFramebuffer(gl_format::framebuffer_target(binding), name) };
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.framebuffer_bindings.remove(&framebuffer);
        unsafe { gl::DeleteFramebuffers(1, &framebuffer.0) };
    }

    fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }
        }
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { gl::Viewport(x, y, width as GLsizei, height as GLsizei) };
    }

    fn clear(&mut self, color: [f32; 4], flags: ClearFlags) {
        let [r, g, b, a] = color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl_format::clear_mask(flags));
        }
    }

    fn compile_shader_stage(&mut self, stage: ShaderStage, source: &str) -> Result<StageCompilation> {
        let Ok(c_source) = CString::new(source) else {
            engine_bail!(SOURCE, Compile, "{} shader source contains a NUL byte", stage.label());
        };

        unsafe {
            let id = gl::CreateShader(gl_format::shader_stage(stage));
            if id == 0 {
                engine_bail!(SOURCE, Compile, "Unable to create {} shader object", stage.label());
            }

            gl::ShaderSource(id, 1, &c_source.as_ptr(), ptr::null());
            gl::CompileShader(id);

            let mut compiled: GLint = 0;
            gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut compiled);
            let log = (compiled != GLint::from(gl::TRUE)).then(|| shader_info_log(id));

            Ok(StageCompilation { handle: ShaderStageHandle(id), log })
        }
    }

    fn destroy_shader_stage(&mut self, stage: ShaderStageHandle) {
        unsafe { gl::DeleteShader(stage.0) };
    }

    fn link_program(&mut self, vertex: ShaderStageHandle, fragment: ShaderStageHandle) -> Result<ProgramLink> {
        unsafe {
            let id = gl::CreateProgram();
            if id == 0 {
                engine_bail!(SOURCE, Compile, "Unable to create program object");
            }

            gl::AttachShader(id, vertex.0);
            gl::AttachShader(id, fragment.0);
            gl::LinkProgram(id);

            let mut linked: GLint = 0;
            gl::GetProgramiv(id, gl::LINK_STATUS, &mut linked);
            let log = (linked != GLint::from(gl::TRUE)).then(|| program_info_log(id));

            gl::DetachShader(id, vertex.0);
            gl::DetachShader(id, fragment.0);

            Ok(ProgramLink { handle: ProgramHandle(id), log })
        }
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        unsafe { gl::DeleteProgram(program.0) };
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        unsafe { gl::UseProgram(program.map_or(0, |program| program.0)) };
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let Ok(c_name) = CString::new(name) else {
            engine_warn!(SOURCE, "Uniform name {:?} contains a NUL byte", name);
            return None;
        };

        let location = unsafe { gl::GetUniformLocation(program.0, c_name.as_ptr()) };
        (location >= 0).then_some(UniformLocation(location))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        let raw = location.0;
        unsafe {
            match value {
                UniformValue::Int(v) => gl::Uniform1i(raw, *v),
                UniformValue::Float(v) => gl::Uniform1f(raw, *v),
                UniformValue::Vec2(v) => gl::Uniform2f(raw, v.x, v.y),
                UniformValue::Vec3(v) => gl::Uniform3f(raw, v.x, v.y, v.z),
                UniformValue::Vec4(v) => gl::Uniform4f(raw, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => {
                    let columns = m.to_cols_array();
                    gl::UniformMatrix4fv(raw, 1, gl::FALSE, columns.as_ptr());
                }
            }
        }
        self.check_errors("glUniform");
    }

    fn draw_indexed(&mut self, vertex_array: VertexArrayHandle, index_count: u32) {
        unsafe {
            gl::BindVertexArray(vertex_array.0);
            gl::DrawElements(gl::TRIANGLES, index_count as GLsizei, gl::UNSIGNED_INT, ptr::null());
            gl::BindVertexArray(0);
        }
        self.check_errors("glDrawElements");
    }
}
