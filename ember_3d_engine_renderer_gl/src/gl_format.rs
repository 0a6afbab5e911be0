/// Conversions from engine descriptors to OpenGL enums
///
/// Pure functions, usable without a GL context.

use ember_3d_engine::ember3d::device::{
    AttachmentPoint, BufferUsage, ClearFlags, FramebufferAttachment, FramebufferBinding, FramebufferStatus,
    ShaderStage, TextureFilter, TextureFormat, TextureKind,
};
use gl::types::{GLbitfield, GLenum, GLint};

/// Texture target for a texture kind
pub(crate) fn texture_target(kind: TextureKind) -> GLenum {
    match kind {
        TextureKind::Tex2D => gl::TEXTURE_2D,
        TextureKind::Tex3D => gl::TEXTURE_3D,
    }
}

/// (internal format, pixel format, pixel type) passed to `glTexImage*`
pub(crate) fn texture_format(format: TextureFormat) -> (GLint, GLenum, GLenum) {
    match format {
        TextureFormat::R8 => (gl::R8 as GLint, gl::RED, gl::UNSIGNED_BYTE),
        TextureFormat::RG8 => (gl::RG8 as GLint, gl::RG, gl::UNSIGNED_BYTE),
        TextureFormat::RGB8 => (gl::RGB8 as GLint, gl::RGB, gl::UNSIGNED_BYTE),
        TextureFormat::RGBA8 => (gl::RGBA8 as GLint, gl::RGBA, gl::UNSIGNED_BYTE),
        TextureFormat::Depth => (gl::DEPTH_COMPONENT24 as GLint, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT),
        TextureFormat::DepthStencil => (gl::DEPTH24_STENCIL8 as GLint, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8),
    }
}

/// Minification filter, using the mipmap variant when the texture has mips
pub(crate) fn min_filter(filter: TextureFilter, mipmaps: bool) -> GLint {
    let value = match (filter, mipmaps) {
        (TextureFilter::Nearest, false) => gl::NEAREST,
        (TextureFilter::Linear, false) => gl::LINEAR,
        (TextureFilter::Nearest, true) => gl::NEAREST_MIPMAP_NEAREST,
        (TextureFilter::Linear, true) => gl::LINEAR_MIPMAP_LINEAR,
    };
    value as GLint
}

pub(crate) fn mag_filter(filter: TextureFilter) -> GLint {
    let value = match filter {
        TextureFilter::Nearest => gl::NEAREST,
        TextureFilter::Linear => gl::LINEAR,
    };
    value as GLint
}

pub(crate) fn buffer_target(usage: BufferUsage) -> GLenum {
    match usage {
        BufferUsage::Vertex => gl::ARRAY_BUFFER,
        BufferUsage::Index => gl::ELEMENT_ARRAY_BUFFER,
    }
}

pub(crate) fn framebuffer_target(binding: FramebufferBinding) -> GLenum {
    match binding {
        FramebufferBinding::Read => gl::READ_FRAMEBUFFER,
        FramebufferBinding::Draw => gl::DRAW_FRAMEBUFFER,
        FramebufferBinding::ReadDraw => gl::FRAMEBUFFER,
    }
}

pub(crate) fn attachment_point(point: AttachmentPoint) -> GLenum {
    match point {
        AttachmentPoint::Color0 => gl::COLOR_ATTACHMENT0,
        AttachmentPoint::Depth => gl::DEPTH_ATTACHMENT,
        AttachmentPoint::DepthStencil => gl::DEPTH_STENCIL_ATTACHMENT,
    }
}

/// Draw and read buffer of a framebuffer: its color attachment, or none for depth-only targets
pub(crate) fn color_buffer(attachments: &[FramebufferAttachment]) -> GLenum {
    if attachments.iter().any(|attachment| attachment.point == AttachmentPoint::Color0) {
        gl::COLOR_ATTACHMENT0
    } else {
        gl::NONE
    }
}

pub(crate) fn shader_stage(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

pub(crate) fn clear_mask(flags: ClearFlags) -> GLbitfield {
    let mut mask = 0;
    if flags.contains(ClearFlags::COLOR) {
        mask |= gl::COLOR_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::DEPTH) {
        mask |= gl::DEPTH_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::STENCIL) {
        mask |= gl::STENCIL_BUFFER_BIT;
    }
    mask
}

/// Most error codes read by one `drain_errors` call
pub(crate) const MAX_DRAINED_ERRORS: usize = 16;

/// Read error codes from `next_error` until it reports `GL_NO_ERROR`.
///
/// A lost context can report errors forever, hence the cap.
pub(crate) fn drain_errors(mut next_error: impl FnMut() -> GLenum) -> Vec<GLenum> {
    std::iter::from_fn(|| Some(next_error()).filter(|&code| code != gl::NO_ERROR))
        .take(MAX_DRAINED_ERRORS)
        .collect()
}

/// Name of a `glGetError` code
pub(crate) fn error_name(code: GLenum) -> &'static str {
    match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        _ => "unknown GL error",
    }
}

/// Result of `glCheckFramebufferStatus`
pub(crate) fn framebuffer_status(status: GLenum) -> FramebufferStatus {
    match status {
        gl::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        gl::FRAMEBUFFER_UNDEFINED => FramebufferStatus::Undefined,
        gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferStatus::IncompleteDrawBuffer,
        gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferStatus::IncompleteReadBuffer,
        gl::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => FramebufferStatus::IncompleteMultisample,
        gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => FramebufferStatus::IncompleteLayerTargets,
        other => FramebufferStatus::Unknown(other),
    }
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;
