/// Framebuffer descriptors - attachments, binding points and completeness
///
/// A framebuffer groups the color and depth(-stencil) textures a render
/// target draws into. It is created once and bound each time the target is
/// enabled.

use crate::graphics_device::TextureHandle;

/// Which framebuffer binding point(s) a framebuffer is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferBinding {
    /// Read operations only (blits, read-back)
    Read,
    /// Draw operations only
    Draw,
    /// Both read and draw
    ReadDraw,
}

impl FramebufferBinding {
    /// Binding used for a target with the given access flags.
    ///
    /// read && write binds both points, read alone binds the read point,
    /// anything else binds the draw point.
    pub fn from_access(read: bool, write: bool) -> Self {
        match (read, write) {
            (true, true) => FramebufferBinding::ReadDraw,
            (true, false) => FramebufferBinding::Read,
            _ => FramebufferBinding::Draw,
        }
    }
}

/// Attachment point inside a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentPoint {
    Color0,
    Depth,
    DepthStencil,
}

/// A texture attached to a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferAttachment {
    pub point: AttachmentPoint,
    pub texture: TextureHandle,
}

/// Descriptor for creating a framebuffer
#[derive(Debug, Clone)]
pub struct FramebufferDesc<'a> {
    /// Binding point the framebuffer is bound to when enabled
    pub binding: FramebufferBinding,
    pub attachments: &'a [FramebufferAttachment],
}

/// Completeness status reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    Undefined,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    Unsupported,
    IncompleteMultisample,
    IncompleteLayerTargets,
    /// Backend status code with no known mapping
    Unknown(u32),
}

impl FramebufferStatus {
    pub fn is_complete(&self) -> bool {
        *self == FramebufferStatus::Complete
    }
}

impl std::fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramebufferStatus::Complete => f.write_str("complete"),
            FramebufferStatus::Undefined => f.write_str("undefined"),
            FramebufferStatus::IncompleteAttachment => f.write_str("incomplete attachment"),
            FramebufferStatus::MissingAttachment => f.write_str("missing attachment"),
            FramebufferStatus::IncompleteDrawBuffer => f.write_str("incomplete draw buffer"),
            FramebufferStatus::IncompleteReadBuffer => f.write_str("incomplete read buffer"),
            FramebufferStatus::Unsupported => f.write_str("unsupported"),
            FramebufferStatus::IncompleteMultisample => f.write_str("incomplete multisample"),
            FramebufferStatus::IncompleteLayerTargets => f.write_str("incomplete layer targets"),
            FramebufferStatus::Unknown(code) => write!(f, "unknown status 0x{:X}", code),
        }
    }
}
