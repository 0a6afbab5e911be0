/// Off-screen render target (framebuffer + attachments).
///
/// A render target owns a framebuffer object and up to two attachments: an
/// RGBA8 color texture and a depth (or depth-stencil) texture, all sized
/// `width x height`. It is bound for drawing through
/// `RenderContext::enable_target`.

use std::fmt;
use std::sync::Arc;

use crate::engine_err;
use crate::error::Result;
use crate::graphics_device::{
    lock_device, AttachmentPoint, FramebufferAttachment, FramebufferBinding, FramebufferDesc,
    FramebufferHandle, GraphicsDevice, SharedGraphicsDevice, TextureDesc,
    TextureFilter, TextureFormat, TextureHandle, TextureKind,
};
use crate::resource::Texture;

const SOURCE: &str = "ember3d::RenderTarget";

/// Framebuffer, color attachment, depth attachment
type RawTarget = (FramebufferHandle, Option<TextureHandle>, Option<TextureHandle>);

/// Descriptor for creating a render target
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDesc {
    /// Target is drawn into
    pub write: bool,
    /// Target is read from (blits, read-back)
    pub read: bool,
    pub width: u32,
    pub height: u32,
    /// Create an RGBA8 color attachment
    pub color: bool,
    /// Create a depth attachment
    pub depth: bool,
    /// Pack a stencil channel into the depth attachment (requires `depth`)
    pub stencil: bool,
    pub mag_filter: TextureFilter,
    pub min_filter: TextureFilter,
}

impl RenderTargetDesc {
    /// Writable target with color and depth attachments and linear filtering
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            write: true,
            read: false,
            width,
            height,
            color: true,
            depth: true,
            stencil: false,
            mag_filter: TextureFilter::Linear,
            min_filter: TextureFilter::Linear,
        }
    }
}

/// Framebuffer plus its attachments
pub struct RenderTarget {
    graphics_device: SharedGraphicsDevice,
    handle: FramebufferHandle,
    binding: FramebufferBinding,
    width: u32,
    height: u32,
    color: Option<Texture>,
    depth: Option<Texture>,
    min_filter: TextureFilter,
    mag_filter: TextureFilter,
}

impl RenderTarget {
    /// Create a render target.
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if neither color nor depth is requested, or a
    ///   dimension is zero
    /// - `UnsupportedFormat` if stencil is requested without depth
    /// - `BackendError` if the framebuffer is incomplete after attachment
    ///
    /// The default draw framebuffer is bound again before returning.
    pub fn create(graphics_device: &SharedGraphicsDevice, desc: &RenderTargetDesc) -> Result<Self> {
        if !desc.color && !desc.depth {
            return Err(engine_err!(SOURCE, InvalidResource,
                "Render target needs at least a color or a depth attachment"));
        }
        if desc.stencil && !desc.depth {
            return Err(engine_err!(SOURCE, UnsupportedFormat,
                "Stencil-only render target attachments are not supported"));
        }
        if desc.width == 0 || desc.height == 0 {
            return Err(engine_err!(SOURCE, InvalidResource,
                "Render target size {}x{} is empty", desc.width, desc.height));
        }

        let binding = FramebufferBinding::from_access(desc.read, desc.write);
        let depth_format = if desc.stencil { TextureFormat::DepthStencil } else { TextureFormat::Depth };

        // Raw handles only while the device is locked: dropping a `Texture`
        // locks the device again.
        let (handle, color_handle, depth_handle) = {
            let mut device = lock_device(graphics_device, SOURCE)?;
            Self::create_raw(&mut *device, desc, binding, depth_format)?
        };

        crate::engine_info!(SOURCE, "Created {}x{} render target ({:?}, color: {}, depth: {}, stencil: {})",
            desc.width, desc.height, binding, desc.color, desc.depth, desc.stencil);

        let wrap = |texture: Option<TextureHandle>, format| {
            texture.map(|texture| Texture::from_device_handle(
                Arc::clone(graphics_device), texture, format, desc.width, desc.height))
        };

        Ok(Self {
            graphics_device: Arc::clone(graphics_device),
            handle,
            binding,
            width: desc.width,
            height: desc.height,
            color: wrap(color_handle, TextureFormat::RGBA8),
            depth: wrap(depth_handle, depth_format),
            min_filter: desc.min_filter,
            mag_filter: desc.mag_filter,
        })
    }

    /// Create attachments and framebuffer, cleaning up on failure
    fn create_raw(
        device: &mut dyn GraphicsDevice,
        desc: &RenderTargetDesc,
        binding: FramebufferBinding,
        depth_format: TextureFormat,
    ) -> Result<RawTarget> {
        let mut created = Vec::new();
        let result = Self::create_attachments(device, desc, binding, depth_format, &mut created);
        if result.is_err() {
            for texture in created {
                device.destroy_texture(texture);
            }
        }
        result
    }

    fn create_attachments(
        device: &mut dyn GraphicsDevice,
        desc: &RenderTargetDesc,
        binding: FramebufferBinding,
        depth_format: TextureFormat,
        created: &mut Vec<TextureHandle>,
    ) -> Result<RawTarget> {
        let attachment_desc = |format| TextureDesc {
            kind: TextureKind::Tex2D,
            format,
            width: desc.width,
            height: desc.height,
            depth: 0,
            data: None,
            generate_mipmaps: false,
            min_filter: desc.min_filter,
            mag_filter: desc.mag_filter,
        };

        let mut attachments = Vec::new();

        let color = if desc.color {
            let texture = device.create_texture(&attachment_desc(TextureFormat::RGBA8))?;
            created.push(texture);
            attachments.push(FramebufferAttachment { point: AttachmentPoint::Color0, texture });
            Some(texture)
        } else {
            None
        };

        let depth = if desc.depth {
            let texture = device.create_texture(&attachment_desc(depth_format))?;
            created.push(texture);
            let point = if desc.stencil { AttachmentPoint::DepthStencil } else { AttachmentPoint::Depth };
            attachments.push(FramebufferAttachment { point, texture });
            Some(texture)
        } else {
            None
        };

        let handle = device.create_framebuffer(&FramebufferDesc {
            binding,
            attachments: &attachments,
        })?;

        let status = device.framebuffer_status(handle);
        device.bind_framebuffer(FramebufferBinding::Draw, None);

        if !status.is_complete() {
            crate::engine_warn!(SOURCE, "Framebuffer status: {}", status);
            device.destroy_framebuffer(handle);
            return Err(engine_err!(SOURCE,
                "Render target {}x{} is incomplete: {}", desc.width, desc.height, status));
        }
        crate::engine_debug!(SOURCE, "Framebuffer status: {}", status);

        Ok((handle, color, depth))
    }

    // ===== ACCESSORS =====

    pub fn handle(&self) -> FramebufferHandle {
        self.handle
    }

    /// Binding point(s) used when the target is enabled
    pub fn binding(&self) -> FramebufferBinding {
        self.binding
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color attachment, if any
    pub fn color(&self) -> Option<&Texture> {
        self.color.as_ref()
    }

    /// Depth (or depth-stencil) attachment, if any
    pub fn depth(&self) -> Option<&Texture> {
        self.depth.as_ref()
    }

    pub fn min_filter(&self) -> TextureFilter {
        self.min_filter
    }

    pub fn mag_filter(&self) -> TextureFilter {
        self.mag_filter
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        if let Ok(mut device) = self.graphics_device.lock() {
            device.destroy_framebuffer(self.handle);
        }
        // attachments release themselves
    }
}

impl fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTarget")
            .field("handle", &self.handle)
            .field("binding", &self.binding)
            .field("size", &(self.width, self.height))
            .field("color", &self.color)
            .field("depth", &self.depth)
            .finish()
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
