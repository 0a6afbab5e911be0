/// Resource-level texture.
///
/// A texture goes through three states:
///
/// - **Empty**: no image, no device handle
/// - **Pending**: an `Image` is attached but not uploaded yet
/// - **Uploaded**: the device owns the texels; the CPU image has been released
///
/// The device handle is released when the texture is dropped (or when a new
/// image replaces the uploaded one).

use std::fmt;
use std::path::Path;

use crate::engine_err;
use crate::error::Result;
use crate::graphics_device::{
    lock_device, SharedGraphicsDevice, TextureDesc, TextureFilter, TextureFormat,
    TextureHandle, TextureKind,
};
use crate::resource::Image;

// ===== STATE =====

enum TextureState {
    Empty,
    Pending(Image),
    Uploaded(DeviceTexture),
}

/// Device texture owned by a `Texture`, released on drop
struct DeviceTexture {
    graphics_device: SharedGraphicsDevice,
    handle: TextureHandle,
    kind: TextureKind,
    format: TextureFormat,
    width: u32,
    height: u32,
    depth: u32,
}

impl Drop for DeviceTexture {
    fn drop(&mut self) {
        if let Ok(mut device) = self.graphics_device.lock() {
            device.destroy_texture(self.handle);
        }
    }
}

// ===== TEXTURE =====

/// A 2D or 3D texture, optionally uploaded to the graphics device
pub struct Texture {
    state: TextureState,
}

impl Texture {
    /// Create an empty texture (no image, no handle)
    pub fn new() -> Self {
        Self { state: TextureState::Empty }
    }

    /// Create a texture holding `image`, ready for `upload()`
    pub fn with_image(image: Image) -> Self {
        Self { state: TextureState::Pending(image) }
    }

    /// Attach a new image. Any previously uploaded handle is released.
    pub fn set_image(&mut self, image: Image) {
        self.state = TextureState::Pending(image);
    }

    /// Create and upload a texture from an image
    pub fn from_image(graphics_device: &SharedGraphicsDevice, image: Image) -> Result<Self> {
        let mut texture = Self::with_image(image);
        texture.upload(graphics_device)?;
        Ok(texture)
    }

    /// Decode an image file and upload it
    pub fn from_file(graphics_device: &SharedGraphicsDevice, path: impl AsRef<Path>) -> Result<Self> {
        let image = Image::decode(path)?;
        Self::from_image(graphics_device, image)
    }

    /// 1x1 opaque white RGBA texture.
    ///
    /// Bound in place of a missing material texture so that every sampler
    /// refers to a valid texture.
    pub fn blank(graphics_device: &SharedGraphicsDevice) -> Result<Self> {
        let image = Image::from_raw(1, 1, 0, 4, vec![u8::MAX; 4])?;
        Self::from_image(graphics_device, image)
    }

    /// Wrap a texture created directly on the device (render target attachments)
    pub(crate) fn from_device_handle(
        graphics_device: SharedGraphicsDevice,
        handle: TextureHandle,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            state: TextureState::Uploaded(DeviceTexture {
                graphics_device,
                handle,
                kind: TextureKind::Tex2D,
                format,
                width,
                height,
                depth: 0,
            }),
        }
    }

    /// Upload the pending image to the device.
    ///
    /// The format is chosen from the channel count (1 → R, 2 → RG, 3 → RGB,
    /// 4 → RGBA). A non-zero image depth creates a 3D texture without
    /// mipmaps; 2D textures get a full mip chain. On success the CPU image is
    /// released. On failure the texture keeps its image and has no handle.
    ///
    /// Uploading an already uploaded texture is a no-op.
    pub fn upload(&mut self, graphics_device: &SharedGraphicsDevice) -> Result<()> {
        let image = match &self.state {
            TextureState::Empty => {
                return Err(engine_err!("ember3d::Texture", InvalidResource,
                    "Cannot upload a texture without an image"));
            }
            TextureState::Uploaded(_) => return Ok(()),
            TextureState::Pending(image) => image,
        };

        let format = TextureFormat::from_channels(image.channels()).ok_or_else(|| {
            engine_err!("ember3d::Texture", UnsupportedFormat,
                "Cannot upload image with {} channels (expected 1 to 4)", image.channels())
        })?;

        let kind = if image.is_3d() { TextureKind::Tex3D } else { TextureKind::Tex2D };

        let handle = {
            let mut device = lock_device(graphics_device, "ember3d::Texture")?;
            device.create_texture(&TextureDesc {
                kind,
                format,
                width: image.width(),
                height: image.height(),
                depth: image.depth(),
                data: Some(image.data()),
                generate_mipmaps: kind == TextureKind::Tex2D,
                min_filter: TextureFilter::Linear,
                mag_filter: TextureFilter::Linear,
            })?
        };

        crate::engine_debug!("ember3d::Texture", "Uploaded {:?} texture {}x{}x{} as {:?}",
            kind, image.width(), image.height(), image.depth(), format);

        let (width, height, depth) = (image.width(), image.height(), image.depth());
        self.state = TextureState::Uploaded(DeviceTexture {
            graphics_device: graphics_device.clone(),
            handle,
            kind,
            format,
            width,
            height,
            depth,
        });
        Ok(())
    }

    // ===== ACCESSORS =====

    /// Device handle, once uploaded
    pub fn handle(&self) -> Option<TextureHandle> {
        match &self.state {
            TextureState::Uploaded(device_texture) => Some(device_texture.handle),
            _ => None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self.state, TextureState::Uploaded(_))
    }

    /// Pending image, if not uploaded yet
    pub fn image(&self) -> Option<&Image> {
        match &self.state {
            TextureState::Pending(image) => Some(image),
            _ => None,
        }
    }

    /// Texture dimensionality, once uploaded
    pub fn kind(&self) -> Option<TextureKind> {
        match &self.state {
            TextureState::Uploaded(device_texture) => Some(device_texture.kind),
            _ => None,
        }
    }

    /// Texel format, once uploaded
    pub fn format(&self) -> Option<TextureFormat> {
        match &self.state {
            TextureState::Uploaded(device_texture) => Some(device_texture.format),
            _ => None,
        }
    }

    /// (width, height, depth) of the image or the uploaded texture
    pub fn dimensions(&self) -> Option<(u32, u32, u32)> {
        match &self.state {
            TextureState::Empty => None,
            TextureState::Pending(image) => Some((image.width(), image.height(), image.depth())),
            TextureState::Uploaded(t) => Some((t.width, t.height, t.depth)),
        }
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            TextureState::Empty => f.write_str("Texture(empty)"),
            TextureState::Pending(image) => f
                .debug_struct("Texture")
                .field("pending", &(image.width(), image.height(), image.depth(), image.channels()))
                .finish(),
            TextureState::Uploaded(t) => f
                .debug_struct("Texture")
                .field("handle", &t.handle)
                .field("kind", &t.kind)
                .field("format", &t.format)
                .finish(),
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
