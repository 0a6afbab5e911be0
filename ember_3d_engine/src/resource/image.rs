/// CPU-side pixel buffer produced by decoding an image file.
///
/// An `Image` owns its bytes and is move-only; the buffer is released exactly
/// once when the image is dropped (or when a `Texture` consumes it on upload).

use std::path::Path;

use image::DynamicImage;

use crate::engine_err;
use crate::error::Result;

/// Decoded or allocated pixel data
#[derive(Debug, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    width: u32,
    height: u32,
    /// 0 for 2D images, number of layers for volume images
    depth: u32,
    channels: u32,
}

impl Image {
    /// Decode an encoded image file (PNG, JPEG, BMP, TGA, ...).
    ///
    /// The channel count follows the file: grayscale gives 1, grayscale+alpha
    /// 2, RGB 3 and RGBA 4. Higher bit depths are converted to RGBA8.
    pub fn decode(path: impl AsRef<Path>) -> Result<Image> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| {
            engine_err!("ember3d::Image", Decode,
                "Failed to load from file '{}': {}", path.display(), e)
        })?;

        let (width, height) = (decoded.width(), decoded.height());
        let (data, channels) = match decoded {
            DynamicImage::ImageLuma8(buffer) => (buffer.into_raw(), 1),
            DynamicImage::ImageLumaA8(buffer) => (buffer.into_raw(), 2),
            DynamicImage::ImageRgb8(buffer) => (buffer.into_raw(), 3),
            DynamicImage::ImageRgba8(buffer) => (buffer.into_raw(), 4),
            other => (other.to_rgba8().into_raw(), 4),
        };

        crate::engine_debug!("ember3d::Image", "Decoded '{}' ({}x{}, {} channels)",
            path.display(), width, height, channels);

        Ok(Image { data, width, height, depth: 0, channels })
    }

    /// Allocate a buffer of `width * height * max(depth, 1) * channels` bytes.
    ///
    /// A `depth` of 0 describes a 2D image. The buffer always starts zeroed:
    /// `zero_fill == false` only tells that the caller overwrites it anyway.
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the byte size does not fit in memory.
    pub fn allocate(width: u32, height: u32, depth: u32, channels: u32, zero_fill: bool) -> Result<Image> {
        let len = Self::byte_len_for(width, height, depth, channels)?;
        crate::engine_trace!("ember3d::Image", "Allocated {} bytes (zero fill requested: {})", len, zero_fill);
        Ok(Image { data: vec![0u8; len], width, height, depth, channels })
    }

    /// Wrap raw pixel data. The length must match the dimensions.
    pub fn from_raw(width: u32, height: u32, depth: u32, channels: u32, data: Vec<u8>) -> Result<Image> {
        let expected = Self::byte_len_for(width, height, depth, channels)?;
        if data.len() != expected {
            return Err(engine_err!("ember3d::Image", InvalidResource,
                "Pixel buffer is {} bytes, expected {} for {}x{}x{} with {} channels",
                data.len(), expected, width, height, depth, channels));
        }
        Ok(Image { data, width, height, depth, channels })
    }

    fn byte_len_for(width: u32, height: u32, depth: u32, channels: u32) -> Result<usize> {
        [height, depth.max(1), channels]
            .into_iter()
            .try_fold(width as usize, |len, factor| len.checked_mul(factor as usize))
            .ok_or_else(|| engine_err!("ember3d::Image", InvalidResource,
                "Image of {}x{}x{} with {} channels is too large", width, height, depth, channels))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Layer count (0 for 2D images)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Whether this is a volume image
    pub fn is_3d(&self) -> bool {
        self.depth > 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Size of the pixel buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Take ownership of the pixel buffer
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
