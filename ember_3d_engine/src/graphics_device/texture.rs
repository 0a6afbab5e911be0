/// Texture descriptors consumed by `GraphicsDevice::create_texture`

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Standard 2D texture
    Tex2D,
    /// Volume texture (depth layers > 0)
    Tex3D,
}

/// Texel format of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    /// 1 channel, 8 bits
    R8,
    /// 2 channels, 8 bits each
    RG8,
    /// 3 channels, 8 bits each
    RGB8,
    /// 4 channels, 8 bits each
    RGBA8,
    /// Depth only (render target attachment)
    Depth,
    /// Packed depth + stencil (render target attachment)
    DepthStencil,
}

impl TextureFormat {
    /// Select the color format for an image channel count.
    ///
    /// Returns `None` for anything outside 1..=4.
    pub fn from_channels(channels: u32) -> Option<Self> {
        match channels {
            1 => Some(TextureFormat::R8),
            2 => Some(TextureFormat::RG8),
            3 => Some(TextureFormat::RGB8),
            4 => Some(TextureFormat::RGBA8),
            _ => None,
        }
    }

    /// Number of color channels (0 for depth formats)
    pub fn channels(&self) -> u32 {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::RG8 => 2,
            TextureFormat::RGB8 => 3,
            TextureFormat::RGBA8 => 4,
            TextureFormat::Depth | TextureFormat::DepthStencil => 0,
        }
    }

    /// Whether this is a depth (or depth-stencil) format
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth | TextureFormat::DepthStencil)
    }
}

/// Sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc<'a> {
    pub kind: TextureKind,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    /// Depth layers (only meaningful for `Tex3D`)
    pub depth: u32,
    /// Initial texel data, tightly packed. `None` allocates storage only.
    pub data: Option<&'a [u8]>,
    /// Generate the full mip chain after upload
    pub generate_mipmaps: bool,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
}
