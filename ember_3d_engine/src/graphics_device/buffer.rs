/// Buffer usage and vertex layout descriptors

/// Buffer usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer
    Vertex,
    /// Index buffer (u32 indices)
    Index,
}

/// Buffer data format for vertex attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    R32_SFLOAT,          // float (4 bytes)
    R32G32_SFLOAT,       // vec2 (8 bytes)
    R32G32B32_SFLOAT,    // vec3 (12 bytes)
    R32G32B32A32_SFLOAT, // vec4 (16 bytes)
}

impl BufferFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        self.component_count() * 4
    }

    /// Number of f32 components
    pub fn component_count(&self) -> u32 {
        match self {
            BufferFormat::R32_SFLOAT => 1,
            BufferFormat::R32G32_SFLOAT => 2,
            BufferFormat::R32G32B32_SFLOAT => 3,
            BufferFormat::R32G32B32A32_SFLOAT => 4,
        }
    }
}

/// One attribute of an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    pub format: BufferFormat,
    /// Byte offset inside the vertex
    pub offset: u32,
}

/// Interleaved vertex layout (single vertex buffer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    /// Size of one vertex in bytes
    pub stride: u32,
    pub attributes: Vec<VertexAttribute>,
}
