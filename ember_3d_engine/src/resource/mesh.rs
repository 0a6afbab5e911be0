/// Mesh resource: interleaved vertices, u32 indices and their device buffers.
///
/// A mesh is built on the CPU (from an imported mesh or raw data), then
/// uploaded once. Device buffers are released when the mesh is dropped.

use std::fmt;
use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

use crate::engine_err;
use crate::error::Result;
use crate::graphics_device::{
    lock_device, BufferFormat, BufferHandle, BufferUsage, GraphicsDevice, SharedGraphicsDevice,
    VertexArrayHandle, VertexAttribute, VertexLayout,
};
use crate::import::ImportedMesh;
use crate::render::RenderContext;

const SOURCE: &str = "ember3d::Mesh";

// ===== VERTEX =====

/// Interleaved vertex as uploaded to the device
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv1: [f32; 2],
    pub uv2: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Normal used when the source mesh has none (+Y)
    pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
    pub const DEFAULT_UV: [f32; 2] = [0.0, 0.0];
    /// Opaque white
    pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Vertex at `position` with every other attribute defaulted
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Shader input layout: 0 position, 1 normal, 2 uv1, 3 uv2, 4 color
    pub fn layout() -> VertexLayout {
        let attribute = |location, format, offset: usize| VertexAttribute {
            location,
            format,
            offset: offset as u32,
        };
        VertexLayout {
            stride: size_of::<Vertex>() as u32,
            attributes: vec![
                attribute(0, BufferFormat::R32G32B32_SFLOAT, offset_of!(Vertex, position)),
                attribute(1, BufferFormat::R32G32B32_SFLOAT, offset_of!(Vertex, normal)),
                attribute(2, BufferFormat::R32G32_SFLOAT, offset_of!(Vertex, uv1)),
                attribute(3, BufferFormat::R32G32_SFLOAT, offset_of!(Vertex, uv2)),
                attribute(4, BufferFormat::R32G32B32A32_SFLOAT, offset_of!(Vertex, color)),
            ],
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: Self::DEFAULT_NORMAL,
            uv1: Self::DEFAULT_UV,
            uv2: Self::DEFAULT_UV,
            color: Self::DEFAULT_COLOR,
        }
    }
}

// ===== DEVICE BUFFERS =====

struct MeshBuffers {
    graphics_device: SharedGraphicsDevice,
    vertex_array: VertexArrayHandle,
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
}

impl Drop for MeshBuffers {
    fn drop(&mut self) {
        if let Ok(mut device) = self.graphics_device.lock() {
            device.destroy_vertex_array(self.vertex_array);
            device.destroy_buffer(self.vertex_buffer);
            device.destroy_buffer(self.index_buffer);
        }
    }
}

// ===== MESH =====

pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    material_id: Option<usize>,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    /// Empty mesh without material
    pub fn new() -> Self {
        Self::from_data(Vec::new(), Vec::new(), None)
    }

    pub fn from_data(vertices: Vec<Vertex>, indices: Vec<u32>, material_id: Option<usize>) -> Self {
        Self {
            vertices,
            indices,
            material_id,
            buffers: None,
        }
    }

    /// Convert an imported mesh.
    ///
    /// Missing normals, UVs and colors take the `Vertex` defaults. Each face
    /// contributes exactly three indices.
    ///
    /// # Errors
    ///
    /// `Import` if a face is not a triangle, an attribute array does not
    /// match the position count, or an index is out of range.
    pub fn from_imported(mesh: &ImportedMesh) -> Result<Self> {
        let count = mesh.positions.len();

        let check_len = |attribute: &str, len: Option<usize>| -> Result<()> {
            match len {
                Some(len) if len != count => Err(engine_err!(SOURCE, Import,
                    "Mesh '{}': {} {} for {} positions", mesh.name, len, attribute, count)),
                _ => Ok(()),
            }
        };
        check_len("normals", mesh.normals.as_ref().map(Vec::len))?;
        check_len("uv1 coordinates", mesh.tex_coords[0].as_ref().map(Vec::len))?;
        check_len("uv2 coordinates", mesh.tex_coords[1].as_ref().map(Vec::len))?;
        check_len("colors", mesh.colors.as_ref().map(Vec::len))?;

        if mesh.normals.is_none() {
            crate::engine_debug!(SOURCE, "No normals while loading mesh '{}'", mesh.name);
        }

        let vertices = (0..count)
            .map(|i| Vertex {
                position: mesh.positions[i],
                normal: mesh.normals.as_ref().map_or(Vertex::DEFAULT_NORMAL, |n| n[i]),
                uv1: mesh.tex_coords[0].as_ref().map_or(Vertex::DEFAULT_UV, |uv| uv[i]),
                uv2: mesh.tex_coords[1].as_ref().map_or(Vertex::DEFAULT_UV, |uv| uv[i]),
                color: mesh.colors.as_ref().map_or(Vertex::DEFAULT_COLOR, |c| c[i]),
            })
            .collect();

        let mut indices = Vec::with_capacity(mesh.faces.len() * 3);
        for (face_index, face) in mesh.faces.iter().enumerate() {
            if face.len() != 3 {
                return Err(engine_err!(SOURCE, Import,
                    "Mesh '{}': face {} has {} indices, expected a triangle",
                    mesh.name, face_index, face.len()));
            }
            if let Some(&index) = face.iter().find(|&&index| index as usize >= count) {
                return Err(engine_err!(SOURCE, Import,
                    "Mesh '{}': index {} out of range ({} vertices)", mesh.name, index, count));
            }
            indices.extend_from_slice(face);
        }

        Ok(Self::from_data(vertices, indices, mesh.material_index))
    }

    /// Create the vertex buffer, index buffer and vertex array.
    ///
    /// Uploading an already uploaded mesh is a no-op.
    pub fn upload(&mut self, graphics_device: &SharedGraphicsDevice) -> Result<()> {
        if self.buffers.is_some() {
            return Ok(());
        }

        let (vertex_array, vertex_buffer, index_buffer) = {
            let mut device = lock_device(graphics_device, SOURCE)?;
            self.create_buffers(&mut *device)?
        };

        crate::engine_trace!(SOURCE, "Uploaded mesh: {} vertices, {} indices",
            self.vertices.len(), self.indices.len());

        self.buffers = Some(MeshBuffers {
            graphics_device: graphics_device.clone(),
            vertex_array,
            vertex_buffer,
            index_buffer,
        });
        Ok(())
    }

    fn create_buffers(&self, device: &mut dyn GraphicsDevice) -> Result<(VertexArrayHandle, BufferHandle, BufferHandle)> {
        let vertex_buffer = device.create_buffer(BufferUsage::Vertex, bytemuck::cast_slice(&self.vertices))?;

        let index_buffer = match device.create_buffer(BufferUsage::Index, bytemuck::cast_slice(&self.indices)) {
            Ok(buffer) => buffer,
            Err(error) => {
                device.destroy_buffer(vertex_buffer);
                return Err(error);
            }
        };

        match device.create_vertex_array(vertex_buffer, index_buffer, &Vertex::layout()) {
            Ok(vertex_array) => Ok((vertex_array, vertex_buffer, index_buffer)),
            Err(error) => {
                device.destroy_buffer(vertex_buffer);
                device.destroy_buffer(index_buffer);
                Err(error)
            }
        }
    }

    /// Issue one indexed draw with whatever program and textures are bound
    pub fn draw(&self, ctx: &mut RenderContext) -> Result<()> {
        let Some(buffers) = &self.buffers else {
            return Err(engine_err!(SOURCE, InvalidResource, "Cannot draw a mesh that has not been uploaded"));
        };
        ctx.draw_indexed(buffers.vertex_array, self.index_count())
    }

    // ===== ACCESSORS =====

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Index into the owning model's materials (`None` = no material)
    pub fn material_id(&self) -> Option<usize> {
        self.material_id
    }

    pub(crate) fn clear_material_id(&mut self) {
        self.material_id = None;
    }

    pub fn is_uploaded(&self) -> bool {
        self.buffers.is_some()
    }

    pub fn vertex_array(&self) -> Option<VertexArrayHandle> {
        self.buffers.as_ref().map(|buffers| buffers.vertex_array)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("material_id", &self.material_id)
            .field("vertex_array", &self.vertex_array())
            .finish()
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
