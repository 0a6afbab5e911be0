/// glTF 2.0 scene importer
///
/// Every glTF primitive becomes one `ImportedMesh`, so a node referencing a
/// glTF mesh refers to all of that mesh's primitives. Strips and fans are
/// triangulated when `ImportFlags::TRIANGULATE` is set; point and line
/// primitives are skipped. Only external image URIs are reported as texture
/// paths. Smooth normals and tangents are not generated: missing normals are
/// left to the vertex defaults.

use std::path::{Path, PathBuf};

use gltf::mesh::Mode;

use crate::engine_err;
use crate::error::Result;
use crate::import::{
    ColorKey, ImportFlags, ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene,
    ScalarKey, SceneFlags, SceneImporter, TextureType,
};

const SOURCE: &str = "ember3d::GltfImporter";

/// Imports `.gltf` and `.glb` files with the `gltf` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfImporter;

impl GltfImporter {
    pub fn new() -> Self {
        Self
    }
}

impl SceneImporter for GltfImporter {
    fn import(&self, path: &Path, flags: ImportFlags) -> Result<ImportedScene> {
        let gltf::Gltf { document, blob } = gltf::Gltf::open(path).map_err(|e| {
            engine_err!(SOURCE, Decode, "Failed to parse '{}': {}", path.display(), e)
        })?;

        let buffers = gltf::import_buffers(&document, path.parent(), blob).map_err(|e| {
            engine_err!(SOURCE, Decode, "Failed to load buffers of '{}': {}", path.display(), e)
        })?;

        if flags.intersects(ImportFlags::GEN_SMOOTH_NORMALS | ImportFlags::CALC_TANGENT_SPACE) {
            crate::engine_trace!(SOURCE, "Normal and tangent generation is not performed for glTF");
        }

        // glTF mesh index -> indices of its primitives in `meshes`
        let mut mesh_primitives: Vec<Vec<usize>> = Vec::with_capacity(document.meshes().len());
        let mut meshes = Vec::new();

        for mesh in document.meshes() {
            let mut primitives = Vec::new();
            for primitive in mesh.primitives() {
                if let Some(imported) = convert_primitive(&mesh, &primitive, &buffers, flags) {
                    primitives.push(meshes.len());
                    meshes.push(imported);
                }
            }
            mesh_primitives.push(primitives);
        }

        let materials = document.materials().map(convert_material).collect();

        let root = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .map(|scene| ImportedNode {
                name: scene.name().unwrap_or_default().to_string(),
                meshes: Vec::new(),
                children: scene.nodes().map(|node| convert_node(node, &mesh_primitives)).collect(),
            });

        crate::engine_debug!(SOURCE, "Imported '{}': {} meshes, {} materials",
            path.display(), meshes.len(), document.materials().len());

        Ok(ImportedScene {
            flags: SceneFlags::empty(),
            root,
            meshes,
            materials,
        })
    }
}

fn convert_node(node: gltf::Node, mesh_primitives: &[Vec<usize>]) -> ImportedNode {
    ImportedNode {
        name: node.name().unwrap_or_default().to_string(),
        meshes: node
            .mesh()
            .and_then(|mesh| mesh_primitives.get(mesh.index()).cloned())
            .unwrap_or_default(),
        children: node.children().map(|child| convert_node(child, mesh_primitives)).collect(),
    }
}

fn convert_primitive(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    flags: ImportFlags,
) -> Option<ImportedMesh> {
    let name = mesh.name().unwrap_or_default();
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let Some(positions) = reader.read_positions() else {
        crate::engine_warn!(SOURCE, "Skipping primitive {} of mesh '{}': no positions",
            primitive.index(), name);
        return None;
    };
    let positions: Vec<[f32; 3]> = positions.collect();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let triangulate = flags.contains(ImportFlags::TRIANGULATE);
    let faces: Vec<Vec<u32>> = match primitive.mode() {
        Mode::Triangles => indices.chunks(3).map(<[u32]>::to_vec).collect(),
        Mode::TriangleStrip if triangulate => (0..indices.len().saturating_sub(2))
            .map(|i| {
                // keep the winding consistent on odd triangles
                if i % 2 == 0 {
                    vec![indices[i], indices[i + 1], indices[i + 2]]
                } else {
                    vec![indices[i + 1], indices[i], indices[i + 2]]
                }
            })
            .collect(),
        Mode::TriangleFan if triangulate => (1..indices.len().saturating_sub(1))
            .map(|i| vec![indices[0], indices[i], indices[i + 1]])
            .collect(),
        mode => {
            crate::engine_warn!(SOURCE, "Skipping primitive {} of mesh '{}': {:?} primitives are not supported",
                primitive.index(), name, mode);
            return None;
        }
    };

    let flip = flags.contains(ImportFlags::FLIP_UVS);
    let read_uvs = |set: u32| {
        reader.read_tex_coords(set).map(|uvs| {
            uvs.into_f32()
                .map(|[u, v]| if flip { [u, 1.0 - v] } else { [u, v] })
                .collect::<Vec<_>>()
        })
    };

    Some(ImportedMesh {
        name: name.to_string(),
        normals: reader.read_normals().map(|normals| normals.collect()),
        tex_coords: [read_uvs(0), read_uvs(1)],
        colors: reader.read_colors(0).map(|colors| colors.into_rgba_f32().collect()),
        faces,
        material_index: primitive.material().index(),
        positions,
    })
}

fn convert_material(material: gltf::Material) -> ImportedMaterial {
    let pbr = material.pbr_metallic_roughness();

    let mut imported = ImportedMaterial {
        name: material.name().unwrap_or_default().to_string(),
        ..Default::default()
    };

    let [r, g, b] = material.emissive_factor();
    imported.colors.insert(ColorKey::Diffuse, pbr.base_color_factor());
    imported.colors.insert(ColorKey::Emissive, [r, g, b, 1.0]);
    // glTF has no reflectivity; rougher means less reflective
    imported.scalars.insert(ScalarKey::Reflectivity, 1.0 - pbr.roughness_factor());

    let textures = [
        (TextureType::Diffuse, pbr.base_color_texture().map(|info| info.texture())),
        (TextureType::DiffuseRoughness, pbr.metallic_roughness_texture().map(|info| info.texture())),
        (TextureType::Normals, material.normal_texture().map(|info| info.texture())),
        (TextureType::EmissionColor, material.emissive_texture().map(|info| info.texture())),
    ];

    for (ty, texture) in textures {
        let Some(texture) = texture else { continue };
        match texture.source().source() {
            gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => {
                imported.textures.entry(ty).or_default().push(PathBuf::from(percent_decode(uri)));
            }
            _ => crate::engine_debug!(SOURCE, "Material '{}': embedded {:?} image ignored",
                imported.name, ty),
        }
    }

    imported
}

/// Decode `%XX` escapes of a glTF URI; malformed escapes are kept as written
fn percent_decode(uri: &str) -> String {
    let bytes = uri.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = (bytes[i] == b'%')
            .then(|| bytes.get(i + 1..i + 3))
            .flatten()
            .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                decoded.push(byte);
                i += 3;
            }
            None => {
                decoded.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

#[cfg(test)]
#[path = "gltf_importer_tests.rs"]
mod tests;
