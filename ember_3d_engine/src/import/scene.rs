/// Imported scene graph, as produced by a `SceneImporter`.
///
/// Format-independent: meshes and materials live in flat arrays and nodes
/// refer to meshes by index. Texture paths are kept exactly as the file
/// wrote them (usually relative to the model file).

use std::path::{Path, PathBuf};

use bitflags::bitflags;
use rustc_hash::FxHashMap;

bitflags! {
    /// Post-processing requested from the importer
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ImportFlags: u32 {
        /// Split polygons into triangles
        const TRIANGULATE = 1 << 0;
        /// Generate smooth normals where the file has none
        const GEN_SMOOTH_NORMALS = 1 << 1;
        /// Compute tangents and bitangents
        const CALC_TANGENT_SPACE = 1 << 2;
        /// Flip the V texture coordinate
        const FLIP_UVS = 1 << 3;
    }
}

bitflags! {
    /// State of an imported scene
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SceneFlags: u32 {
        /// The importer could not produce a complete scene
        const INCOMPLETE = 1 << 0;
    }
}

/// Color properties of an imported material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Diffuse,
    Specular,
    Emissive,
}

/// Scalar properties of an imported material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Shininess,
    Reflectivity,
}

/// Texture slots of an imported material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Diffuse,
    Specular,
    Normals,
    DiffuseRoughness,
    EmissionColor,
}

/// Node of the scene hierarchy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedNode {
    pub name: String,
    /// Indices into `ImportedScene::meshes`
    pub meshes: Vec<usize>,
    pub children: Vec<ImportedNode>,
}

/// Triangulated mesh with optional per-vertex attributes.
///
/// Every present attribute array has one entry per position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    /// UV sets 0 and 1
    pub tex_coords: [Option<Vec<[f32; 2]>>; 2],
    /// Vertex color set 0
    pub colors: Option<Vec<[f32; 4]>>,
    /// Faces as index lists; a triangulated mesh has exactly 3 per face
    pub faces: Vec<Vec<u32>>,
    /// Index into `ImportedScene::materials`
    pub material_index: Option<usize>,
}

/// Material properties keyed by their meaning
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMaterial {
    pub name: String,
    pub colors: FxHashMap<ColorKey, [f32; 4]>,
    pub scalars: FxHashMap<ScalarKey, f32>,
    pub textures: FxHashMap<TextureType, Vec<PathBuf>>,
}

impl ImportedMaterial {
    pub fn color(&self, key: ColorKey) -> Option<[f32; 4]> {
        self.colors.get(&key).copied()
    }

    pub fn scalar(&self, key: ScalarKey) -> Option<f32> {
        self.scalars.get(&key).copied()
    }

    /// Number of textures of the given type
    pub fn texture_count(&self, ty: TextureType) -> usize {
        self.textures.get(&ty).map_or(0, Vec::len)
    }

    /// Path of the `index`-th texture of the given type
    pub fn texture(&self, ty: TextureType, index: usize) -> Option<&Path> {
        self.textures.get(&ty)?.get(index).map(PathBuf::as_path)
    }
}

/// Result of importing a model file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedScene {
    pub flags: SceneFlags,
    pub root: Option<ImportedNode>,
    pub meshes: Vec<ImportedMesh>,
    pub materials: Vec<ImportedMaterial>,
}

impl ImportedScene {
    pub fn is_incomplete(&self) -> bool {
        self.flags.contains(SceneFlags::INCOMPLETE)
    }
}
