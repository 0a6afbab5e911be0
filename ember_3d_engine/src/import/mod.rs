//! Scene import
//!
//! The model pipeline consumes files through the `SceneImporter` trait.
//! `GltfImporter` reads glTF 2.0 (`.gltf` / `.glb`).

pub mod scene;
pub mod scene_importer;
pub mod gltf_importer;

pub use scene::{
    ColorKey, ImportFlags, ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene,
    ScalarKey, SceneFlags, TextureType,
};
pub use scene_importer::SceneImporter;
pub use gltf_importer::GltfImporter;
