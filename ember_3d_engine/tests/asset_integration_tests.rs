//! Integration tests for the asset pipeline
//!
//! glTF file → ImportedScene → CPU meshes and images, plus frame pacing.
//! No GPU required.
//!
//! Run with: cargo test --test asset_integration_tests

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ember_3d_engine::ember3d::import::{GltfImporter, ImportFlags, SceneImporter};
use ember_3d_engine::ember3d::resource::{Image, Mesh, Vertex};
use ember_3d_engine::ember3d::time::FrameClock;
use ember_3d_engine::ember3d::Config;

// ============================================================================
// HELPERS
// ============================================================================

// Two triangles sharing an edge as a 4-index triangle strip:
// 4 x vec3 positions, then u16 indices 0 1 2 3
const STRIP_BUFFER: &str =
    "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAACAPwAAgD8AAAAAAAABAAIAAwA=";

fn strip_gltf() -> String {
    format!(r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [ {{ "nodes": [0] }} ],
  "nodes": [ {{ "name": "quad", "mesh": 0 }} ],
  "meshes": [ {{ "name": "quad", "primitives": [ {{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "mode": 5 }} ] }} ],
  "buffers": [ {{ "byteLength": 56, "uri": "data:application/octet-stream;base64,{}" }} ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 48 }},
    {{ "buffer": 0, "byteOffset": 48, "byteLength": 8 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5123, "count": 4, "type": "SCALAR" }}
  ]
}}"#, STRIP_BUFFER)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ember3d_assets_{}_{}", std::process::id(), name))
}

// ============================================================================
// SCENE IMPORT
// ============================================================================

#[test]
fn test_integration_strip_is_triangulated_into_mesh() {
    let path = temp_path("strip.gltf");
    std::fs::write(&path, strip_gltf()).unwrap();

    let flags = ImportFlags::TRIANGULATE | ImportFlags::GEN_SMOOTH_NORMALS;
    let scene = GltfImporter::new().import(&path, flags).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.meshes[0].faces.len(), 2);

    let mesh = Mesh::from_imported(&scene.meshes[0]).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_count(), 6);
    assert_eq!(mesh.material_id(), None);
    assert!(mesh.vertices().iter().all(|v| v.normal == Vertex::DEFAULT_NORMAL));
    assert!(!mesh.is_uploaded());
}

#[test]
fn test_integration_strip_without_triangulation_is_skipped() {
    let path = temp_path("strip_raw.gltf");
    std::fs::write(&path, strip_gltf()).unwrap();

    let scene = GltfImporter::new().import(&path, ImportFlags::empty()).unwrap();
    let _ = std::fs::remove_file(&path);

    assert!(scene.meshes.is_empty());
    // The node still exists, it just references nothing
    let root = scene.root.unwrap();
    assert!(root.children[0].meshes.is_empty());
}

// ============================================================================
// IMAGES
// ============================================================================

#[test]
fn test_integration_rgba_png_decodes_with_alpha() {
    let path = temp_path("rgba.png");
    let mut source = image::RgbaImage::new(2, 2);
    source.put_pixel(1, 1, image::Rgba([1, 2, 3, 4]));
    source.save(&path).unwrap();

    let decoded = Image::decode(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(decoded.channels(), 4);
    assert_eq!(decoded.byte_len(), 2 * 2 * 4);
    assert_eq!(&decoded.data()[12..16], &[1, 2, 3, 4]);
}

// ============================================================================
// FRAME PACING
// ============================================================================

#[test]
fn test_integration_frame_clock_paces_a_simulated_loop() {
    let config = Config::default().with_framerate(100);
    let mut clock = FrameClock::from_config(&config);
    let start = Instant::now() + Duration::from_secs(1);

    // One second of 1 ms iterations renders at the target rate
    let rendered = (1..=1000)
        .filter(|ms| clock.should_render_at(start + Duration::from_millis(*ms)))
        .count();

    // The first query absorbs the gap between clock creation and `start`
    assert!((99..=101).contains(&rendered), "rendered {} frames", rendered);
}
