//! Engine resources
//!
//! CPU-side data (images, meshes, materials) and the device objects built
//! from them. Every resource that owns a device handle releases it on drop.

pub mod image;
pub mod texture;
pub mod color;
pub mod render_target;
pub mod shader;
pub mod mesh;
pub mod material;
pub mod model;

pub use self::image::Image;
pub use texture::Texture;
pub use color::Color;
pub use render_target::{RenderTarget, RenderTargetDesc};
pub use shader::{DiagnosticStage, ShaderDiagnostic, ShaderProgram, MAX_SHADER_NAME_LEN};
pub use mesh::{Mesh, Vertex};
pub use material::{ComponentKind, Material, MaterialComponent};
pub use model::Model;
