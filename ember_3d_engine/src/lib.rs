/*!
# Ember 3D Engine

Resource and render-state layer for small real-time OpenGL-style renderers.

The crate manages the lifecycle of device objects (textures, render targets,
shader programs, mesh buffers), tracks what is bound through an explicit
`RenderContext`, and turns imported model files into drawable `Model`s.
The GPU itself is reached through the `GraphicsDevice` trait; backends
(OpenGL 3.3 in `ember_3d_engine_renderer_gl`) implement it.

## Architecture

- **GraphicsDevice**: GPU capability trait consumed by every resource
- **Texture / RenderTarget / ShaderProgram / Mesh**: resources owning device handles
- **RenderContext**: active program, texture slots, bound render target
- **SceneImporter**: model file parsing capability (`GltfImporter` for glTF 2.0)
- **Model**: meshes and materials extracted from an imported scene
- **FrameClock**: fixed-rate "render now" signal
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod graphics_device;
pub mod utils;
pub mod resource;
pub mod render;
pub mod import;
pub mod time;

// Main ember3d namespace module
pub mod ember3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton and configuration
    pub use crate::engine::Engine;
    pub use crate::config::Config;

    // Graphics device trait
    pub use crate::graphics_device::{GraphicsDevice, SharedGraphicsDevice};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device capability types
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Render state sub-module
    pub mod render {
        pub use crate::render::*;
    }

    // Scene import sub-module
    pub mod import {
        pub use crate::import::*;
    }

    // Frame timing sub-module
    pub mod time {
        pub use crate::time::*;
    }
}

// Re-export math library at crate root
pub use glam;
