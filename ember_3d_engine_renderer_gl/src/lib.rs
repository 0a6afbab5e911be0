/*!
# Ember 3D Engine - OpenGL Backend

OpenGL 3.3 core implementation of the `GraphicsDevice` trait of
`ember_3d_engine`, using the `gl` crate for bindings.

The window and GL context are created by the application; the backend only
needs a function resolving GL entry points.

```no_run
use std::sync::{Arc, Mutex};
use ember_3d_engine::ember3d::{Config, SharedGraphicsDevice};
use ember_3d_engine::ember3d::render::RenderContext;
use ember_3d_engine_renderer_gl::GlGraphicsDevice;

# fn get_proc_address(_: &str) -> *const std::ffi::c_void { std::ptr::null() }
let config = Config::default().with_validation(true);
let device: SharedGraphicsDevice = Arc::new(Mutex::new(GlGraphicsDevice::new(get_proc_address, &config)?));
let ctx = RenderContext::new(device, &config)?;
# Ok::<(), ember_3d_engine::ember3d::Error>(())
```
*/

mod gl_format;
mod gl_graphics_device;

pub use gl_graphics_device::GlGraphicsDevice;
