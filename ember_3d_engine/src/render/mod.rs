//! Rendering state
//!
//! Holds the explicit binding context every draw goes through.

pub mod render_context;

pub use render_context::RenderContext;
