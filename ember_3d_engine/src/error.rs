//! Error types for the Ember3D engine
//!
//! This module defines the error types used throughout the engine,
//! including resource decoding, shader compilation, scene import and
//! backend failures.
//!
//! Every error raised by the engine is logged at the point where it is
//! created (see [`engine_err!`] and [`engine_bail!`]), then handed back to
//! the caller as a regular `Result`.

use std::fmt;

/// Result type for Ember3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ember3D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL, mock device, etc.)
    BackendError(String),

    /// Invalid resource or invalid use of a resource
    InvalidResource(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),

    /// Image or model file unreadable / unparseable
    Decode(String),

    /// Shader stage or program could not be created
    Compile(String),

    /// Pixel format or attachment combination not supported
    UnsupportedFormat(String),

    /// Scene import produced no scene, an incomplete scene, or no root node
    Import(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::Decode(msg) => write!(f, "Decode error: {}", msg),
            Error::Compile(msg) => write!(f, "Compile error: {}", msg),
            Error::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            Error::Import(msg) => write!(f, "Import error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an [`Error`], logging it as ERROR first.
///
/// Without a variant the error is an `Error::BackendError`:
///
/// ```no_run
/// # use ember_3d_engine::engine_err;
/// let err = engine_err!("ember3d::Texture", "texture {} not found", 3);
/// let err = engine_err!("ember3d::Texture", UnsupportedFormat, "{} channels", 7);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $kind:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let message = format!($fmt $(, $arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::ember3d::Error::$kind(message)
    }};
    ($source:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let message = format!($fmt $(, $arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::ember3d::Error::BackendError(message)
    }};
}

/// Log an error and return it from the current function.
///
/// Accepts the same arguments as [`engine_err!`].
#[macro_export]
macro_rules! engine_bail {
    ($($arg:tt)*) => {
        return Err($crate::engine_err!($($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
