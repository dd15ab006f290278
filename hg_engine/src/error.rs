//! Error types for the HG engine
//!
//! This module defines the error types used throughout the engine,
//! including rendering dispatch, resource caching and initialization.

use std::fmt;
use crate::render::DataType;

/// Result type for HG engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// HG engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (headless device, GPU API, etc.)
    BackendError(String),

    /// Invalid resource (texture, mesh, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, pipeline, subsystems)
    InitializationFailed(String),

    /// A processor or renderer was registered twice for the same data type
    DuplicateRegistration {
        /// "processor" or "renderer"
        kind: &'static str,
        data_type: DataType,
    },

    /// A cached resource was released into a cache that did not produce it
    ForeignCacheRelease {
        type_name: &'static str,
    },

    /// Operation is not allowed in the current state
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::DuplicateRegistration { kind, data_type } => {
                write!(f, "Duplicate {} registration for data type {}", kind, data_type)
            }
            Error::ForeignCacheRelease { type_name } => {
                write!(f, "Resource of type {} released into a foreign cache", type_name)
            }
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error and build an `Error::BackendError` from the formatted message
///
/// # Example
///
/// ```no_run
/// # use hg_engine::engine_err;
/// let err = engine_err!("hg::Texture", "Surface {} has no pixels", "grass.png");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::hg::Error::BackendError(message)
    }};
}

/// Log an error and return it from the current function
///
/// # Example
///
/// ```no_run
/// # use hg_engine::engine_bail;
/// fn check(size: u32) -> hg_engine::hg::Result<()> {
///     if size == 0 {
///         engine_bail!("hg::RenderTarget", "Render target size cannot be zero");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
