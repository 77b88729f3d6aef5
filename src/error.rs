//! Crate-wide error handling.
//!
//! Two failure families exist: configuration errors (rejected at
//! construction, always fatal) and resource errors (render targets are
//! fatal, texture loads degrade to a sentinel and log).

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Invalid config: {field} = {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    // Resource errors
    #[error("Render target '{label}' incomplete: {error}")]
    RenderTargetIncomplete { label: String, error: String },

    #[error("Texture load failed for {path}: {error}")]
    TextureLoadFailed { path: String, error: String },

    #[error("GPU device request failed: {0}")]
    DeviceRequestFailed(String),

    // System errors
    #[error("IO error for {path}: {error}")]
    Io { path: String, error: String },

    #[error("Parse error in {context}: {error}")]
    Parse { context: String, error: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results in the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> EngineResult<T>;
    fn with_context<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> EngineResult<T> {
        self.map_err(|e| EngineError::Internal {
            message: format!("{}: {}", msg, e),
        })
    }

    fn with_context<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| EngineError::Internal {
            message: format!("{}: {}", f(), e),
        })
    }
}

/// Convert Option to Result with an engine error
pub trait OptionExt<T> {
    fn ok_or_engine<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> EngineError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_engine<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> EngineError,
    {
        self.ok_or_else(f)
    }
}
