//! Global error handling for txtdump
//!
//! Per-file problems during an export never surface here; they become
//! [`SkipReason`](crate::types::SkipReason) values. This type covers the
//! failures that end an operation: bad configuration, the final tree write,
//! and the like.

use std::io;
use thiserror::Error;

/// Global error type for txtdump operations
#[derive(Error, Debug)]
pub enum TxtDumpError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tree mapper errors
    #[error("Tree error: {0}")]
    Tree(String),
}

/// Specialized Result type for txtdump operations
pub type Result<T> = std::result::Result<T, TxtDumpError>;

/// Creates a TxtDumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::TxtDumpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Wrap the error in a tree error carrying the given context
    fn tree_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn tree_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| TxtDumpError::Tree(format!("{}: {}", f(), e)))
    }
}
