//! Error taxonomy for the binding layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::dynamic::{CSignature, CType};

/// Errors surfaced by the dynamic binding.
///
/// Build and link failures of the extension binding never reach this type;
/// they abort the build itself. Every variant here is surfaced directly to
/// the caller; there is no retry and no local recovery.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("Failed to load library '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Library '{0}' not found in search paths")]
    NotFound(String),

    #[error("Symbol '{name}' not found in '{}': {source}", .path.display())]
    Symbol {
        name: String,
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Invalid symbol name '{0}'")]
    InvalidSymbol(String),

    #[error("Argument count mismatch: declared {declared}, got {got}")]
    ArgCount { declared: usize, got: usize },

    #[error("Cannot convert {got} argument to declared type {declared}")]
    Convert { declared: CType, got: CType },

    #[error("Unsupported signature shape: {0}")]
    UnsupportedSignature(CSignature),
}

/// Result type for binding operations.
pub type BindResult<T> = Result<T, BindError>;
