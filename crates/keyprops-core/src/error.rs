//! Error types for the keyprops core library.
//!
//! Resolving a signing identity never fails; these errors only come from the
//! helpers that write files or shell out to `keytool`.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for keyprops.
#[derive(Error, Debug)]
pub enum KeypropsError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    #[error("Signing identity is incomplete, missing: {}", .0.join(", "))]
    IncompleteIdentity(Vec<&'static str>),
}

impl KeypropsError {
    /// Wraps an I/O error together with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for keyprops operations.
pub type Result<T> = std::result::Result<T, KeypropsError>;
