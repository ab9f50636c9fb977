/// Error types for package (container) operations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Not a ZIP package: {0}")]
    NotAContainer(String),

    #[error("Corrupt entry '{name}': {reason}")]
    CorruptEntry { name: String, reason: String },

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Failed to emit package: {0}")]
    Emit(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PackageError>;
