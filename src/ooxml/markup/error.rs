/// Error types for markup parsing.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The part is not well-formed XML
    #[error("Malformed XML at byte {position}: {reason}")]
    Malformed { position: u64, reason: String },

    /// The part bytes cannot be decoded as UTF-8 or UTF-16
    #[error("Undecodable part content: {0}")]
    Encoding(String),

    /// Document type declarations are not permitted in OOXML parts
    #[error("DOCTYPE declarations are not supported")]
    Doctype,
}

impl MarkupError {
    pub(crate) fn malformed(position: u64, reason: impl Into<String>) -> Self {
        MarkupError::Malformed {
            position,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarkupError>;
