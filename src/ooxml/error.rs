/// Error types for document sessions.
use crate::ooxml::markup::MarkupError;
use crate::ooxml::opc::error::PackageError;
use crate::ooxml::text::Flavor;
use thiserror::Error;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Error types for document sessions.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The package lacks a part the flavor requires
    #[error("Not a {flavor} package: missing {missing}")]
    UnsupportedFlavor { flavor: Flavor, missing: String },

    /// The package holds neither a word-processing document nor a presentation
    #[error("Package is neither a word-processing document nor a presentation")]
    UnknownFlavor,

    /// The number of replacement texts does not match the number of slots
    #[error("Slot count mismatch: expected {expected}, got {actual}")]
    SlotCountMismatch { expected: usize, actual: usize },

    /// A slot no longer resolves against its part's tree
    #[error("Text slot #{index} not found in {part}")]
    SlotNotFound { part: String, index: usize },

    /// Replacement text holds a character XML 1.0 does not allow
    #[error("Text for slot #{index} in {part} contains U+{code_point:04X}, which XML does not allow")]
    IllegalCharacter {
        part: String,
        index: usize,
        code_point: u32,
    },

    /// Source and target of a migration are of different flavors
    #[error("Cannot migrate {actual} text into a {expected} document")]
    FlavorMismatch { expected: Flavor, actual: Flavor },

    /// Container error
    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    /// Markup error in a specific part
    #[error("Markup error in {part}: {source}")]
    Markup {
        part: String,
        #[source]
        source: MarkupError,
    },

    /// The text rewriter failed
    #[error("Rewriter failed: {0}")]
    Rewriter(String),

    /// Invalid session options
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    pub(crate) fn markup(part: &str, source: MarkupError) -> Self {
        DocumentError::Markup {
            part: part.to_string(),
            source,
        }
    }
}
