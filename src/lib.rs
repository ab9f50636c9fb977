//! ooxml-splice - structure-preserving text substitution for Office Open XML packages
//!
//! This library replaces the text of Word-compatible (`.docx`, `.docm`,
//! `.dotx`) and PowerPoint-compatible (`.pptx`, `.pptm`, `.potx`) packages
//! while keeping everything else about them intact.
//!
//! # Features
//!
//! - **Raw-copy emit**: parts that were not edited leave the package with
//!   their compressed bytes, CRC and timestamps unchanged
//! - **Lossless markup trees**: attribute order, namespace declarations,
//!   whitespace, comments and processing instructions survive a round trip
//! - **Text slots**: every `w:t` / `a:t` leaf is addressable; writing one
//!   never merges runs or moves formatting
//! - **Plain-text projection**: documents render to plain text and plain text
//!   maps back onto the slots
//! - **New documents**: minimal packages from plain text
//!
//! # Example - Editing a DOCX file
//!
//! ```no_run
//! use ooxml_splice::{Flavor, Session};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::open_file("report.docx", Flavor::WordProcessing)?;
//!
//! // "Hello\n\nWorld"
//! let text = session.extract_plain_text();
//! println!("{}", text);
//!
//! // One replacement per text slot, in document order
//! session.apply_replacements(&["Hi", "World"])?;
//! session.save("report-edited.docx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Applying rewritten plain text
//!
//! ```no_run
//! use ooxml_splice::{ReplacementMode, Session};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("deck.pptx")?;
//! let mut session = Session::detect(bytes)?;
//!
//! let rewritten = session.extract_plain_text().replace("Q3", "Q4");
//! if session.apply_plain_text(&rewritten)? == ReplacementMode::Collapsed {
//!     eprintln!("text did not line up with the slides; it went into the first text box");
//! }
//! std::fs::write("deck-q4.pptx", session.emit()?)?;
//! # Ok(())
//! # }
//! ```

/// Shared helpers: byte order marks and XML escaping
pub mod common;

/// OOXML packages, markup trees, text slots and editing sessions
pub mod ooxml;

// Re-export commonly used types for convenience
pub use ooxml::markup::MarkupError;
pub use ooxml::opc::PackageError;
pub use ooxml::session::{BatchJob, BatchOutcome, process_batch};
pub use ooxml::{
    DocumentError, Flavor, MismatchPolicy, ReplacementMode, Session, SessionOptions, SlotMapping,
    TextRewriter, TextSlot,
};
