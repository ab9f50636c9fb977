//! Office Open XML (OOXML) text substitution.
//!
//! The module is organized into layers, each using only the ones below it:
//!
//! 1. **OPC Layer** (`opc`): ZIP package access and re-emission
//! 2. **Markup Layer** (`markup`): generic ordered XML trees
//! 3. **Text Layer** (`text`): atomic text leaves of a flavor as addressable slots
//! 4. **Sessions** (`session`): open, extract, replace, emit
//!
//! `template` synthesizes minimal packages for new documents.
//!
//! # Example: Replacing the text of a presentation
//!
//! ```rust,no_run
//! use ooxml_splice::ooxml::{Flavor, Session};
//!
//! let mut session = Session::open_file("deck.pptx", Flavor::Presentation)?;
//! println!("{}", session.extract_plain_text());
//!
//! session.write_text(0, "New title")?;
//! session.save("deck-edited.pptx")?;
//! # Ok::<(), ooxml_splice::DocumentError>(())
//! ```
pub mod error;
pub mod markup;
pub mod opc;
pub mod session;
pub mod template;
pub mod text;

pub use error::DocumentError;
pub use opc::{PackURI, Package};
pub use session::{
    MismatchPolicy, ReplacementMode, Session, SessionOptions, SlotMapping, TextRewriter,
};
pub use text::{Flavor, TextSlot};
