/// Markup tree layer.
///
/// Parses XML parts into a generic ordered tree and serializes them back.
/// Elements are identified by their qualified names as written, so the tree
/// works for any OOXML vocabulary without a schema.
pub mod error;
pub mod node;
pub mod parser;
pub mod writer;

pub use error::MarkupError;
pub use node::{Address, Attributes, Element, MarkupDocument, MarkupNode, XmlDeclaration};
pub use parser::{parse, parse_str};
pub use writer::{serialize, to_xml_string};
