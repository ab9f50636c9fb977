//! XML text helpers.

mod escape;

pub use escape::{escape_attr, escape_text, find_illegal_char, is_xml_char, unescape};
