/// Text-node projection layer.
///
/// Projects a markup tree onto the ordered list of its atomic text leaves
/// (`w:t` in word-processing parts, `a:t` in slides) without flattening the
/// tree. Runs, paragraphs and properties around the leaves are never touched.
pub mod flavor;
pub mod slot;

pub use flavor::{Flavor, FlavorTable, slide_number};
pub use slot::{Census, TextSlot, check_text, enumerate_slots, enumerate_with_census, read_text, write_text, write_text_with};
