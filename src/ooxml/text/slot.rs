//! Text slots: addressable handles on the atomic text leaves of a part.

use crate::common::xml::find_illegal_char;
use crate::ooxml::error::{DocumentError, Result};
use crate::ooxml::markup::{Address, Element, MarkupDocument, MarkupNode};
use crate::ooxml::text::flavor::Flavor;
use smallvec::smallvec;

const PRESERVE_LEAF: &str = "w:t";
const XML_SPACE: &str = "xml:space";

/// Handle on the single text child of one atomic text leaf.
///
/// A slot stores the path to its text node, not a reference into the tree;
/// it is resolved against the tree each time it is read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSlot {
    /// Part the slot lives in, e.g. `word/document.xml`
    pub part: String,
    /// Child-index path from the part's root element to the text node
    pub address: Address,
    /// Text at enumeration time
    pub original_text: String,
    /// Position of the slot in document order
    pub index: usize,
}

/// Run and paragraph elements seen while enumerating a part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub runs: usize,
    pub paragraphs: usize,
}

/// Enumerate the text slots of a part in depth-first document order.
///
/// An element named like the flavor's leaf that holds exactly one text node
/// yields a slot, even when the text is empty. Everything else is searched
/// recursively; text outside leaves is never collected.
pub fn enumerate_slots(part: &str, document: &MarkupDocument, flavor: Flavor) -> Vec<TextSlot> {
    enumerate_with_census(part, document, flavor).0
}

/// [`enumerate_slots`], also counting the flavor's runs and paragraphs.
pub fn enumerate_with_census(
    part: &str,
    document: &MarkupDocument,
    flavor: Flavor,
) -> (Vec<TextSlot>, Census) {
    let mut collector = Collector {
        flavor,
        part,
        address: smallvec![],
        slots: Vec::new(),
        census: Census::default(),
    };

    if document.root.name() == flavor.table().leaf && document.root.sole_text().is_some() {
        // Degenerate part whose root is itself a leaf
        collector.push_slot(&[0], &document.root);
    } else {
        collector.count(&document.root);
        collector.collect(&document.root);
    }

    let Collector { slots, census, .. } = collector;
    log::trace!(
        "{}: {} text slots, {} runs, {} paragraphs",
        part,
        slots.len(),
        census.runs,
        census.paragraphs
    );
    (slots, census)
}

struct Collector<'a> {
    flavor: Flavor,
    part: &'a str,
    address: Address,
    slots: Vec<TextSlot>,
    census: Census,
}

impl Collector<'_> {
    fn count(&mut self, element: &Element) {
        let table = self.flavor.table();
        if element.name() == table.run {
            self.census.runs += 1;
        } else if element.name() == table.paragraph {
            self.census.paragraphs += 1;
        }
    }

    fn collect(&mut self, element: &Element) {
        for (i, child) in element.children().iter().enumerate() {
            let MarkupNode::Element(child) = child else {
                continue;
            };
            self.address.push(i);
            if child.name() == self.flavor.table().leaf && child.sole_text().is_some() {
                self.address.push(0);
                let address = self.address.clone();
                self.push_slot(&address, child);
                self.address.pop();
            } else {
                self.count(child);
                self.collect(child);
            }
            self.address.pop();
        }
    }

    fn push_slot(&mut self, address: &[usize], leaf: &Element) {
        push_slot(&mut self.slots, self.part, address, leaf);
    }
}

fn push_slot(slots: &mut Vec<TextSlot>, part: &str, address: &[usize], leaf: &Element) {
    slots.push(TextSlot {
        part: part.to_string(),
        address: Address::from_slice(address),
        original_text: leaf.sole_text().unwrap_or_default().to_string(),
        index: slots.len(),
    });
}

/// Read the current text of a slot.
pub fn read_text<'doc>(document: &'doc MarkupDocument, slot: &TextSlot) -> Result<&'doc str> {
    match document.node_at(&slot.address) {
        Some(MarkupNode::Text(text)) => Ok(text),
        _ => Err(not_found(slot)),
    }
}

/// Replace the text of a slot in place, adding `xml:space="preserve"` to a
/// `w:t` leaf when the new text starts or ends with whitespace.
///
/// Returns whether the text changed.
pub fn write_text(document: &mut MarkupDocument, slot: &TextSlot, text: &str) -> Result<bool> {
    write_text_with(document, slot, text, true)
}

/// [`write_text`] with control over the `xml:space` adjustment.
///
/// Text holding a character XML 1.0 does not allow is rejected with
/// [`DocumentError::IllegalCharacter`] and the tree is left as it was.
pub fn write_text_with(
    document: &mut MarkupDocument,
    slot: &TextSlot,
    text: &str,
    preserve_edge_whitespace: bool,
) -> Result<bool> {
    check_text(slot, text)?;
    let current = match document.node_at_mut(&slot.address) {
        Some(MarkupNode::Text(current)) => current,
        _ => return Err(not_found(slot)),
    };
    if current.as_str() == text {
        return Ok(false);
    }
    current.clear();
    current.push_str(text);

    if preserve_edge_whitespace && has_edge_whitespace(text) {
        let leaf = document
            .root
            .parent_of_mut(&slot.address)
            .ok_or_else(|| not_found(slot))?;
        if leaf.name() == PRESERVE_LEAF && leaf.attribute(XML_SPACE) != Some("preserve") {
            leaf.set_attribute(XML_SPACE, "preserve");
        }
    }

    Ok(true)
}

/// Fail when `text` cannot be stored in the slot's part.
pub fn check_text(slot: &TextSlot, text: &str) -> Result<()> {
    match find_illegal_char(text) {
        Some(c) => Err(DocumentError::IllegalCharacter {
            part: slot.part.clone(),
            index: slot.index,
            code_point: c as u32,
        }),
        None => Ok(()),
    }
}

#[inline]
fn has_edge_whitespace(text: &str) -> bool {
    text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace)
}

fn not_found(slot: &TextSlot) -> DocumentError {
    DocumentError::SlotNotFound {
        part: slot.part.clone(),
        index: slot.index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::markup::{parse_str, to_xml_string};
    use proptest::prelude::*;

    const DOCUMENT: &str = "<w:document xmlns:w=\"urn:w\"><w:body>\
        <w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t></w:t></w:r></w:p>\
        <w:p><w:r><w:t xml:space=\"preserve\">World</w:t></w:r><w:r><w:t/></w:r></w:p>\
        <w:p><w:r><w:instrText>PAGE</w:instrText></w:r></w:p>\
        </w:body></w:document>";

    const SLIDE: &str = "<p:sld xmlns:p=\"urn:p\" xmlns:a=\"urn:a\"><p:cSld><p:spTree>\
        <p:sp><p:txBody><a:p><a:r><a:t>Title</a:t></a:r></a:p>\
        <a:p><a:r><a:t>Point one</a:t></a:r><a:br/><a:r><a:t>Point two</a:t></a:r></a:p>\
        </p:txBody></p:sp></p:spTree></p:cSld></p:sld>";

    #[test]
    fn test_census_counts_runs_and_paragraphs() {
        let doc = parse_str(DOCUMENT).unwrap();
        let (slots, census) = enumerate_with_census("word/document.xml", &doc, Flavor::WordProcessing);
        assert_eq!(slots.len(), 3);
        assert_eq!(census, Census { runs: 5, paragraphs: 3 });

        let doc = parse_str(SLIDE).unwrap();
        let (_, census) = enumerate_with_census("ppt/slides/slide1.xml", &doc, Flavor::Presentation);
        assert_eq!(census, Census { runs: 3, paragraphs: 2 });
    }

    #[test]
    fn test_enumerate_word_leaves() {
        let doc = parse_str(DOCUMENT).unwrap();
        let slots = enumerate_slots("word/document.xml", &doc, Flavor::WordProcessing);

        let texts: Vec<_> = slots.iter().map(|s| s.original_text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "", "World"]);
        assert_eq!(slots[0].address.as_slice(), &[0, 0, 0, 0, 0]);
        assert_eq!(slots[2].index, 2);
    }

    #[test]
    fn test_enumerate_ignores_other_flavor() {
        let doc = parse_str(DOCUMENT).unwrap();
        assert!(enumerate_slots("word/document.xml", &doc, Flavor::Presentation).is_empty());
    }

    #[test]
    fn test_enumerate_slide_leaves() {
        let doc = parse_str(SLIDE).unwrap();
        let slots = enumerate_slots("ppt/slides/slide1.xml", &doc, Flavor::Presentation);
        let texts: Vec<_> = slots.iter().map(|s| s.original_text.as_str()).collect();
        assert_eq!(texts, vec!["Title", "Point one", "Point two"]);
    }

    #[test]
    fn test_write_keeps_structure() {
        let mut doc = parse_str(DOCUMENT).unwrap();
        let before = doc.node_count();
        let slots = enumerate_slots("word/document.xml", &doc, Flavor::WordProcessing);

        assert!(write_text(&mut doc, &slots[0], "Hi").unwrap());
        assert!(!write_text(&mut doc, &slots[2], "World").unwrap());
        assert_eq!(read_text(&doc, &slots[0]).unwrap(), "Hi");
        assert_eq!(doc.node_count(), before);
        assert!(to_xml_string(&doc).contains("<w:r><w:t>Hi</w:t></w:r>"));
    }

    #[test]
    fn test_edge_whitespace_sets_preserve() {
        let mut doc = parse_str(DOCUMENT).unwrap();
        let slots = enumerate_slots("word/document.xml", &doc, Flavor::WordProcessing);

        write_text(&mut doc, &slots[0], " padded ").unwrap();
        assert!(to_xml_string(&doc).contains("<w:t xml:space=\"preserve\"> padded </w:t>"));

        let mut plain = parse_str(DOCUMENT).unwrap();
        write_text_with(&mut plain, &slots[0], " padded ", false).unwrap();
        assert!(to_xml_string(&plain).contains("<w:t> padded </w:t>"));
    }

    #[test]
    fn test_control_characters_are_rejected() {
        let mut doc = parse_str(DOCUMENT).unwrap();
        let before = doc.clone();
        let slots = enumerate_slots("word/document.xml", &doc, Flavor::WordProcessing);

        for text in ["Hi\u{1}there", "W\u{0}", " \u{B}", "\u{FFFE}"] {
            assert!(matches!(
                write_text(&mut doc, &slots[0], text),
                Err(DocumentError::IllegalCharacter { index: 0, .. })
            ));
        }
        assert_eq!(doc, before);
        assert!(write_text(&mut doc, &slots[0], "tab\tand\nbreak").unwrap());
    }

    #[test]
    fn test_stale_slot() {
        let doc = parse_str("<w:document><w:body/></w:document>").unwrap();
        let slot = TextSlot {
            part: "word/document.xml".to_string(),
            address: smallvec![0, 0, 0],
            original_text: String::new(),
            index: 7,
        };
        assert!(matches!(
            read_text(&doc, &slot),
            Err(DocumentError::SlotNotFound { index: 7, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_write_then_read(texts in prop::collection::vec("\\PC{0,12}", 3)) {
            let mut doc = parse_str(DOCUMENT).unwrap();
            let slots = enumerate_slots("word/document.xml", &doc, Flavor::WordProcessing);
            for (slot, text) in slots.iter().zip(&texts) {
                write_text(&mut doc, slot, text).unwrap();
            }
            for (slot, text) in slots.iter().zip(&texts) {
                prop_assert_eq!(read_text(&doc, slot).unwrap(), text.as_str());
            }
        }
    }
}
