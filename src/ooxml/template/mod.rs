//! Minimal packages for new documents.
//!
//! The generated packages hold only the parts Office needs to open the file;
//! the body text comes from plain text in the session's plain-text format.

pub mod docx;
pub mod pptx;

use crate::common::xml::escape_attr;
use crate::ooxml::opc::Package;
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::text::Flavor;
use std::fmt::Write;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Build a new package of `flavor` holding `text`.
pub fn build(flavor: Flavor, text: &str) -> Package {
    let parts = match flavor {
        Flavor::WordProcessing => docx::parts(text),
        Flavor::Presentation => pptx::parts(text),
    };
    log::debug!("synthesized {} package with {} parts", flavor, parts.len());
    Package::from_parts(parts)
}

/// Generate `[Content_Types].xml` with `rels`/`xml` defaults and the given
/// part overrides.
pub(crate) fn content_types_xml(overrides: &[(String, &str)]) -> String {
    let mut xml = String::with_capacity(512 + overrides.len() * 160);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES);
    let _ = write!(
        xml,
        r#"<Default Extension="rels" ContentType="{}"/>"#,
        ct::OPC_RELATIONSHIPS
    );
    let _ = write!(xml, r#"<Default Extension="xml" ContentType="{}"/>"#, ct::XML);
    for (partname, content_type) in overrides {
        let _ = write!(
            xml,
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            escape_attr(partname),
            content_type
        );
    }
    xml.push_str("</Types>");
    xml
}

/// Generate a relationships part from `(id, type, target)` triples.
pub(crate) fn relationships_xml(rels: &[(String, &str, String)]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS);
    for (id, rel_type, target) in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id,
            rel_type,
            escape_attr(target)
        );
    }
    xml.push_str("</Relationships>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::markup;
    use crate::ooxml::opc::constants::relationship_type as rt;

    #[test]
    fn test_content_types_well_formed() {
        let xml = content_types_xml(&[("/word/document.xml".to_string(), ct::WML_DOCUMENT_MAIN)]);
        let doc = markup::parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.root.name(), "Types");
        assert_eq!(doc.root.children().len(), 3);
    }

    #[test]
    fn test_relationships_well_formed() {
        let xml = relationships_xml(&[(
            "rId1".to_string(),
            rt::OFFICE_DOCUMENT,
            "word/document.xml".to_string(),
        )]);
        let doc = markup::parse(xml.as_bytes()).unwrap();
        let rel = doc.node_at(&[0]).unwrap().as_element().unwrap();
        assert_eq!(rel.attribute("Target"), Some("word/document.xml"));
    }

    #[test]
    fn test_every_template_part_parses() {
        for flavor in [Flavor::WordProcessing, Flavor::Presentation] {
            let pkg = build(flavor, "Slide 1:\nA & B\n\nSlide 2:\n<C>");
            for part in pkg.iter_parts() {
                let name = part.partname().membername();
                assert!(
                    markup::parse(part.blob()).is_ok(),
                    "{} is not well-formed",
                    name
                );
            }
        }
    }
}
