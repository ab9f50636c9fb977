//! Markup parser built on quick-xml events.
//!
//! The parser keeps everything a lossless round trip needs: attribute order,
//! namespace declarations, whitespace-only text, comments and processing
//! instructions. CDATA sections are folded into ordinary text.

use crate::common::bom;
use crate::common::xml::{escape_text, find_illegal_char, unescape};
use crate::ooxml::markup::error::{MarkupError, Result};
use crate::ooxml::markup::node::{Element, MarkupDocument, MarkupNode, XmlDeclaration};
use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use std::borrow::Cow;

/// Parse the bytes of a markup part.
///
/// The byte encoding (UTF-8 with or without BOM, UTF-16 with BOM) is detected
/// and recorded on the returned document so it can be written back the same way.
///
/// # Errors
/// [`MarkupError::Encoding`] for undecodable bytes, [`MarkupError::Doctype`]
/// for a DOCTYPE declaration and [`MarkupError::Malformed`] for anything that
/// is not well-formed.
pub fn parse(bytes: &[u8]) -> Result<MarkupDocument> {
    let (text, encoding) = bom::decode(bytes)
        .ok_or_else(|| MarkupError::Encoding("invalid byte sequence".to_string()))?;
    let mut document = parse_str(&text)?;
    document.encoding = encoding;
    Ok(document)
}

/// Parse already-decoded markup text.
pub fn parse_str(xml: &str) -> Result<MarkupDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            MarkupError::malformed(reader.error_position() as u64, e.to_string())
        })?;
        let position = reader.buffer_position() as u64;

        match event {
            Event::Eof => break,

            Event::Decl(decl) => builder.declaration(&decl, position)?,

            Event::DocType(_) => return Err(MarkupError::Doctype),

            Event::Start(start) => {
                let element = element_from(&start, position)?;
                builder.flush_text(position)?;
                builder.stack.push(element);
            },

            Event::Empty(start) => {
                let element = element_from(&start, position)?;
                builder.flush_text(position)?;
                builder.attach(MarkupNode::Element(element), position)?;
            },

            Event::End(_) => {
                builder.flush_text(position)?;
                let mut element = builder
                    .stack
                    .pop()
                    .ok_or_else(|| MarkupError::malformed(position, "unexpected end tag"))?;
                // A start/end pair holds an empty text node; `<x/>` holds nothing
                if element.children.is_empty() {
                    element.children.push(MarkupNode::Text(String::new()));
                }
                builder.attach(MarkupNode::Element(element), position)?;
            },

            Event::Text(text) => {
                let raw = utf8(&text, position)?;
                builder.text(raw, position)?;
            },

            Event::GeneralRef(reference) => {
                let name = utf8(&reference, position)?;
                builder.text(&format!("&{};", name), position)?;
            },

            Event::CData(cdata) => {
                let content = normalize_line_endings(utf8(&cdata, position)?);
                builder.text(&escape_text(&content), position)?;
            },

            Event::Comment(comment) => {
                let body = xml_chars(utf8(&comment, position)?, position)?.to_string();
                builder.flush_text(position)?;
                builder.attach(MarkupNode::Comment(body), position)?;
            },

            Event::PI(pi) => {
                let body = xml_chars(utf8(&pi, position)?, position)?.to_string();
                builder.flush_text(position)?;
                builder.attach(MarkupNode::ProcessingInstruction(body), position)?;
            },
        }
    }

    builder.finish(reader.buffer_position() as u64)
}

#[derive(Default)]
struct TreeBuilder {
    declaration: Option<XmlDeclaration>,
    prolog: Vec<MarkupNode>,
    root: Option<Element>,
    epilog: Vec<MarkupNode>,
    /// Open elements, innermost last
    stack: Vec<Element>,
    /// Raw (still escaped) character data of the current text run
    pending: String,
    has_pending: bool,
    seen_content: bool,
}

impl TreeBuilder {
    fn declaration(&mut self, decl: &BytesDecl<'_>, position: u64) -> Result<()> {
        if self.seen_content || self.declaration.is_some() {
            return Err(MarkupError::malformed(
                position,
                "XML declaration is only allowed at the start of the document",
            ));
        }

        let version = decl
            .version()
            .ok()
            .map(|v| String::from_utf8_lossy(&v).into_owned())
            .unwrap_or_else(|| "1.0".to_string());
        let encoding = decl
            .encoding()
            .and_then(|e| e.ok())
            .map(|e| String::from_utf8_lossy(&e).into_owned());
        let standalone = decl
            .standalone()
            .and_then(|s| s.ok())
            .map(|s| String::from_utf8_lossy(&s).into_owned());

        self.declaration = Some(XmlDeclaration {
            version,
            encoding,
            standalone,
        });
        Ok(())
    }

    fn text(&mut self, raw: &str, position: u64) -> Result<()> {
        if self.stack.is_empty() {
            if !raw.chars().all(is_xml_whitespace) {
                return Err(MarkupError::malformed(
                    position,
                    "character data outside the root element",
                ));
            }
            // Whitespace between top-level nodes is kept verbatim
            self.seen_content = true;
            self.top_level().push(MarkupNode::Text(raw.to_string()));
            return Ok(());
        }

        self.pending.push_str(raw);
        self.has_pending = true;
        Ok(())
    }

    fn flush_text(&mut self, position: u64) -> Result<()> {
        if !self.has_pending {
            return Ok(());
        }
        self.has_pending = false;

        let raw = std::mem::take(&mut self.pending);
        xml_chars(&raw, position)?;
        let normalized = normalize_line_endings(&raw);
        let text = unescape(&normalized)
            .map_err(|reason| MarkupError::malformed(position, reason))?
            .into_owned();

        match self.stack.last_mut() {
            Some(parent) => parent.children.push(MarkupNode::Text(text)),
            None => return Err(MarkupError::malformed(position, "dangling character data")),
        }
        Ok(())
    }

    fn attach(&mut self, node: MarkupNode, position: u64) -> Result<()> {
        self.seen_content = true;
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }

        match node {
            MarkupNode::Element(element) => {
                if self.root.is_some() {
                    return Err(MarkupError::malformed(position, "multiple root elements"));
                }
                self.root = Some(element);
            },
            other => self.top_level().push(other),
        }
        Ok(())
    }

    fn top_level(&mut self) -> &mut Vec<MarkupNode> {
        if self.root.is_some() {
            &mut self.epilog
        } else {
            &mut self.prolog
        }
    }

    fn finish(self, position: u64) -> Result<MarkupDocument> {
        if let Some(open) = self.stack.last() {
            return Err(MarkupError::malformed(
                position,
                format!("unclosed element <{}>", open.name()),
            ));
        }
        let root = self
            .root
            .ok_or_else(|| MarkupError::malformed(position, "no root element"))?;

        Ok(MarkupDocument {
            declaration: self.declaration,
            encoding: bom::SourceEncoding::Utf8,
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

fn element_from(start: &BytesStart<'_>, position: u64) -> Result<Element> {
    let mut element = Element::new(utf8(start.name().as_ref(), position)?);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| MarkupError::malformed(position, e.to_string()))?;
        let key = utf8(attr.key.as_ref(), position)?;
        let raw = xml_chars(utf8(&attr.value, position)?, position)?;
        let value = unescape(&normalize_attr_value(raw))
            .map_err(|reason| MarkupError::malformed(position, reason))?
            .into_owned();
        element.attributes_mut().insert(key, value);
    }

    Ok(element)
}

#[inline]
fn utf8(bytes: &[u8], position: u64) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| MarkupError::malformed(position, e.to_string()))
}

/// Reject characters XML 1.0 does not allow, raw or as references.
fn xml_chars(raw: &str, position: u64) -> Result<&str> {
    match find_illegal_char(raw) {
        Some(c) => Err(MarkupError::malformed(
            position,
            format!("character U+{:04X} is not allowed in XML", c as u32),
        )),
        None => Ok(raw),
    }
}

#[inline]
fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Fold literal `\r\n` and lone `\r` into `\n`, as XML processors do.
fn normalize_line_endings(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\r') {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Attribute-value normalization: literal whitespace characters become spaces.
/// Character references are resolved afterwards and survive untouched.
fn normalize_attr_value(raw: &str) -> Cow<'_, str> {
    let line_folded = normalize_line_endings(raw);
    if !line_folded.contains(['\t', '\n']) {
        return line_folded;
    }
    Cow::Owned(line_folded.replace(['\t', '\n'], " "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::bom::SourceEncoding;

    #[test]
    fn test_parse_keeps_names_and_attribute_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="urn:w" xmlns:r="urn:r" mc:Ignorable="w14"><w:body/></w:document>"#;
        let doc = parse(xml.as_bytes()).unwrap();

        let decl = doc.declaration.as_ref().unwrap();
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(decl.standalone.as_deref(), Some("yes"));

        assert_eq!(doc.root.name(), "w:document");
        let keys: Vec<_> = doc.root.attributes().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["xmlns:w", "xmlns:r", "mc:Ignorable"]);
        assert_eq!(doc.prolog, vec![MarkupNode::Text("\n".to_string())]);
    }

    #[test]
    fn test_empty_pair_and_self_closing_differ() {
        let doc = parse_str("<r><a></a><b/></r>").unwrap();
        let a = doc.node_at(&[0]).unwrap().as_element().unwrap();
        let b = doc.node_at(&[1]).unwrap().as_element().unwrap();
        assert_eq!(a.sole_text(), Some(""));
        assert!(b.children().is_empty());
    }

    #[test]
    fn test_entities_and_cdata_become_text() {
        let doc = parse_str("<t>a &amp; b &#x41;<![CDATA[<c> & d]]></t>").unwrap();
        assert_eq!(doc.root.sole_text(), Some("a & b A<c> & d"));
    }

    #[test]
    fn test_whitespace_text_is_kept() {
        let doc = parse_str("<r>\n  <a/>\n</r>").unwrap();
        let kinds: Vec<_> = doc
            .root
            .children()
            .iter()
            .map(|n| n.as_text().is_some())
            .collect();
        assert_eq!(kinds, vec![true, false, true]);
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let doc = parse_str("<t>a\r\nb\rc&#13;</t>").unwrap();
        assert_eq!(doc.root.sole_text(), Some("a\nb\nc\r"));
    }

    #[test]
    fn test_cdata_line_endings_are_normalized() {
        let doc = parse_str("<t>a<![CDATA[b\r\nc\rd]]></t>").unwrap();
        assert_eq!(doc.root.sole_text(), Some("ab\nc\nd"));
    }

    #[test]
    fn test_illegal_characters_rejected() {
        for xml in [
            "<t>a\u{1}b</t>",
            "<t>&#0;</t>",
            "<t>&#x1B;</t>",
            "<t><![CDATA[\u{8}]]></t>",
            "<a v=\"&#x1;\"/>",
            "<a v=\"\u{c}\"/>",
            "<r><!--\u{2}--></r>",
            "<t>\u{FFFF}</t>",
        ] {
            assert!(
                matches!(parse_str(xml), Err(MarkupError::Malformed { .. })),
                "expected malformed for {:?}",
                xml
            );
        }
        assert_eq!(parse_str("<t>&#9;&#x10FFFF;</t>").unwrap().root.sole_text(), Some("\t\u{10FFFF}"));
    }

    #[test]
    fn test_attribute_value_normalization() {
        let doc = parse_str("<a v=\"x\ty\nz&#10;\"/>").unwrap();
        assert_eq!(doc.root.attribute("v"), Some("x y z\n"));
    }

    #[test]
    fn test_comments_and_processing_instructions() {
        let doc = parse_str("<!-- head --><r><?mso-app x?><!--in--></r><!--tail-->").unwrap();
        assert_eq!(doc.prolog, vec![MarkupNode::Comment(" head ".to_string())]);
        assert_eq!(
            doc.root.children(),
            &[
                MarkupNode::ProcessingInstruction("mso-app x".to_string()),
                MarkupNode::Comment("in".to_string()),
            ]
        );
        assert_eq!(doc.epilog, vec![MarkupNode::Comment("tail".to_string())]);
    }

    #[test]
    fn test_malformed_inputs() {
        for xml in ["<a><b></a>", "<a>", "", "<a/><b/>", "text<a/>", "<a>&bogus;</a>"] {
            assert!(
                matches!(parse_str(xml), Err(MarkupError::Malformed { .. })),
                "expected malformed for {:?}",
                xml
            );
        }
    }

    #[test]
    fn test_doctype_rejected() {
        let xml = "<!DOCTYPE r [<!ENTITY e \"x\">]><r>&e;</r>";
        assert_eq!(parse_str(xml), Err(MarkupError::Doctype));
    }

    #[test]
    fn test_utf16_part() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a>é</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = parse(&bytes).unwrap();
        assert_eq!(doc.encoding, SourceEncoding::Utf16Le);
        assert_eq!(doc.root.sole_text(), Some("é"));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            parse(&[b'<', b'a', b'>', 0xC3, 0x28, b'<', b'/', b'a', b'>']),
            Err(MarkupError::Encoding(_))
        ));
    }
}
