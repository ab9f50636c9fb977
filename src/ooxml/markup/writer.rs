//! Deterministic markup serializer.
//!
//! Output is stable: serializing, parsing and serializing again yields the
//! same bytes. Elements without children are written self-closing.

use crate::common::bom;
use crate::common::xml::{escape_attr, escape_text};
use crate::ooxml::markup::node::{Element, MarkupDocument, MarkupNode, XmlDeclaration};

/// Serialize a document back to part bytes in its source encoding.
pub fn serialize(document: &MarkupDocument) -> Vec<u8> {
    bom::encode(&to_xml_string(document), document.encoding)
}

/// Serialize a document to a string, declaration included.
///
/// A document parsed without a declaration gets the one Office writes
/// (`standalone="yes"`) labelled with the source encoding.
pub fn to_xml_string(document: &MarkupDocument) -> String {
    let mut out = String::with_capacity(document.node_count() * 16);

    match &document.declaration {
        Some(decl) => write_declaration(&mut out, decl),
        None => write_declaration(
            &mut out,
            &XmlDeclaration::office_default(document.encoding),
        ),
    }

    for node in &document.prolog {
        write_top_level(&mut out, node);
    }
    write_element(&mut out, &document.root);
    for node in &document.epilog {
        write_top_level(&mut out, node);
    }

    out
}

fn write_declaration(out: &mut String, decl: &XmlDeclaration) {
    out.push_str("<?xml version=\"");
    out.push_str(&escape_attr(&decl.version));
    out.push('"');
    if let Some(encoding) = &decl.encoding {
        out.push_str(" encoding=\"");
        out.push_str(&escape_attr(encoding));
        out.push('"');
    }
    if let Some(standalone) = &decl.standalone {
        out.push_str(" standalone=\"");
        out.push_str(&escape_attr(standalone));
        out.push('"');
    }
    out.push_str("?>");
}

/// Nodes outside the root; whitespace is written raw since references are
/// not allowed there.
fn write_top_level(out: &mut String, node: &MarkupNode) {
    match node {
        MarkupNode::Text(text) => out.push_str(text),
        other => write_node(out, other),
    }
}

fn write_node(out: &mut String, node: &MarkupNode) {
    match node {
        MarkupNode::Element(element) => write_element(out, element),
        MarkupNode::Text(text) => out.push_str(&escape_text(text)),
        MarkupNode::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        },
        MarkupNode::ProcessingInstruction(body) => {
            out.push_str("<?");
            out.push_str(body);
            out.push_str("?>");
        },
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.name());
    for (key, value) in element.attributes().iter() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    if element.children().is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in element.children() {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}
