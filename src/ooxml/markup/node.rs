//! Generic ordered markup tree.
//!
//! Names are kept exactly as written in the source (`w:t`, `a:r`); namespace
//! prefixes are never resolved. Namespace declarations are ordinary attributes.

use crate::common::bom::SourceEncoding;
use smallvec::SmallVec;

/// Child-index path from a document's root element to a node.
pub type Address = SmallVec<[usize; 8]>;

/// A node of the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(Element),
    /// Character data, entities resolved
    Text(String),
    /// Comment body, verbatim
    Comment(String),
    /// Processing instruction body (target and data), verbatim
    ProcessingInstruction(String),
}

impl MarkupNode {
    /// An empty element node.
    #[inline]
    pub fn element(name: impl Into<String>) -> Self {
        MarkupNode::Element(Element::new(name))
    }

    /// A text node.
    #[inline]
    pub fn text(text: impl Into<String>) -> Self {
        MarkupNode::Text(text.into())
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MarkupNode::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        match self {
            MarkupNode::Element(element) => element.node_count(),
            _ => 1,
        }
    }
}

/// Attributes in source order.
///
/// Lookups are linear; OOXML elements carry a handful of attributes at most.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute. An existing attribute keeps its position; a new one
    /// is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An element with its qualified name, ordered attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Attributes,
    pub(crate) children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// The qualified name exactly as written, e.g. `w:t`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[inline]
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    #[inline]
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name, value);
    }

    #[inline]
    pub fn children(&self) -> &[MarkupNode] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<MarkupNode> {
        &mut self.children
    }

    pub fn push(&mut self, child: MarkupNode) {
        self.children.push(child);
    }

    /// The element's text when its only child is a single text node.
    pub fn sole_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [MarkupNode::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Resolve a child-index path relative to this element.
    pub fn node_at(&self, address: &[usize]) -> Option<&MarkupNode> {
        let (&first, rest) = address.split_first()?;
        let mut node = self.children.get(first)?;
        for &index in rest {
            node = node.as_element()?.children.get(index)?;
        }
        Some(node)
    }

    /// Mutable variant of [`Element::node_at`].
    pub fn node_at_mut(&mut self, address: &[usize]) -> Option<&mut MarkupNode> {
        let (&first, rest) = address.split_first()?;
        let mut node = self.children.get_mut(first)?;
        for &index in rest {
            node = node.as_element_mut()?.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Resolve the element that owns the node at `address`.
    pub fn parent_of_mut(&mut self, address: &[usize]) -> Option<&mut Element> {
        match address.split_last() {
            Some((_, [])) => Some(self),
            Some((_, parent)) => self.node_at_mut(parent)?.as_element_mut(),
            None => None,
        }
    }

    /// Number of nodes in this subtree, this element included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(MarkupNode::node_count).sum::<usize>()
    }
}

/// The `<?xml ...?>` declaration of a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl XmlDeclaration {
    /// The declaration Office writes for its own parts.
    pub fn office_default(encoding: SourceEncoding) -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some(encoding.label().to_string()),
            standalone: Some("yes".to_string()),
        }
    }
}

/// A parsed markup part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    pub declaration: Option<XmlDeclaration>,
    /// Byte encoding the part was stored in
    pub encoding: SourceEncoding,
    /// Whitespace, comments and processing instructions before the root
    pub prolog: Vec<MarkupNode>,
    pub root: Element,
    /// Whitespace, comments and processing instructions after the root
    pub epilog: Vec<MarkupNode>,
}

impl MarkupDocument {
    /// A document with an Office-style declaration around `root`.
    pub fn new(root: Element) -> Self {
        Self {
            declaration: Some(XmlDeclaration::office_default(SourceEncoding::Utf8)),
            encoding: SourceEncoding::Utf8,
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Resolve a child-index path from the root element.
    #[inline]
    pub fn node_at(&self, address: &[usize]) -> Option<&MarkupNode> {
        self.root.node_at(address)
    }

    #[inline]
    pub fn node_at_mut(&mut self, address: &[usize]) -> Option<&mut MarkupNode> {
        self.root.node_at_mut(address)
    }

    /// Number of nodes under (and including) the root element.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}
