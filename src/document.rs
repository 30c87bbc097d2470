use crate::error::{ParseError, ParseErrorKind};
use std::{fmt, ops::Deref, str};

/// Owned run of text captured from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Text {
    value: String,
}

impl Text {
    /// Copies `bytes` into an owned string.
    ///
    /// `offset` is where `bytes` starts in its buffer, used to point errors at the bad byte.
    pub(crate) fn from_utf8(bytes: &[u8], offset: usize) -> Result<Self, ParseError> {
        match str::from_utf8(bytes) {
            Ok(value) => Ok(Self::from(value)),
            Err(e) => Err(ParseError::new(ParseErrorKind::InvalidUtf8, offset + e.valid_up_to())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn into_string(self) -> String {
        self.value
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.value.push_str(s);
    }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Represents an XML attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    name: Text,
    value: Text,
}

impl Attribute {
    pub fn new(name: impl Into<Text>, value: impl Into<Text>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Gets the name of the attribute this instance represents.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the raw value of the attribute. Entities are not decoded.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Index of a [`Node`] inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A parsed element, stored in its [`Document`]'s arena.
///
/// Use [`NodeRef`] to navigate between nodes.
#[derive(Debug, Clone)]
pub struct Node {
    tag: Text,
    inner_text: Text,
    attributes: Vec<Attribute>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Text between the opening and closing tags, without any child elements.
    pub fn inner_text(&self) -> &str {
        &self.inner_text
    }

    /// Attributes in the order they appear in the opening tag.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Owns every node parsed from one buffer.
///
/// A document does not borrow the buffer it was parsed from,
/// so it can be moved across threads and outlive its source freely.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: self.root,
        }
    }

    /// Gets the node with the given id, if it belongs to this document.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(id.0).map(|_| NodeRef { doc: self, id })
    }

    /// Number of elements in the document, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates every element in document order.
    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |ix| NodeRef {
            doc: self,
            id: NodeId(ix),
        })
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}

impl Eq for Document {}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root(), f)
    }
}

/// Borrowed handle to a node, able to walk to its parent and children.
#[derive(Clone, Copy)]
pub struct NodeRef<'doc> {
    doc: &'doc Document,
    id: NodeId,
}

impl<'doc> NodeRef<'doc> {
    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub const fn document(&self) -> &'doc Document {
        self.doc
    }

    pub fn node(&self) -> &'doc Node {
        &self.doc.nodes[self.id.0]
    }

    pub fn tag(&self) -> &'doc str {
        self.node().tag()
    }

    pub fn inner_text(&self) -> &'doc str {
        self.node().inner_text()
    }

    pub fn attributes(&self) -> &'doc [Attribute] {
        self.node().attributes()
    }

    /// Value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&'doc str> {
        self.attributes()
            .iter()
            .find(|attr| attr.name() == name)
            .map(Attribute::value)
    }

    pub fn parent(&self) -> Option<NodeRef<'doc>> {
        let doc = self.doc;
        self.node().parent.map(|id| NodeRef { doc, id })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'doc>> + 'doc {
        let doc = self.doc;
        self.node().children.iter().map(move |&id| NodeRef { doc, id })
    }

    /// Number of ancestors; the root has depth 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            depth += 1;
            current = node.parent();
        }
        depth
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.node(), other.node());
        a.tag == b.tag
            && a.inner_text == b.inner_text
            && a.attributes == b.attributes
            && a.children.len() == b.children.len()
            && self.children().zip(other.children()).all(|(x, y)| x == y)
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("tag", &node.tag)
            .field("inner_text", &node.inner_text)
            .field("attributes", &node.attributes)
            .field("children", &node.children)
            .finish()
    }
}

/// Writes the element back out as markup: inner text first, then children.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        write!(f, "<{}", node.tag)?;
        for attr in &node.attributes {
            write!(f, " {}=\"{}\"", attr.name, attr.value)?;
        }
        write!(f, ">{}", node.inner_text)?;
        for child in self.children() {
            fmt::Display::fmt(&child, f)?;
        }
        write!(f, "</{}>", node.tag)
    }
}

/// Append-only arena used while parsing.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Adds an element, linking it under `parent` if one is given.
    pub(crate) fn open(
        &mut self,
        tag: Text,
        attributes: Vec<Attribute>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag,
            inner_text: Text::default(),
            attributes,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub(crate) fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    pub(crate) fn set_inner_text(&mut self, id: NodeId, text: Text) {
        self.nodes[id.0].inner_text = text;
    }

    pub(crate) fn finish(self, root: NodeId) -> Document {
        Document {
            nodes: self.nodes,
            root,
        }
    }
}
