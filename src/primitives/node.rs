//! Node - The closed set of tree node variants.
//!
//! - [`Text`] - leaf holding a string, always host-backed
//! - [`Element`] - host primitive with a tag, attributes and children
//! - [`Component`] - composite with a name, props and children, never host-backed
//!
//! Each variant owns its children outright. The element store only records
//! descriptors, so the tree stays the sole owner of every node.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::types::{Describe, Descriptor, Id, Key};

/// Attribute or prop map. Ordered so diffs are deterministic.
pub type Attributes = BTreeMap<String, String>;

// =============================================================================
// Node Kind
// =============================================================================

/// Structural type tag used to decide "same node, diff in place" versus
/// "different node, replace".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind<'a> {
    Text,
    Element(&'a str),
    Component(&'a str),
}

// =============================================================================
// Variants
// =============================================================================

/// Text leaf.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub descriptor: Descriptor,
    pub key: Option<Key>,
    pub content: String,
}

/// Host element such as `div` or `body`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub descriptor: Descriptor,
    pub key: Option<Key>,
    pub tag: Cow<'static, str>,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

/// Composite node. Groups children without a host representation of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub descriptor: Descriptor,
    pub key: Option<Key>,
    pub name: Cow<'static, str>,
    pub props: Attributes,
    pub children: Vec<Node>,
}

/// A node of the UI tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(Text),
    Element(Element),
    Component(Component),
}

// =============================================================================
// Constructors
// =============================================================================

/// Create a text node.
pub fn text(content: impl Into<String>) -> Node {
    Node::Text(Text {
        content: content.into(),
        ..Default::default()
    })
}

/// Start building an element.
///
/// ```ignore
/// let row: Node = element("li")
///     .key("row-1")
///     .attr("class", "row")
///     .child(text("first"))
///     .into();
/// ```
pub fn element(tag: impl Into<Cow<'static, str>>) -> Element {
    Element {
        descriptor: Descriptor::default(),
        key: None,
        tag: tag.into(),
        attributes: Attributes::new(),
        children: Vec::new(),
    }
}

/// Start building a component.
pub fn component(name: impl Into<Cow<'static, str>>) -> Component {
    Component {
        descriptor: Descriptor::default(),
        key: None,
        name: name.into(),
        props: Attributes::new(),
        children: Vec::new(),
    }
}

/// The `body` element used as the engine root.
pub fn body() -> Element {
    element("body")
}

impl Text {
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl Element {
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

impl Component {
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

impl From<Text> for Node {
    fn from(value: Text) -> Self {
        Node::Text(value)
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl From<Component> for Node {
    fn from(value: Component) -> Self {
        Node::Component(value)
    }
}

// =============================================================================
// Accessors
// =============================================================================

impl Node {
    pub fn kind(&self) -> NodeKind<'_> {
        match self {
            Node::Text(_) => NodeKind::Text,
            Node::Element(e) => NodeKind::Element(&e.tag),
            Node::Component(c) => NodeKind::Component(&c.name),
        }
    }

    pub fn key(&self) -> Option<&Key> {
        match self {
            Node::Text(t) => t.key.as_ref(),
            Node::Element(e) => e.key.as_ref(),
            Node::Component(c) => c.key.as_ref(),
        }
    }

    /// Same kind and same key: the two describe one logical node.
    pub fn is_same(&self, other: &Node) -> bool {
        self.kind() == other.kind() && self.key() == other.key()
    }

    /// Whether mounting this node needs a host handle.
    pub fn is_host(&self) -> bool {
        !matches!(self, Node::Component(_))
    }

    pub fn descriptor_mut(&mut self) -> &mut Descriptor {
        match self {
            Node::Text(t) => &mut t.descriptor,
            Node::Element(e) => &mut e.descriptor,
            Node::Component(c) => &mut c.descriptor,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_) => &[],
            Node::Element(e) => &e.children,
            Node::Component(c) => &c.children,
        }
    }

    /// Mutable child list. `None` for text leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Text(_) => None,
            Node::Element(e) => Some(&mut e.children),
            Node::Component(c) => Some(&mut c.children),
        }
    }

    /// Detach the child list, leaving it empty.
    pub(crate) fn take_children(&mut self) -> Vec<Node> {
        self.children_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Unmounted copy of this node with the same kind, key and content but
    /// no children.
    pub(crate) fn shell(&self) -> Node {
        match self {
            Node::Text(t) => Node::Text(Text {
                descriptor: Descriptor::default(),
                key: t.key.clone(),
                content: t.content.clone(),
            }),
            Node::Element(e) => Node::Element(Element {
                descriptor: Descriptor::default(),
                key: e.key.clone(),
                tag: e.tag.clone(),
                attributes: e.attributes.clone(),
                children: Vec::new(),
            }),
            Node::Component(c) => Node::Component(Component {
                descriptor: Descriptor::default(),
                key: c.key.clone(),
                name: c.name.clone(),
                props: c.props.clone(),
                children: Vec::new(),
            }),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_len).sum::<usize>()
    }

    /// The node in this subtree carrying `id`, if any.
    pub fn find(&self, id: Id) -> Option<&Node> {
        if self.descriptor().id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }
}

impl Describe for Node {
    fn descriptor(&self) -> &Descriptor {
        match self {
            Node::Text(t) => &t.descriptor,
            Node::Element(e) => &e.descriptor,
            Node::Component(c) => &c.descriptor,
        }
    }
}

impl Describe for Text {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl Describe for Element {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl Describe for Component {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}
