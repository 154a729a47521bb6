//! DOM tree implementation for the Magpie selector tooling.
//!
//! This crate provides an arena-based document tree following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), reduced to the
//! capability set the selector generator reads: tag name, parent link,
//! ordered child list, node-type discriminator, and attribute lookup.
//!
//! # Design
//!
//! All relationships are stored as [`NodeId`] indices into a single arena,
//! giving O(1) access and traversal without borrow checker issues. The
//! selector components treat the tree as a read-only snapshot; the mutation
//! API ([`DomTree::alloc`], [`DomTree::append_child`]) exists so embedders
//! and tests can build documents.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A single node in the tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "An object that participates in a tree has a parent, which is either
/// null or an object, and an ordered list of children."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// The node's parent, or `None` for the document root and detached
    /// (orphan) nodes.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data: local name plus attribute list.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element),
/// "when an element is created, its local name is always given". Namespaces,
/// custom elements, and the rest of the element interface are out of scope.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name", stored as authored.
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// The tag name case-folded to ASCII lowercase.
    ///
    /// HTML element names are ASCII case-insensitive; selector fragments are
    /// always emitted in the lowercase form.
    #[must_use]
    pub fn local_name(&self) -> String {
        self.tag_name.to_ascii_lowercase()
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Returns the element's `id` attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// The class names from the `class` attribute, split on ASCII whitespace,
    /// de-duplicated, in document order.
    ///
    /// Order is preserved so that consumers emitting class selectors produce
    /// deterministic output.
    #[must_use]
    pub fn class_list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if let Some(value) = self.attrs.get("class") {
            for name in value.split_ascii_whitespace() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Whether the element's class list contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.class_list().contains(&name)
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
        };
        DomTree {
            nodes: vec![document],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node ID in the tree, in allocation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`, updating the parent
    /// link.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.as_element(id).is_some()
    }

    /// Whether the node is the document.
    #[must_use]
    pub fn is_document(&self, id: NodeId) -> bool {
        matches!(
            self.get(id).map(|n| &n.node_type),
            Some(NodeType::Document)
        )
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Iterate over the element children of a node, in document order.
    ///
    /// Text, comment, and other node types are excluded; this is the list
    /// structural selectors such as `:nth-child` index into.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
    }

    /// The zero-based position of a node among its parent's element children.
    ///
    /// Returns `None` for non-elements and for nodes without a parent.
    #[must_use]
    pub fn element_index(&self, id: NodeId) -> Option<usize> {
        if !self.is_element(id) {
            return None;
        }
        let parent = self.parent(id)?;
        self.element_children(parent).position(|child| child == id)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// The nearest ancestor of a node that is an element, skipping any
    /// non-element ancestors.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|&ancestor| self.is_element(ancestor))
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is
    /// that document, if it exists; otherwise null." For HTML documents this
    /// is the `<html>` element.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).next()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's
    /// children that is either a body element or a frameset element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;

        self.element_children(html).find(|&id| {
            self.as_element(id).is_some_and(|e| {
                let tag = e.local_name();
                tag == "body" || tag == "frameset"
            })
        })
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
