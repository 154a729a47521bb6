//! Tests for the element view: class lists, element children, ancestor
//! traversal, and the document/body helpers.

use magpie_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its `NodeId`.
fn alloc_element(tree: &mut DomTree, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    tree.alloc(NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: attrs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }))
}

// ========== ElementData ==========

#[test]
fn test_local_name_is_lowercased() {
    let element = ElementData {
        tag_name: "DIV".to_string(),
        attrs: Default::default(),
    };
    assert_eq!(element.local_name(), "div");
}

#[test]
fn test_class_list_preserves_document_order() {
    let mut tree = DomTree::new();
    let id = alloc_element(&mut tree, "p", &[("class", "zebra apple middle")]);
    let element = tree.as_element(id).unwrap();
    assert_eq!(element.class_list(), vec!["zebra", "apple", "middle"]);
}

#[test]
fn test_class_list_splits_on_any_ascii_whitespace_and_dedups() {
    let mut tree = DomTree::new();
    let id = alloc_element(&mut tree, "p", &[("class", "  a \t b\na ")]);
    let element = tree.as_element(id).unwrap();
    assert_eq!(element.class_list(), vec!["a", "b"]);
    assert!(element.has_class("b"));
    assert!(!element.has_class("c"));
}

#[test]
fn test_missing_class_attribute_is_empty_list() {
    let mut tree = DomTree::new();
    let id = alloc_element(&mut tree, "p", &[]);
    assert!(tree.as_element(id).unwrap().class_list().is_empty());
}

#[test]
fn test_attr_lookup() {
    let mut tree = DomTree::new();
    let id = alloc_element(&mut tree, "input", &[("type", "text")]);
    let element = tree.as_element(id).unwrap();
    assert_eq!(element.attr("type"), Some("text"));
    assert_eq!(element.attr("href"), None);
}

// ========== element children and indexing ==========

#[test]
fn test_element_children_skip_text_and_comments() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div", &[]);
    let text = tree.alloc(NodeType::Text("hello".to_string()));
    let p = alloc_element(&mut tree, "p", &[]);
    let comment = tree.alloc(NodeType::Comment("note".to_string()));
    let span = alloc_element(&mut tree, "span", &[]);
    tree.append_child(div, text);
    tree.append_child(div, p);
    tree.append_child(div, comment);
    tree.append_child(div, span);

    let elements: Vec<NodeId> = tree.element_children(div).collect();
    assert_eq!(elements, vec![p, span]);
}

#[test]
fn test_element_index_ignores_non_elements() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div", &[]);
    let text = tree.alloc(NodeType::Text("hello".to_string()));
    let p = alloc_element(&mut tree, "p", &[]);
    let span = alloc_element(&mut tree, "span", &[]);
    tree.append_child(div, text);
    tree.append_child(div, p);
    tree.append_child(div, span);

    assert_eq!(tree.element_index(p), Some(0));
    assert_eq!(tree.element_index(span), Some(1));
    assert_eq!(tree.element_index(text), None);
}

#[test]
fn test_element_index_of_detached_node() {
    let mut tree = DomTree::new();
    let orphan = alloc_element(&mut tree, "div", &[]);
    assert_eq!(tree.element_index(orphan), None);
}

// ========== ancestors ==========

#[test]
fn test_ancestors_walk_to_root() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html", &[]);
    let body = alloc_element(&mut tree, "body", &[]);
    let p = alloc_element(&mut tree, "p", &[]);
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);
    tree.append_child(body, p);

    let ancestors: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(ancestors, vec![body, html, NodeId::ROOT]);
}

#[test]
fn test_parent_element_skips_the_document() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html", &[]);
    tree.append_child(NodeId::ROOT, html);

    assert_eq!(tree.parent_element(html), None);
    assert!(tree.is_document(NodeId::ROOT));
    assert!(!tree.is_element(NodeId::ROOT));
}

// ========== document helpers ==========

#[test]
fn test_document_element_and_body() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html", &[]);
    let head = alloc_element(&mut tree, "head", &[]);
    let body = alloc_element(&mut tree, "BODY", &[]);
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_empty_tree_has_no_document_element() {
    let tree = DomTree::new();
    assert_eq!(tree.document_element(), None);
    assert_eq!(tree.body(), None);
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
}
