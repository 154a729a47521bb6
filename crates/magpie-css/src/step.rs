//! Selector step construction.
//!
//! A step is the selector fragment for exactly one ancestor level of the
//! path, e.g. `div:nth-child(3)`, `p.about`, or `#main`. The builder decides
//! per element whether the step can be an id selector, a tag + class
//! combination, a structural `:nth-child` index, or a tag plus an
//! `input[type="..."]` attribute hint.

use std::collections::HashSet;
use std::fmt;
use std::fmt::Write;

use magpie_dom::{DomTree, NodeId};
use serde::Serialize;

use crate::PathError;
use crate::ident::escape_identifier;

/// One fragment of a selector path.
///
/// A step is immutable once constructed. The `optimized` flag marks a step
/// whose fragment alone anchors the rest of the selector (an id selector,
/// one of `html`/`head`/`body`, or the tag of an orphan element), so the
/// ascent may terminate at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    fragment: String,
    optimized: bool,
}

impl Step {
    /// A structural step that requires further ancestors to be unique.
    #[must_use]
    pub const fn new(fragment: String) -> Self {
        Step {
            fragment,
            optimized: false,
        }
    }

    /// A self-sufficient step; the ascent terminates here.
    #[must_use]
    pub const fn optimized(fragment: String) -> Self {
        Step {
            fragment,
            optimized: true,
        }
    }

    /// The selector fragment, e.g. `div:nth-child(3)`.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Whether the fragment alone uniquely anchors the subtree.
    #[must_use]
    pub const fn is_optimized(&self) -> bool {
        self.optimized
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fragment)
    }
}

/// How the structural part of a fragment is produced.
///
/// `NthChild` indexes the element among its parent's element children;
/// `TagAndClasses` appends the classes that no same-tag sibling shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepMode {
    NthChild,
    TagAndClasses,
}

/// Build the selector step for `node`.
///
/// `is_target` marks the element the whole path is being computed for; only
/// the target step may receive the `input[type="..."]` attribute decoration.
///
/// # Errors
///
/// - [`PathError::NotAnElement`] if `node` is not an element.
/// - [`PathError::NonHtmlUnderDocument`] if `node` is a direct child of the
///   document but is not `<html>`.
pub fn build_step(tree: &DomTree, node: NodeId, is_target: bool) -> Result<Step, PathError> {
    let Some(element) = tree.as_element(node) else {
        return Err(PathError::NotAnElement);
    };
    let tag = element.local_name();

    // Shortcut checks: a non-empty id, a singleton tag, or an orphan element
    // each anchor the path on their own.
    if let Some(id) = element.id()
        && !id.is_empty()
    {
        return Ok(Step::optimized(format!("#{}", escape_identifier(id))));
    }
    if matches!(tag.as_str(), "html" | "head" | "body") {
        return Ok(Step::optimized(tag));
    }
    let Some(parent) = tree.parent(node) else {
        return Ok(Step::optimized(tag));
    };
    if tree.is_document(parent) {
        return Err(PathError::NonHtmlUnderDocument(tag));
    }

    // Sibling inspection: find the element-child position of `node`, and
    // eliminate every class that some same-tag sibling also carries. Classes
    // that survive distinguish the element; if none survive (or it has none),
    // only the structural index can.
    let own_classes = element.class_list();
    let mut remaining = own_classes.clone();
    let mut needs_nth_child = false;

    // The node is always present in its parent's child list.
    let own_index = tree
        .element_children(parent)
        .position(|child| child == node)
        .unwrap_or(0);

    for sibling in tree.element_children(parent) {
        if needs_nth_child {
            break;
        }
        if sibling == node {
            continue;
        }
        let Some(sibling_element) = tree.as_element(sibling) else {
            continue;
        };
        if sibling_element.local_name() != tag {
            continue;
        }
        if own_classes.is_empty() {
            needs_nth_child = true;
            continue;
        }
        let sibling_classes: HashSet<&str> = sibling_element.class_list().into_iter().collect();
        remaining.retain(|class| !sibling_classes.contains(class));
        if remaining.is_empty() {
            needs_nth_child = true;
        }
    }

    let mode = if needs_nth_child {
        StepMode::NthChild
    } else {
        StepMode::TagAndClasses
    };

    let mut fragment = tag.clone();

    // Target-only hint for otherwise indistinguishable form inputs. The id
    // shortcut above already guarantees there is no usable id here.
    if is_target && tag == "input" {
        let type_attr = element.attr("type").unwrap_or_default();
        let has_class = element.attr("class").is_some_and(|c| !c.is_empty());
        if !type_attr.is_empty() && !has_class {
            // Infallible on String.
            let _ = write!(fragment, "[type=\"{type_attr}\"]");
        }
    }

    match mode {
        StepMode::NthChild => {
            // :nth-child is 1-based.
            let _ = write!(fragment, ":nth-child({})", own_index + 1);
        }
        StepMode::TagAndClasses => {
            for class in remaining {
                fragment.push('.');
                fragment.push_str(&escape_identifier(class));
            }
        }
    }

    Ok(Step::new(fragment))
}
