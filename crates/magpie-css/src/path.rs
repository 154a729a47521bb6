//! Path ascent: composing selector steps into a full root-to-target path.
//!
//! Starting at the target element, a step is built for each ancestor level
//! until a step declares itself optimized (id selector, `html`/`head`/`body`,
//! or an orphan tag) or the parent chain runs out. The collected steps are
//! rendered root-first, joined with the child combinator.

use std::fmt;

use magpie_common::warning::warn_once;
use magpie_dom::{DomTree, NodeId};
use serde::Serialize;

use crate::PathError;
use crate::selector::Specificity;
use crate::step::{Step, build_step};

/// Options accepted by [`css_path_with_options`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PathOptions {
    /// A lower bound the caller would like the rendered selector's
    /// specificity to reach. Recorded on the output for inspection; the
    /// current step-selection policy does not consult it.
    pub min_specificity: Option<Specificity>,
}

/// An ordered sequence of selector steps, root-first.
///
/// Joining the fragments with ` > ` yields a selector whose match set
/// against the source document is exactly the target element. Empty when the
/// requested target was not an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorPath {
    steps: Vec<Step>,
    min_specificity: Option<Specificity>,
}

impl SelectorPath {
    /// The steps of the path in root-to-target order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether the path contains no steps (non-element target).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The minimum-specificity hint the path was requested with, if any.
    #[must_use]
    pub const fn min_specificity(&self) -> Option<Specificity> {
        self.min_specificity
    }

    /// Render the path as a selector string, fragments joined with the child
    /// combinator.
    #[must_use]
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .map(Step::fragment)
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

impl fmt::Display for SelectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Compute the unique selector path for `target`.
///
/// A non-element target yields an empty path rather than an error.
///
/// # Errors
///
/// Propagates [`PathError::NonHtmlUnderDocument`] from step construction if
/// the ascent meets a non-`html` element sitting directly under the document.
pub fn css_path(tree: &DomTree, target: NodeId) -> Result<SelectorPath, PathError> {
    css_path_with_options(tree, target, &PathOptions::default())
}

/// Compute the unique selector path for `target` with explicit options.
///
/// # Errors
///
/// Same as [`css_path`].
pub fn css_path_with_options(
    tree: &DomTree,
    target: NodeId,
    options: &PathOptions,
) -> Result<SelectorPath, PathError> {
    if options.min_specificity.is_some() {
        warn_once(
            "CSS",
            "minimum-specificity hint is recorded but not applied to step selection",
        );
    }

    let mut steps = Vec::new();
    if !tree.is_element(target) {
        return Ok(SelectorPath {
            steps,
            min_specificity: options.min_specificity,
        });
    }

    let mut cursor = Some(target);
    while let Some(node) = cursor {
        let step = build_step(tree, node, node == target)?;
        let optimized = step.is_optimized();
        steps.push(step);
        if optimized {
            break;
        }
        cursor = tree.parent_element(node);
    }

    // Collected target-first during ascent; the rendered order is root-first.
    steps.reverse();
    Ok(SelectorPath {
        steps,
        min_specificity: options.min_specificity,
    })
}
