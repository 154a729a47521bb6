//! CSS selector path generation and verification for the Magpie tooling.
//!
//! # Scope
//!
//! Given any element in a [`magpie_dom::DomTree`], this crate computes a CSS
//! selector string that uniquely identifies that element in the document,
//! built as a chain of parent-to-child steps joined by the child combinator:
//!
//! ```text
//! #main > div:nth-child(2) > p.note
//! ```
//!
//! The crate implements:
//! - **Identifier escaping** ([§ 2.1 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization))
//!   - Bare-identifier detection and hex escape sequences
//! - **Step construction** — one selector fragment per ancestor level,
//!   choosing between an id selector, a tag + class combination, a structural
//!   `:nth-child` index, or a tag plus `[type="..."]` attribute hint
//! - **Path ascent** — composing steps from the target up to an anchoring
//!   ancestor and rendering the result
//! - **Selector matching** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - A parser and matcher for the emitted grammar, with specificity
//!     calculation, used to verify that generated selectors are unique
//!
//! # Not Yet Implemented
//!
//! - Global selector minimization (ascent is greedy, one ancestor at a time)
//! - Selector stability under later document mutation
//! - Applying the minimum-specificity hint to step selection (it is recorded
//!   on the output only; see [`path::PathOptions`])

/// CSS identifier escaping per [§ 2.1 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization).
pub mod ident;
/// Path ascent: composing steps into a full root-to-target selector.
pub mod path;
/// Selector parsing, matching, and specificity for verification.
pub mod selector;
/// Per-element selector step construction.
pub mod step;

// Re-exports for convenience
pub use ident::{escape_identifier, is_bare_identifier};
pub use path::{PathOptions, SelectorPath, css_path, css_path_with_options};
pub use selector::{ParsedSelector, Specificity, parse_selector, query_all};
pub use step::{Step, build_step};

/// Error type for selector path construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A selector step was requested for a node that is not an element.
    #[error("cannot build a selector step for a non-element node")]
    NotAnElement,

    /// During ascent an element other than `<html>` was found as a direct
    /// child of the document, which cannot occur in a well-formed document.
    #[error("child of the document must be <html>, found <{0}>")]
    NonHtmlUnderDocument(String),
}
