//! Selector parsing and matching for verification.
//!
//! This module implements the selector grammar the path generator emits,
//! per [Selectors Level 4](https://www.w3.org/TR/selectors-4/): type, id,
//! and class selectors, the exact-match attribute selector, the
//! `:nth-child(n)` pseudo-class, and the child and descendant combinators.
//! Matching a generated path back against the source tree is how tests prove
//! the uniqueness contract.
//!
//! Unlike a stylesheet parser, the identifier lexer here must decode CSS
//! escape sequences (`\31 st` is the class `1st`), because generated
//! fragments escape non-identifier characters.

use std::iter::Peekable;
use std::str::Chars;

use magpie_common::warning::warn_once;
use magpie_dom::{DomTree, ElementData, NodeId};
use serde::Serialize;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type."
    ///
    /// Examples: `div`, `p`, `input`
    Type(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*)."
    Universal,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the ID
    /// value."
    Id(String),

    /// [§ 4.12 :nth-child](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    /// with a plain 1-based integer argument, the only form the generator
    /// emits.
    NthChild(usize),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    /// `[attr]` (presence, `value` is `None`) or `[attr="value"]` (exact
    /// match).
    Attribute {
        /// The attribute name.
        name: String,
        /// The required value, or `None` for a presence check.
        value: Option<String>,
    },
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// The relationship between adjacent compound selectors. Generated paths
/// only use `Child`; `Descendant` is supported for hand-written queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A > B`: B is a direct child of A.
    Child,
    /// `A B`: B is an arbitrary descendant of A.
    Descendant,
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A sequence of simple selectors that are not separated by a combinator,"
/// representing simultaneous conditions on a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The simple selectors making up this compound.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// A chain of compound selectors separated by combinators. The subject is
/// the rightmost compound; the chain is stored right-to-left so matching
/// walks upward from the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject).
    pub subject: CompoundSelector,
    /// `(combinator, compound)` pairs going left from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// "count the number of ID selectors in the selector (= A); count the number
/// of class selectors, attributes selectors, and pseudo-classes in the
/// selector (= B); count the number of type selectors and pseudo-elements in
/// the selector (= C)." Compared component-wise, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

/// A parsed selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The compound selectors with their combinators.
    pub complex: ComplexSelector,
    /// The specificity of the whole selector.
    pub specificity: Specificity,
}

impl ParsedSelector {
    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Match this selector against an element with full tree context: the
    /// subject must match the element, then every combinator relationship
    /// must be satisfied walking up the tree.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node: NodeId) -> bool {
        if !compound_matches(&self.complex.subject, tree, node) {
            return false;
        }

        let mut current = node;
        for (combinator, compound) in &self.complex.combinators {
            match combinator {
                // [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
                // the immediate parent element must match
                Combinator::Child => {
                    let Some(parent) = tree.parent_element(current) else {
                        return false;
                    };
                    if !compound_matches(compound, tree, parent) {
                        return false;
                    }
                    current = parent;
                }
                // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
                // any matching ancestor will do
                Combinator::Descendant => {
                    let matched = tree
                        .ancestors(current)
                        .find(|&ancestor| compound_matches(compound, tree, ancestor));
                    match matched {
                        Some(ancestor) => current = ancestor,
                        None => return false,
                    }
                }
            }
        }
        true
    }
}

/// Every element the selector matches, in tree order.
///
/// The uniqueness contract of a generated path is exactly
/// `query_all(tree, parse(render(path))) == [target]`.
#[must_use]
pub fn query_all(tree: &DomTree, selector: &ParsedSelector) -> Vec<NodeId> {
    tree.node_ids()
        .filter(|&id| tree.is_element(id) && selector.matches_in_tree(tree, id))
        .collect()
}

/// Check if a compound selector matches an element.
fn compound_matches(compound: &CompoundSelector, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.as_element(node) else {
        return false;
    };
    compound
        .simple_selectors
        .iter()
        .all(|simple| simple_matches(simple, tree, node, element))
}

/// Check a single simple selector against an element.
fn simple_matches(
    simple: &SimpleSelector,
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
) -> bool {
    match simple {
        // [§ 5.1] type selectors are ASCII case-insensitive in HTML
        SimpleSelector::Type(name) => element.tag_name.eq_ignore_ascii_case(name),

        SimpleSelector::Universal => true,

        // [§ 6.6] class matching is exact on the space-separated token list
        SimpleSelector::Class(name) => element.has_class(name),

        // [§ 6.7] id matching is exact
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),

        // [§ 4.12] the argument is the 1-based position among the parent's
        // element children; text and comment nodes are not counted
        SimpleSelector::NthChild(n) => {
            tree.element_index(node).is_some_and(|index| index + 1 == *n)
        }

        SimpleSelector::Attribute { name, value } => match value {
            None => element.attr(name).is_some(),
            Some(expected) => element.attr(name) == Some(expected.as_str()),
        },
    }
}

impl ComplexSelector {
    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Specificity of the whole chain: the sum over every compound selector.
    #[must_use]
    pub fn calculate_specificity(&self) -> Specificity {
        let mut spec = compound_specificity(&self.subject);
        for (_, compound) in &self.combinators {
            let part = compound_specificity(compound);
            spec.0 += part.0;
            spec.1 += part.1;
            spec.2 += part.2;
        }
        spec
    }
}

/// Specificity of a single compound selector.
fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();
    for simple in &compound.simple_selectors {
        match simple {
            // "count the number of ID selectors in the selector (= A)"
            SimpleSelector::Id(_) => spec.0 += 1,
            // "count the number of class selectors, attributes selectors,
            // and pseudo-classes in the selector (= B)"
            SimpleSelector::Class(_)
            | SimpleSelector::NthChild(_)
            | SimpleSelector::Attribute { .. } => spec.1 += 1,
            // "count the number of type selectors... (= C)"
            SimpleSelector::Type(_) => spec.2 += 1,
            // "ignore the universal selector"
            SimpleSelector::Universal => {}
        }
    }
    spec
}

/// A code point that may appear unescaped inside an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c >= '\u{A0}'
}

/// Collect an identifier, decoding CSS escape sequences.
///
/// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-an-escaped-code-point)
/// "Consume as many hex digits as possible, but no more than 5 [more]...
/// If the next input code point is whitespace, consume it as well."
fn collect_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    loop {
        match chars.peek() {
            Some(&c) if is_ident_char(c) => {
                ident.push(c);
                let _ = chars.next();
            }
            Some('\\') => {
                let _ = chars.next();
                match chars.peek() {
                    Some(&c) if c.is_ascii_hexdigit() => {
                        let mut value = 0u32;
                        let mut digits = 0;
                        while digits < 6
                            && let Some(&c) = chars.peek()
                            && let Some(digit) = c.to_digit(16)
                        {
                            value = value * 16 + digit;
                            digits += 1;
                            let _ = chars.next();
                        }
                        // A single trailing whitespace terminates the escape.
                        if chars.peek().is_some_and(|&c| c.is_ascii_whitespace()) {
                            let _ = chars.next();
                        }
                        if let Some(decoded) = char::from_u32(value) {
                            ident.push(decoded);
                        }
                    }
                    // An escaped literal character.
                    Some(&c) => {
                        ident.push(c);
                        let _ = chars.next();
                    }
                    None => break,
                }
            }
            _ => break,
        }
    }
    ident
}

/// Skip ASCII whitespace, returning whether any was consumed.
fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) -> bool {
    let mut consumed = false;
    while chars.peek().is_some_and(|&c| c.is_ascii_whitespace()) {
        let _ = chars.next();
        consumed = true;
    }
    consumed
}

/// Parse an attribute value inside `[attr="value"]`: quoted string or bare
/// identifier.
fn parse_attr_value(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let _ = skip_whitespace(chars);
    match chars.peek() {
        Some(&quote @ ('"' | '\'')) => {
            let _ = chars.next();
            let mut value = String::new();
            for c in chars.by_ref() {
                if c == quote {
                    return Some(value);
                }
                value.push(c);
            }
            None // unterminated string
        }
        Some(_) => {
            let value = collect_ident(chars);
            if value.is_empty() { None } else { Some(value) }
        }
        None => None,
    }
}

/// Parse a raw selector string.
///
/// Supports the grammar the path generator emits — type, id, and class
/// selectors, `[attr]` / `[attr="value"]`, `:nth-child(n)`, and the child
/// and descendant combinators — plus the universal selector. Anything else
/// returns `None` after a one-time warning.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    /// Move the collected simple selectors into the compound list.
    fn flush_compound(
        current: &mut Vec<SimpleSelector>,
        compounds: &mut Vec<CompoundSelector>,
    ) -> bool {
        if current.is_empty() {
            return false;
        }
        compounds.push(CompoundSelector {
            simple_selectors: std::mem::take(current),
        });
        true
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators_between: Vec<Combinator> = Vec::new();
    let mut current: Vec<SimpleSelector> = Vec::new();

    let mut chars = trimmed.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            // [§ 16.1] / [§ 16.2]: whitespace is the descendant combinator
            // unless an explicit `>` follows
            c if c.is_ascii_whitespace() => {
                let _ = skip_whitespace(chars.by_ref());
                match chars.peek() {
                    None => {}
                    Some('>') => {} // handled below
                    Some(_) => {
                        if !flush_compound(&mut current, &mut compounds) {
                            return unsupported(raw, "combinator without left-hand side");
                        }
                        combinators_between.push(Combinator::Descendant);
                    }
                }
            }
            '>' => {
                let _ = chars.next();
                if !flush_compound(&mut current, &mut compounds) {
                    return unsupported(raw, "combinator without left-hand side");
                }
                let _ = skip_whitespace(&mut chars);
                combinators_between.push(Combinator::Child);
            }
            '*' => {
                let _ = chars.next();
                current.push(SimpleSelector::Universal);
            }
            '.' => {
                let _ = chars.next();
                let name = collect_ident(&mut chars);
                if name.is_empty() {
                    return unsupported(raw, "class selector without a name");
                }
                current.push(SimpleSelector::Class(name));
            }
            '#' => {
                let _ = chars.next();
                let id = collect_ident(&mut chars);
                if id.is_empty() {
                    return unsupported(raw, "id selector without a value");
                }
                current.push(SimpleSelector::Id(id));
            }
            ':' => {
                let _ = chars.next();
                let name = collect_ident(&mut chars);
                if !name.eq_ignore_ascii_case("nth-child") || chars.peek() != Some(&'(') {
                    return unsupported(raw, "unsupported pseudo-class");
                }
                let _ = chars.next(); // consume '('
                let mut digits = String::new();
                while chars.peek().is_some_and(char::is_ascii_digit) {
                    digits.push(chars.next().unwrap_or_default());
                }
                if chars.next() != Some(')') {
                    return unsupported(raw, "unsupported :nth-child argument");
                }
                let Ok(n) = digits.parse::<usize>() else {
                    return unsupported(raw, "unsupported :nth-child argument");
                };
                current.push(SimpleSelector::NthChild(n));
            }
            '[' => {
                let _ = chars.next();
                let _ = skip_whitespace(&mut chars);
                let name = collect_ident(&mut chars);
                if name.is_empty() {
                    return unsupported(raw, "attribute selector without a name");
                }
                let _ = skip_whitespace(&mut chars);
                match chars.next() {
                    Some(']') => current.push(SimpleSelector::Attribute { name, value: None }),
                    Some('=') => {
                        let Some(value) = parse_attr_value(&mut chars) else {
                            return unsupported(raw, "unsupported attribute value");
                        };
                        let _ = skip_whitespace(&mut chars);
                        if chars.next() != Some(']') {
                            return unsupported(raw, "unterminated attribute selector");
                        }
                        current.push(SimpleSelector::Attribute {
                            name,
                            value: Some(value),
                        });
                    }
                    _ => return unsupported(raw, "unsupported attribute operator"),
                }
            }
            _ => {
                let name = collect_ident(&mut chars);
                if name.is_empty() {
                    return unsupported(raw, "unsupported selector syntax");
                }
                current.push(SimpleSelector::Type(name));
            }
        }
    }

    let _ = flush_compound(&mut current, &mut compounds);
    if compounds.is_empty() || compounds.len() != combinators_between.len() + 1 {
        return unsupported(raw, "malformed selector");
    }

    // The rightmost compound is the subject; the chain is reversed so
    // matching walks up from it.
    let subject = compounds.pop()?;
    let combinators = compounds
        .into_iter()
        .zip(combinators_between)
        .rev()
        .map(|(compound, combinator)| (combinator, compound))
        .collect();

    let complex = ComplexSelector {
        subject,
        combinators,
    };
    let specificity = complex.calculate_specificity();
    Some(ParsedSelector {
        complex,
        specificity,
    })
}

/// Warn once about an unsupported selector and give up on it.
fn unsupported(raw: &str, reason: &str) -> Option<ParsedSelector> {
    warn_once("CSS", &format!("{reason} in selector '{raw}'"));
    None
}
