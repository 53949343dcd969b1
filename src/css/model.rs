//! CSS AST: StyleSheet, Rule, Declaration, and the selector tree.

use std::fmt;

// ---------------------------------------------------------------------------
// Stylesheet model
// ---------------------------------------------------------------------------

/// A single CSS property declaration, e.g. `color: red` or `margin: 0 auto !important`.
///
/// The value is kept as the trimmed source text; nothing downstream needs to
/// understand it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name, e.g. `"color"`. Lowercased unless it is a custom property.
    pub property: String,
    /// The value text without the `!important` flag.
    pub value: String,
    /// Whether `!important` was specified.
    pub important: bool,
}

impl Declaration {
    /// Create a new declaration.
    pub fn new(property: impl Into<String>, value: impl Into<String>, important: bool) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important,
        }
    }
}

/// Serializes as `property: value;` or `property: value !important;`.
impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.important {
            write!(f, "{}: {} !important;", self.property, self.value)
        } else {
            write!(f, "{}: {};", self.property, self.value)
        }
    }
}

/// A style rule: one or more selectors paired with declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedRule {
    /// The selector texts of this rule (comma-separated in CSS), trimmed.
    pub selectors: Vec<String>,
    /// The property declarations inside the `{ ... }` block.
    pub declarations: Vec<Declaration>,
}

/// An at-rule (`@media`, `@font-face`, `@import`, ...), kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the `@`, e.g. `"media"`.
    pub name: String,
    /// The full source text of the rule, from `@` through its block or `;`.
    pub raw: String,
}

/// A top-level stylesheet rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Qualified(QualifiedRule),
    At(AtRule),
}

/// A parsed CSS stylesheet: rules in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    pub rules: Vec<Rule>,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }
}

// ---------------------------------------------------------------------------
// Selector model
// ---------------------------------------------------------------------------

/// Attribute selector operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[a=v]`
    Equals,
    /// `[a~=v]`: whitespace-separated list contains `v`.
    Includes,
    /// `[a|=v]`: equals `v` or starts with `v-`.
    DashMatch,
    /// `[a^=v]`
    Prefix,
    /// `[a$=v]`
    Suffix,
    /// `[a*=v]`
    Substring,
}

/// An attribute selector such as `[href]` or `[type="text" i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name, lowercased.
    pub name: String,
    /// Operator and value; `None` for a presence test.
    pub condition: Option<(AttributeOperator, String)>,
    /// Whether the `i` flag was given.
    pub case_insensitive: bool,
}

/// A single CSS selector component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorComponent {
    /// Type selector: matches the element's tag name (e.g. `p`).
    Type(String),
    /// Universal selector: `*`.
    Universal,
    /// Class selector: `.classname`.
    Class(String),
    /// ID selector: `#id`.
    Id(String),
    /// Attribute selector: `[name op value]`.
    Attribute(AttributeSelector),
    /// Pseudo-class: `:first-child`, or `:nth-child(2n)` with its raw argument.
    PseudoClass {
        name: String,
        argument: Option<String>,
    },
    /// Pseudo-element: `::before`.
    PseudoElement(String),
}

/// A combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
    /// Next-sibling combinator: `A + B`.
    NextSibling,
    /// Subsequent-sibling combinator: `A ~ B`.
    SubsequentSibling,
}

/// A single compound selector (sequence of components without combinators).
///
/// For example, `a.button[href]` is one `CompoundSelector` with three
/// components: `Type("a")`, `Class("button")`, `Attribute(href)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    /// Create an empty compound selector.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Append a component to this compound selector.
    pub fn push(&mut self, component: SelectorComponent) {
        self.components.push(component);
    }
}

/// One element in a selector chain: either a compound selector or a combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPart {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

/// A full CSS selector: chain of compound selectors joined by combinators.
///
/// For example, `table > td.cell` is a `Selector` with parts:
/// `[Compound(table), Combinator(Child), Compound(td.cell)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Alternating compound selectors and combinators.
    /// Always starts and ends with a `SelectorPart::Compound`.
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// Iterate over the compound selectors, left to right.
    pub fn compounds(&self) -> impl Iterator<Item = &CompoundSelector> {
        self.parts.iter().filter_map(|part| match part {
            SelectorPart::Compound(compound) => Some(compound),
            SelectorPart::Combinator(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_display() {
        let decl = Declaration::new("color", "red", false);
        assert_eq!(decl.to_string(), "color: red;");
    }

    #[test]
    fn test_declaration_display_important() {
        let decl = Declaration::new("margin", "0 auto", true);
        assert_eq!(decl.to_string(), "margin: 0 auto !important;");
    }

    #[test]
    fn test_compound_selector_push() {
        let mut cs = CompoundSelector::new();
        cs.push(SelectorComponent::Type("a".into()));
        cs.push(SelectorComponent::Class("button".into()));
        assert_eq!(cs.components.len(), 2);
    }

    #[test]
    fn test_selector_compounds_skip_combinators() {
        let mut table = CompoundSelector::new();
        table.push(SelectorComponent::Type("table".into()));
        let mut cell = CompoundSelector::new();
        cell.push(SelectorComponent::Type("td".into()));

        let selector = Selector {
            parts: vec![
                SelectorPart::Compound(table.clone()),
                SelectorPart::Combinator(Combinator::Child),
                SelectorPart::Compound(cell.clone()),
            ],
        };

        let compounds: Vec<_> = selector.compounds().collect();
        assert_eq!(compounds, vec![&table, &cell]);
    }

    #[test]
    fn test_stylesheet_default() {
        let ss = StyleSheet::default();
        assert!(ss.rules.is_empty());
        assert_eq!(ss, StyleSheet::new());
    }
}
