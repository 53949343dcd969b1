//! Splits parsed stylesheets into inlinable rules and raw pass-through rules.

use std::fmt;

use log::{debug, trace};

use crate::css::{parse_selector, AtRule, Declaration, Rule, Selector, StyleSheet};
use crate::dom::query::is_supported_selector;

use super::classify::is_inlinable;

/// One inlinable selector with the declarations of its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinableRule {
    pub selector: String,
    pub parsed: Selector,
    pub declarations: Vec<Declaration>,
    /// Position of the owning rule across all stylesheets.
    pub source_order: usize,
}

/// A rule that cannot be inlined and is re-emitted as CSS text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRule {
    /// An at-rule, kept verbatim.
    At(AtRule),
    /// A single non-inlinable selector split out of its rule.
    OrphanSelector {
        selector: String,
        declarations: Vec<Declaration>,
    },
}

impl fmt::Display for RawRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawRule::At(rule) => f.write_str(&rule.raw),
            RawRule::OrphanSelector {
                selector,
                declarations,
            } => {
                write!(f, "{selector}{{")?;
                for (i, declaration) in declarations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{declaration}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Output of [`collect_rules`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedRules {
    /// Inlinable selectors, in source order.
    pub inlinable: Vec<InlinableRule>,
    /// Raw rules, in encounter order.
    pub raw: Vec<RawRule>,
}

/// Walk `stylesheets` in order, classifying every selector of every rule.
///
/// The source order counter advances once per rule, so selectors sharing a
/// rule share an order. A selector is inlined only if it passes
/// [`is_inlinable`], parses, and uses nothing the matcher cannot evaluate;
/// every other selector is kept as raw CSS.
pub fn collect_rules(stylesheets: &[StyleSheet]) -> CollectedRules {
    let mut collected = CollectedRules::default();
    let mut source_order = 0;

    for stylesheet in stylesheets {
        for rule in &stylesheet.rules {
            match rule {
                Rule::At(at_rule) => {
                    trace!("passing through @{} rule", at_rule.name);
                    collected.raw.push(RawRule::At(at_rule.clone()));
                }
                Rule::Qualified(qualified) => {
                    for selector in &qualified.selectors {
                        if let Some(parsed) = inlinable_selector(selector) {
                            collected.inlinable.push(InlinableRule {
                                selector: selector.clone(),
                                parsed,
                                declarations: qualified.declarations.clone(),
                                source_order,
                            });
                        } else {
                            collected.raw.push(RawRule::OrphanSelector {
                                selector: selector.clone(),
                                declarations: qualified.declarations.clone(),
                            });
                        }
                    }
                }
            }
            source_order += 1;
        }
    }

    collected
}

fn inlinable_selector(selector: &str) -> Option<Selector> {
    if !is_inlinable(selector) {
        trace!("selector {selector:?} is not inlinable");
        return None;
    }
    match parse_selector(selector) {
        Ok(parsed) if is_supported_selector(&parsed) => Some(parsed),
        Ok(_) => {
            debug!("selector {selector:?} cannot be matched, keeping it as raw CSS");
            None
        }
        Err(err) => {
            debug!("selector {selector:?} does not parse, keeping it as raw CSS: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parse_stylesheet;
    use pretty_assertions::assert_eq;

    fn collect(css: &[&str]) -> CollectedRules {
        let sheets: Vec<StyleSheet> = css.iter().map(|s| parse_stylesheet(s).unwrap()).collect();
        collect_rules(&sheets)
    }

    #[test]
    fn splits_selector_lists() {
        let rules = collect(&["h1, a:hover { color: red }"]);
        assert_eq!(rules.inlinable.len(), 1);
        assert_eq!(rules.inlinable[0].selector, "h1");
        assert_eq!(
            rules.raw,
            vec![RawRule::OrphanSelector {
                selector: "a:hover".into(),
                declarations: vec![Declaration::new("color", "red", false)],
            }]
        );
    }

    #[test]
    fn source_order_spans_stylesheets() {
        let rules = collect(&["a { color: red } b, i { color: blue }", "p { margin: 0 }"]);
        let orders: Vec<(&str, usize)> = rules
            .inlinable
            .iter()
            .map(|r| (r.selector.as_str(), r.source_order))
            .collect();
        assert_eq!(orders, vec![("a", 0), ("b", 1), ("i", 1), ("p", 2)]);
    }

    #[test]
    fn at_rules_are_raw_and_counted() {
        let rules = collect(&["@media print { p { color: red } } p { color: blue }"]);
        assert_eq!(rules.raw.len(), 1);
        assert_eq!(
            rules.raw[0].to_string(),
            "@media print { p { color: red } }"
        );
        assert_eq!(rules.inlinable[0].source_order, 1);
    }

    #[test]
    fn unmatchable_selectors_stay_raw() {
        let rules = collect(&["p:not(.x), li:nth-child(2), p:has(a) { color: red }"]);
        let inlined: Vec<&str> = rules.inlinable.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(inlined, vec!["p:not(.x)", "li:nth-child(2)"]);
        let raw: Vec<String> = rules.raw.iter().map(|r| r.to_string()).collect();
        assert_eq!(raw, vec!["p:has(a){color: red;}"]);
    }

    #[test]
    fn unparseable_selector_stays_raw() {
        let rules = collect(&["p..x, b { color: red }"]);
        assert_eq!(rules.inlinable.len(), 1);
        assert_eq!(rules.raw[0].to_string(), "p..x{color: red;}");
    }

    // ── Display ──────────────────────────────────────────────────────

    #[test]
    fn orphan_selector_display() {
        let rule = RawRule::OrphanSelector {
            selector: "a:hover".into(),
            declarations: vec![
                Declaration::new("color", "green", false),
                Declaration::new("margin", "0", true),
            ],
        };
        assert_eq!(rule.to_string(), "a:hover{color: green; margin: 0 !important;}");
    }

    #[test]
    fn empty_input_collects_nothing() {
        assert_eq!(collect(&[]), CollectedRules::default());
    }
}
