//! Element rule index: which inlinable rules match which elements.

use log::{debug, trace};
use slotmap::SecondaryMap;

use crate::css::{Declaration, Specificity};
use crate::dom::{Dom, NodeId};

use super::collect::InlinableRule;

/// The declarations of one rule as matched against one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedDeclarationSet<'a> {
    pub selector: &'a str,
    pub specificity: Specificity,
    pub source_order: usize,
    pub declarations: &'a [Declaration],
}

/// An element with every declaration set that applies to it, in stylesheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedElement<'a> {
    pub node: NodeId,
    pub matches: Vec<MatchedDeclarationSet<'a>>,
}

/// Matched elements in first-match order, keyed by arena node.
#[derive(Debug, Default)]
pub struct ElementRuleIndex<'a> {
    elements: Vec<MatchedElement<'a>>,
    positions: SecondaryMap<NodeId, usize>,
}

impl<'a> ElementRuleIndex<'a> {
    /// Match every rule against `dom`.
    ///
    /// Rules are visited in source order and each rule's matches in document
    /// order, so an element's sets end up in stylesheet encounter order.
    /// Selectors that match nothing are skipped.
    pub fn build(dom: &Dom, rules: &'a [InlinableRule]) -> Self {
        let mut index = Self::default();

        for rule in rules {
            let specificity = Specificity::from_selector(&rule.parsed);
            let nodes = dom.select(&rule.parsed);
            if nodes.is_empty() {
                debug!("selector {:?} matched no elements", rule.selector);
                continue;
            }

            for node in nodes {
                trace!("selector {:?} matched {node:?}", rule.selector);
                index.push(
                    node,
                    MatchedDeclarationSet {
                        selector: &rule.selector,
                        specificity,
                        source_order: rule.source_order,
                        declarations: &rule.declarations,
                    },
                );
            }
        }

        index
    }

    fn push(&mut self, node: NodeId, set: MatchedDeclarationSet<'a>) {
        match self.positions.get(node) {
            Some(&position) => self.elements[position].matches.push(set),
            None => {
                self.positions.insert(node, self.elements.len());
                self.elements.push(MatchedElement {
                    node,
                    matches: vec![set],
                });
            }
        }
    }

    /// The matched elements in first-match order.
    pub fn elements(&self) -> &[MatchedElement<'a>] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
