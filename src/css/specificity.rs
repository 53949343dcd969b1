//! Selector specificity calculation and comparison.
//!
//! Specificity decides which rule wins when several rules set the same
//! property on the same element. It is the 3-tuple
//!
//! ```text
//! (id_count, class_count, type_count)
//! ```
//!
//! Fields are ordered so that the derived `Ord` (lexicographic) gives the
//! cascade result: more ids beat any number of classes, more classes beat any
//! number of type selectors.

use crate::css::model::{Selector, SelectorComponent};
use crate::css::selector::parse_selector_list;

/// CSS specificity as a 3-tuple, ordered from highest to lowest weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity {
    /// Number of ID selectors (`#id`).
    pub id_count: u16,
    /// Number of class, attribute and pseudo-class selectors.
    pub class_count: u16,
    /// Number of type selectors and pseudo-elements.
    pub type_count: u16,
}

impl Specificity {
    /// Create a specificity from its three components.
    pub fn new(id_count: u16, class_count: u16, type_count: u16) -> Self {
        Self {
            id_count,
            class_count,
            type_count,
        }
    }

    /// Compute specificity from a parsed selector.
    pub fn from_selector(selector: &Selector) -> Self {
        let mut result = Self::default();

        for component in selector.compounds().flat_map(|c| &c.components) {
            match component {
                SelectorComponent::Id(_) => result.id_count += 1,
                SelectorComponent::PseudoClass {
                    name,
                    argument: Some(argument),
                } if name == "not" => match parse_selector_list(argument) {
                    // `:not()` weighs as its most specific argument.
                    Ok(list) => {
                        let inner = list.iter().map(Self::from_selector).max().unwrap_or_default();
                        result.id_count += inner.id_count;
                        result.class_count += inner.class_count;
                        result.type_count += inner.type_count;
                    }
                    Err(_) => result.class_count += 1,
                },
                SelectorComponent::Class(_)
                | SelectorComponent::Attribute(_)
                | SelectorComponent::PseudoClass { .. } => result.class_count += 1,
                SelectorComponent::Type(_) | SelectorComponent::PseudoElement(_) => {
                    result.type_count += 1;
                }
                SelectorComponent::Universal => {
                    // Universal selector has zero specificity.
                }
            }
        }

        result
    }
}
