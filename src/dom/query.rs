//! DOM queries: selector matching, element lookup by tag name.

use log::trace;

use super::node::{ElementData, NodeData, NodeId};
use super::tree::Dom;
use crate::css::parse_selector_list;
use crate::css::model::{
    AttributeOperator, AttributeSelector, Combinator, CompoundSelector, Selector,
    SelectorComponent, SelectorPart,
};

impl Dom {
    /// All elements matching `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.elements()
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    /// All elements with the given (lowercase) tag name, in document order.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.elements()
            .filter(move |&id| self.get(id).is_some_and(|node| node.is_element_named(name)))
    }

    /// The first element with the given tag name, in document order.
    pub fn first_element_named(&self, name: &str) -> Option<NodeId> {
        self.elements_named(name).next()
    }

    /// Check whether a full selector matches a given node.
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        !selector.parts.is_empty() && self.matches_parts(&selector.parts, id)
    }

    /// Every element node, in document order.
    fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.root()
            .map(|root| self.walk_depth_first(root))
            .unwrap_or_default()
            .into_iter()
            .filter(move |&id| self.get(id).is_some_and(NodeData::is_element))
    }

    /// Match selector parts right to left, backtracking over combinators.
    ///
    /// The last part must match `id`; the remaining prefix must then match
    /// some element reachable through the combinator.
    fn matches_parts(&self, parts: &[SelectorPart], id: NodeId) -> bool {
        let Some((SelectorPart::Compound(compound), rest)) = parts.split_last() else {
            return false;
        };
        if !self.matches_compound(compound, id) {
            return false;
        }
        let Some((last, rest)) = rest.split_last() else {
            return true;
        };
        let SelectorPart::Combinator(combinator) = last else {
            return false;
        };

        match combinator {
            Combinator::Child => self
                .parent_element(id)
                .is_some_and(|parent| self.matches_parts(rest, parent)),
            Combinator::Descendant => self
                .ancestors(id)
                .into_iter()
                .filter(|&ancestor| self.element(ancestor).is_some())
                .any(|ancestor| self.matches_parts(rest, ancestor)),
            Combinator::NextSibling => self
                .preceding_element_siblings(id)
                .first()
                .is_some_and(|&sibling| self.matches_parts(rest, sibling)),
            Combinator::SubsequentSibling => self
                .preceding_element_siblings(id)
                .into_iter()
                .any(|sibling| self.matches_parts(rest, sibling)),
        }
    }

    /// Check whether a compound selector matches a single element.
    fn matches_compound(&self, compound: &CompoundSelector, id: NodeId) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        compound.components.iter().all(|component| match component {
            SelectorComponent::Type(name) => element.name.eq_ignore_ascii_case(name),
            SelectorComponent::Universal => true,
            SelectorComponent::Class(name) => element.has_class(name),
            SelectorComponent::Id(name) => element.id() == Some(name.as_str()),
            SelectorComponent::Attribute(attribute) => matches_attribute(attribute, element),
            SelectorComponent::PseudoClass { name, argument } => {
                self.matches_pseudo_class(name, argument.as_deref(), id)
            }
            SelectorComponent::PseudoElement(_) => false,
        })
    }

    fn matches_pseudo_class(&self, name: &str, argument: Option<&str>, id: NodeId) -> bool {
        let element = self.element(id);
        let same_type = |other: NodeId| {
            self.element(other).map(|e| &e.name) == element.map(|e| &e.name)
        };
        match (name, argument) {
            ("first-child", None) => self.preceding_element_siblings(id).is_empty(),
            ("last-child", None) => self.following_element_siblings(id).is_empty(),
            ("only-child", None) => {
                self.preceding_element_siblings(id).is_empty()
                    && self.following_element_siblings(id).is_empty()
            }
            ("first-of-type", None) => {
                !self.preceding_element_siblings(id).into_iter().any(same_type)
            }
            ("last-of-type", None) => {
                !self.following_element_siblings(id).into_iter().any(same_type)
            }
            ("only-of-type", None) => {
                !self.preceding_element_siblings(id).into_iter().any(same_type)
                    && !self.following_element_siblings(id).into_iter().any(same_type)
            }
            ("empty", None) => self.children(id).iter().all(|&child| match self.get(child) {
                Some(NodeData::Text(text)) => text.is_empty(),
                Some(NodeData::Comment(_)) => true,
                _ => false,
            }),
            ("not", Some(argument)) => match parse_selector_list(argument) {
                Ok(list) => !list.iter().any(|selector| self.matches(id, selector)),
                Err(_) => false,
            },
            ("nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type", Some(argument)) => {
                let Some(nth) = Nth::parse(argument) else {
                    return false;
                };
                let siblings = if name.starts_with("nth-last") {
                    self.following_element_siblings(id)
                } else {
                    self.preceding_element_siblings(id)
                };
                let before = if name.ends_with("of-type") {
                    siblings.into_iter().filter(|&s| same_type(s)).count()
                } else {
                    siblings.len()
                };
                nth.matches(before + 1)
            }
            _ => {
                trace!("pseudo-class :{name} is not supported, matching nothing");
                false
            }
        }
    }

    fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&parent| self.element(parent).is_some())
    }

    /// Element siblings before `id`, nearest first.
    fn preceding_element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&s| s == id).unwrap_or(0);
        siblings[..index]
            .iter()
            .rev()
            .copied()
            .filter(|&s| self.element(s).is_some())
            .collect()
    }

    /// Element siblings after `id`, nearest first.
    fn following_element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        let index = siblings
            .iter()
            .position(|&s| s == id)
            .map_or(siblings.len(), |i| i + 1);
        siblings[index..]
            .iter()
            .copied()
            .filter(|&s| self.element(s).is_some())
            .collect()
    }
}

/// Returns `true` if every pseudo-class in `selector` can be evaluated by [`Dom::matches`].
///
/// Selectors that fail this check never match anything.
pub fn is_supported_selector(selector: &Selector) -> bool {
    selector
        .compounds()
        .flat_map(|compound| &compound.components)
        .all(|component| match component {
            SelectorComponent::PseudoClass { name, argument } => {
                is_supported_pseudo_class(name, argument.as_deref())
            }
            SelectorComponent::PseudoElement(_) => false,
            _ => true,
        })
}

fn is_supported_pseudo_class(name: &str, argument: Option<&str>) -> bool {
    match (name, argument) {
        (
            "first-child" | "last-child" | "only-child" | "first-of-type" | "last-of-type"
            | "only-of-type" | "empty",
            None,
        ) => true,
        ("not", Some(argument)) => parse_selector_list(argument)
            .is_ok_and(|list| list.iter().all(is_supported_selector)),
        ("nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type", Some(argument)) => {
            Nth::parse(argument).is_some()
        }
        _ => false,
    }
}

/// An `An+B` position pattern from `:nth-child()` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Nth {
    step: i64,
    offset: i64,
}

impl Nth {
    /// Parse `odd`, `even`, `B`, `An`, `An+B` or `An-B` (whitespace allowed around the sign).
    fn parse(text: &str) -> Option<Self> {
        let compact: String = text
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "odd" => return Some(Self { step: 2, offset: 1 }),
            "even" => return Some(Self { step: 2, offset: 0 }),
            _ => {}
        }

        let Some((step, offset)) = compact.split_once('n') else {
            return parse_signed(&compact).map(|offset| Self { step: 0, offset });
        };
        let step = match step {
            "" | "+" => 1,
            "-" => -1,
            digits => parse_signed(digits)?,
        };
        let offset = match offset {
            "" => 0,
            rest if rest.starts_with(['+', '-']) => parse_signed(rest)?,
            _ => return None,
        };
        Some(Self { step, offset })
    }

    /// Whether the 1-based `position` is `step * n + offset` for some `n >= 0`.
    fn matches(self, position: usize) -> bool {
        let Ok(position) = i64::try_from(position) else {
            return false;
        };
        let distance = position - self.offset;
        if self.step == 0 {
            return distance == 0;
        }
        distance % self.step == 0 && distance / self.step >= 0
    }
}

fn parse_signed(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('+').unwrap_or(text);
    if digits.trim_start_matches('-').is_empty()
        || !digits.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

fn matches_attribute(selector: &AttributeSelector, element: &ElementData) -> bool {
    let Some(actual) = element.attr(&selector.name) else {
        return false;
    };
    let Some((operator, expected)) = &selector.condition else {
        return true;
    };

    let (actual, expected) = if selector.case_insensitive {
        (actual.to_ascii_lowercase(), expected.to_ascii_lowercase())
    } else {
        (actual.to_owned(), expected.clone())
    };

    match operator {
        AttributeOperator::Equals => actual == expected,
        AttributeOperator::Includes => {
            !expected.is_empty() && actual.split_ascii_whitespace().any(|word| word == expected)
        }
        AttributeOperator::DashMatch => {
            actual == expected || actual.starts_with(&format!("{expected}-"))
        }
        AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttributeOperator::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}
