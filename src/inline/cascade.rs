//! Cascade resolution for one element.
//!
//! Declarations are folded in stylesheet order. A property's stored value is
//! replaced when the incoming declaration ranks at least as high, and the
//! property then moves to the end of the resolved order.

use crate::css::{Declaration, Specificity};

use super::index::MatchedDeclarationSet;

/// Cascade precedence of a declaration.
///
/// Field order makes the derived `Ord` compare `!important` first, then
/// specificity, then source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CascadeRank {
    pub important: bool,
    pub specificity: Specificity,
    pub source_order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Winner<'a> {
    declaration: &'a Declaration,
    rank: CascadeRank,
}

/// Winning declarations of an element, in last-applied order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle<'a> {
    winners: Vec<Winner<'a>>,
}

impl<'a> ResolvedStyle<'a> {
    /// Fold matched declaration sets, given in stylesheet order.
    pub fn resolve(sets: &[MatchedDeclarationSet<'a>]) -> Self {
        let mut style = Self::default();
        for set in sets {
            for declaration in set.declarations {
                let rank = CascadeRank {
                    important: declaration.important,
                    specificity: set.specificity,
                    source_order: set.source_order,
                };
                style.apply(declaration, rank);
            }
        }
        style
    }

    fn apply(&mut self, declaration: &'a Declaration, rank: CascadeRank) {
        let existing = self
            .winners
            .iter()
            .position(|w| w.declaration.property == declaration.property);
        if let Some(position) = existing {
            if rank < self.winners[position].rank {
                return;
            }
            self.winners.remove(position);
        }
        self.winners.push(Winner { declaration, rank });
    }

    /// Winning declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Declaration> + '_ {
        self.winners.iter().map(|w| w.declaration)
    }

    #[cfg(test)]
    fn get(&self, property: &str) -> Option<&'a Declaration> {
        self.winners
            .iter()
            .find(|w| w.declaration.property == property)
            .map(|w| w.declaration)
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}
