//! The inlining engine: classification, collection, matching, cascade and output.
//!
//! Each stage is a plain function or type over borrowed data; the pipeline in
//! [`crate::inliner`] drives them in order.

pub mod cascade;
pub mod classify;
pub mod collect;
pub mod index;
pub mod raw;
pub mod writer;

pub use cascade::{CascadeRank, ResolvedStyle};
pub use classify::{is_inlinable, UNSUPPORTED_PSEUDO_CLASSES};
pub use collect::{collect_rules, CollectedRules, InlinableRule, RawRule};
pub use index::{ElementRuleIndex, MatchedDeclarationSet, MatchedElement};
pub use raw::{raw_css, reinsert_raw_rules};
pub use writer::write_inline_style;
