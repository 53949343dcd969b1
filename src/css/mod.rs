//! CSS engine: tokenizer, stylesheet parser, selector parser, specificity.

pub mod model;
pub mod parser;
pub mod selector;
pub mod specificity;
pub mod tokenizer;

pub use model::{AtRule, Declaration, QualifiedRule, Rule, Selector, StyleSheet};
pub use parser::{parse_declaration_list, parse_stylesheet, ParseError};
pub use selector::{parse_selector, parse_selector_list};
pub use specificity::Specificity;
