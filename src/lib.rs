//! # style-inliner
//!
//! Moves CSS from `<style>` blocks (and, optionally, linked stylesheets) into
//! the inline `style` attributes of the elements it applies to, for consumers
//! such as email clients that ignore document-level stylesheets.
//!
//! ```no_run
//! let html = r#"<html><head><style>p { color: red }</style></head><body><p>hi</p></body></html>"#;
//! let out = style_inliner::inline(html)?;
//! assert!(out.contains(r#"<p style="color: red;">hi</p>"#));
//! # Ok::<(), style_inliner::InlineError>(())
//! ```
//!
//! ## Core Systems
//!
//! - **[`css`]**: tokenizer, stylesheet parser, selector parser, specificity
//! - **[`dom`]**: slotmap-backed DOM arena with HTML parsing, selector matching and serialization
//! - **[`inline`]**: inlinability, rule collection, element index, cascade, style writing
//! - **[`fetch`]**: URL resolution and external stylesheet fetching
//! - **[`inliner`]**: the end-to-end pipeline
//!
//! Logging goes through the [`log`] facade; install any logger to see it.

// Core systems
pub mod css;
pub mod dom;
pub mod inline;

// Pipeline
pub mod error;
pub mod fetch;
pub mod inliner;
pub mod options;

pub use dom::Dom;
pub use error::InlineError;
pub use fetch::{Fetch, FetchError};
#[cfg(feature = "fetch")]
pub use fetch::HttpFetcher;
pub use inliner::{inline, inline_dom, inline_with_options, InlineSummary, Inliner};
pub use options::InlineOptions;
