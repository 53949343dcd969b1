//! Top-level error type of the inlining pipeline.

use std::io;

use crate::css::ParseError;
use crate::dom::{DomError, HtmlError};
use crate::fetch::FetchError;

/// Errors returned by [`Inliner`](crate::Inliner) and [`inline_dom`](crate::inline_dom).
#[derive(Debug, thiserror::Error)]
pub enum InlineError {
    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to parse HTML: {0}")]
    HtmlParse(#[source] HtmlError),

    /// A `<style>` block did not parse. `index` counts style elements in document order.
    #[error("failed to parse stylesheet #{index}: {source}")]
    CssParse {
        index: usize,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid source URL {url:?}: {source}")]
    SourceUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("document has no <head> element to hold non-inlinable rules")]
    MissingHead,
}

impl From<HtmlError> for InlineError {
    fn from(err: HtmlError) -> Self {
        match err {
            HtmlError::Dom(err) => InlineError::Dom(err),
            other => InlineError::HtmlParse(other),
        }
    }
}
