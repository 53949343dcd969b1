//! Inliner configuration.

use url::Url;

use crate::error::InlineError;

/// Options controlling an inlining run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineOptions {
    /// Fetch `<link rel="stylesheet">` targets and inline them too.
    pub fetch_external: bool,
    /// URL of the document, used to resolve relative stylesheet hrefs.
    pub source_url: Option<String>,
    /// HTTP proxy for stylesheet requests. No proxy is used when unset.
    pub proxy: Option<String>,
}

impl InlineOptions {
    /// Create default options: no fetching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable external stylesheet fetching (builder).
    pub fn with_fetch_external(mut self, fetch_external: bool) -> Self {
        self.fetch_external = fetch_external;
        self
    }

    /// Set the document URL (builder).
    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    /// Set the HTTP proxy (builder).
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// The parsed base URL for relative hrefs.
    ///
    /// Only consulted when fetching; an empty `source_url` counts as unset.
    pub fn base_url(&self) -> Result<Option<Url>, InlineError> {
        if !self.fetch_external {
            return Ok(None);
        }
        match self.source_url.as_deref().filter(|url| !url.is_empty()) {
            None => Ok(None),
            Some(url) => Url::parse(url)
                .map(Some)
                .map_err(|source| InlineError::SourceUrl {
                    url: url.to_string(),
                    source,
                }),
        }
    }
}
