//! The inlining pipeline.
//!
//! HTML is parsed into a [`Dom`], external stylesheets are optionally fetched,
//! every `<style>` element is parsed and removed, and the collected rules are
//! matched, resolved and written back as inline styles. Rules that cannot be
//! inlined are re-emitted in a single `<style>` block at the end of `<head>`.

use std::io::Read;

use log::debug;

use crate::css::{parse_stylesheet, StyleSheet};
use crate::dom::{Dom, NodeId};
use crate::error::InlineError;
use crate::fetch::{fetch_external_stylesheets, Fetch};
use crate::inline::{
    collect_rules, reinsert_raw_rules, write_inline_style, ElementRuleIndex, ResolvedStyle,
};
use crate::options::InlineOptions;

/// Counts describing what [`inline_dom`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineSummary {
    /// `<style>` elements parsed and removed.
    pub stylesheets: usize,
    /// Elements that matched at least one inlinable rule.
    pub styled_elements: usize,
    /// Rules re-emitted as raw CSS.
    pub raw_rules: usize,
}

/// An HTML document waiting to be inlined.
#[derive(Debug, Clone)]
pub struct Inliner {
    html: String,
}

impl Inliner {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Read the whole document from `reader`.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, InlineError> {
        let mut html = String::new();
        reader
            .read_to_string(&mut html)
            .map_err(InlineError::Read)?;
        Ok(Self { html })
    }

    /// Run the pipeline, fetching external stylesheets over HTTP if enabled.
    pub fn inline(self, options: &InlineOptions) -> Result<Dom, InlineError> {
        if !options.fetch_external {
            return self.inline_with_fetcher(options, &NoFetch);
        }

        #[cfg(feature = "fetch")]
        {
            let fetcher = crate::fetch::HttpFetcher::new(options.proxy.as_deref())?;
            self.inline_with_fetcher(options, &fetcher)
        }
        #[cfg(not(feature = "fetch"))]
        {
            Err(crate::fetch::FetchError::Unsupported.into())
        }
    }

    /// Run the pipeline with a caller-supplied fetcher.
    pub fn inline_with_fetcher(
        self,
        options: &InlineOptions,
        fetcher: &dyn Fetch,
    ) -> Result<Dom, InlineError> {
        let base = options.base_url()?;
        let mut dom = Dom::parse_html(&self.html)?;
        debug!("parsed HTML into {} nodes", dom.len());

        if options.fetch_external {
            let fetched = fetch_external_stylesheets(&mut dom, base.as_ref(), fetcher)?;
            debug!("fetched {fetched} external stylesheets");
        }

        inline_dom(&mut dom)?;
        Ok(dom)
    }
}

/// Fetcher used when fetching is disabled; never called.
struct NoFetch;

impl Fetch for NoFetch {
    fn fetch(&self, _url: &str) -> Result<String, crate::fetch::FetchError> {
        Err(crate::fetch::FetchError::Unsupported)
    }
}

/// Inline every `<style>` element of an already-parsed document.
pub fn inline_dom(dom: &mut Dom) -> Result<InlineSummary, InlineError> {
    let style_elements: Vec<NodeId> = dom.elements_named("style").collect();
    let stylesheets = style_elements
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            parse_stylesheet(&dom.text_content(id))
                .map_err(|source| InlineError::CssParse { index, source })
        })
        .collect::<Result<Vec<StyleSheet>, _>>()?;
    for &id in &style_elements {
        dom.remove(id);
    }
    debug!("parsed {} stylesheets", stylesheets.len());

    let collected = collect_rules(&stylesheets);
    debug!(
        "collected {} inlinable selectors and {} raw rules",
        collected.inlinable.len(),
        collected.raw.len()
    );

    let index = ElementRuleIndex::build(dom, &collected.inlinable);
    debug!("{} elements matched inlinable rules", index.len());
    for element in index.elements() {
        let style = ResolvedStyle::resolve(&element.matches);
        write_inline_style(dom, element.node, &style)?;
    }

    reinsert_raw_rules(dom, &collected.raw)?;

    Ok(InlineSummary {
        stylesheets: stylesheets.len(),
        styled_elements: index.len(),
        raw_rules: collected.raw.len(),
    })
}

/// Inline the CSS of `html` without fetching external stylesheets.
pub fn inline(html: &str) -> Result<String, InlineError> {
    inline_with_options(html, &InlineOptions::default())
}

/// Inline the CSS of `html` with `options`.
pub fn inline_with_options(html: &str, options: &InlineOptions) -> Result<String, InlineError> {
    let dom = Inliner::new(html).inline(options)?;
    Ok(dom.to_html())
}
