//! External stylesheets: URL resolution and `<link>` replacement.
//!
//! Fetching goes through the [`Fetch`] trait so the pipeline can be driven
//! without a network. [`HttpFetcher`] is the blocking reqwest implementation,
//! available with the `fetch` feature.

use log::debug;
use url::Url;

use crate::dom::{Dom, DomError, ElementData, NodeData, NodeId};

/// Errors from fetching external stylesheets.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[cfg(feature = "fetch")]
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[cfg(feature = "fetch")]
    #[error("invalid proxy {proxy:?}: {source}")]
    Proxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[cfg(feature = "fetch")]
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("fetching external stylesheets requires the `fetch` feature")]
    Unsupported,

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Something that can retrieve the text of a stylesheet URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher backed by reqwest.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    /// Build a fetcher. Without a proxy, system proxy settings are ignored too.
    pub fn new(proxy: Option<&str>) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder();
        builder = match proxy {
            Some(proxy) => {
                let proxy_config =
                    reqwest::Proxy::all(proxy).map_err(|source| FetchError::Proxy {
                        proxy: proxy.to_string(),
                        source,
                    })?;
                builder.proxy(proxy_config)
            }
            None => builder.no_proxy(),
        };
        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

#[cfg(feature = "fetch")]
impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(request_error)
    }
}

/// Resolve a stylesheet `href` against the document's base URL.
///
/// Absolute `http(s)` URLs pass through. Protocol-relative URLs take the base
/// scheme, root-relative URLs the base origin, and anything else is joined
/// onto the full base path and cleaned.
pub fn resolve_url(href: &str, base: Option<&Url>) -> String {
    let Some(base) = base else {
        return href.to_string();
    };
    if href.starts_with("http://") || href.starts_with("https://") || href.is_empty() {
        return href.to_string();
    }
    if href.starts_with("//") {
        return format!("{}:{href}", base.scheme());
    }

    let mut origin = format!("{}://{}", base.scheme(), base.host_str().unwrap_or_default());
    if let Some(port) = base.port() {
        origin.push_str(&format!(":{port}"));
    }
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}{}", join_path(base.path(), href))
    }
}

/// Join two slash-separated paths and normalize the result.
fn join_path(base: &str, relative: &str) -> String {
    let joined = match (base.is_empty(), relative.is_empty()) {
        (true, _) => relative.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{base}/{relative}"),
    };
    clean_path(&joined)
}

/// Lexically normalize a path: drop empty and `.` segments, resolve `..`.
fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// `<link>` elements that apply a stylesheet by default and have an `href`.
///
/// `rel` must include `stylesheet` and must not include `alternate`.
fn stylesheet_links(dom: &Dom) -> Vec<(NodeId, String)> {
    dom.elements_named("link")
        .filter_map(|id| {
            let link = dom.element(id)?;
            let rel = link.attr("rel")?;
            let has = |keyword: &str| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case(keyword))
            };
            let is_stylesheet = has("stylesheet") && !has("alternate");
            let href = link.attr("href").filter(|href| !href.is_empty())?;
            is_stylesheet.then(|| (id, href.to_string()))
        })
        .collect()
}

/// Replace each stylesheet `<link>` with a `<style>` holding the fetched CSS.
///
/// Links are fetched in document order and the first failure aborts.
/// Returns how many links were replaced.
pub fn fetch_external_stylesheets(
    dom: &mut Dom,
    base: Option<&Url>,
    fetcher: &dyn Fetch,
) -> Result<usize, FetchError> {
    let links = stylesheet_links(dom);
    for (link, href) in &links {
        let url = resolve_url(href, base);
        debug!("fetching stylesheet {url}");
        let css = fetcher.fetch(&url)?;

        let style = dom.insert_before(
            *link,
            NodeData::Element(ElementData::new("style").with_attr("type", "text/css")),
        )?;
        dom.insert_child(style, NodeData::text(css))?;
        dom.remove(*link);
    }
    Ok(links.len())
}
