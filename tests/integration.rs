//! Integration tests for style-inliner.
//!
//! These tests drive the public API end to end: HTML in, inlined HTML out.

use std::cell::RefCell;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use style_inliner::dom::{Dom, NodeData};
use style_inliner::{
    inline, inline_dom, Fetch, FetchError, InlineError, InlineOptions, Inliner,
};

fn page(css: &str, body: &str) -> String {
    format!("<html><head><style>{css}</style></head><body>{body}</body></html>")
}

// ---------------------------------------------------------------------------
// Basic scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_single_rule_is_inlined_and_style_removed() {
    let out = inline("<html><head><style>p{color:red}</style></head><body><p>hi</p></body></html>")
        .unwrap();
    assert_snapshot!(out, @r#"<html><head></head><body><p style="color: red;">hi</p></body></html>"#);
}

#[test]
fn test_later_rule_wins_on_equal_specificity() {
    let out = inline(&page("p{color:red} p{color:blue}", "<p>hi</p>")).unwrap();
    assert!(out.contains(r#"<p style="color: blue;">hi</p>"#), "{out}");
}

#[test]
fn test_important_beats_specificity() {
    let out = inline(&page(
        ".a{color:red !important} #id.a{color:blue}",
        r#"<p id="id" class="a">hi</p>"#,
    ))
    .unwrap();
    assert_snapshot!(out, @r#"<html><head></head><body><p id="id" class="a" style="color: red !important;">hi</p></body></html>"#);
}

#[test]
fn test_hover_rule_is_reinserted_not_inlined() {
    let out = inline(&page("a:hover{color:green}", r##"<a href="#">x</a>"##)).unwrap();
    assert_eq!(
        out,
        "<html><head><style type=\"text/css\">\na:hover{color: green;}\n</style></head><body><a href=\"#\">x</a></body></html>"
    );
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

#[test]
fn test_specificity_beats_source_order() {
    let out = inline(&page("#x{color:red} p{color:blue}", r#"<p id="x">hi</p>"#)).unwrap();
    assert!(out.contains(r#"style="color: red;""#), "{out}");
}

#[test]
fn test_declarations_merge_across_rules() {
    let out = inline(&page(
        "p { margin: 0; color: red } .lead { color: blue; font-size: 14px }",
        r#"<p class="lead">hi</p>"#,
    ))
    .unwrap();
    assert_snapshot!(out, @r#"<html><head></head><body><p class="lead" style="margin: 0; color: blue; font-size: 14px;">hi</p></body></html>"#);
}

#[test]
fn test_existing_inline_style_beats_important() {
    let out = inline(&page(
        "p { color: red !important; margin: 0 }",
        r#"<p style="color: blue">hi</p>"#,
    ))
    .unwrap();
    assert!(out.contains(r#"<p style="margin: 0; color: blue;">hi</p>"#), "{out}");
}

#[test]
fn test_rules_from_multiple_style_blocks() {
    let html = "<html><head><style>p{color:red}</style><style>p{color:green}</style></head><body><p>hi</p></body></html>";
    let out = inline(html).unwrap();
    assert!(out.contains(r#"<p style="color: green;">hi</p>"#), "{out}");
    assert!(!out.contains("<style"), "{out}");
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

#[test]
fn test_combinators_and_structural_pseudo_classes() {
    let out = inline(&page(
        "ul > li:first-child { font-weight: bold } li + li { color: gray } ul li:last-child { margin: 0 }",
        "<ul><li>a</li><li>b</li><li>c</li></ul>",
    ))
    .unwrap();
    assert_snapshot!(out, @r#"<html><head></head><body><ul><li style="font-weight: bold;">a</li><li style="color: gray;">b</li><li style="color: gray; margin: 0;">c</li></ul></body></html>"#);
}

#[test]
fn test_attribute_selectors() {
    let out = inline(&page(
        r#"a[href$=".pdf" i] { color: red } a[target] { text-decoration: none }"#,
        r#"<a href="x.PDF">a</a><a href="y.html" target="_blank">b</a>"#,
    ))
    .unwrap();
    assert!(out.contains(r#"<a href="x.PDF" style="color: red;">a</a>"#), "{out}");
    assert!(
        out.contains(r#"<a href="y.html" target="_blank" style="text-decoration: none;">b</a>"#),
        "{out}"
    );
}

#[test]
fn test_selector_list_splits_inlinable_from_raw() {
    let out = inline(&page("h1, a:visited { color: purple }", "<h1>t</h1>")).unwrap();
    assert_eq!(
        out,
        "<html><head><style type=\"text/css\">\na:visited{color: purple;}\n</style></head><body><h1 style=\"color: purple;\">t</h1></body></html>"
    );
}

#[test]
fn test_pseudo_elements_are_never_inlined() {
    let out = inline(&page("p::before { content: \"x\" }", "<p>hi</p>")).unwrap();
    assert!(out.contains("<p>hi</p>"), "{out}");
    assert!(out.contains("p::before{content: \"x\";}"), "{out}");
}

#[test]
fn test_negation_and_nth_selectors_are_inlined() {
    let out = inline(&page(
        "p:not(.x) { color: red } li:nth-child(2n) { color: blue } li:nth-last-of-type(1) { margin: 0 }",
        r#"<p class="x">a</p><p>b</p><ul><li>1</li><li>2</li><li>3</li></ul>"#,
    ))
    .unwrap();
    assert_snapshot!(out, @r#"<html><head></head><body><p class="x">a</p><p style="color: red;">b</p><ul><li>1</li><li style="color: blue;">2</li><li style="margin: 0;">3</li></ul></body></html>"#);
}

#[test]
fn test_selector_the_matcher_cannot_evaluate_is_kept_as_raw() {
    let out = inline(&page("p:has(a) { margin: 0 }", "<p><a>x</a></p>")).unwrap();
    assert_eq!(
        out,
        "<html><head><style type=\"text/css\">\np:has(a){margin: 0;}\n</style></head><body><p><a>x</a></p></body></html>"
    );
}

#[test]
fn test_empty_custom_property_is_inlined() {
    let out = inline(&page("p { --gap:; color: red }", "<p>x</p>")).unwrap();
    assert!(out.contains(r#"<p style="--gap: ; color: red;">x</p>"#), "{out}");
}

#[test]
fn test_template_contents_survive_inlining() {
    let out = inline(&page("p { color: red }", "<template><p>t</p></template>")).unwrap();
    assert_snapshot!(out, @r#"<html><head></head><body><template><p style="color: red;">t</p></template></body></html>"#);
}

// ---------------------------------------------------------------------------
// Raw passthrough
// ---------------------------------------------------------------------------

#[test]
fn test_media_query_passes_through() {
    let out = inline(&page(
        "@media (max-width: 600px) { p { color: red } } p { margin: 0 }",
        "<p>hi</p>",
    ))
    .unwrap();
    assert_eq!(
        out,
        "<html><head><style type=\"text/css\">\n@media (max-width: 600px) { p { color: red } }\n</style></head><body><p style=\"margin: 0;\">hi</p></body></html>"
    );
}

#[test]
fn test_output_is_stable_when_run_twice() {
    let first = inline(&page(
        "a:hover{color:green} p{color:red}",
        "<p>x</p><a href=\"/\">y</a>",
    ))
    .unwrap();
    let second = inline(&first).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_document_without_styles_is_unchanged() {
    let html = r#"<html><head><title>t</title></head><body><p style="color: red">x</p></body></html>"#;
    assert_eq!(inline(html).unwrap(), html);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_css_parse_error_is_reported() {
    let err = inline(&page("p { color: red", "<p>hi</p>")).unwrap_err();
    assert!(matches!(err, InlineError::CssParse { index: 0, .. }), "{err}");
}

#[test]
fn test_missing_head_with_raw_rules() {
    let mut dom = Dom::new();
    let document = dom.insert(NodeData::Document);
    let html = dom.insert_child(document, NodeData::element("html")).unwrap();
    let body = dom.insert_child(html, NodeData::element("body")).unwrap();
    let style = dom.insert_child(body, NodeData::element("style")).unwrap();
    dom.insert_child(style, NodeData::text("a:hover { color: red }"))
        .unwrap();

    let err = inline_dom(&mut dom).unwrap_err();
    assert!(matches!(err, InlineError::MissingHead));
}

#[test]
fn test_invalid_source_url_is_reported_when_fetching() {
    let options = InlineOptions::new()
        .with_fetch_external(true)
        .with_source_url("::not a url::");
    let err = Inliner::new("<p>x</p>")
        .inline_with_fetcher(&options, &StaticFetcher::new("p{}"))
        .unwrap_err();
    assert!(matches!(err, InlineError::SourceUrl { .. }), "{err}");
}

// ---------------------------------------------------------------------------
// External stylesheets
// ---------------------------------------------------------------------------

struct StaticFetcher {
    css: &'static str,
    requested: RefCell<Vec<String>>,
}

impl StaticFetcher {
    fn new(css: &'static str) -> Self {
        Self {
            css,
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl Fetch for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requested.borrow_mut().push(url.to_string());
        Ok(self.css.to_string())
    }
}

#[test]
fn test_linked_stylesheet_is_fetched_and_inlined() {
    let html = r#"<html><head><link rel="stylesheet" href="css/main.css"></head><body><p>x</p></body></html>"#;
    let options = InlineOptions::new()
        .with_fetch_external(true)
        .with_source_url("http://example.com/mail/");
    let fetcher = StaticFetcher::new("p { color: navy }");

    let dom = Inliner::new(html)
        .inline_with_fetcher(&options, &fetcher)
        .unwrap();

    assert_eq!(
        *fetcher.requested.borrow(),
        vec!["http://example.com/mail/css/main.css"]
    );
    assert_snapshot!(dom.to_html(), @r#"<html><head></head><body><p style="color: navy;">x</p></body></html>"#);
}

#[test]
fn test_links_are_left_alone_without_fetching() {
    let html = r#"<html><head><link rel="stylesheet" href="main.css"></head><body><p>x</p></body></html>"#;
    let fetcher = StaticFetcher::new("p { color: navy }");

    let dom = Inliner::new(html)
        .inline_with_fetcher(&InlineOptions::new(), &fetcher)
        .unwrap();

    assert!(fetcher.requested.borrow().is_empty());
    assert_eq!(dom.to_html(), html);
}

#[test]
fn test_alternate_stylesheets_are_not_fetched() {
    let html = r#"<html><head><link rel="alternate stylesheet" href="alt.css"><link rel="stylesheet" href="main.css"></head><body><p>x</p></body></html>"#;
    let options = InlineOptions::new()
        .with_fetch_external(true)
        .with_source_url("http://example.com/");
    let fetcher = StaticFetcher::new("p { color: navy }");

    let dom = Inliner::new(html)
        .inline_with_fetcher(&options, &fetcher)
        .unwrap();

    assert_eq!(*fetcher.requested.borrow(), vec!["http://example.com/main.css"]);
    assert_snapshot!(dom.to_html(), @r#"<html><head><link rel="alternate stylesheet" href="alt.css"></head><body><p style="color: navy;">x</p></body></html>"#);
}

#[test]
fn test_from_reader() {
    let input = page("b { font-weight: 700 }", "<b>x</b>");
    let dom = Inliner::from_reader(input.as_bytes())
        .unwrap()
        .inline(&InlineOptions::default())
        .unwrap();
    assert!(dom.to_html().contains(r#"<b style="font-weight: 700;">x</b>"#));
}
