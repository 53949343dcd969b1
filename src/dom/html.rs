//! HTML5 parsing using html5ever.
//!
//! html5ever builds an `RcDom`, which is then copied into the arena [`Dom`].

use std::io;

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::node::{ElementData, NodeData, NodeId};
use super::tree::{Dom, DomError};

/// Errors from HTML parsing.
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl Dom {
    /// Parse an HTML document.
    ///
    /// Parsing follows the HTML5 tree construction rules, so the result always
    /// has `<html>`, `<head>` and `<body>` elements even when the input omits
    /// them.
    pub fn parse_html(html: &str) -> Result<Dom, HtmlError> {
        let rc_dom: RcDom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut dom = Dom::new();
        let document = dom.insert(NodeData::Document);

        // Explicit stack: documents can nest deeper than the call stack allows.
        let mut stack: Vec<(Handle, NodeId)> = rc_dom
            .document
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), document))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let Some(data) = convert_node(&handle) else {
                continue;
            };
            let id = dom.insert_child(parent, data)?;
            let mut children: Vec<Handle> = handle.children.borrow().clone();
            // `<template>` content lives in a separate fragment; it is stored
            // as ordinary children of the template element.
            if let RcNodeData::Element {
                template_contents, ..
            } = &handle.data
            {
                if let Some(fragment) = template_contents.borrow().as_ref() {
                    children.extend(fragment.children.borrow().iter().cloned());
                }
            }
            stack.extend(children.into_iter().rev().map(|child| (child, id)));
        }

        Ok(dom)
    }
}

/// Convert one html5ever node, without its children.
fn convert_node(handle: &Handle) -> Option<NodeData> {
    match &handle.data {
        RcNodeData::Doctype { name, .. } => Some(NodeData::Doctype {
            name: name.to_string(),
        }),
        RcNodeData::Text { contents } => Some(NodeData::Text(contents.borrow().to_string())),
        RcNodeData::Comment { contents } => Some(NodeData::Comment(contents.to_string())),
        RcNodeData::Element { name, attrs, .. } => {
            let mut element = ElementData::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                let attr_name = match &attr.name.prefix {
                    Some(prefix) => format!("{prefix}:{}", attr.name.local),
                    None => attr.name.local.to_string(),
                };
                element.attrs.push((attr_name, attr.value.to_string()));
            }
            Some(NodeData::Element(element))
        }
        RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => None,
    }
}
