//! Writes resolved styles into `style` attributes.

use log::warn;

use crate::css::parse_declaration_list;
use crate::dom::{Dom, DomError, NodeId};

use super::cascade::ResolvedStyle;

/// Write `style` into the `style` attribute of `node`.
///
/// Declarations already present inline take precedence: any resolved
/// declaration for the same property is dropped, and the existing text is
/// appended unchanged after the derived declarations. The attribute is left
/// alone when nothing new would be added.
pub fn write_inline_style(
    dom: &mut Dom,
    node: NodeId,
    style: &ResolvedStyle<'_>,
) -> Result<(), DomError> {
    let element = dom
        .get(node)
        .ok_or(DomError::NoSuchNode(node))?
        .as_element()
        .ok_or(DomError::NotAnElement(node))?;
    let existing = element
        .attr("style")
        .map(str::trim)
        .filter(|text| !text.is_empty());
    let overridden = existing.map(inline_properties).unwrap_or_default();

    let mut parts: Vec<String> = style
        .iter()
        .filter(|declaration| !overridden.contains(&declaration.property))
        .map(|declaration| declaration.to_string())
        .collect();
    if parts.is_empty() {
        return Ok(());
    }

    if let Some(existing) = existing {
        if existing.ends_with(';') {
            parts.push(existing.to_string());
        } else {
            parts.push(format!("{existing};"));
        }
    }

    dom.set_attr(node, "style", parts.join(" "))
}

/// Property names declared in an inline style attribute.
fn inline_properties(text: &str) -> Vec<String> {
    match parse_declaration_list(text) {
        Ok(declarations) => declarations.into_iter().map(|d| d.property).collect(),
        Err(err) => {
            warn!("malformed inline style {text:?}: {err}");
            text.split(';')
                .filter_map(|item| item.split_once(':'))
                .map(|(property, _)| property.trim().to_ascii_lowercase())
                .filter(|property| !property.is_empty())
                .collect()
        }
    }
}
