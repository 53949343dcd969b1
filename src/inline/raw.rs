//! Re-emits non-inlinable rules as a `<style>` block in `<head>`.

use log::debug;

use crate::dom::{Dom, ElementData, NodeData, NodeId};
use crate::error::InlineError;

use super::collect::RawRule;

/// CSS text for `rules`: each rule followed by a newline.
pub fn raw_css(rules: &[RawRule]) -> String {
    rules.iter().map(|rule| format!("{rule}\n")).collect()
}

/// Append `rules` to the first `<head>` as one `<style type="text/css">` element.
///
/// Returns the new style element, or `None` when there is nothing to emit.
pub fn reinsert_raw_rules(dom: &mut Dom, rules: &[RawRule]) -> Result<Option<NodeId>, InlineError> {
    if rules.is_empty() {
        return Ok(None);
    }
    let head = dom.first_element_named("head").ok_or(InlineError::MissingHead)?;

    let style = dom.insert_child(
        head,
        NodeData::Element(ElementData::new("style").with_attr("type", "text/css")),
    )?;
    dom.insert_child(style, NodeData::text(format!("\n{}", raw_css(rules))))?;
    debug!("reinserted {} raw rules", rules.len());
    Ok(Some(style))
}
