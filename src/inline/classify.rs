//! Decides whether a selector can be expressed as an inline style.
//!
//! Inline `style` attributes apply unconditionally, so any selector that
//! depends on user interaction, document state or a generated box has no
//! inline equivalent and must stay in a stylesheet.

/// Pseudo-classes and legacy single-colon pseudo-elements that rule out inlining.
///
/// Matching is by substring, so `:first-letter` also rejects compound uses
/// like `p:first-letter.big`.
pub const UNSUPPORTED_PSEUDO_CLASSES: &[&str] = &[
    ":active",
    ":after",
    ":before",
    ":checked",
    ":disabled",
    ":enabled",
    ":first-line",
    ":first-letter",
    ":focus",
    ":hover",
    ":invalid",
    ":in-range",
    ":lang",
    ":link",
    ":root",
    ":selection",
    ":target",
    ":valid",
    ":visited",
];

/// Returns `true` if declarations under `selector` may be written inline.
pub fn is_inlinable(selector: &str) -> bool {
    if selector.contains("::") {
        return false;
    }
    !UNSUPPORTED_PSEUDO_CLASSES
        .iter()
        .any(|pseudo| selector.contains(pseudo))
}
