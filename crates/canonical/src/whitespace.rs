//! Whitespace normalization.
//!
//! Ingredient labels come from OCR, barcode databases and hand-typed text,
//! so line breaks, tabs and non-breaking spaces show up inside a single
//! ingredient. [`collapse_whitespace`] turns every run of Unicode whitespace
//! into one ASCII space and trims both ends.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  milk\n\tsolids  "), "milk solids");
//! assert_eq!(collapse_whitespace("yeast\u{00A0}extract"), "yeast extract");
//! assert_eq!(collapse_whitespace("   "), "");
//! ```

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// Time and space are O(n); the output never has leading or trailing
/// whitespace and is empty for whitespace-only input.
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
