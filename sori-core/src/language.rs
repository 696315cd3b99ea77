//! Script-detection heuristic for choosing a synthesis language.

use crate::error::{Error, Result};

/// ASCII share above which text is classified as the secondary language.
pub const ASCII_RATIO_THRESHOLD: f64 = 0.7;

/// Pick a language for `text` from its ASCII share.
///
/// The share is measured over the UTF-8 byte length of the text with
/// whitespace removed: each ASCII character contributes one byte, wider
/// characters contribute their full encoded width. A share above 0.7 selects
/// `secondary`, anything else selects `primary`. This is a crude script
/// detector, not locale detection, and it misclassifies non-Latin secondary
/// languages; the tradeoff is accepted for a local tool.
///
/// Fails with `InvalidInput` when nothing but whitespace remains, so callers
/// that validate emptiness first never reach that path.
pub fn infer_language<'a>(text: &str, primary: &'a str, secondary: &'a str) -> Result<&'a str> {
    let mut ascii_chars = 0usize;
    let mut total_bytes = 0usize;

    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total_bytes += c.len_utf8();
        if c.is_ascii() {
            ascii_chars += 1;
        }
    }

    if total_bytes == 0 {
        return Err(Error::InvalidInput("No text provided".to_string()));
    }

    if ascii_chars as f64 / total_bytes as f64 > ASCII_RATIO_THRESHOLD {
        Ok(secondary)
    } else {
        Ok(primary)
    }
}
