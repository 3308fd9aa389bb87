//! Carve the embedded hydration state out of a server-rendered page.
//!
//! A JSON parser cannot be pointed at an offset inside HTML and asked where the value
//! ends, so the object boundary is found with a brace-depth scan that skips string
//! literals (and escaped quotes inside them). Only the carved text goes to `serde_json`.
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Assignment that precedes the state object in the page script.
pub const INITIAL_STATE_MARKER: &str = "__INITIAL_STATE__=";

// ASCII word boundaries, so `undefinedFoo` or `_undefined` are left alone.
static UNDEFINED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)undefined(?-u:\b)").expect("static undefined-token pattern")
});

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Login wall, captcha page, or a markup change upstream.
    #[error("embedded state marker `{marker}` not found in page")]
    NotFound { marker: String },
    /// A partial page load or a format change inside the blob.
    #[error("embedded state is malformed: {0}")]
    Malformed(#[from] Malformed),
}

#[derive(Debug, Error)]
pub enum Malformed {
    #[error("no object start after marker")]
    MissingStart,
    #[error("object opened at byte {start} is never closed")]
    Unbalanced { start: usize },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Extract and parse `__INITIAL_STATE__` from an explore page.
pub fn extract_initial_state(html: &str) -> Result<Value, ExtractError> {
    extract_embedded_state(html, INITIAL_STATE_MARKER)
}

/// Extract the first balanced object after `marker` and parse it as JSON.
///
/// Bare `undefined` tokens are rewritten to `null` before parsing. The rewrite is
/// textual and also applies inside string literals.
pub fn extract_embedded_state(text: &str, marker: &str) -> Result<Value, ExtractError> {
    let marker_at = text.find(marker).ok_or_else(|| ExtractError::NotFound {
        marker: marker.to_string(),
    })?;
    let after = marker_at + marker.len();

    let start = text[after..]
        .find('{')
        .map(|rel| after + rel)
        .ok_or(Malformed::MissingStart)?;
    let end = find_object_end(&text[start..])
        .map(|rel| start + rel)
        .ok_or(Malformed::Unbalanced { start })?;

    let carved = &text[start..=end];
    let json = UNDEFINED_TOKEN.replace_all(carved, "null");

    tracing::debug!(
        marker,
        start,
        len = carved.len(),
        rewrote_undefined = json.len() != carved.len(),
        "xhs.state.carved"
    );

    let value = serde_json::from_str(&json).map_err(Malformed::from)?;
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Normal,
    InString,
    Escaped,
}

/// Byte offset of the `}` closing the object that opens at `input[0]`.
///
/// `input` must start with `{`. Returns `None` when the text ends first.
fn find_object_end(input: &str) -> Option<usize> {
    let mut depth: u32 = 0;
    let mut state = Scan::Normal;

    for (i, ch) in input.char_indices() {
        state = match (state, ch) {
            (Scan::Escaped, _) => Scan::InString,
            (Scan::InString, '\\') => Scan::Escaped,
            (Scan::InString, '"') => Scan::Normal,
            (Scan::InString, _) => Scan::InString,
            (Scan::Normal, '"') => Scan::InString,
            (Scan::Normal, '{') => {
                depth += 1;
                Scan::Normal
            }
            (Scan::Normal, '}') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
                Scan::Normal
            }
            (Scan::Normal, _) => Scan::Normal,
        };
    }
    None
}
