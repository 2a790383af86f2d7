//! Structured-block recovery from assistant replies.
//!
//! Replies are prose with zero or more data blocks. Fenced code blocks are
//! tried first, last to first; if none parses, every bracket-balanced region
//! in the text is tried, again last to first. The first candidate that parses
//! into an [`ExtractedPayload`] wins and its span is cut from the prose.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::payload::ExtractedPayload;
use crate::scan::balanced_regions;

/// Fenced code block with an optional info string. Group 1 is the body.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[ \t]*[A-Za-z0-9_+.\-]*[ \t]*\r?\n?(.*?)```").expect("valid regex")
});

/// A short label such as `DATA:` or `JSON :` ahead of the payload, or a bare
/// colon left behind by a fence info string like ```` ```DATA: ````.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[A-Za-z][A-Za-z0-9_ \-]{0,30})?:\s*").expect("valid regex")
});

/// Result of scanning one reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The reply with the winning block removed, or the original text when
    /// nothing parsed.
    pub cleaned_text: String,
    pub structured_data: Option<ExtractedPayload>,
}

/// Recovers the structured payload, if any, from `text`.
#[must_use]
pub fn extract(text: &str) -> Extraction {
    let fences: Vec<(Range<usize>, Range<usize>)> = FENCE_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let body = cap.get(1)?;
            Some((whole.range(), body.range()))
        })
        .collect();

    for (whole, body) in fences.iter().rev() {
        if let Some(payload) = parse_candidate(&text[body.clone()]) {
            tracing::debug!(
                fence_count = fences.len(),
                records = payload.record_count(),
                "structured data recovered from fenced block"
            );
            return Extraction {
                cleaned_text: remove_span(text, whole.clone()),
                structured_data: Some(payload),
            };
        }
    }

    let regions = balanced_regions(text);
    for region in regions.iter().rev() {
        if let Some(payload) = parse_candidate(&text[region.clone()]) {
            tracing::debug!(
                region_count = regions.len(),
                records = payload.record_count(),
                "structured data recovered from bare region"
            );
            return Extraction {
                cleaned_text: remove_span(text, region.clone()),
                structured_data: Some(payload),
            };
        }
    }

    tracing::debug!(
        fence_count = fences.len(),
        region_count = regions.len(),
        "no structured data in reply"
    );
    Extraction {
        cleaned_text: text.to_owned(),
        structured_data: None,
    }
}

/// Strips any leading label and parses the remainder as a payload.
fn parse_candidate(raw: &str) -> Option<ExtractedPayload> {
    let body = LABEL_RE.replace(raw, "");
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ExtractedPayload::from_value(value)
}

fn remove_span(text: &str, span: Range<usize>) -> String {
    let before = text[..span.start].trim_end();
    let after = text[span.end..].trim_start();
    match (before.is_empty(), after.is_empty()) {
        (true, _) => after.trim_end().to_owned(),
        (false, true) => before.trim_start().to_owned(),
        (false, false) => format!("{}\n\n{}", before.trim_start(), after.trim_end()),
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
