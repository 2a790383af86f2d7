//! Byte-level scanning for bracket-balanced regions in arbitrary text.
//!
//! Only ASCII bytes are inspected, so every returned range falls on UTF-8
//! character boundaries.

use std::ops::Range;

/// Every top-level balanced `{…}` or `[…]` region in `text`, in document order.
///
/// A candidate that never closes, or closes with the wrong bracket, is
/// abandoned and scanning resumes one byte after its opener so regions nested
/// inside it can still be found.
pub(crate) fn balanced_regions(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut ends: Vec<Option<OpenerEnd>> = vec![None; bytes.len()];
    let mut regions = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if matches!(bytes[i], b'{' | b'[') {
            if ends[i].is_none() {
                scan_from(bytes, i, &mut ends);
            }
            if let Some(OpenerEnd::Closed(end)) = ends[i] {
                regions.push(i..end);
                i = end;
                continue;
            }
        }
        i += 1;
    }

    regions
}

/// How the region opening at a given byte ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenerEnd {
    /// Exclusive end of the balanced region.
    Closed(usize),
    /// Runs off the end of the text or meets the wrong closer.
    Abandoned,
}

/// Scans the region opening at `bytes[start]`, recording the end of every
/// opener met outside a string along the way.
///
/// An opener scanned outside a string behaves identically from any scan that
/// reaches it outside a string, so a recorded result is reused instead of
/// walking its region again. Quoted strings are opaque: brackets inside them
/// do not count, and a quote preceded by an odd run of backslashes does not
/// end the string.
fn scan_from(bytes: &[u8], start: usize, ends: &mut [Option<OpenerEnd>]) {
    let mut open: Vec<usize> = Vec::new();
    let mut in_string = false;
    let mut escape = false;
    let mut p = start;

    while p < bytes.len() {
        let b = bytes[p];
        if in_string {
            if escape {
                escape = false;
            } else if b == b'\\' {
                escape = true;
            } else if b == b'"' {
                in_string = false;
            }
            p += 1;
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => match ends[p] {
                Some(OpenerEnd::Closed(end)) => {
                    p = end;
                    continue;
                }
                Some(OpenerEnd::Abandoned) => break,
                None => open.push(p),
            },
            b'}' | b']' => {
                let Some(&top) = open.last() else { break };
                if closer_for(bytes[top]) != b {
                    break;
                }
                open.pop();
                ends[top] = Some(OpenerEnd::Closed(p + 1));
                if open.is_empty() {
                    return;
                }
            }
            _ => {}
        }
        p += 1;
    }

    for q in open {
        ends[q] = Some(OpenerEnd::Abandoned);
    }
}

fn closer_for(opener: u8) -> u8 {
    if opener == b'{' {
        b'}'
    } else {
        b']'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions_of(text: &str) -> Vec<&str> {
        balanced_regions(text)
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test]
    fn finds_single_object() {
        assert_eq!(regions_of(r#"see {"a": 1} ok"#), vec![r#"{"a": 1}"#]);
    }

    #[test]
    fn brace_inside_string_does_not_close_region() {
        let text = r#"payload {"a": "}"} done"#;
        assert_eq!(regions_of(text), vec![r#"{"a": "}"}"#]);
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let text = r#"x {"a": "say \"}\" now"} y"#;
        assert_eq!(regions_of(text), vec![r#"{"a": "say \"}\" now"}"#]);
    }

    #[test]
    fn even_backslash_run_ends_string() {
        // The value is a single escaped backslash, so the following quote closes it.
        let text = r#"{"a": "\\"} tail"#;
        assert_eq!(regions_of(text), vec![r#"{"a": "\\"}"#]);
    }

    #[test]
    fn collects_multiple_top_level_regions_in_order() {
        let text = r#"[1, 2] then {"b": [3]} and [4]"#;
        assert_eq!(regions_of(text), vec!["[1, 2]", r#"{"b": [3]}"#, "[4]"]);
    }

    #[test]
    fn mismatched_closer_is_abandoned_and_inner_region_recovered() {
        let text = r#"[ {"ok": true} }"#;
        assert_eq!(regions_of(text), vec![r#"{"ok": true}"#]);
    }

    #[test]
    fn unterminated_region_yields_nothing() {
        assert!(regions_of(r#"{"a": [1, 2"#).is_empty());
    }

    #[test]
    fn many_unclosed_openers_still_find_trailing_object() {
        let text = format!("{}{{\"ok\": 1}}", "[".repeat(200_000));
        assert_eq!(regions_of(&text), vec![r#"{"ok": 1}"#]);
    }

    #[test]
    fn opener_inside_abandoned_string_is_scanned_on_its_own() {
        // From the outer brace the bracket is quoted; on its own it balances.
        let text = r#"{"a": "[1]"#;
        assert_eq!(regions_of(text), vec!["[1]"]);
    }

    #[test]
    fn handles_multibyte_text_around_regions() {
        let text = "Ngày 1: {\"name\": \"Hội An\"} — xong";
        assert_eq!(regions_of(text), vec!["{\"name\": \"Hội An\"}"]);
    }
}
