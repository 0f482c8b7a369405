//! Callout annotation
//!
//! Wraps admonition phrases in a converted body into MDX callout components.
//! A callout opens at a marker phrase (`Note:`, `⚠️`, `Pro tip:`, ...) and
//! runs to the next blank line, the next heading line or the end of the body:
//!
//! ```text
//! Note: Keys expire after 24 hours.      <Note>
//!                                   =>   Keys expire after 24 hours.
//!                                        </Note>
//! ```
//!
//! Families are applied one after another in the order the rule set lists
//! them. A family never rescans text it produced itself, but later families
//! see earlier output, so a span carrying markers of two families is wrapped
//! twice.

use crate::converter::collapse_blank_lines;
use crate::rules::CalloutFamily;

/// Annotate a body with the given callout families
///
/// ```rust
/// use docs_mdx_migrator::callout::annotate;
/// use docs_mdx_migrator::rules::RuleSet;
///
/// let rules = RuleSet::default();
/// let body = annotate("Intro\n\nTip: use sandbox keys\n\n## Next\n\n", &rules.callouts);
/// assert_eq!(body, "Intro\n\n<Tip>\nuse sandbox keys\n</Tip>\n\n## Next\n\n");
/// ```
pub fn annotate(body: &str, families: &[CalloutFamily]) -> String {
    let mut text = body.to_string();
    for family in families {
        text = annotate_family(&text, family);
    }
    collapse_blank_lines(&text)
}

/// Apply one family in a single left-to-right pass
fn annotate_family(text: &str, family: &CalloutFamily) -> String {
    if family.markers.is_empty() {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len() + 32);
    let mut pos = 0;

    while let Some((start, marker_len)) = find_marker(text, pos, &family.markers) {
        let content_start = start + marker_len;
        let end = span_end(text, content_start);

        output.push_str(&text[pos..start]);
        output.push('<');
        output.push_str(&family.component);
        output.push_str(">\n");
        output.push_str(text[content_start..end].trim());
        output.push_str("\n</");
        output.push_str(&family.component);
        output.push_str(">\n\n");

        pos = end;
    }

    output.push_str(&text[pos..]);
    output
}

/// Leftmost marker at or after `from`; earlier markers win ties
///
/// Returns the byte offset of the match and the marker's byte length.
/// Matching ignores ASCII case only.
fn find_marker(text: &str, from: usize, markers: &[String]) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    for (offset, _) in text[from..].char_indices() {
        let at = from + offset;
        let rest = &bytes[at..];
        for marker in markers {
            let needle = marker.as_bytes();
            if !needle.is_empty()
                && rest.len() >= needle.len()
                && rest[..needle.len()].eq_ignore_ascii_case(needle)
            {
                return Some((at, needle.len()));
            }
        }
    }
    None
}

/// End of a callout span: the next `\n\n`, `\n#` or the end of the text
fn span_end(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    [rest.find("\n\n"), rest.find("\n#")]
        .into_iter()
        .flatten()
        .min()
        .map(|offset| from + offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;

    const WARNING_SIGN: &str = "\u{26a0}\u{fe0f}";

    fn families() -> Vec<CalloutFamily> {
        RuleSet::default().callouts
    }

    #[test]
    fn test_note_runs_to_blank_line() {
        let body = "Intro\n\nNote: Keys expire.\nRotate them.\n\nAfter\n\n";
        assert_eq!(
            annotate(body, &families()),
            "Intro\n\n<Note>\nKeys expire.\nRotate them.\n</Note>\n\nAfter\n\n"
        );
    }

    #[test]
    fn test_span_stops_at_heading() {
        let body = "Warning: irreversible\n## Refunds\n\n";
        assert_eq!(
            annotate(body, &families()),
            "<Warning>\nirreversible\n</Warning>\n\n## Refunds\n\n"
        );
    }

    #[test]
    fn test_span_runs_to_end_of_input() {
        assert_eq!(annotate("Tip: last words", &families()), "<Tip>\nlast words\n</Tip>\n\n");
    }

    #[test]
    fn test_markers_ignore_ascii_case() {
        assert_eq!(
            annotate("IMPORTANT: read this", &families()),
            "<Note>\nread this\n</Note>\n\n"
        );
        assert_eq!(
            annotate("pro TIP: cache tokens", &families()),
            "<Tip>\ncache tokens\n</Tip>\n\n"
        );
    }

    #[test]
    fn test_marker_inside_sentence() {
        assert_eq!(
            annotate("Please note: this is text.\n\n", &families()),
            "Please <Note>\nthis is text.\n</Note>\n\n"
        );
    }

    #[test]
    fn test_multiple_callouts_in_one_pass() {
        let body = "Note: one\n\nNote: two\n\n";
        assert_eq!(
            annotate(body, &families()),
            "<Note>\none\n</Note>\n\n<Note>\ntwo\n</Note>\n\n"
        );
    }

    #[test]
    fn test_shared_marker_is_claimed_by_first_family() {
        // The warning sign belongs to both the note and the warning family.
        let body = format!("{} careful\n\n", WARNING_SIGN);
        let first = annotate_family(&body, &families()[0]);
        assert_eq!(first, "<Note>\ncareful\n</Note>\n\n\n\n");
        assert_eq!(
            annotate(&body, &families()),
            "<Note>\ncareful\n</Note>\n\n"
        );
    }

    #[test]
    fn test_later_family_rescans_earlier_output() {
        let body = format!("Note: {} careful", WARNING_SIGN);
        assert_eq!(
            annotate(&body, &families()),
            "<Note>\n<Warning>\ncareful\n</Note>\n</Warning>\n\n"
        );
    }

    #[test]
    fn test_body_without_markers_is_unchanged() {
        let body = "# Title\n\nNothing to see.\n\n";
        assert_eq!(annotate(body, &families()), body);
        assert_eq!(annotate("", &families()), "");
    }

    #[test]
    fn test_custom_family() {
        let family = CalloutFamily {
            component: "Info".to_string(),
            markers: vec!["FYI:".to_string()],
        };
        assert_eq!(annotate("fyi: hello", &[family]), "<Info>\nhello\n</Info>\n\n");
    }
}
