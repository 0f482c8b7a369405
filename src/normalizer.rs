//! Markup normalization to plain text
//!
//! Turns a serialized page into a single line of readable text. This is the
//! text every downstream measurement is taken from: word counts, the front
//! matter description and duplicate detection all work on normalized text.
//!
//! The normalizer is deliberately pattern based rather than tree based. It
//! must accept anything a scraper stored, including truncated documents, and a
//! tag that never closes simply stops matching instead of failing.
//!
//! # Steps
//!
//! 1. Remove `<script>` and `<style>` blocks including their contents
//! 2. Replace every remaining tag with a space
//! 3. Decode `&amp; &lt; &gt; &quot; &#39; &nbsp;`
//! 4. Collapse whitespace runs to one space and trim
//!
//! Decoding can produce new markup (`&lt;b&gt;` becomes `<b>`), so the steps
//! are repeated until the text stops changing. Every step either shortens the
//! text or only rewrites whitespace, which bounds the number of rounds.
//!
//! ```rust
//! use docs_mdx_migrator::normalizer::normalize;
//!
//! let text = normalize("<p>Hello&nbsp;<b>world</b></p><script>x()</script>");
//! assert_eq!(text, "Hello world");
//! assert_eq!(normalize(&text), text);
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// Entities decoded by the normalizer, `&amp;` last so a single pass never
/// produces a fresh entity out of an escaped one.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

fn script_regex() -> Option<&'static Regex> {
    static SCRIPT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    SCRIPT_REGEX
        .get_or_init(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").ok())
        .as_ref()
}

fn style_regex() -> Option<&'static Regex> {
    static STYLE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    STYLE_REGEX
        .get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").ok())
        .as_ref()
}

fn tag_regex() -> Option<&'static Regex> {
    static TAG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    TAG_REGEX
        .get_or_init(|| Regex::new(r"<[^>]*>").ok())
        .as_ref()
}

/// Normalize markup to plain text
///
/// Never fails; malformed markup degrades to whatever the patterns can still
/// recognize. The result is a fixed point: `normalize(normalize(x)) ==
/// normalize(x)` for every input.
pub fn normalize(html: &str) -> String {
    let mut current = normalize_pass(html);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Count whitespace-delimited words; empty text has zero words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Decode the entities the normalizer understands, leaving others untouched
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut decoded = text.to_string();
    for (entity, replacement) in ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }
    decoded
}

/// Drop script and style blocks, then replace every tag with a space
///
/// Entities are left encoded and whitespace is not collapsed.
pub fn strip_tags(html: &str) -> String {
    let mut text = html.to_string();

    if let Some(re) = script_regex() {
        text = re.replace_all(&text, "").into_owned();
    }
    if let Some(re) = style_regex() {
        text = re.replace_all(&text, "").into_owned();
    }
    if let Some(re) = tag_regex() {
        text = re.replace_all(&text, " ").into_owned();
    }
    text
}

fn normalize_pass(html: &str) -> String {
    let decoded = decode_entities(&strip_tags(html));
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
