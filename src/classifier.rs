//! Page classification
//!
//! Assigns each scraped page a slug, content type, priority tier and topic
//! tags, and records a few cheap signals about its markup (code samples, API
//! examples, interactive widgets, images). Everything is a pure function of
//! the page record and the rule tables, so classifying the same record twice
//! always yields the same [`PageAnalysis`].
//!
//! # Examples
//!
//! ```rust
//! use docs_mdx_migrator::classifier::ContentClassifier;
//! use docs_mdx_migrator::page::{PageRecord, Priority};
//!
//! let page = PageRecord::new(
//!     "Getting Started",
//!     "https://docs.payper.ca/docs/getting-started",
//!     "<h1>Getting Started</h1><p>Create an account.</p>",
//! );
//! let analysis = ContentClassifier::new().classify(&page);
//! assert_eq!(analysis.slug, "docs/getting-started");
//! assert_eq!(analysis.priority, Priority::High);
//! assert_eq!(analysis.word_count, 5);
//! ```

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::normalizer::{normalize, word_count};
use crate::page::{PageAnalysis, PageRecord};
use crate::rules::{self, MatchTarget, RuleSet};

/// Page classifier bound to a rule set
pub struct ContentClassifier<'r> {
    rules: &'r RuleSet,
}

impl ContentClassifier<'static> {
    /// Create a classifier using the process-wide rules
    pub fn new() -> Self {
        Self {
            rules: rules::global(),
        }
    }
}

impl Default for ContentClassifier<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> ContentClassifier<'r> {
    /// Create a classifier using an explicit rule set
    pub fn with_rules(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Classify a page record
    pub fn classify(&self, page: &PageRecord) -> PageAnalysis {
        let target = MatchTarget::new(&page.title, &page.url, &page.html);
        let text = normalize(&page.html);
        let signals = &self.rules.signals;

        PageAnalysis {
            title: page.title.clone(),
            url: page.url.clone(),
            slug: extract_slug(&page.url, &self.rules.base_url),
            word_count: word_count(&text),
            has_code_examples: contains_any(&page.html, &signals.code),
            has_api_examples: contains_any(&page.html, &signals.api),
            has_interactive_elements: contains_any(&page.html, &signals.interactive),
            navigation_path: extract_navigation_path(&page.html),
            content_type: self.rules.content_type(&target),
            priority: self.rules.priority(&target),
            tags: self.rules.tags(&target),
            images: extract_images(&page.html),
        }
    }
}

/// Classify a page with the process-wide rules
pub fn classify(page: &PageRecord) -> PageAnalysis {
    ContentClassifier::new().classify(page)
}

/// Derive the site-relative slug of a page URL
///
/// URLs under `base_url` lose that prefix. Other absolute URLs keep their
/// path, query and fragment. One leading `/` is removed either way.
pub fn extract_slug(url: &str, base_url: &str) -> String {
    let relative = if !base_url.is_empty()
        && let Some(rest) = url.strip_prefix(base_url)
    {
        rest.to_string()
    } else if let Ok(parsed) = Url::parse(url) {
        let mut path = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }
        if let Some(fragment) = parsed.fragment() {
            path.push('#');
            path.push_str(fragment);
        }
        path
    } else {
        url.to_string()
    };

    relative
        .strip_prefix('/')
        .map(str::to_string)
        .unwrap_or(relative)
}

/// Image sources in document order
///
/// Scans the raw markup the way the extractor saw it, so images inside
/// scripts or comments are reported too.
pub fn extract_images(html: &str) -> Vec<String> {
    static IMG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(regex) = IMG_REGEX
        .get_or_init(|| Regex::new(r#"(?i)<img[^>]+src="([^"]+)""#).ok())
        .as_ref()
    else {
        return Vec::new();
    };

    regex
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Breadcrumb text if the page has one, else the `<title>` text
pub fn extract_navigation_path(html: &str) -> String {
    static BREADCRUMB_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    static TITLE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

    let breadcrumb = BREADCRUMB_REGEX
        .get_or_init(|| Regex::new(r"(?i)breadcrumb[^>]*>(.*?)</[^>]*>").ok())
        .as_ref();
    if let Some(regex) = breadcrumb
        && let Some(m) = regex.captures(html).and_then(|caps| caps.get(1))
    {
        return m.as_str().to_string();
    }

    let title = TITLE_REGEX
        .get_or_init(|| Regex::new(r"(?i)<title[^>]*>(.*?)</title>").ok())
        .as_ref();
    if let Some(regex) = title
        && let Some(m) = regex.captures(html).and_then(|caps| caps.get(1))
    {
        return m.as_str().to_string();
    }

    String::new()
}

fn contains_any(html: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| html.contains(marker.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ContentType, Priority};
    use proptest::prelude::*;

    fn page(title: &str, url: &str, html: &str) -> PageRecord {
        PageRecord::new(title, url, html)
    }

    #[test]
    fn test_slug_under_base_url() {
        assert_eq!(
            extract_slug("https://docs.payper.ca/docs/getting-started", "https://docs.payper.ca/"),
            "docs/getting-started"
        );
        assert_eq!(
            extract_slug("https://docs.payper.ca/reference/api#auth", "https://docs.payper.ca"),
            "reference/api#auth"
        );
    }

    #[test]
    fn test_slug_for_foreign_host_uses_path() {
        assert_eq!(
            extract_slug("https://other.example.com/docs/e-transfer-setup?v=2", "https://docs.payper.ca/"),
            "docs/e-transfer-setup?v=2"
        );
        assert_eq!(extract_slug("not a url", ""), "not a url");
    }

    #[test]
    fn test_word_count_of_empty_page_is_zero() {
        let analysis = classify(&page("Empty", "https://docs.payper.ca/empty", ""));
        assert_eq!(analysis.word_count, 0);
        let analysis = classify(&page(
            "Scripts only",
            "https://docs.payper.ca/empty",
            "<script>var a = 1;</script>",
        ));
        assert_eq!(analysis.word_count, 0);
    }

    #[test]
    fn test_signals_match_raw_markup() {
        let analysis = classify(&page(
            "Payments",
            "https://docs.payper.ca/docs/payments",
            r#"<pre><code class="language-bash">curl -X POST</code></pre><button>Try</button>"#,
        ));
        assert!(analysis.has_code_examples);
        assert!(analysis.has_api_examples);
        assert!(analysis.has_interactive_elements);

        let plain = classify(&page("Plain", "https://docs.payper.ca/plain", "<p>hello</p>"));
        assert!(!plain.has_code_examples);
        assert!(!plain.has_api_examples);
        assert!(!plain.has_interactive_elements);
    }

    #[test]
    fn test_api_signal_is_case_sensitive() {
        // "get" in running text is not an HTTP method marker.
        let analysis = classify(&page("x", "https://docs.payper.ca/x", "<p>get started</p>"));
        assert!(!analysis.has_api_examples);
    }

    #[test]
    fn test_images_in_document_order() {
        let html = r#"<img alt="a" src="/one.png"><p>x</p><IMG class="c" src="https://cdn/two.png" alt="b"><img alt="no src">"#;
        assert_eq!(extract_images(html), vec!["/one.png", "https://cdn/two.png"]);
    }

    #[test]
    fn test_navigation_path() {
        let html = r#"<head><title>Payouts | Docs</title></head><nav class="breadcrumb">Docs / Payouts</nav>"#;
        assert_eq!(extract_navigation_path(html), "Docs / Payouts");
        assert_eq!(
            extract_navigation_path("<title>Only Title</title>"),
            "Only Title"
        );
        assert_eq!(extract_navigation_path("<p>nothing</p>"), "");
    }

    #[test]
    fn test_end_to_end_metadata() {
        let analysis = classify(&page(
            "E-Transfer Setup",
            "https://docs.example.com/docs/e-transfer-setup",
            "<h1>Setup</h1><p>Do this.</p>",
        ));
        assert!(analysis.has_tag("e-transfer"));
        assert_eq!(analysis.priority, Priority::Medium);
        assert_eq!(analysis.content_type, ContentType::Guide);
        assert_eq!(analysis.word_count, 3);
    }

    #[test]
    fn test_custom_rules() {
        let mut rules = RuleSet::default();
        rules.base_url = "https://docs.example.com/".into();
        rules.tags.clear();
        let analysis = ContentClassifier::with_rules(&rules).classify(&page(
            "Webhook Guide",
            "https://docs.example.com/docs/webhooks",
            "",
        ));
        assert_eq!(analysis.slug, "docs/webhooks");
        assert!(analysis.tags.is_empty());
        assert_eq!(analysis.priority, Priority::Medium);
    }

    proptest! {
        #[test]
        fn prop_classification_is_deterministic(
            title in "[A-Za-z -]{0,30}",
            path in "[a-z/-]{0,30}",
            body in "[A-Za-z <>/=\"-]{0,120}",
        ) {
            let record = page(&title, &format!("https://docs.payper.ca/{}", path), &body);
            prop_assert_eq!(classify(&record), classify(&record.clone()));
        }

        #[test]
        fn prop_every_page_gets_exactly_one_tier(
            title in prop::sample::select(vec![
                "Getting Started", "API Reference", "Digital Cheque", "Mastercard",
                "Webhooks", "Appendix", "", "e-Transfer Payment",
            ]),
            path in prop::sample::select(vec!["docs/a", "reference/b", "c", ""]),
        ) {
            let analysis = classify(&page(title, &format!("https://docs.payper.ca/{}", path), ""));
            let hits = Priority::ALL.iter().filter(|tier| **tier == analysis.priority).count();
            prop_assert_eq!(hits, 1);
        }
    }
}
