//! Page records and per-page analysis results

use serde::{Deserialize, Serialize};
use std::fmt;

/// One scraped page as stored by the extractor
///
/// Extracted JSON files carry more fields (headings, links, text content);
/// only these three are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Document title at extraction time
    #[serde(default)]
    pub title: String,
    /// Absolute page address
    pub url: String,
    /// Full serialized document, possibly malformed or partial
    pub html: String,
}

impl PageRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Kind of content a page holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    ApiEndpoint,
    GettingStarted,
    Guide,
    Overview,
    Reference,
    Other,
}

impl ContentType {
    /// All content types in report order
    pub const ALL: [ContentType; 6] = [
        ContentType::Guide,
        ContentType::ApiEndpoint,
        ContentType::Overview,
        ContentType::Reference,
        ContentType::GettingStarted,
        ContentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::ApiEndpoint => "api-endpoint",
            ContentType::GettingStarted => "getting-started",
            ContentType::Guide => "guide",
            ContentType::Overview => "overview",
            ContentType::Reference => "reference",
            ContentType::Other => "other",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Migration priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single page
///
/// Derived deterministically from a [`PageRecord`] and the rule tables.
/// Never patched after creation; reclassify instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    pub title: String,
    pub url: String,
    pub slug: String,
    pub word_count: usize,
    pub has_code_examples: bool,
    pub has_api_examples: bool,
    pub has_interactive_elements: bool,
    /// Breadcrumb text, or the document title when there is no breadcrumb
    #[serde(default)]
    pub navigation_path: String,
    pub content_type: ContentType,
    pub priority: Priority,
    /// Topic tags in rule-table order, each at most once
    pub tags: Vec<String>,
    /// Image sources in document order
    pub images: Vec<String>,
}

impl PageAnalysis {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ignores_extra_fields() {
        let json = r#"{
            "title": "Getting Started",
            "url": "https://docs.example.com/docs/getting-started",
            "html": "<h1>Hi</h1>",
            "textContent": "Hi",
            "headings": [{"level": "H1", "text": "Hi", "id": ""}]
        }"#;
        let record: PageRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(record.title, "Getting Started");
        assert_eq!(record.html, "<h1>Hi</h1>");
    }

    #[test]
    fn test_record_without_html_is_rejected() {
        let json = r#"{"title": "x", "url": "https://docs.example.com/"}"#;
        assert!(serde_json::from_str::<PageRecord>(json).is_err());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ContentType::ApiEndpoint).unwrap(),
            "\"api-endpoint\""
        );
        assert_eq!(
            serde_json::to_string(&ContentType::GettingStarted).unwrap(),
            "\"getting-started\""
        );
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"medium\"");
        for content_type in ContentType::ALL {
            let json = serde_json::to_string(&content_type).unwrap();
            assert_eq!(json, format!("\"{}\"", content_type));
        }
    }

    #[test]
    fn test_analysis_serializes_camel_case() {
        let analysis = PageAnalysis {
            title: "T".into(),
            url: "https://docs.example.com/docs/t".into(),
            slug: "docs/t".into(),
            word_count: 3,
            has_code_examples: true,
            has_api_examples: false,
            has_interactive_elements: false,
            navigation_path: String::new(),
            content_type: ContentType::Guide,
            priority: Priority::Medium,
            tags: vec!["guides".into()],
            images: Vec::new(),
        };
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["wordCount"], 3);
        assert_eq!(value["hasCodeExamples"], true);
        assert_eq!(value["contentType"], "guide");
        assert!(analysis.has_tag("guides"));
        assert!(!analysis.has_tag("api"));
    }
}
