//! Keyword tables driving classification, reporting and callouts
//!
//! Every decision the classifier and reporter make that depends on site
//! vocabulary (which titles mark getting-started content, which URL paths are
//! API reference, which phrases open a callout) is data in a [`RuleSet`]
//! rather than branching logic. The built-in tables describe the payments
//! documentation site the tool was written for; a JSON file can replace any
//! subset of them.
//!
//! A rule set is loaded once and then shared read-only for the rest of the
//! process through [`global`].
//!
//! ```rust
//! use docs_mdx_migrator::rules::RuleSet;
//!
//! let rules: RuleSet = serde_json::from_str(r#"{"baseUrl": "https://docs.example.com/"}"#)
//!     .expect("partial rule files keep the defaults");
//! assert_eq!(rules.base_url, "https://docs.example.com/");
//! assert!(!rules.tags.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::error::MigrationError;
use crate::page::{ContentType, Priority};

/// Part of a page a keyword is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Url,
    Html,
}

/// Lowercased view of a page used for keyword matching
#[derive(Debug, Clone)]
pub struct MatchTarget {
    title: String,
    url: String,
    html: String,
}

impl MatchTarget {
    pub fn new(title: &str, url: &str, html: &str) -> Self {
        Self {
            title: title.to_lowercase(),
            url: url.to_lowercase(),
            html: html.to_lowercase(),
        }
    }

    fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Url => &self.url,
            Field::Html => &self.html,
        }
    }
}

/// Case-insensitive substring test on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub field: Field,
    pub keyword: String,
}

impl KeywordMatch {
    pub fn new(field: Field, keyword: &str) -> Self {
        Self {
            field,
            keyword: keyword.to_lowercase(),
        }
    }

    pub fn matches(&self, target: &MatchTarget) -> bool {
        target
            .field(self.field)
            .contains(self.keyword.to_lowercase().as_str())
    }
}

/// One content-type rule; rules are evaluated in order, first match wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeRule {
    pub content_type: ContentType,
    pub any: Vec<KeywordMatch>,
}

/// One `{pattern, tier}` entry of the priority table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRule {
    pub tier: Priority,
    pub field: Field,
    pub pattern: String,
}

/// Tag assigned when any of its keywords match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub tag: String,
    pub any: Vec<KeywordMatch>,
}

/// Literal markers searched for in raw markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalRules {
    pub code: Vec<String>,
    pub api: Vec<String>,
    pub interactive: Vec<String>,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            code: strings(&["<code", "CodeTabs", "language-"]),
            api: strings(&["application/json", "POST", "GET", "curl", "endpoint"]),
            interactive: strings(&["try-it-out", "api-try", "button", "form"]),
        }
    }
}

/// Report bucket assignment; a rule with no conditions never matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRule {
    pub category: String,
    #[serde(default)]
    pub slug_contains: Vec<String>,
    #[serde(default)]
    pub any_tag: Vec<String>,
}

/// Callout component and the phrases that open it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutFamily {
    /// Component name, e.g. `Note`
    pub component: String,
    pub markers: Vec<String>,
}

/// Complete rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleSet {
    /// Site prefix removed from page URLs to form slugs
    pub base_url: String,
    pub content_types: Vec<ContentTypeRule>,
    pub priorities: Vec<PriorityRule>,
    pub tags: Vec<TagRule>,
    pub signals: SignalRules,
    pub categories: Vec<CategoryRule>,
    /// Bucket for pages no category rule claims
    pub fallback_category: String,
    /// Slugs of guides that already exist on the target platform
    pub existing_guides: Vec<String>,
    /// Applied in order; earlier families wrap first
    pub callouts: Vec<CalloutFamily>,
    /// Pages with more images than this are image heavy
    pub image_heavy_threshold: usize,
    /// Length of the top-tag and largest-page lists
    pub top_n: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        use Field::{Html, Title, Url};

        let content_types = vec![
            ContentTypeRule {
                content_type: ContentType::ApiEndpoint,
                any: vec![
                    KeywordMatch::new(Url, "/reference/"),
                    KeywordMatch::new(Html, "http-method"),
                ],
            },
            ContentTypeRule {
                content_type: ContentType::GettingStarted,
                any: vec![
                    KeywordMatch::new(Title, "getting started"),
                    KeywordMatch::new(Url, "getting-started"),
                ],
            },
            ContentTypeRule {
                content_type: ContentType::Guide,
                any: vec![
                    KeywordMatch::new(Title, "guide"),
                    KeywordMatch::new(Title, "tutorial"),
                    KeywordMatch::new(Url, "/docs/"),
                ],
            },
            ContentTypeRule {
                content_type: ContentType::Overview,
                any: vec![
                    KeywordMatch::new(Title, "overview"),
                    KeywordMatch::new(Title, "introduction"),
                ],
            },
            // Shadowed by the first rule for URLs; kept so titles still match.
            ContentTypeRule {
                content_type: ContentType::Reference,
                any: vec![
                    KeywordMatch::new(Url, "/reference/"),
                    KeywordMatch::new(Title, "reference"),
                ],
            },
        ];

        let priority = |tier, field, pattern: &str| PriorityRule {
            tier,
            field,
            pattern: pattern.to_string(),
        };
        let priorities = vec![
            priority(Priority::High, Title, "getting started"),
            priority(Priority::High, Title, "e-transfer payment"),
            priority(Priority::High, Title, "digital cheque"),
            priority(Priority::High, Title, "api reference"),
            priority(Priority::Medium, Title, "visa direct"),
            priority(Priority::Medium, Title, "mastercard"),
            priority(Priority::Medium, Title, "webhook"),
            priority(Priority::Medium, Url, "/docs/"),
        ];

        let tag = |tag: &str, any: Vec<KeywordMatch>| TagRule {
            tag: tag.to_string(),
            any,
        };
        let tags = vec![
            tag(
                "e-transfer",
                vec![
                    KeywordMatch::new(Title, "e-transfer"),
                    KeywordMatch::new(Url, "etransfer"),
                ],
            ),
            tag("digital-cheque", vec![KeywordMatch::new(Title, "digital cheque")]),
            tag("visa-direct", vec![KeywordMatch::new(Title, "visa")]),
            tag("mastercard", vec![KeywordMatch::new(Title, "mastercard")]),
            tag("webhooks", vec![KeywordMatch::new(Title, "webhook")]),
            tag("api", vec![KeywordMatch::new(Title, "api")]),
            tag("api-reference", vec![KeywordMatch::new(Url, "/reference/")]),
            tag("guides", vec![KeywordMatch::new(Url, "/docs/")]),
        ];

        let category = |category: &str, slug_contains: &[&str], any_tag: &[&str]| CategoryRule {
            category: category.to_string(),
            slug_contains: strings(slug_contains),
            any_tag: strings(any_tag),
        };
        let categories = vec![
            category("getting-started", &["getting-started"], &[]),
            category("api-reference", &["reference/"], &[]),
            category(
                "payment-methods",
                &[],
                &["e-transfer", "digital-cheque", "visa-direct", "mastercard"],
            ),
            category("authentication", &[], &[]),
            category("webhooks", &[], &["webhooks"]),
            category("guides", &["docs/"], &[]),
            category("reference", &[], &[]),
        ];

        let callout = |component: &str, markers: &[&str]| CalloutFamily {
            component: component.to_string(),
            markers: strings(markers),
        };
        let callouts = vec![
            callout("Note", &["Note:", "Important:", "⚠️", "🔥", "💡"]),
            callout("Warning", &["Warning:", "Caution:", "⚠️", "🚨"]),
            callout("Tip", &["Tip:", "Pro tip:", "💡", "✨"]),
        ];

        Self {
            base_url: "https://docs.payper.ca/".to_string(),
            content_types,
            priorities,
            tags,
            signals: SignalRules::default(),
            categories,
            fallback_category: "other".to_string(),
            existing_guides: strings(&[
                "etransfer",
                "digital-cheque",
                "one-click-checkout",
                "realtime-transaction",
            ]),
            callouts,
            image_heavy_threshold: 3,
            top_n: 10,
        }
    }
}

impl RuleSet {
    /// Load a rule set from a JSON file; omitted tables keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MigrationError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MigrationError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            MigrationError::Config(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// First content-type rule that matches, or `Other`
    pub fn content_type(&self, target: &MatchTarget) -> ContentType {
        self.content_types
            .iter()
            .find(|rule| rule.any.iter().any(|m| m.matches(target)))
            .map(|rule| rule.content_type)
            .unwrap_or(ContentType::Other)
    }

    /// Highest tier with a matching entry; `Low` when nothing matches
    pub fn priority(&self, target: &MatchTarget) -> Priority {
        for tier in [Priority::High, Priority::Medium] {
            let matched = self
                .priorities
                .iter()
                .filter(|rule| rule.tier == tier)
                .any(|rule| {
                    target
                        .field(rule.field)
                        .contains(rule.pattern.to_lowercase().as_str())
                });
            if matched {
                return tier;
            }
        }
        Priority::Low
    }

    /// Tags in table order, without duplicates
    pub fn tags(&self, target: &MatchTarget) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for rule in &self.tags {
            if rule.any.iter().any(|m| m.matches(target)) && !tags.contains(&rule.tag) {
                tags.push(rule.tag.clone());
            }
        }
        tags
    }

    /// Report category for a classified page
    pub fn category(&self, slug: &str, tags: &[String]) -> &str {
        self.categories
            .iter()
            .find(|rule| {
                rule.slug_contains.iter().any(|s| slug.contains(s.as_str()))
                    || rule.any_tag.iter().any(|t| tags.contains(t))
            })
            .map(|rule| rule.category.as_str())
            .unwrap_or(self.fallback_category.as_str())
    }

    /// All report buckets in report order, fallback last
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.iter().map(|c| c.category.as_str()).collect();
        if !names.contains(&self.fallback_category.as_str()) {
            names.push(self.fallback_category.as_str());
        }
        names
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

static GLOBAL_RULES: OnceLock<RuleSet> = OnceLock::new();

/// Process-wide rule set; the built-in tables unless [`install`] ran first
pub fn global() -> &'static RuleSet {
    GLOBAL_RULES.get_or_init(RuleSet::default)
}

/// Install the process-wide rule set
///
/// # Errors
///
/// Fails with `MigrationError::Config` once the rules have been read, since
/// readers may already hold references to the previous tables.
pub fn install(rules: RuleSet) -> Result<&'static RuleSet, MigrationError> {
    GLOBAL_RULES
        .set(rules)
        .map_err(|_| MigrationError::Config("rule set already initialized".to_string()))?;
    Ok(global())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(title: &str, url: &str, html: &str) -> MatchTarget {
        MatchTarget::new(title, url, html)
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let m = KeywordMatch::new(Field::Title, "Getting Started");
        assert!(m.matches(&target("GETTING STARTED with us", "", "")));
        assert!(!m.matches(&target("", "getting started", "")));
    }

    #[test]
    fn test_content_type_precedence() {
        let rules = RuleSet::default();
        // Rule (a) wins over (e) for reference URLs.
        assert_eq!(
            rules.content_type(&target("Payments", "https://d/reference/pay", "")),
            ContentType::ApiEndpoint
        );
        assert_eq!(
            rules.content_type(&target("x", "https://d/x", "<span class=\"http-method\">")),
            ContentType::ApiEndpoint
        );
        assert_eq!(
            rules.content_type(&target("Getting Started Guide", "https://d/docs/x", "")),
            ContentType::GettingStarted
        );
        assert_eq!(
            rules.content_type(&target("Overview", "https://d/docs/overview", "")),
            ContentType::Guide
        );
        assert_eq!(
            rules.content_type(&target("Platform Overview", "https://d/home", "")),
            ContentType::Overview
        );
        // Only the title half of the reference rule is reachable.
        assert_eq!(
            rules.content_type(&target("Error Reference", "https://d/errors", "")),
            ContentType::Reference
        );
        assert_eq!(
            rules.content_type(&target("Changelog", "https://d/changelog", "")),
            ContentType::Other
        );
    }

    #[test]
    fn test_priority_tiers() {
        let rules = RuleSet::default();
        assert_eq!(rules.priority(&target("Getting Started", "https://d/x", "")), Priority::High);
        assert_eq!(rules.priority(&target("API Reference", "https://d/x", "")), Priority::High);
        assert_eq!(
            rules.priority(&target("Mastercard Send", "https://d/x", "")),
            Priority::Medium
        );
        assert_eq!(
            rules.priority(&target("E-Transfer Setup", "https://d/docs/e-transfer-setup", "")),
            Priority::Medium
        );
        assert_eq!(rules.priority(&target("Appendix", "https://d/x", "")), Priority::Low);
    }

    #[test]
    fn test_tags_follow_table_order() {
        let rules = RuleSet::default();
        let tags = rules.tags(&target(
            "Visa Direct API",
            "https://d/reference/visa-direct",
            "",
        ));
        assert_eq!(tags, vec!["visa-direct", "api", "api-reference"]);
        assert!(rules.tags(&target("Home", "https://d/", "")).is_empty());
    }

    #[test]
    fn test_category_precedence_and_fallback() {
        let rules = RuleSet::default();
        let tags = vec!["e-transfer".to_string(), "guides".to_string()];
        assert_eq!(rules.category("docs/getting-started", &tags), "getting-started");
        assert_eq!(rules.category("docs/e-transfer", &tags), "payment-methods");
        assert_eq!(rules.category("docs/webhooks", &["webhooks".to_string()]), "webhooks");
        assert_eq!(rules.category("docs/misc", &[]), "guides");
        assert_eq!(rules.category("changelog", &[]), "other");
        assert_eq!(
            rules.category_names(),
            vec![
                "getting-started",
                "api-reference",
                "payment-methods",
                "authentication",
                "webhooks",
                "guides",
                "reference",
                "other"
            ]
        );
    }

    #[test]
    fn test_partial_rule_file_keeps_defaults() {
        let rules: RuleSet = serde_json::from_str(
            r#"{"priorities": [{"tier": "high", "field": "url", "pattern": "/quickstart"}]}"#,
        )
        .expect("valid rules");
        assert_eq!(rules.priorities.len(), 1);
        assert_eq!(rules.tags, RuleSet::default().tags);
        assert_eq!(
            rules.priority(&target("Getting Started", "https://d/quickstart", "")),
            Priority::High
        );
        assert_eq!(
            rules.priority(&target("Getting Started", "https://d/other", "")),
            Priority::Low
        );
    }

    #[test]
    fn test_rule_set_round_trips_through_json() {
        let rules = RuleSet::default();
        let json = serde_json::to_string(&rules).expect("serialize");
        let back: RuleSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, rules);
    }

    #[test]
    fn test_from_file_reports_config_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "{ not json").expect("write");
        match RuleSet::from_file(&path) {
            Err(MigrationError::Config(msg)) => assert!(msg.contains("cannot parse")),
            other => panic!("expected Config error, got {:?}", other),
        }
        assert!(matches!(
            RuleSet::from_file(dir.path().join("absent.json")),
            Err(MigrationError::Config(_))
        ));
    }

    #[test]
    fn test_global_defaults() {
        assert_eq!(global().top_n, 10);
        assert!(install(RuleSet::default()).is_err());
    }
}
