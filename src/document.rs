//! Converted MDX documents
//!
//! A [`ConvertedDocument`] is the final product of converting one page: YAML
//! front matter with the page title and a short description, followed by the
//! annotated body.
//!
//! # Format
//!
//! ```yaml
//! ---
//! title: "Page Title"
//! description: "First sentence. Second sentence"
//! ---
//!
//! # Page Title
//! ...
//! ```

use serde::Serialize;

use crate::callout::annotate;
use crate::converter::convert;
use crate::normalizer::normalize;
use crate::page::PageRecord;
use crate::rules::RuleSet;

/// Longest description kept without truncation, in characters
pub const DESCRIPTION_MAX_CHARS: usize = 160;

/// Characters kept from an over-long description before the ellipsis
const DESCRIPTION_KEEP_CHARS: usize = 157;

/// Front matter fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    /// At most [`DESCRIPTION_MAX_CHARS`] characters
    pub description: String,
}

/// One converted page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedDocument {
    pub front_matter: FrontMatter,
    pub body: String,
}

impl ConvertedDocument {
    /// Convert a page record
    ///
    /// The body is the structural conversion of the page markup with callouts
    /// annotated using the rule set's callout families.
    pub fn from_page(page: &PageRecord, rules: &RuleSet) -> Self {
        let body = annotate(&convert(&page.html), &rules.callouts);
        Self {
            front_matter: FrontMatter {
                title: page.title.trim().to_string(),
                description: describe(&page.html),
            },
            body,
        }
    }

    /// Render the document as MDX source
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(self.body.len() + 128);
        self.write_front_matter(&mut output);
        output.push_str(&self.body);
        output
    }

    fn write_front_matter(&self, output: &mut String) {
        output.push_str("---\n");

        output.push_str("title: ");
        write_yaml_string(output, &self.front_matter.title);
        output.push('\n');

        output.push_str("description: ");
        write_yaml_string(output, &self.front_matter.description);
        output.push('\n');

        output.push_str("---\n\n");
    }
}

/// Summarize a page for its front matter description
///
/// Takes the first two `". "`-separated sentences of the normalized text.
/// Longer than [`DESCRIPTION_MAX_CHARS`] characters, it is cut to 157
/// characters followed by `...`.
///
/// ```rust
/// use docs_mdx_migrator::document::describe;
///
/// let html = "<h1>Payouts</h1><p>Send money. Track it. Reconcile it.</p>";
/// assert_eq!(describe(html), "Payouts Send money. Track it");
/// ```
pub fn describe(html: &str) -> String {
    let text = normalize(html);
    let description = text.split(". ").take(2).collect::<Vec<_>>().join(". ");

    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        let mut truncated: String = description.chars().take(DESCRIPTION_KEEP_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        description
    }
}

/// Write a YAML double-quoted scalar
///
/// - `"` -> `\"`
/// - `\` -> `\\`
/// - newline, carriage return and tab -> `\n`, `\r`, `\t`
fn write_yaml_string(output: &mut String, value: &str) {
    output.push('"');
    for ch in value.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            _ => output.push(ch),
        }
    }
    output.push('"');
}
