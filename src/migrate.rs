//! Phase-1 migration
//!
//! Reads the migration plan and analysis report written by an `analyze` run,
//! picks the critical pages worth migrating first and writes each one as an
//! MDX document. A page that cannot be migrated is logged and recorded; the
//! documents already written stay on disk.
//!
//! Selection works on the phase-1 pages of the plan:
//!
//! | Group           | Membership                        | Pages written                         |
//! |-----------------|-----------------------------------|---------------------------------------|
//! | getting started | slug contains `getting-started`   | `docs/getting-started` (or the first) |
//! | e-transfer      | tag `e-transfer`                  | up to 3 payment/payout/standard pages |
//! | digital cheque  | tag `digital-cheque`              | up to 2 transaction/direct-debit pages|
//! | API reference   | slug contains `reference/api`     | `reference/api` (or the first)        |

use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::document::ConvertedDocument;
use crate::error::MigrationError;
use crate::page::PageAnalysis;
use crate::report::{AnalysisReport, MigrationPlan};
use crate::rules::RuleSet;
use crate::store::{self, PageStore};

const MAIN_GETTING_STARTED_SLUG: &str = "docs/getting-started";
const MAIN_API_REFERENCE_SLUG: &str = "reference/api";

const ETRANSFER_SLUGS: &[&str] = &["e-transfer-payment", "e-transfer-payout", "e-transfer-standard"];
const ETRANSFER_LIMIT: usize = 3;

const DIGITAL_CHEQUE_SLUGS: &[&str] = &[
    "digital-cheque-transaction",
    "directdebit-2",
    "docs/digital-cheque",
];
const DIGITAL_CHEQUE_LIMIT: usize = 2;

/// Input and output locations for a migration run
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Directory of extracted page records
    pub input_dir: PathBuf,
    /// Directory the MDX documents are written to
    pub output_dir: PathBuf,
    pub plan_path: PathBuf,
    pub report_path: PathBuf,
    /// Written only when some page failed
    pub errors_path: PathBuf,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("extracted-docs/data"),
            output_dir: PathBuf::from("migrated-content"),
            plan_path: PathBuf::from("migration-plan.json"),
            report_path: PathBuf::from("content-analysis-report.json"),
            errors_path: PathBuf::from("migration-errors.log"),
        }
    }
}

/// A phase-1 page and the file it is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    pub page: &'a PageAnalysis,
    pub file_name: String,
}

/// What a migration run produced
#[derive(Debug, Default)]
pub struct MigrationSummary {
    /// Documents written, in migration order
    pub written: Vec<PathBuf>,
    /// One line per page that could not be migrated
    pub errors: Vec<String>,
}

/// Run the phase-1 migration
///
/// # Errors
///
/// Fails before writing anything when the plan, the report or the input
/// directory cannot be loaded. Per-page failures do not fail the run; they are
/// returned in [`MigrationSummary::errors`] and written to the errors file.
pub fn run(options: &MigrateOptions, rules: &RuleSet) -> Result<MigrationSummary, MigrationError> {
    let plan: MigrationPlan = store::read_json(&options.plan_path)?;
    let report: AnalysisReport = store::read_json(&options.report_path)?;
    let page_store = PageStore::open(&options.input_dir)?;

    info!(
        "migrating critical content: {} of {} pages in phase 1",
        plan.phase1_critical.pages.len(),
        report.summary.total_pages
    );

    let mut summary = MigrationSummary::default();
    for selection in select_phase1(&plan.phase1_critical.pages) {
        match migrate_page(&page_store, selection.page, &selection.file_name, &options.output_dir, rules) {
            Ok(path) => summary.written.push(path),
            Err(error) => {
                let message = format!("Error migrating {}: {}", selection.page.title, error);
                warn!("{}", message);
                summary.errors.push(message);
            }
        }
    }

    info!("migration complete: {} pages written", summary.written.len());
    if !summary.errors.is_empty() {
        warn!(
            "{} errors encountered, see {}",
            summary.errors.len(),
            options.errors_path.display()
        );
        store::write_text(&options.errors_path, &summary.errors.join("\n"))?;
    }

    Ok(summary)
}

/// Pick the phase-1 pages to migrate, in migration order
pub fn select_phase1(pages: &[PageAnalysis]) -> Vec<Selection<'_>> {
    let mut getting_started = Vec::new();
    let mut etransfer = Vec::new();
    let mut digital_cheque = Vec::new();
    let mut api_reference = Vec::new();

    for page in pages {
        if page.slug.contains("getting-started") {
            getting_started.push(page);
        } else if page.has_tag("e-transfer") {
            etransfer.push(page);
        } else if page.has_tag("digital-cheque") {
            digital_cheque.push(page);
        } else if page.slug.contains("reference/api") {
            api_reference.push(page);
        }
    }

    let mut selections = Vec::new();

    if let Some(page) = main_page(&getting_started, MAIN_GETTING_STARTED_SLUG) {
        selections.push(Selection {
            page,
            file_name: "getting-started.mdx".to_string(),
        });
    }

    selections.extend(
        etransfer
            .iter()
            .filter(|page| ETRANSFER_SLUGS.iter().any(|s| page.slug.contains(s)))
            .take(ETRANSFER_LIMIT)
            .map(|page| Selection {
                page,
                file_name: generate_file_name(&page.title, "etransfer"),
            }),
    );

    selections.extend(
        digital_cheque
            .iter()
            .filter(|page| DIGITAL_CHEQUE_SLUGS.iter().any(|s| page.slug.contains(s)))
            .take(DIGITAL_CHEQUE_LIMIT)
            .map(|page| Selection {
                page,
                file_name: generate_file_name(&page.title, "digital-cheque"),
            }),
    );

    if let Some(page) = main_page(&api_reference, MAIN_API_REFERENCE_SLUG) {
        selections.push(Selection {
            page,
            file_name: "api-reference.mdx".to_string(),
        });
    }

    selections
}

/// The page with exactly `slug`, else the first page of the group
fn main_page<'a>(group: &[&'a PageAnalysis], slug: &str) -> Option<&'a PageAnalysis> {
    group
        .iter()
        .find(|page| page.slug == slug)
        .or_else(|| group.first())
        .copied()
}

/// Derive an `.mdx` file name from a page title
///
/// Lowercases the title, drops everything but ASCII letters, digits,
/// whitespace and `-`, turns whitespace runs into `-`, squeezes repeated `-`
/// and trims them from both ends. The category is prefixed unless the name
/// already contains it.
///
/// ```rust
/// use docs_mdx_migrator::migrate::generate_file_name;
///
/// assert_eq!(
///     generate_file_name("Interac e-Transfer® Payout", "etransfer"),
///     "etransfer-interac-e-transfer-payout.mdx"
/// );
/// assert_eq!(generate_file_name("Digital Cheque: Overview", "digital-cheque"), "digital-cheque-overview.mdx");
/// ```
pub fn generate_file_name(title: &str, category: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut name = String::with_capacity(kept.len());
    for c in kept.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && name.ends_with('-') {
            continue;
        }
        name.push(c);
    }
    let name = name.trim_matches('-');

    if name.contains(category) {
        format!("{}.mdx", name)
    } else {
        format!("{}-{}.mdx", category, name)
    }
}

/// Convert one page and write it under `output_dir`
fn migrate_page(
    page_store: &PageStore,
    page: &PageAnalysis,
    file_name: &str,
    output_dir: &Path,
    rules: &RuleSet,
) -> Result<PathBuf, MigrationError> {
    info!("converting {} -> {}", page.title, file_name);

    let data_file = page_store
        .find_data_file(&page.url)
        .ok_or_else(|| MigrationError::MissingFile(format!("data file for {}", page.url)))?;
    let record = page_store.load(&data_file)?;
    let document = ConvertedDocument::from_page(&record, rules);

    let path = output_dir.join(file_name);
    store::write_text(&path, &document.render())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ContentType, Priority};

    fn page(title: &str, slug: &str, tags: &[&str]) -> PageAnalysis {
        PageAnalysis {
            title: title.to_string(),
            url: format!("https://docs.payper.ca/{}", slug),
            slug: slug.to_string(),
            word_count: 1,
            has_code_examples: false,
            has_api_examples: false,
            has_interactive_elements: false,
            navigation_path: String::new(),
            content_type: ContentType::Guide,
            priority: Priority::High,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_generate_file_name() {
        assert_eq!(generate_file_name("Getting Started", "guide"), "guide-getting-started.mdx");
        assert_eq!(
            generate_file_name("  e-Transfer -- Standard  ", "etransfer"),
            "etransfer-e-transfer-standard.mdx"
        );
        assert_eq!(
            generate_file_name("Digital Cheque Transaction", "digital"),
            "digital-cheque-transaction.mdx"
        );
        assert_eq!(generate_file_name("!!!", "api"), "api-.mdx");
    }

    #[test]
    fn test_select_phase1() {
        let pages = vec![
            page("Getting Started Intro", "docs/getting-started#intro", &[]),
            page("Getting Started", "docs/getting-started", &[]),
            page("e-Transfer Payment", "docs/e-transfer-payment", &["e-transfer"]),
            page("e-Transfer Overview", "docs/e-transfer", &["e-transfer"]),
            page("e-Transfer Payout", "docs/e-transfer-payout", &["e-transfer"]),
            page("e-Transfer Standard", "docs/e-transfer-standard", &["e-transfer"]),
            page("e-Transfer Payment v2", "docs/e-transfer-payment-v2", &["e-transfer"]),
            page("Digital Cheque", "docs/digital-cheque", &["digital-cheque"]),
            page("Direct Debit", "docs/directdebit-2", &["digital-cheque"]),
            page("Digital Cheque Transaction", "docs/digital-cheque-transaction", &["digital-cheque"]),
            page("API Reference", "reference/api", &["api"]),
        ];

        let selections = select_phase1(&pages);
        assert_eq!(selections[0].page.slug, "docs/getting-started");

        let names: Vec<&str> = selections.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "getting-started.mdx",
                "etransfer-e-transfer-payment.mdx",
                "etransfer-e-transfer-payout.mdx",
                "etransfer-e-transfer-standard.mdx",
                "digital-cheque.mdx",
                "digital-cheque-direct-debit.mdx",
                "api-reference.mdx",
            ]
        );
    }

    #[test]
    fn test_select_phase1_falls_back_to_first_page() {
        let pages = vec![
            page("Getting Started Checklist", "guides/getting-started-checklist", &[]),
            page("API Keys", "reference/api-keys", &[]),
        ];
        let selections = select_phase1(&pages);
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].page.slug, "guides/getting-started-checklist");
        assert_eq!(selections[1].file_name, "api-reference.mdx");
        assert!(select_phase1(&[]).is_empty());
    }
}
