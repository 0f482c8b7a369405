//! Per-page processing
//!
//! Runs one page record through classification and conversion. Failures are
//! values: a batch keeps going after a bad page and reports it alongside the
//! pages that succeeded.

use log::{debug, info, warn};

use crate::classifier::ContentClassifier;
use crate::document::ConvertedDocument;
use crate::error::MigrationError;
use crate::page::{PageAnalysis, PageRecord};
use crate::rules::RuleSet;

/// Classification and converted document for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPage {
    pub analysis: PageAnalysis,
    pub document: ConvertedDocument,
}

/// A page that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// Page URL, the page title when the record has no URL, or the file path
    /// of an unreadable record
    pub source: String,
    pub error: MigrationError,
}

/// Result of processing a batch of pages
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successful pages in input order
    pub pages: Vec<ProcessedPage>,
    /// Failed pages in input order
    pub errors: Vec<PageFailure>,
}

impl BatchOutcome {
    /// Analyses of the successful pages, in input order
    pub fn analyses(&self) -> Vec<PageAnalysis> {
        self.pages.iter().map(|page| page.analysis.clone()).collect()
    }
}

/// Classify and convert a single page
///
/// # Errors
///
/// Returns `MigrationError::InvalidInput` for a record without a URL.
pub fn process_page(page: &PageRecord, rules: &RuleSet) -> Result<ProcessedPage, MigrationError> {
    if page.url.trim().is_empty() {
        return Err(MigrationError::InvalidInput(format!(
            "page {:?} has no URL",
            page.title
        )));
    }

    let analysis = ContentClassifier::with_rules(rules).classify(page);
    let document = ConvertedDocument::from_page(page, rules);
    debug!(
        "processed {} ({}, {}, {} words)",
        analysis.slug, analysis.content_type, analysis.priority, analysis.word_count
    );

    Ok(ProcessedPage { analysis, document })
}

/// Process every page, collecting failures instead of stopping
pub fn process_batch(pages: &[PageRecord], rules: &RuleSet) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for page in pages {
        match process_page(page, rules) {
            Ok(processed) => outcome.pages.push(processed),
            Err(error) => {
                warn!("skipping page {:?}: {}", page.title, error);
                let source = if page.url.trim().is_empty() {
                    page.title.clone()
                } else {
                    page.url.clone()
                };
                outcome.errors.push(PageFailure { source, error });
            }
        }
    }

    info!(
        "processed {} pages ({} failed)",
        outcome.pages.len(),
        outcome.errors.len()
    );
    outcome
}
