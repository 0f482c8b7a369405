//! Documentation migration toolkit
//!
//! Analyzes pages scraped from a documentation site and converts them into
//! MDX documents for a new documentation platform.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `normalizer`: markup to plain text, word counts
//! - `classifier`: slug, signals, content type, priority and tags per page
//! - `parser`: HTML5 parsing using html5ever
//! - `converter`: MDX body generation from the DOM tree
//! - `callout`: wrapping marked paragraphs in callout components
//! - `document`: front matter and final MDX rendering
//! - `pipeline`: per-page processing with failures as values
//! - `report`: content analysis report and phased migration plan
//! - `store`: extracted-page directory and output files
//! - `migrate`: phase-1 migration of critical pages
//! - `rules`: the keyword tables that drive classification
//!
//! # Example
//!
//! ```rust
//! use docs_mdx_migrator::{PageRecord, RuleSet, process_page};
//!
//! let page = PageRecord::new(
//!     "Getting Started",
//!     "https://docs.payper.ca/docs/getting-started",
//!     "<h1>Welcome</h1><p>Note: read this first.</p>",
//! );
//! let processed = process_page(&page, &RuleSet::default()).unwrap();
//! assert_eq!(processed.analysis.slug, "docs/getting-started");
//! assert!(processed.document.body.contains("<Note>"));
//! ```

// Module declarations
pub mod callout;
pub mod classifier;
pub mod converter;
pub mod document;
pub mod error;
pub mod migrate;
pub mod normalizer;
pub mod page;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod store;

// Re-export main types for convenience
pub use classifier::ContentClassifier;
pub use converter::MdxConverter;
pub use document::ConvertedDocument;
pub use error::MigrationError;
pub use page::{ContentType, PageAnalysis, PageRecord, Priority};
pub use parser::parse_html;
pub use pipeline::{BatchOutcome, PageFailure, ProcessedPage, process_batch, process_page};
pub use report::{AnalysisReport, MigrationPlan, aggregate, plan_migration};
pub use rules::RuleSet;
