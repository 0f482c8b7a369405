//! Aggregate reports over classified pages
//!
//! Two read-only summaries are computed from a run's [`PageAnalysis`] list:
//!
//! - [`AnalysisReport`]: totals, per-category and per-content-type buckets,
//!   priority counts, most common tags, largest pages and likely duplicates
//! - [`MigrationPlan`]: pages grouped into three migration phases by priority,
//!   plus special considerations and overlap with guides that already exist
//!
//! Both are recomputed from scratch on every run and serialize to the JSON
//! files the migrator reads back.
//!
//! Phase page lists are ordered by word count, largest first, so the migrator
//! takes the most substantial pages of each group.
//!
//! `contentTypeBreakdown` has one bucket per [`ContentType`], always six.
//! There is no `tutorial` bucket: pages titled as tutorials count as `guide`.

use log::info;
use serde::{Deserialize, Serialize};

use crate::page::{ContentType, PageAnalysis, Priority};
use crate::rules::RuleSet;

/// Recommendation attached to every existing-guide overlap
pub const OVERLAP_RECOMMENDATION: &str = "merge-or-enhance";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_pages: usize,
    pub total_word_count: usize,
    /// Rounded; 0 when there are no pages
    pub average_word_count: usize,
    pub pages_with_code: usize,
    pub pages_with_api_examples: usize,
    pub pages_with_interactivity: usize,
}

/// Page reference listed under a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPage {
    pub title: String,
    pub slug: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub category: String,
    pub count: usize,
    pub pages: Vec<CategoryPage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeBucket {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub count: usize,
    /// Rounded; 0 for an empty bucket
    pub avg_word_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestPage {
    pub title: String,
    pub word_count: usize,
    pub slug: String,
}

/// Two pages whose titles collide after lowercasing and trimming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    /// The normalized title
    pub title: String,
    /// First page with the title, then the colliding page
    pub pages: Vec<PageAnalysis>,
}

/// Content analysis report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: Summary,
    pub category_breakdown: Vec<CategoryBucket>,
    pub content_type_breakdown: Vec<ContentTypeBucket>,
    pub priority_breakdown: PriorityBreakdown,
    pub top_tags: Vec<TagCount>,
    pub largest_pages: Vec<LargestPage>,
    pub duplicate_candidates: Vec<DuplicateCandidate>,
}

/// One migration phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub description: String,
    pub pages: Vec<PageAnalysis>,
    pub estimated_effort: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialConsiderations {
    pub api_endpoints: usize,
    pub interactive_pages: usize,
    pub image_heavy_pages: usize,
}

/// Extracted page that covers the same ground as an existing guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    /// Existing guide slug
    pub existing: String,
    /// Title of the extracted page
    pub extracted: String,
    pub recommendation: String,
}

/// Phased migration plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub phase1_critical: Phase,
    pub phase2_core: Phase,
    pub phase3_comprehensive: Phase,
    #[serde(rename = "specialConsiderations")]
    pub special_considerations: SpecialConsiderations,
    #[serde(rename = "existingContentOverlap")]
    pub existing_content_overlap: Vec<Overlap>,
}

/// Fold page analyses into a content analysis report
pub fn aggregate(analyses: &[PageAnalysis], rules: &RuleSet) -> AnalysisReport {
    let total_word_count: usize = analyses.iter().map(|a| a.word_count).sum();

    let summary = Summary {
        total_pages: analyses.len(),
        total_word_count,
        average_word_count: rounded_average(total_word_count, analyses.len()),
        pages_with_code: analyses.iter().filter(|a| a.has_code_examples).count(),
        pages_with_api_examples: analyses.iter().filter(|a| a.has_api_examples).count(),
        pages_with_interactivity: analyses.iter().filter(|a| a.has_interactive_elements).count(),
    };

    let mut categories: Vec<CategoryBucket> = rules
        .category_names()
        .into_iter()
        .map(|name| CategoryBucket {
            category: name.to_string(),
            count: 0,
            pages: Vec::new(),
        })
        .collect();
    for analysis in analyses {
        let name = rules.category(&analysis.slug, &analysis.tags);
        if let Some(bucket) = categories.iter_mut().find(|b| b.category == name) {
            bucket.count += 1;
            bucket.pages.push(CategoryPage {
                title: analysis.title.clone(),
                slug: analysis.slug.clone(),
                priority: analysis.priority,
            });
        }
    }

    let content_type_breakdown = ContentType::ALL
        .iter()
        .map(|&content_type| {
            let (count, words) = analyses
                .iter()
                .filter(|a| a.content_type == content_type)
                .fold((0, 0), |(count, words), a| (count + 1, words + a.word_count));
            ContentTypeBucket {
                content_type,
                count,
                avg_word_count: rounded_average(words, count),
            }
        })
        .collect();

    let mut priority_breakdown = PriorityBreakdown::default();
    for analysis in analyses {
        match analysis.priority {
            Priority::High => priority_breakdown.high += 1,
            Priority::Medium => priority_breakdown.medium += 1,
            Priority::Low => priority_breakdown.low += 1,
        }
    }

    AnalysisReport {
        summary,
        category_breakdown: categories,
        content_type_breakdown,
        priority_breakdown,
        top_tags: top_tags(analyses, rules.top_n),
        largest_pages: largest_pages(analyses, rules.top_n),
        duplicate_candidates: duplicate_candidates(analyses),
    }
}

/// Split page analyses into migration phases
///
/// Each phase lists its pages by word count, largest first; equal counts keep
/// input order.
pub fn plan_migration(analyses: &[PageAnalysis], rules: &RuleSet) -> MigrationPlan {
    let phase = |priority: Priority, description: &str, effort: &str| {
        let mut pages: Vec<PageAnalysis> = analyses
            .iter()
            .filter(|a| a.priority == priority)
            .cloned()
            .collect();
        pages.sort_by(|a, b| b.word_count.cmp(&a.word_count));
        Phase {
            description: description.to_string(),
            pages,
            estimated_effort: effort.to_string(),
        }
    };

    MigrationPlan {
        phase1_critical: phase(
            Priority::High,
            "Essential content that users need immediately",
            "1-2 weeks",
        ),
        phase2_core: phase(
            Priority::Medium,
            "Important guides and documentation",
            "2-3 weeks",
        ),
        phase3_comprehensive: phase(
            Priority::Low,
            "Complete documentation coverage",
            "1-2 weeks",
        ),
        special_considerations: SpecialConsiderations {
            api_endpoints: analyses
                .iter()
                .filter(|a| a.content_type == ContentType::ApiEndpoint)
                .count(),
            interactive_pages: analyses.iter().filter(|a| a.has_interactive_elements).count(),
            image_heavy_pages: analyses
                .iter()
                .filter(|a| a.images.len() > rules.image_heavy_threshold)
                .count(),
        },
        existing_content_overlap: existing_overlap(analyses, &rules.existing_guides),
    }
}

impl AnalysisReport {
    /// Log the headline numbers
    pub fn log_summary(&self) {
        info!(
            "{} pages, {} words ({} per page), {} with code, {} with API examples",
            self.summary.total_pages,
            self.summary.total_word_count,
            self.summary.average_word_count,
            self.summary.pages_with_code,
            self.summary.pages_with_api_examples
        );
        for bucket in &self.category_breakdown {
            info!("category {}: {} pages", bucket.category, bucket.count);
        }
        info!(
            "priority: {} high, {} medium, {} low",
            self.priority_breakdown.high, self.priority_breakdown.medium, self.priority_breakdown.low
        );
    }
}

impl MigrationPlan {
    /// Log the phase sizes and special considerations
    pub fn log_summary(&self) {
        info!(
            "plan: phase 1 {} pages, phase 2 {} pages, phase 3 {} pages",
            self.phase1_critical.pages.len(),
            self.phase2_core.pages.len(),
            self.phase3_comprehensive.pages.len()
        );
        info!(
            "special considerations: {} API endpoints, {} interactive, {} image heavy",
            self.special_considerations.api_endpoints,
            self.special_considerations.interactive_pages,
            self.special_considerations.image_heavy_pages
        );
    }
}

/// Rounded mean, 0 for an empty set
fn rounded_average(total: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as usize
}

/// Most frequent tags, count descending, ties in first-encounter order
fn top_tags(analyses: &[PageAnalysis], limit: usize) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    for tag in analyses.iter().flat_map(|a| a.tags.iter()) {
        match counts.iter_mut().find(|c| &c.tag == tag) {
            Some(entry) => entry.count += 1,
            None => counts.push(TagCount {
                tag: tag.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Largest pages by word count; equal counts keep input order
fn largest_pages(analyses: &[PageAnalysis], limit: usize) -> Vec<LargestPage> {
    let mut sorted: Vec<&PageAnalysis> = analyses.iter().collect();
    sorted.sort_by(|a, b| b.word_count.cmp(&a.word_count));
    sorted
        .into_iter()
        .take(limit)
        .map(|a| LargestPage {
            title: a.title.clone(),
            word_count: a.word_count,
            slug: a.slug.clone(),
        })
        .collect()
}

/// Every later page whose normalized title matches an earlier one
fn duplicate_candidates(analyses: &[PageAnalysis]) -> Vec<DuplicateCandidate> {
    let mut first_seen: Vec<(String, &PageAnalysis)> = Vec::new();
    let mut candidates = Vec::new();

    for analysis in analyses {
        let title = analysis.title.to_lowercase().trim().to_string();
        match first_seen.iter().find(|(seen, _)| *seen == title) {
            Some((_, first)) => candidates.push(DuplicateCandidate {
                title,
                pages: vec![(*first).clone(), analysis.clone()],
            }),
            None => first_seen.push((title, analysis)),
        }
    }

    candidates
}

/// Pairs of existing guide and extracted page covering the same topic
///
/// A page overlaps a guide when its slug contains the guide slug, or its
/// title contains the guide slug with the first `-` read as a space.
fn existing_overlap(analyses: &[PageAnalysis], existing_guides: &[String]) -> Vec<Overlap> {
    let mut overlaps = Vec::new();
    for analysis in analyses {
        let slug = analysis.slug.to_lowercase();
        let title = analysis.title.to_lowercase();
        for guide in existing_guides {
            if slug.contains(guide.as_str()) || title.contains(&guide.replacen('-', " ", 1)) {
                overlaps.push(Overlap {
                    existing: guide.clone(),
                    extracted: analysis.title.clone(),
                    recommendation: OVERLAP_RECOMMENDATION.to_string(),
                });
            }
        }
    }
    overlaps
}
