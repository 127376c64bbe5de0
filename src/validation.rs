use crate::types::DraftArticle;
use crate::utils::word_count;
use std::fmt;
use tracing::{info, warn};

/// Phrases that mark a draft as obviously machine-written.
const SYNTHETIC_PHRASES: &[&str] = &[
    "as an ai language model",
    "in conclusion, in conclusion",
    "lorem ipsum",
];

/// Headings that receive an inline annotation marker when a draft is
/// approved. Markers are cues for later manual curation, not external links.
const ANNOTATED_HEADINGS: &[(&str, &str)] = &[
    ("## Core concepts and mental models", "[internal notes]"),
    ("## Implementation guidelines and failure modes", "[field experience]"),
];

const CONTEXT_NOTE: &str = "From a practical standpoint, treat this guide as a set of \
guardrails rather than a script. You are encouraged to adapt the examples to the \
constraints of your own organisation, regulatory environment, and risk appetite.";

/// Why a draft was rejected. Rejection is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    TooShort { words: usize, min: usize },
    MissingStructure,
    MachineLike,
    KeywordStuffing { count: usize, max: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooShort { words, min } => {
                write!(f, "content too short ({} words, minimum {})", words, min)
            }
            RejectReason::MissingStructure => {
                write!(f, "missing structural sections (H2/table/FAQ)")
            }
            RejectReason::MachineLike => {
                write!(f, "content appears machine-like from simple heuristics")
            }
            RejectReason::KeywordStuffing { count, max } => {
                write!(f, "potential keyword stuffing ({} occurrences, maximum {})", count, max)
            }
        }
    }
}

/// Outcome of validating a single draft: either the enriched draft, or the
/// reasons it was turned away. The topic stays `drafted` on rejection so it
/// can be reattempted or inspected.
#[derive(Debug, Clone)]
pub enum Verdict {
    Approved(DraftArticle),
    Rejected {
        topic_id: String,
        reasons: Vec<RejectReason>,
    },
}

/// Validation stage: independent quality predicates plus enrichment of the
/// drafts that pass. No network calls.
pub struct ValidationAgent {
    min_words: usize,
    keyword_max_repeats: usize,
}

impl ValidationAgent {
    pub fn new(min_words: usize, keyword_max_repeats: usize) -> Self {
        Self {
            min_words,
            keyword_max_repeats,
        }
    }

    fn has_required_structure(content: &str) -> bool {
        let has_h2 = content.contains("## ");
        let has_faq = content.contains("## Frequently asked questions");
        let has_table = content.contains('|') && content.contains("---");
        has_h2 && has_faq && has_table
    }

    fn looks_human_like(content: &str) -> bool {
        let lower = content.to_lowercase();
        !SYNTHETIC_PHRASES.iter().any(|p| lower.contains(p))
    }

    fn keyword_occurrences(content: &str, keyword: &str) -> usize {
        if keyword.trim().is_empty() {
            return 0;
        }
        content
            .to_lowercase()
            .matches(&keyword.to_lowercase())
            .count()
    }

    /// Evaluate every predicate; all must pass for approval.
    pub fn validate(&self, draft: &DraftArticle) -> Vec<RejectReason> {
        let mut reasons = Vec::new();

        let words = word_count(&draft.content);
        if words < self.min_words {
            reasons.push(RejectReason::TooShort {
                words,
                min: self.min_words,
            });
        }

        if !Self::has_required_structure(&draft.content) {
            reasons.push(RejectReason::MissingStructure);
        }

        if !Self::looks_human_like(&draft.content) {
            reasons.push(RejectReason::MachineLike);
        }

        let count = Self::keyword_occurrences(&draft.content, &draft.title);
        if count > self.keyword_max_repeats {
            reasons.push(RejectReason::KeywordStuffing {
                count,
                max: self.keyword_max_repeats,
            });
        }

        reasons
    }

    /// Append annotation markers to known headings. Idempotent: a heading
    /// that already carries its marker is left alone, so re-running
    /// enrichment never stacks markers.
    fn add_inline_annotations(content: &str) -> String {
        let mut content = content.to_string();
        for (heading, marker) in ANNOTATED_HEADINGS {
            let annotated = format!("{} {}", heading, marker);
            if !content.contains(&annotated) {
                content = content.replace(heading, &annotated);
            }
        }
        content
    }

    /// Insert one contextual paragraph near the top, once.
    fn enrich_context(content: &str) -> String {
        if content.contains(CONTEXT_NOTE) {
            return content.to_string();
        }
        let mut paragraphs: Vec<&str> = content.split("\n\n").collect();
        if paragraphs.len() < 2 {
            return content.to_string();
        }
        paragraphs.insert(2, CONTEXT_NOTE);
        paragraphs.join("\n\n")
    }

    /// Full enrichment transform applied to approved drafts. Applying it to
    /// already-enriched text produces identical output.
    pub fn enrich(content: &str) -> String {
        Self::enrich_context(&Self::add_inline_annotations(content))
    }

    pub fn assess(&self, draft: DraftArticle) -> Verdict {
        let reasons = self.validate(&draft);
        if reasons.is_empty() {
            let enriched = Self::enrich(&draft.content);
            let word_count = word_count(&enriched);
            Verdict::Approved(DraftArticle {
                content: enriched,
                word_count,
                ..draft
            })
        } else {
            Verdict::Rejected {
                topic_id: draft.topic_id,
                reasons,
            }
        }
    }

    /// Validate a batch; rejections are logged and dropped, approvals are
    /// enriched and returned.
    pub fn run(&self, drafts: Vec<DraftArticle>) -> Vec<DraftArticle> {
        let total = drafts.len();
        let mut approved = Vec::new();
        for draft in drafts {
            match self.assess(draft) {
                Verdict::Approved(draft) => approved.push(draft),
                Verdict::Rejected { topic_id, reasons } => {
                    let summary: Vec<String> = reasons.iter().map(|r| r.to_string()).collect();
                    warn!("Rejected draft for topic {}: {}", topic_id, summary.join("; "));
                }
            }
        }
        info!("Validation: approved {}/{} drafts", approved.len(), total);
        approved
    }
}
