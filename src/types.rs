use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a topic. Statuses only move forward; the store refuses to
/// regress a topic within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    New,
    Selected,
    Drafted,
    Published,
}

impl TopicStatus {
    /// Whether a topic in this status may still be picked up by discovery.
    /// `selected` stays eligible so a topic picked in a run that later failed
    /// is not stranded.
    pub fn is_available(self) -> bool {
        matches!(self, TopicStatus::New | TopicStatus::Selected)
    }
}

/// A unit of subject matter with a lifecycle status; the seed for one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub keyword: String,
    pub category: String,
    pub intent: String,
    pub difficulty_score: f64,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub status: TopicStatus,
}

/// In-memory candidate article produced by the drafting stage. Never
/// persisted unless it passes validation and is published.
#[derive(Debug, Clone)]
pub struct DraftArticle {
    pub topic_id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Started,
    Success,
    Failed,
}

/// Append-only log entry summarizing one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: RunStatus,
    pub generated_topics: usize,
    pub generated_articles: usize,
    pub published_articles: usize,
    pub errors: Vec<String>,
}

impl RunEntry {
    pub fn started() -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            status: RunStatus::Started,
            generated_topics: 0,
            generated_articles: 0,
            published_articles: 0,
            errors: Vec::new(),
        }
    }
}

/// On-disk run history plus rolling publication counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceLog {
    pub runs: Vec<RunEntry>,
    pub articles_published: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub errors: Vec<String>,
    #[serde(default)]
    pub latest_published_files: Vec<String>,
}

impl Default for PerformanceLog {
    fn default() -> Self {
        Self {
            runs: Vec::new(),
            articles_published: 0,
            last_run: None,
            errors: Vec::new(),
            latest_published_files: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FoundryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, FoundryError>;
