use crate::types::{PerformanceLog, Result, RunEntry, Topic, TopicStatus};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Whole-file JSON store for topic records. The file is read in full,
/// modified in memory, and rewritten in full; there is no partial-write or
/// multi-writer discipline, matching the single-invocation model.
pub struct TopicStore {
    path: PathBuf,
}

impl TopicStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("topics.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all topics. A missing or malformed file is treated as an empty
    /// store rather than an error, so one corrupted write cannot wedge the
    /// pipeline permanently.
    pub fn load(&self) -> Vec<Topic> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(topics) => topics,
            Err(e) => {
                warn!("Topic store at {:?} is malformed ({}), starting fresh", self.path, e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, topics: &[Topic]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(topics)?)?;
        Ok(())
    }

    /// Append candidates whose id is not already present. Existing records
    /// are never replaced; the store is append-only for new ids.
    pub fn merge_candidates(topics: &mut Vec<Topic>, candidates: Vec<Topic>) -> usize {
        let mut seen: HashSet<String> = topics.iter().map(|t| t.id.clone()).collect();
        let mut added = 0;
        for candidate in candidates {
            if seen.insert(candidate.id.clone()) {
                topics.push(candidate);
                added += 1;
            }
        }
        added
    }

    /// Advance the status of the given topics. Statuses only move forward;
    /// a regression attempt is ignored and logged.
    pub fn advance_status(&self, ids: &HashSet<String>, status: TopicStatus) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut topics = self.load();
        for topic in topics.iter_mut().filter(|t| ids.contains(&t.id)) {
            if topic.status > status {
                debug!(
                    "Refusing to regress topic {} from {:?} to {:?}",
                    topic.id, topic.status, status
                );
                continue;
            }
            topic.status = status;
        }
        self.save(&topics)
    }
}

/// Append-only run history, persisted alongside the topic store. Owned
/// exclusively by the orchestrator; stages never touch it.
pub struct RunHistory {
    path: PathBuf,
}

impl RunHistory {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("performance.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the log, substituting the default structure when the file is
    /// missing or corrupt.
    pub fn load(&self) -> PerformanceLog {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return PerformanceLog::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(log) => log,
            Err(e) => {
                warn!("Run history at {:?} is malformed ({}), starting fresh", self.path, e);
                PerformanceLog::default()
            }
        }
    }

    pub fn save(&self, log: &PerformanceLog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(log)?)?;
        Ok(())
    }

    /// Append one run entry and roll the aggregate counters forward. Past
    /// entries are never mutated.
    pub fn append_run(&self, entry: RunEntry, published_files: Vec<String>) -> Result<()> {
        let mut log = self.load();
        log.last_run = Some(entry.timestamp);
        log.articles_published += entry.published_articles as u64;
        log.errors.extend(entry.errors.iter().cloned());
        log.latest_published_files = published_files;
        log.runs.push(entry);
        self.save(&log)
    }
}
