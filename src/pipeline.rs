use crate::config::PipelineConfig;
use crate::content::ContentAgent;
use crate::discovery::DiscoveryAgent;
use crate::distribution::DistributionAgent;
use crate::generator::{generator_for, TemplateGenerator};
use crate::store::{RunHistory, TopicStore};
use crate::types::{Result, RunEntry, RunStatus, TopicStatus};
use crate::validation::ValidationAgent;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

const SEED_INDEX_HTML: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
\x20 <meta charset=\"utf-8\" />\n\
\x20 <title>Technical Knowledge Base</title>\n\
\x20 <link rel=\"stylesheet\" href=\"assets/style.css\" />\n\
</head>\n\
<body>\n\
\x20 <h1>Technical Knowledge Base</h1>\n\
\x20 <p>In-depth technical guides and compatibility documentation.</p>\n\
\x20 <ul>\n\
\x20   <li>No articles have been published yet. Check back tomorrow.</li>\n\
\x20 </ul>\n\
</body>\n\
</html>\n";

const SEED_STYLESHEET: &str = "body { font-family: system-ui, -apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; line-height: 1.6; }\n\
a { color: #0366d6; text-decoration: none; }\n\
a:hover { text-decoration: underline; }\n\
h1, h2, h3 { line-height: 1.25; }\n";

/// On-disk layout of the generated site, rooted at one directory.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub articles_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl SitePaths {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            data_dir: root.join("data"),
            articles_dir: root.join("articles"),
            assets_dir: root.join("assets"),
        }
    }
}

/// Orchestrator: runs the stages in order exactly once, with per-topic
/// failure isolation inside the stages and a single catch-all boundary here.
/// Every invocation appends a run entry, success or not; a stage failure
/// marks the run `failed` but never escapes as a panic or process error.
pub struct Pipeline {
    paths: SitePaths,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(root: &Path, config: PipelineConfig) -> Self {
        Self {
            paths: SitePaths::new(root),
            config,
        }
    }

    fn ensure_initial_files(&self) -> Result<()> {
        fs::create_dir_all(&self.paths.data_dir)?;
        fs::create_dir_all(&self.paths.articles_dir)?;
        fs::create_dir_all(&self.paths.assets_dir)?;

        let topics_file = self.paths.data_dir.join("topics.json");
        if !topics_file.exists() {
            fs::write(&topics_file, "[]")?;
        }

        let history = RunHistory::new(&self.paths.data_dir);
        if !history.path().exists() {
            history.save(&Default::default())?;
        }

        let index_file = self.paths.root.join("index.html");
        if !index_file.exists() {
            fs::write(&index_file, SEED_INDEX_HTML)?;
        }

        let style_file = self.paths.assets_dir.join("style.css");
        if !style_file.exists() {
            fs::write(&style_file, SEED_STYLESHEET)?;
        }
        Ok(())
    }

    async fn execute(&self, run: &mut RunEntry, published_files: &mut Vec<String>) -> Result<()> {
        self.ensure_initial_files()?;
        let store = TopicStore::new(&self.paths.data_dir);

        info!("Starting discovery stage");
        let discovery = DiscoveryAgent::new(&self.paths.data_dir, self.config.max_selected);
        let selected = discovery.run()?;
        run.generated_topics = selected.len();

        info!("Starting drafting stage");
        let content = ContentAgent::new(
            generator_for(&self.config),
            TemplateGenerator::new(self.config.affiliate_slots.clone()),
            self.config.min_words,
        );
        let drafts = content.run(&selected).await;
        run.generated_articles = drafts.len();

        // Drafted topics are not re-selected on the next run.
        let drafted_ids: HashSet<String> = drafts.iter().map(|d| d.topic_id.clone()).collect();
        store.advance_status(&drafted_ids, TopicStatus::Drafted)?;

        info!("Starting validation stage");
        let validator =
            ValidationAgent::new(self.config.min_words, self.config.keyword_max_repeats);
        let approved = validator.run(drafts);

        info!("Starting publishing stage");
        let distribution = DistributionAgent::new(&self.paths.root, &self.config);
        let report = distribution.run(&approved)?;
        run.published_articles = report.published_topic_ids.len();
        run.errors.extend(report.errors);
        published_files.extend(
            report
                .published_paths
                .iter()
                .map(|p| p.display().to_string()),
        );

        // Only topics whose artifact actually landed advance to published.
        let published_ids: HashSet<String> = report.published_topic_ids.into_iter().collect();
        store.advance_status(&published_ids, TopicStatus::Published)?;

        Ok(())
    }

    /// One full pipeline pass. Always records a run entry; the returned
    /// entry's status tells the caller whether the run succeeded. The only
    /// error that propagates is a failure to write the run history itself.
    pub async fn run(&self) -> Result<RunEntry> {
        let mut run = RunEntry::started();
        let mut published_files = Vec::new();

        match self.execute(&mut run, &mut published_files).await {
            Ok(()) => {
                run.status = RunStatus::Success;
                info!(
                    "Pipeline completed: {} selected, {} drafted, {} published",
                    run.generated_topics, run.generated_articles, run.published_articles
                );
            }
            Err(e) => {
                run.status = RunStatus::Failed;
                run.errors.push(e.to_string());
                error!("Pipeline failed: {}", e);
            }
        }

        let history = RunHistory::new(&self.paths.data_dir);
        history.append_run(run.clone(), published_files)?;
        Ok(run)
    }
}
