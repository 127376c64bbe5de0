use crate::store::TopicStore;
use crate::types::{Result, Topic, TopicStatus};
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

const DEVTOOLS: &[&str] = &[
    "VS Code",
    "JetBrains Fleet",
    "Neovim",
    "Cursor IDE",
    "Zed editor",
    "GitHub Copilot CLI",
    "Sublime Text",
    "Helix editor",
    "Lapce",
    "Nova by Panic",
];

const AUDIENCES: &[&str] = &[
    "full-stack developers",
    "Python backend engineers",
    "Rust developers",
    "data scientists",
    "DevOps engineers",
    "mobile developers",
    "frontend React developers",
];

const COMPAT_TECH: &[&str] = &[
    "Docker",
    "Podman",
    "PyTorch",
    "TensorFlow",
    "PostgreSQL",
    "MySQL 8",
    "Redis 7",
    "MongoDB 7",
    "Elasticsearch 8",
    "Node.js 22",
    "Bun runtime",
    "Deno 2",
    ".NET 9",
    "Go 1.23",
];

const COMPAT_ENV: &[&str] = &[
    "on Windows 11 ARM",
    "on Apple Silicon M3",
    "with WSL2 GPU passthrough",
    "with ROCm on AMD GPUs",
    "with CUDA 12.4",
    "on Raspberry Pi 5",
    "inside GitHub Codespaces",
    "on NixOS",
    "with Prisma ORM",
    "with Docker Compose v2",
    "with Kubernetes 1.30",
];

const FOREIGN_NEWS_HOOKS: &[&str] = &[
    "Japan dev community reaction",
    "Chinese open source ecosystem",
    "Tokyo startups using",
    "Shanghai AI labs testing",
    "CN cloud provider partnership",
    "Korean fintech engineering",
    "Shenzhen hardware-software integration",
    "Japanese enterprise Rust adoption",
    "Alibaba Cloud open source push",
    "ByteDance internal tooling",
];

const HOWTO_SEEDS: &[&str] = &[
    "set up a CI/CD pipeline with GitHub Actions",
    "deploy a Python app to Railway from scratch",
    "configure Nginx reverse proxy with SSL",
    "set up PostgreSQL replication for high availability",
    "migrate from Heroku to self-hosted Docker",
    "monitor a Node.js app with Prometheus and Grafana",
    "set up Tailscale VPN for a dev team",
    "containerise a legacy Django app",
    "configure VS Code remote development over SSH",
    "automate database backups with cron and S3",
    "set up a monorepo with Turborepo",
    "deploy a static site with Cloudflare Pages",
    "configure ESLint and Prettier for a team",
    "set up Python type checking with mypy in CI",
    "build a CLI tool with Python and Click",
];

fn id_fragment(text: &str) -> String {
    text.replace([' ', '.', '/'], "").to_lowercase()
}

/// Heuristic keyword discovery. Combines curated seed terms into long-tail
/// phrases (devtools comparisons, compatibility guides, foreign tech news
/// adaptations, how-to tutorials) with no network calls. The pool is finite:
/// once every combination has been drafted the stage goes idle, which is
/// logged loudly rather than treated as normal.
pub struct DiscoveryAgent {
    store: TopicStore,
    max_selected: usize,
}

impl DiscoveryAgent {
    pub fn new(data_dir: &Path, max_selected: usize) -> Self {
        Self {
            store: TopicStore::new(data_dir),
            max_selected,
        }
    }

    /// Produce the full candidate set. Deterministic ids keep the store
    /// deduplicated across runs.
    pub fn generate_candidates(&self) -> Vec<Topic> {
        let now = Utc::now();
        let mut topics = Vec::new();

        // Devtools comparisons: ordered pairs so "A vs B" never duplicates
        // "B vs A", crossed with each audience.
        for a in DEVTOOLS {
            for b in DEVTOOLS {
                if a >= b {
                    continue;
                }
                for audience in AUDIENCES {
                    topics.push(Topic {
                        id: format!(
                            "devtools-{}-{}-{}",
                            id_fragment(a),
                            id_fragment(b),
                            id_fragment(audience)
                        ),
                        keyword: format!("{} vs {} for {}", a, b, audience),
                        category: "devtools_comparison".to_string(),
                        intent: "Evaluate which tool to adopt for a specific workflow."
                            .to_string(),
                        difficulty_score: 0.35,
                        source: "heuristic-devtools".to_string(),
                        created_at: now,
                        status: TopicStatus::New,
                    });
                }
            }
        }

        // Micro-niche compatibility: technology crossed with environment.
        for tech in COMPAT_TECH {
            for env in COMPAT_ENV {
                topics.push(Topic {
                    id: format!("compat-{}-{}", id_fragment(tech), id_fragment(env)),
                    keyword: format!("{} {} compatibility guide", tech, env),
                    category: "compatibility".to_string(),
                    intent: "Understand whether a stack combination is safe and supported."
                        .to_string(),
                    difficulty_score: 0.28,
                    source: "heuristic-compatibility".to_string(),
                    created_at: now,
                    status: TopicStatus::New,
                });
            }
        }

        for hook in FOREIGN_NEWS_HOOKS {
            topics.push(Topic {
                id: format!("news-{}", id_fragment(hook)),
                keyword: format!("{} for global engineers (translated summary)", hook),
                category: "foreign_news".to_string(),
                intent: "Learn what is happening in JP/CN tech ecosystems.".to_string(),
                difficulty_score: 0.32,
                source: "heuristic-foreign-news".to_string(),
                created_at: now,
                status: TopicStatus::New,
            });
        }

        for seed in HOWTO_SEEDS {
            let fragment: String = seed.replace(' ', "-").to_lowercase().chars().take(60).collect();
            topics.push(Topic {
                id: format!("howto-{}", fragment),
                keyword: format!("How to {} (step-by-step guide)", seed),
                category: "tutorial".to_string(),
                intent: "Follow a practical, step-by-step guide to accomplish a specific task."
                    .to_string(),
                difficulty_score: 0.30,
                source: "heuristic-howto".to_string(),
                created_at: now,
                status: TopicStatus::New,
            });
        }

        topics
    }

    /// One discovery pass: merge new candidates into the store, mark up to
    /// `max_selected` of the easiest available topics as selected, persist,
    /// and return the selection. An empty selection is a normal outcome, not
    /// an error.
    pub fn run(&self) -> Result<Vec<Topic>> {
        let mut topics = self.store.load();
        let before = topics.len();

        let added = TopicStore::merge_candidates(&mut topics, self.generate_candidates());
        info!("Discovery: {} existing topics, {} new candidates added", before, added);

        let mut available: Vec<usize> = topics
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status.is_available())
            .map(|(i, _)| i)
            .collect();

        if available.is_empty() {
            // Finite seed pool: every combination has been drafted or
            // published. The pipeline stays idle until new seeds ship.
            warn!(
                "Discovery: topic pool exhausted ({} topics, none available); \
                 runs will publish nothing until new seed lists are added",
                topics.len()
            );
            self.store.save(&topics)?;
            return Ok(Vec::new());
        }

        available.sort_by(|&a, &b| {
            topics[a]
                .difficulty_score
                .partial_cmp(&topics[b].difficulty_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        available.truncate(self.max_selected);

        let selected_ids: HashSet<String> =
            available.iter().map(|&i| topics[i].id.clone()).collect();
        for topic in topics.iter_mut().filter(|t| selected_ids.contains(&t.id)) {
            topic.status = TopicStatus::Selected;
        }

        self.store.save(&topics)?;

        let selection: Vec<Topic> = topics
            .iter()
            .filter(|t| selected_ids.contains(&t.id))
            .cloned()
            .collect();
        info!("Discovery: selected {} topics for drafting", selection.len());
        Ok(selection)
    }
}
