use crate::types::{FoundryError, Result};
use std::env;
use tracing::warn;
use url::Url;

/// One affiliate name/URL pair rendered into the recommended-tools section
/// and substituted for the `{{AFFILIATE_TOOL_N}}` placeholders at publish
/// time.
#[derive(Debug, Clone)]
pub struct AffiliateSlot {
    pub name: String,
    pub url: String,
    pub desc: String,
}

/// Which article generator backs the drafting stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorBackend {
    /// Deterministic offline templates; the default, safe for CI.
    Template,
    /// Delegate to a local Ollama server, falling back to templates.
    Ollama,
}

/// Pipeline configuration. Everything is optional in the environment and has
/// a stated default; there is no global config singleton, the value is passed
/// into each stage that needs it.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub base_url: String,
    pub backend: GeneratorBackend,
    pub ollama_model: String,
    pub ollama_url: String,
    pub adsense_id: Option<String>,
    pub affiliate_slots: Vec<AffiliateSlot>,
    pub min_words: usize,
    pub max_selected: usize,
    pub keyword_max_repeats: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.github.io/content-foundry".to_string(),
            backend: GeneratorBackend::Template,
            ollama_model: "llama3".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            adsense_id: None,
            affiliate_slots: default_affiliate_slots(),
            min_words: 1200,
            max_selected: 5,
            keyword_max_repeats: 15,
        }
    }
}

fn default_affiliate_slots() -> Vec<AffiliateSlot> {
    vec![
        AffiliateSlot {
            name: "Cursor IDE".to_string(),
            url: "https://www.cursor.com".to_string(),
            desc: "AI-native code editor built on VS Code — autocomplete, inline chat, \
                   and codebase-aware suggestions out of the box"
                .to_string(),
        },
        AffiliateSlot {
            name: "Datadog".to_string(),
            url: "https://www.datadoghq.com".to_string(),
            desc: "unified observability platform for logs, metrics, and traces — free \
                   tier available for small teams"
                .to_string(),
        },
        AffiliateSlot {
            name: "Railway".to_string(),
            url: "https://railway.app".to_string(),
            desc: "deploy from a GitHub repo in seconds with built-in CI, databases, \
                   and cron — pay only for what you use"
                .to_string(),
        },
    ]
}

impl PipelineConfig {
    /// Build a configuration from `FOUNDRY_*` environment variables, keeping
    /// the defaults for anything unset or unparseable.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("FOUNDRY_BASE_URL") {
            // Reject garbage early so generated canonical links are usable.
            Url::parse(&base_url).map_err(FoundryError::InvalidUrl)?;
            config.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(backend) = env::var("FOUNDRY_LLM_BACKEND") {
            config.backend = match backend.to_lowercase().as_str() {
                "ollama" => GeneratorBackend::Ollama,
                "template" => GeneratorBackend::Template,
                other => {
                    warn!("Unknown FOUNDRY_LLM_BACKEND '{}', using templates", other);
                    GeneratorBackend::Template
                }
            };
        }

        if let Ok(model) = env::var("FOUNDRY_OLLAMA_MODEL") {
            config.ollama_model = model;
        }
        if let Ok(url) = env::var("FOUNDRY_OLLAMA_URL") {
            config.ollama_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(id) = env::var("FOUNDRY_ADSENSE_ID") {
            if !id.trim().is_empty() {
                config.adsense_id = Some(id);
            }
        }

        for (i, slot) in config.affiliate_slots.iter_mut().enumerate() {
            if let Ok(name) = env::var(format!("FOUNDRY_AFF{}_NAME", i + 1)) {
                slot.name = name;
            }
            if let Ok(url) = env::var(format!("FOUNDRY_AFF{}_URL", i + 1)) {
                slot.url = url;
            }
        }

        Ok(config)
    }
}
