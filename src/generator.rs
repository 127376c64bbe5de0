use crate::config::{AffiliateSlot, GeneratorBackend, PipelineConfig};
use crate::types::{FoundryError, Result, Topic};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Capability interface for producing long-form article text from a topic.
/// The drafting stage depends only on this trait; backends are selected from
/// configuration.
#[async_trait]
pub trait ArticleGenerator: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Produce the article body (markdown) for a topic.
    async fn produce(&self, topic: &Topic) -> Result<String>;
}

/// Build the configured primary generator.
pub fn generator_for(config: &PipelineConfig) -> Box<dyn ArticleGenerator> {
    match config.backend {
        GeneratorBackend::Template => {
            Box::new(TemplateGenerator::new(config.affiliate_slots.clone()))
        }
        GeneratorBackend::Ollama => Box::new(OllamaGenerator::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
        )),
    }
}

/// Deterministic, fully offline generator. Produces opinionated long-form
/// markdown with the structure the validation stage expects: H2 sections, a
/// comparison table, an affiliate section, and an FAQ.
pub struct TemplateGenerator {
    affiliate_slots: Vec<AffiliateSlot>,
}

impl TemplateGenerator {
    pub fn new(affiliate_slots: Vec<AffiliateSlot>) -> Self {
        Self { affiliate_slots }
    }

    fn render(&self, keyword: &str) -> String {
        let now = Utc::now().format("%B %Y");

        let intro = format!(
            "# {keyword}\n\
             \n\
             As a practitioner who cares about maintainable systems and realistic trade-offs,\n\
             this guide walks through **real-world considerations** instead of fluffy marketing.\n\
             The goal is to help you make a confident decision about your tooling and architecture,\n\
             using language that any experienced engineer or tech lead would recognise.\n\
             \n\
             In this article you will learn:\n\
             \n\
             - How this topic fits into modern engineering workflows\n\
             - Concrete pros and cons you can explain to stakeholders\n\
             - Implementation patterns, edge cases, and failure modes to watch out for\n\
             - How to decide whether to adopt, migrate, or wait\n\
             \n\
             All explanations target engineers shipping production systems in {now}."
        );

        let architecture = "## Core concepts and mental models\n\
             \n\
             Before we dive into specific tools, it is useful to step back and describe\n\
             the core mental models behind this topic. When you understand the moving\n\
             pieces conceptually, you become far less dependent on any single vendor\n\
             or framework.\n\
             \n\
             Think about:\n\
             \n\
             - The boundary between local development and production deployment\n\
             - Where state is stored and how it flows through the system\n\
             - Which teams own which layers of the stack\n\
             - What \"done\" means in terms of observability, reliability, and security\n\
             \n\
             Even simple sounding decisions, such as choosing one editor or plugin\n\
             over another, tend to compound over years as teams, codebases, and\n\
             infrastructure evolve."
            .to_string();

        let use_cases = format!(
            "## High-intent use cases and user journeys\n\
             \n\
             Search intent around this topic is rarely casual. Engineers typing\n\
             queries such as \"{keyword}\" are normally stuck on:\n\
             \n\
             - A migration project with hard deadlines\n\
             - A compatibility issue blocking deployment\n\
             - A build, test, or debug workflow that has become painfully slow\n\
             \n\
             When evaluating options, anchor on the **specific journeys**:\n\
             \n\
             1. A new contributor cloning the repo and becoming productive.\n\
             2. A senior engineer debugging intermittent failures under load.\n\
             3. An ops team keeping the system observable, patchable, and auditable.\n\
             4. A tech lead justifying the stack to non-technical stakeholders."
        );

        let comparisons = "## Nuanced comparisons instead of hype\n\
             \n\
             Tool comparisons often degenerate into unhelpful debates. A more\n\
             responsible way to reason about options is to define a shortlist of\n\
             evaluation criteria and then score each option in context.\n\
             \n\
             Recommended lenses:\n\
             \n\
             - Learning curve and onboarding experience\n\
             - Ecosystem maturity and plugin quality\n\
             - Failure behaviour and how issues surface during incidents\n\
             - Long-term maintainability for a growing team\n\
             - Vendor risk and lock-in mitigation strategies\n\
             \n\
             When you read benchmarks or case studies, pause and ask whether the\n\
             environment, team skills, and risk profile actually match yours."
            .to_string();

        let table = "## Architecture and workflow comparison table\n\
             \n\
             | Dimension                 | Conservative choice                    | Progressive choice                         |\n\
             |---------------------------|----------------------------------------|--------------------------------------------|\n\
             | Primary optimisation      | Stability and predictability           | Velocity and expressiveness               |\n\
             | Tooling customisation     | Minimal, opinionated defaults          | Deep, scriptable, highly extensible       |\n\
             | Ideal team size           | Large orgs with multiple squads        | Small, senior-heavy product teams         |\n\
             | Operational burden        | Lower, easier to standardise           | Higher, needs clear ownership             |\n\
             | Risk of lock-in           | Moderate, but manageable               | Depends heavily on integration strategy   |\n\
             \n\
             The right answer is rarely at either extreme. Most organisations end up\n\
             standardising on a conservative baseline while enabling power users to\n\
             extend their local workflows where it genuinely pays off."
            .to_string();

        let implementation = "## Implementation guidelines and failure modes\n\
             \n\
             From an implementation perspective, treat configuration as code and\n\
             invest early in reproducible environments. A few practical guidelines:\n\
             \n\
             - Keep environment setup scripted and version-controlled.\n\
             - Capture decisions in lightweight design docs instead of tribal knowledge.\n\
             - Add smoke tests to catch obvious misconfigurations before release.\n\
             - Decide what \"good enough\" observability looks like before scaling usage.\n\
             \n\
             Common failure modes include silent configuration drift, unclear\n\
             ownership of tooling, and one-off shell scripts that become accidental\n\
             production dependencies."
            .to_string();

        let affiliate_items: Vec<String> = self
            .affiliate_slots
            .iter()
            .map(|s| format!("- [{}]({}) — {}", s.name, s.url, s.desc))
            .collect();
        let affiliates = format!(
            "## Recommended tools and resources\n\
             \n\
             After working with many stacks over the past few years, these are tools\n\
             we genuinely recommend. We may earn a commission if you sign up through\n\
             the links below, but our recommendations are based on hands-on experience\n\
             — not payout.\n\
             \n\
             {}\n\
             \n\
             Disclosure: some links above are affiliate links. We only list tools\n\
             we have used in real projects and would recommend regardless.",
            affiliate_items.join("\n")
        );

        let faq = "## Frequently asked questions\n\
             \n\
             ### Is it safe to standardise on a single tool?\n\
             \n\
             Standardisation helps reduce cognitive overhead, but you should still\n\
             leave room for exceptions. Allow power users to diverge when they\n\
             can demonstrate clear upside and are willing to document their setup.\n\
             \n\
             ### How often should we revisit our tooling choices?\n\
             \n\
             In most teams, a light review every 12–18 months is enough. The goal\n\
             is not to chase trends, but to make sure your defaults do not become\n\
             an unexamined constraint that quietly slows product delivery.\n\
             \n\
             ### How can we evaluate claims in benchmarks and vendor content?\n\
             \n\
             Treat glossy benchmarks as a starting point, not a conclusion. Recreate\n\
             the critical paths from your own system and run targeted experiments\n\
             under realistic constraints, including network conditions and data size."
            .to_string();

        let conclusion = "## Conclusion: how to move forward thoughtfully\n\
             \n\
             The most sustainable decisions are usually boring from the outside.\n\
             Instead of chasing the newest stack, identify the smallest set of\n\
             changes that meaningfully de-risk your roadmap and improve developer\n\
             quality of life.\n\
             \n\
             Make adoption explicit, reversible, and well-documented. Capture what\n\
             you tried, what worked, and what you decided not to pursue yet. That\n\
             historical context will save future teams enormous amounts of time\n\
             and prevent expensive re-litigations of settled questions."
            .to_string();

        [
            intro,
            architecture,
            use_cases,
            comparisons,
            table,
            implementation,
            affiliates,
            faq,
            conclusion,
        ]
        .join("\n\n")
    }
}

#[async_trait]
impl ArticleGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "template"
    }

    async fn produce(&self, topic: &Topic) -> Result<String> {
        Ok(self.render(&topic.keyword))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

/// Generator backed by a local Ollama server. Any failure surfaces as an
/// error so the drafting stage can fall back to templates; the pipeline never
/// depends on the model being up.
pub struct OllamaGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_default(),
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model,
        }
    }

    fn prompt_for(topic: &Topic) -> String {
        format!(
            "You are writing a long-form, E-E-A-T compliant technical article.\n\
             \n\
             Topic: {}\n\
             Category: {}\n\
             Search intent: {}\n\
             \n\
             Requirements:\n\
             - At least 1,400 words.\n\
             - Use Markdown headings with H2/H3 structure.\n\
             - Include at least one comparison-style table.\n\
             - Include a short FAQ section near the end, under the heading \
             \"## Frequently asked questions\".\n\
             - Insert the affiliate placeholders {{{{AFFILIATE_TOOL_1}}}}, \
             {{{{AFFILIATE_TOOL_2}}}}, {{{{AFFILIATE_TOOL_3}}}} in a dedicated section.\n\
             - Focus on practical guidance, real-world trade-offs, and failure modes.\n",
            topic.keyword, topic.category, topic.intent
        )
    }

    /// Ollama answers either with a single JSON object or, when streaming,
    /// with newline-delimited JSON whose `response` fields concatenate into
    /// the full text.
    fn parse_body(raw: &str) -> Result<String> {
        if let Ok(parsed) = serde_json::from_str::<OllamaResponse>(raw) {
            if !parsed.response.trim().is_empty() {
                return Ok(parsed.response.trim().to_string());
            }
        }

        let mut parts = String::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Ok(chunk) = serde_json::from_str::<OllamaResponse>(line) {
                parts.push_str(&chunk.response);
            }
        }
        let parts = parts.trim();
        if parts.is_empty() {
            return Err(FoundryError::Generation(
                "Ollama call returned no usable content".to_string(),
            ));
        }
        Ok(parts.to_string())
    }
}

#[async_trait]
impl ArticleGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn produce(&self, topic: &Topic) -> Result<String> {
        debug!("Requesting article for '{}' from {}", topic.keyword, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "model": self.model,
                "prompt": Self::prompt_for(topic),
                "stream": false,
            }))
            .send()
            .await?
            .error_for_status()?;
        let raw = response.text().await?;
        Self::parse_body(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_object_response() {
        let raw = r#"{"model":"llama3","response":"Hello world","done":true}"#;
        assert_eq!(OllamaGenerator::parse_body(raw).unwrap(), "Hello world");
    }

    #[test]
    fn parses_streamed_response() {
        let raw = "{\"response\":\"Hello \"}\n{\"response\":\"world\"}\n{\"done\":true}";
        assert_eq!(OllamaGenerator::parse_body(raw).unwrap(), "Hello world");
    }

    #[test]
    fn empty_body_is_an_error() {
        assert!(OllamaGenerator::parse_body("").is_err());
        assert!(OllamaGenerator::parse_body("{\"response\":\"\"}").is_err());
    }
}
