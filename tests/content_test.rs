use async_trait::async_trait;
use chrono::Utc;
use content_foundry::types::{FoundryError, Result, Topic, TopicStatus};
use content_foundry::utils::word_count;
use content_foundry::{ArticleGenerator, ContentAgent, PipelineConfig, TemplateGenerator};

fn topic(keyword: &str) -> Topic {
    Topic {
        id: "test-topic".to_string(),
        keyword: keyword.to_string(),
        category: "devtools_comparison".to_string(),
        intent: "Evaluate which tool to adopt.".to_string(),
        difficulty_score: 0.35,
        source: "test".to_string(),
        created_at: Utc::now(),
        status: TopicStatus::Selected,
    }
}

fn template(config: &PipelineConfig) -> TemplateGenerator {
    TemplateGenerator::new(config.affiliate_slots.clone())
}

/// Stand-in for an external delegate with scripted behavior.
struct StubGenerator {
    output: Result<String>,
}

#[async_trait]
impl ArticleGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn produce(&self, _topic: &Topic) -> Result<String> {
        match &self.output {
            Ok(text) => Ok(text.clone()),
            Err(_) => Err(FoundryError::Generation("stub failure".to_string())),
        }
    }
}

#[tokio::test]
async fn template_drafts_meet_minimum_length_and_structure() {
    let config = PipelineConfig::default();
    let agent = ContentAgent::new(
        Box::new(template(&config)),
        template(&config),
        config.min_words,
    );

    let drafts = agent.run(&[topic("VS Code vs Neovim for Rust developers")]).await;
    assert_eq!(drafts.len(), 1);

    let draft = &drafts[0];
    assert!(draft.word_count >= config.min_words);
    assert_eq!(draft.word_count, word_count(&draft.content));
    assert_eq!(draft.topic_id, "test-topic");
    assert_eq!(draft.title, "VS Code vs Neovim for Rust developers");
    assert_eq!(draft.slug, "vs-code-vs-neovim-for-rust-developers");
    assert!(draft.content.contains("## Frequently asked questions"));
    assert!(draft.content.contains("|---"));
}

#[tokio::test]
async fn short_delegate_output_is_padded_to_minimum() {
    let config = PipelineConfig::default();
    let agent = ContentAgent::new(
        Box::new(StubGenerator {
            output: Ok("A very short article body.".to_string()),
        }),
        template(&config),
        config.min_words,
    );

    let drafts = agent.run(&[topic("short output")]).await;
    let draft = &drafts[0];
    assert!(draft.word_count >= config.min_words);
    assert!(draft.content.starts_with("A very short article body."));
}

#[tokio::test]
async fn failing_delegate_falls_back_to_template() {
    let config = PipelineConfig::default();
    let agent = ContentAgent::new(
        Box::new(StubGenerator {
            output: Err(FoundryError::Generation("unreachable".to_string())),
        }),
        template(&config),
        config.min_words,
    );

    let drafts = agent.run(&[topic("fallback topic")]).await;
    let draft = &drafts[0];
    assert!(draft.content.contains("# fallback topic"));
    assert!(draft.content.contains("## Frequently asked questions"));
    assert!(draft.word_count >= config.min_words);
}

#[tokio::test]
async fn empty_delegate_output_falls_back_to_template() {
    let config = PipelineConfig::default();
    let agent = ContentAgent::new(
        Box::new(StubGenerator {
            output: Ok("   \n  ".to_string()),
        }),
        template(&config),
        config.min_words,
    );

    let drafts = agent.run(&[topic("empty output")]).await;
    assert!(drafts[0].content.contains("## Core concepts and mental models"));
}

#[tokio::test]
async fn drafts_one_article_per_topic() {
    let config = PipelineConfig::default();
    let agent = ContentAgent::new(
        Box::new(template(&config)),
        template(&config),
        config.min_words,
    );

    let topics = vec![topic("first topic"), topic("second topic"), topic("third topic")];
    let drafts = agent.run(&topics).await;
    assert_eq!(drafts.len(), 3);
}

#[tokio::test]
async fn template_includes_configured_affiliate_links() {
    let config = PipelineConfig::default();
    let agent = ContentAgent::new(
        Box::new(template(&config)),
        template(&config),
        config.min_words,
    );

    let drafts = agent.run(&[topic("affiliate check")]).await;
    for slot in &config.affiliate_slots {
        assert!(
            drafts[0].content.contains(&slot.url),
            "template should link {}",
            slot.name
        );
    }
}
