use crate::generator::{ArticleGenerator, TemplateGenerator};
use crate::types::{DraftArticle, Topic};
use crate::utils::{slugify, word_count};
use chrono::Utc;
use tracing::{info, warn};

/// Filler appended until a draft reaches the minimum word count.
const PADDING_PARAGRAPH: &str = "In practice, each organisation should run small, low-risk \
experiments, observe the operational impact over several weeks, and only then roll out \
broader changes. Document the trade-offs clearly so that future engineers can understand \
not just what you chose, but why other options were rejected.";

/// Drafting stage: turns selected topics into draft articles through the
/// configured generator, falling back to the deterministic templates when the
/// generator fails or returns nothing. Every draft, whichever backend
/// produced it, is padded up to the minimum word count.
pub struct ContentAgent {
    generator: Box<dyn ArticleGenerator>,
    fallback: TemplateGenerator,
    min_words: usize,
}

impl ContentAgent {
    pub fn new(
        generator: Box<dyn ArticleGenerator>,
        fallback: TemplateGenerator,
        min_words: usize,
    ) -> Self {
        Self {
            generator,
            fallback,
            min_words,
        }
    }

    async fn generate(&self, topic: &Topic) -> String {
        match self.generator.produce(topic).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(
                    "Generator '{}' returned empty text for '{}', falling back to templates",
                    self.generator.name(),
                    topic.keyword
                );
                self.fallback_text(topic).await
            }
            Err(e) => {
                warn!(
                    "Generator '{}' failed for '{}' ({}), falling back to templates",
                    self.generator.name(),
                    topic.keyword,
                    e
                );
                self.fallback_text(topic).await
            }
        }
    }

    async fn fallback_text(&self, topic: &Topic) -> String {
        // The template generator is infallible.
        self.fallback.produce(topic).await.unwrap_or_default()
    }

    fn enforce_min_words(&self, mut content: String) -> String {
        while word_count(&content) < self.min_words {
            content.push_str("\n\n");
            content.push_str(PADDING_PARAGRAPH);
        }
        content
    }

    /// Draft one article per topic. Drafting itself never fails a topic; the
    /// fallback path guarantees text for every selection.
    pub async fn run(&self, topics: &[Topic]) -> Vec<DraftArticle> {
        let mut drafts = Vec::with_capacity(topics.len());
        for topic in topics {
            let content = self.enforce_min_words(self.generate(topic).await);
            let word_count = word_count(&content);
            drafts.push(DraftArticle {
                topic_id: topic.id.clone(),
                title: topic.keyword.clone(),
                slug: slugify(&topic.keyword),
                content,
                word_count,
                created_at: Utc::now(),
            });
        }
        info!("Drafted {} articles via '{}'", drafts.len(), self.generator.name());
        drafts
    }
}
