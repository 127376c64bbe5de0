use chrono::Utc;
use content_foundry::types::{DraftArticle, TopicStatus};
use content_foundry::utils::word_count;
use content_foundry::{
    ArticleGenerator, PipelineConfig, RejectReason, TemplateGenerator, ValidationAgent, Verdict,
};

fn make_draft(content: &str, title: &str) -> DraftArticle {
    DraftArticle {
        topic_id: "test-1".to_string(),
        title: title.to_string(),
        slug: "test-1".to_string(),
        word_count: word_count(content),
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

/// Structurally valid content padded to exactly `target` words.
fn structured_content(target: usize) -> String {
    let mut content = String::from(
        "## Section one\n\n\
         Opening paragraph with context.\n\n\
         ## Frequently asked questions\n\n\
         | a | b |\n|---|---|\n| c | d |\n\n",
    );
    while word_count(&content) < target {
        content.push_str("filler ");
    }
    assert_eq!(word_count(&content), target);
    content
}

async fn template_content(keyword: &str) -> String {
    let config = PipelineConfig::default();
    let generator = TemplateGenerator::new(config.affiliate_slots);
    let topic = content_foundry::Topic {
        id: "tpl".to_string(),
        keyword: keyword.to_string(),
        category: "compatibility".to_string(),
        intent: "Test.".to_string(),
        difficulty_score: 0.3,
        source: "test".to_string(),
        created_at: Utc::now(),
        status: TopicStatus::Selected,
    };
    let mut content = generator.produce(&topic).await.unwrap();
    // Mirror the drafting stage's padding so the template text clears the gate.
    while word_count(&content) < 1200 {
        content.push_str("\n\nAdditional practical guidance for rollout and review.");
    }
    content
}

fn agent() -> ValidationAgent {
    ValidationAgent::new(1200, 15)
}

#[tokio::test]
async fn template_content_is_approved() {
    let content = template_content("Docker on NixOS compatibility guide").await;
    let draft = make_draft(&content, "Docker on NixOS compatibility guide");
    let reasons = agent().validate(&draft);
    assert!(reasons.is_empty(), "template content should pass: {:?}", reasons);
}

#[test]
fn word_count_boundary_is_exact() {
    let short = make_draft(&structured_content(1199), "boundary check");
    let reasons = agent().validate(&short);
    assert!(reasons
        .iter()
        .any(|r| matches!(r, RejectReason::TooShort { words: 1199, .. })));

    let long = make_draft(&structured_content(1200), "boundary check");
    assert!(agent().validate(&long).is_empty());
}

#[test]
fn missing_structure_is_rejected() {
    let content = "filler ".repeat(1300);
    let draft = make_draft(&content, "no structure");
    let reasons = agent().validate(&draft);
    assert!(reasons.contains(&RejectReason::MissingStructure));
}

#[test]
fn synthetic_phrases_are_rejected() {
    let mut content = structured_content(1250);
    content.push_str("\n\nAs an AI language model, I cannot help with that.");
    let draft = make_draft(&content, "tone check");
    let reasons = agent().validate(&draft);
    assert!(reasons.contains(&RejectReason::MachineLike));
}

#[test]
fn keyword_stuffing_is_rejected_despite_valid_structure_and_length() {
    let keyword = "test keyword";
    let mut content = structured_content(1250);
    for _ in 0..20 {
        content.push_str(keyword);
        content.push(' ');
    }
    let draft = make_draft(&content, keyword);
    let reasons = agent().validate(&draft);
    assert!(
        reasons
            .iter()
            .any(|r| matches!(r, RejectReason::KeywordStuffing { .. })),
        "20 repetitions should exceed the limit of 15"
    );
}

#[test]
fn keyword_matching_is_case_insensitive() {
    let mut content = structured_content(1250);
    for _ in 0..20 {
        content.push_str("TEST Keyword ");
    }
    let draft = make_draft(&content, "test keyword");
    let reasons = agent().validate(&draft);
    assert!(reasons
        .iter()
        .any(|r| matches!(r, RejectReason::KeywordStuffing { .. })));
}

#[tokio::test]
async fn enrichment_is_idempotent() {
    let content = template_content("Enrichment idempotence").await;
    let once = ValidationAgent::enrich(&content);
    let twice = ValidationAgent::enrich(&once);
    assert_eq!(once, twice);

    // Markers appear exactly once.
    assert_eq!(once.matches("[internal notes]").count(), 1);
    assert_eq!(once.matches("[field experience]").count(), 1);
    assert_eq!(once.matches("From a practical standpoint").count(), 1);
}

#[tokio::test]
async fn approved_drafts_are_enriched() {
    let content = template_content("Good topic").await;
    let draft = make_draft(&content, "Good topic");

    match agent().assess(draft) {
        Verdict::Approved(enriched) => {
            assert!(enriched.content.contains("## Core concepts and mental models [internal notes]"));
            assert!(enriched.content.contains("From a practical standpoint"));
            assert_eq!(enriched.word_count, word_count(&enriched.content));
        }
        Verdict::Rejected { reasons, .. } => panic!("should approve: {:?}", reasons),
    }
}

#[test]
fn rejected_drafts_report_their_reasons() {
    let draft = make_draft("Too short.", "Bad topic");
    match agent().assess(draft) {
        Verdict::Rejected { topic_id, reasons } => {
            assert_eq!(topic_id, "test-1");
            assert!(reasons.len() >= 2, "short and structureless: {:?}", reasons);
        }
        Verdict::Approved(_) => panic!("must not approve a ten-character draft"),
    }
}

#[tokio::test]
async fn run_filters_out_rejected_drafts() {
    let good = make_draft(&template_content("Good topic").await, "Good topic");
    let bad = make_draft("Too short.", "Bad topic");

    let approved = agent().run(vec![good, bad]);
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].topic_id, "test-1");
    assert!(approved[0].content.contains("[internal notes]"));
}
