use content_foundry::{DiscoveryAgent, TopicStatus, TopicStore};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

fn mark_as_drafted(data_dir: &std::path::Path, ids: &HashSet<String>) {
    let store = TopicStore::new(data_dir);
    store.advance_status(ids, TopicStatus::Drafted).unwrap();
}

#[test]
fn first_run_seeds_pool_and_selects_five() {
    let tmp = TempDir::new().unwrap();
    let agent = DiscoveryAgent::new(tmp.path(), 5);

    let selected = agent.run().unwrap();
    assert_eq!(selected.len(), 5);

    let topics = TopicStore::new(tmp.path()).load();
    assert!(topics.len() > 5, "full candidate pool should be persisted");
    assert_eq!(topics.len(), agent.generate_candidates().len());

    let selected_ids: HashSet<&str> = selected.iter().map(|t| t.id.as_str()).collect();
    for topic in &topics {
        if selected_ids.contains(topic.id.as_str()) {
            assert_eq!(topic.status, TopicStatus::Selected);
        } else {
            assert_eq!(topic.status, TopicStatus::New);
        }
    }
}

#[test]
fn candidate_ids_are_unique() {
    let tmp = TempDir::new().unwrap();
    let agent = DiscoveryAgent::new(tmp.path(), 5);

    let candidates = agent.generate_candidates();
    let ids: HashSet<&str> = candidates.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), candidates.len());
}

#[test]
fn store_is_append_only_across_runs() {
    let tmp = TempDir::new().unwrap();
    let agent = DiscoveryAgent::new(tmp.path(), 5);
    let store = TopicStore::new(tmp.path());

    agent.run().unwrap();
    let first_count = store.load().len();

    agent.run().unwrap();
    let second_count = store.load().len();

    assert!(second_count >= first_count);
    // The generators are deterministic, so nothing new appears either.
    assert_eq!(second_count, first_count);

    let ids: HashSet<String> = store.load().into_iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), second_count, "no duplicate ids after repeat runs");
}

#[test]
fn drafted_topics_are_not_reselected() {
    let tmp = TempDir::new().unwrap();
    let agent = DiscoveryAgent::new(tmp.path(), 5);

    let first: HashSet<String> = agent.run().unwrap().into_iter().map(|t| t.id).collect();
    mark_as_drafted(tmp.path(), &first);

    let second: HashSet<String> = agent.run().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(second.len(), 5);
    assert!(first.is_disjoint(&second));
}

#[test]
fn available_pool_shrinks_each_run() {
    let tmp = TempDir::new().unwrap();
    let agent = DiscoveryAgent::new(tmp.path(), 5);

    let mut all_ids: HashSet<String> = HashSet::new();
    for _ in 0..3 {
        let batch: HashSet<String> = agent.run().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(batch.len(), 5);
        mark_as_drafted(tmp.path(), &batch);
        all_ids.extend(batch);
    }
    assert_eq!(all_ids.len(), 15, "three batches must not overlap");
}

#[test]
fn selected_but_never_drafted_topics_stay_eligible() {
    let tmp = TempDir::new().unwrap();
    let agent = DiscoveryAgent::new(tmp.path(), 5);

    // First run selects five; nothing downstream drafts them.
    let first: HashSet<String> = agent.run().unwrap().into_iter().map(|t| t.id).collect();
    // Second run picks the easiest available again, which is the same set.
    let second: HashSet<String> = agent.run().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(first, second);
}

#[test]
fn exhausted_pool_yields_empty_selection() {
    let tmp = TempDir::new().unwrap();
    let agent = DiscoveryAgent::new(tmp.path(), 5);
    let store = TopicStore::new(tmp.path());

    agent.run().unwrap();
    let all_ids: HashSet<String> = store.load().into_iter().map(|t| t.id).collect();
    mark_as_drafted(tmp.path(), &all_ids);

    let selected = agent.run().unwrap();
    assert!(selected.is_empty(), "no eligible topics should mean no selection");

    // Store is untouched apart from the earlier status updates.
    assert_eq!(store.load().len(), all_ids.len());
}

#[test]
fn malformed_store_file_starts_fresh() {
    let tmp = TempDir::new().unwrap();
    let store = TopicStore::new(tmp.path());
    fs::create_dir_all(tmp.path()).unwrap();
    fs::write(store.path(), "definitely not json").unwrap();

    let agent = DiscoveryAgent::new(tmp.path(), 5);
    let selected = agent.run().unwrap();
    assert_eq!(selected.len(), 5);
    assert_eq!(store.load().len(), agent.generate_candidates().len());
}

#[test]
fn respects_configured_selection_limit() {
    let tmp = TempDir::new().unwrap();
    let agent = DiscoveryAgent::new(tmp.path(), 2);
    assert_eq!(agent.run().unwrap().len(), 2);
}
