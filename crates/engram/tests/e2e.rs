// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the assembled service against mock adapters.

use std::sync::Arc;
use std::time::Duration;

use engram::{ChatMessage, EngramConfig, EngramError, EngramService, MemoryKind, OwnerId};
use engram_test_utils::{InMemoryBackend, MockCompletion, MockEmbedder};

struct Harness {
    service: EngramService,
    backend: Arc<InMemoryBackend>,
    embedder: Arc<MockEmbedder>,
    completion: Arc<MockCompletion>,
}

fn harness_with(embedder: Arc<MockEmbedder>, completion: Arc<MockCompletion>) -> Harness {
    let backend = Arc::new(InMemoryBackend::new());
    let service = EngramService::new(
        EngramConfig::default(),
        backend.clone(),
        embedder.clone(),
        completion.clone(),
    );
    Harness {
        service,
        backend,
        embedder,
        completion,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(MockEmbedder::new()), Arc::new(MockCompletion::new()))
}

#[tokio::test]
async fn remember_the_same_fact_twice_merges() {
    let h = harness();
    let owner = OwnerId::new("sam");

    h.embedder.set_vector("I love hiking", vec![1.0, 0.0, 0.0]);
    h.embedder
        .set_vector("I really love hiking!", vec![0.999, 0.04, 0.0]);

    let first = h.service.remember(&owner, "I love hiking").await.unwrap();
    assert!(!first.merged);

    let second = h
        .service
        .remember(&owner, "I really love hiking!")
        .await
        .unwrap();
    assert!(second.merged, "near-identical phrasing must merge");
    assert_eq!(second.final_text, "I really love hiking!");

    let records = h.backend.records(&owner).await;
    assert_eq!(records.len(), 1, "merge must not create a second record");
    assert_eq!(records[0].text, "I really love hiking!");
    assert_eq!(records[0].kind, MemoryKind::Explicit);
    assert_eq!(records[0].confidence, 1.0);
}

#[tokio::test]
async fn unrelated_facts_stay_separate() {
    let h = harness();
    let owner = OwnerId::new("sam");

    h.embedder.set_vector("I love hiking", vec![1.0, 0.0, 0.0]);
    h.embedder
        .set_vector("My sister is a vet", vec![0.0, 1.0, 0.0]);

    h.service.remember(&owner, "I love hiking").await.unwrap();
    let second = h.service.remember(&owner, "My sister is a vet").await.unwrap();
    assert!(!second.merged);
    assert_eq!(h.backend.records(&owner).await.len(), 2);
}

#[tokio::test]
async fn recall_returns_only_relevant_memories() {
    let h = harness();
    let owner = OwnerId::new("alice-reader");

    h.embedder
        .set_vector("Alice enjoys painting", vec![1.0, 0.0, 0.0]);
    h.embedder
        .set_vector("Alice works in finance", vec![0.0, 1.0, 0.0]);
    // cos(query, painting) = 0.7 (distance 0.3, relevant);
    // cos(query, finance) = 0.1 (distance 0.9, irrelevant).
    h.embedder.set_vector(
        "what are Alice's hobbies",
        vec![0.7, 0.1, 0.7071],
    );

    h.service
        .remember(&owner, "Alice enjoys painting")
        .await
        .unwrap();
    h.service
        .remember(&owner, "Alice works in finance")
        .await
        .unwrap();

    let results = h
        .service
        .recall(&owner, "what are Alice's hobbies", Some(5), None)
        .await
        .unwrap();
    assert_eq!(results, vec!["Alice enjoys painting".to_string()]);
}

#[tokio::test]
async fn fifteen_turns_fit_without_truncation() {
    let h = harness();
    let owner = OwnerId::new("sam");

    let mut window = Vec::new();
    for i in 1..=15 {
        let role = if i % 2 == 1 { "user" } else { "assistant" };
        window = h
            .service
            .record_turn(&owner, ChatMessage::new(role, format!("turn {i}")))
            .await
            .unwrap();
    }

    assert_eq!(window.len(), 16, "system turn plus fifteen turns");
    assert_eq!(window[0].role, "system");
    assert_eq!(window[1].content, "turn 1");
    assert_eq!(window[15].content, "turn 15");
}

#[tokio::test]
async fn window_overflow_keeps_system_plus_most_recent() {
    let h = harness();
    let owner = OwnerId::new("sam");

    let mut window = Vec::new();
    for i in 1..=25 {
        let role = if i % 2 == 1 { "user" } else { "assistant" };
        window = h
            .service
            .record_turn(&owner, ChatMessage::new(role, format!("turn {i}")))
            .await
            .unwrap();
    }

    assert_eq!(window.len(), 20);
    assert_eq!(window[0].role, "system");
    assert_eq!(window[1].content, "turn 7");
    assert_eq!(window[19].content, "turn 25");
}

#[tokio::test]
async fn system_turn_carries_memories_and_custom_suffix() {
    let h = harness();
    let owner = OwnerId::new("sam");

    h.service.remember(&owner, "User lives in Oslo").await.unwrap();
    h.service
        .set_custom_prompt(&owner, "Answer in French.")
        .await
        .unwrap();

    let window = h
        .service
        .record_turn(&owner, ChatMessage::user("hello"))
        .await
        .unwrap();

    let system = &window[0];
    assert_eq!(system.role, "system");
    assert!(system.content.contains("User lives in Oslo"));
    assert!(system.content.ends_with("Answer in French."));
    assert_eq!(
        window.iter().filter(|m| m.role == "system").count(),
        1,
        "system turn is rewritten, never duplicated"
    );
}

#[tokio::test]
async fn oversized_custom_prompt_is_rejected() {
    let h = harness();
    let owner = OwnerId::new("sam");

    let long = "x".repeat(501);
    let err = h.service.set_custom_prompt(&owner, &long).await.unwrap_err();
    assert!(matches!(err, EngramError::Validation(_)));

    // At the limit is fine, and empty resets.
    h.service
        .set_custom_prompt(&owner, &"x".repeat(500))
        .await
        .unwrap();
    h.service.set_custom_prompt(&owner, "").await.unwrap();
    let window = h
        .service
        .record_turn(&owner, ChatMessage::user("hello"))
        .await
        .unwrap();
    assert!(!window[0].content.contains('x'));
}

#[tokio::test]
async fn pipeline_extracts_facts_after_trigger() {
    let completion = Arc::new(MockCompletion::with_responses(vec![
        "The user mentioned they adopted a cat named Miso.".into(),
        r#"["User has a cat named Miso"]"#.into(),
    ]));
    let h = harness_with(Arc::new(MockEmbedder::new()), completion);
    let owner = OwnerId::new("sam");

    h.service
        .record_turn(&owner, ChatMessage::user("I adopted a cat"))
        .await
        .unwrap();
    h.service
        .record_turn(&owner, ChatMessage::assistant("Congratulations!"))
        .await
        .unwrap();
    h.service
        .record_turn(&owner, ChatMessage::user("Her name is Miso"))
        .await
        .unwrap();

    // Third message trips the trigger; the run is fire-and-forget.
    let mut records = Vec::new();
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        records = h.backend.records(&owner).await;
        if !records.is_empty() {
            break;
        }
    }
    assert_eq!(records.len(), 1, "extracted fact should land in the store");
    assert_eq!(records[0].text, "User has a cat named Miso");
    assert_eq!(records[0].kind, MemoryKind::Intuited);
    assert_eq!(records[0].confidence, 0.8);

    let checkpoint = h.service.state().checkpoint(&owner).unwrap();
    assert_eq!(checkpoint.messages_since_last_summary, 0);
}

#[tokio::test]
async fn pipeline_failure_never_reaches_the_foreground() {
    let h = harness_with(Arc::new(MockEmbedder::new()), Arc::new(MockCompletion::failing()));
    let owner = OwnerId::new("sam");

    for i in 1..=4 {
        // No error surfaces even though the background run fails.
        h.service
            .record_turn(&owner, ChatMessage::user(format!("turn {i}")))
            .await
            .unwrap();
    }

    // Give the failed background task time to finish.
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if h.completion.call_count() > 0 {
            break;
        }
    }

    assert!(h.backend.records(&owner).await.is_empty());
    let checkpoint = h.service.state().checkpoint(&owner).unwrap();
    assert!(
        checkpoint.messages_since_last_summary < 3,
        "counters stay reset after the failed run"
    );

    let window = h
        .service
        .record_turn(&owner, ChatMessage::user("still here"))
        .await
        .unwrap();
    assert_eq!(window.last().unwrap().content, "still here");
}

#[tokio::test]
async fn embedding_outage_degrades_but_keeps_data() {
    let h = harness_with(Arc::new(MockEmbedder::failing()), Arc::new(MockCompletion::new()));
    let owner = OwnerId::new("sam");

    // Upsert still lands the text, without a vector.
    let outcome = h
        .service
        .remember(&owner, "my favourite tea is genmaicha")
        .await
        .unwrap();
    assert!(!outcome.merged);
    let records = h.backend.records(&owner).await;
    assert_eq!(records.len(), 1);
    assert!(records[0].embedding.is_empty());

    // Retrieval falls back to fuzzy text matching.
    let results = h
        .service
        .recall(&owner, "favourite tea", Some(5), None)
        .await
        .unwrap();
    assert_eq!(results, vec!["my favourite tea is genmaicha".to_string()]);
}

#[tokio::test]
async fn reset_conversation_clears_window_not_memories() {
    let h = harness();
    let owner = OwnerId::new("sam");

    h.embedder.set_vector("I love hiking", vec![1.0, 0.0, 0.0]);
    h.service.remember(&owner, "I love hiking").await.unwrap();
    h.service
        .record_turn(&owner, ChatMessage::user("hello"))
        .await
        .unwrap();

    h.service.reset_conversation(&owner).await;

    let window = h
        .service
        .record_turn(&owner, ChatMessage::user("fresh start"))
        .await
        .unwrap();
    assert_eq!(window.len(), 2, "system turn plus the new message");
    assert_eq!(h.backend.records(&owner).await.len(), 1);
}

#[tokio::test]
async fn owners_are_isolated_end_to_end() {
    let h = harness();
    let alice = OwnerId::new("alice");
    let bob = OwnerId::new("bob");

    h.service.remember(&alice, "Alice fact").await.unwrap();
    h.service
        .record_turn(&alice, ChatMessage::user("hi from alice"))
        .await
        .unwrap();

    let window = h
        .service
        .record_turn(&bob, ChatMessage::user("hi from bob"))
        .await
        .unwrap();
    assert_eq!(window.len(), 2);
    assert!(!window[0].content.contains("Alice fact"));
    assert!(h.backend.records(&bob).await.is_empty());
}
