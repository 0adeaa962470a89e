//! History Store Property Tests
//!
//! Validates the observable contract of the store: dedup, dense ids,
//! navigation, session isolation and ranking signals.

use proptest::prelude::*;
use recall::{HistoryStore, ManualClock, SessionId, NANOS_PER_SEC};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_store() -> (HistoryStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000 * NANOS_PER_SEC));
    let store = HistoryStore::new().with_clock(clock.clone());
    (store, clock)
}

fn sid(raw: u32) -> SessionId {
    SessionId::new(raw)
}

// ============================================================================
// Dedup and Id Tests
// ============================================================================

/// Adding the same text N times keeps one line with count N
#[test]
fn test_dedup_idempotence() {
    let (store, clock) = test_store();

    for i in 0..7 {
        clock.advance(Duration::from_secs(3));
        store.add("cargo build --release", sid(i % 3));
    }

    assert_eq!(store.len(), 1);
    let line = store.line(0).unwrap();
    assert_eq!(line.occurrence_count, 7);
    assert_eq!(line.timestamp_nanos, (1_700_000_000 + 21) * NANOS_PER_SEC);
}

/// The k-th distinct text gets id k-1 and keeps it
#[test]
fn test_dense_stable_ids() {
    let (store, _) = test_store();
    let texts = ["ls", "cd /tmp", "ls", "vim notes.md", "cd /tmp", "make"];
    let ids: Vec<_> = texts.iter().map(|t| store.add(t, sid(1))).collect();
    assert_eq!(ids, vec![0, 1, 0, 2, 1, 3]);

    for (expected, text) in ["ls", "cd /tmp", "vim notes.md", "make"].iter().enumerate() {
        assert_eq!(store.line_by_text(text).unwrap().id, expected as u32);
    }
}

// ============================================================================
// Navigation Tests
// ============================================================================

/// Three ups walk newest to oldest, three downs return to the live buffer
#[test]
fn test_navigation_round_trip() {
    let (store, _) = test_store();
    let s = sid(10);
    store.add("c0", s);
    store.add("c1", s);
    store.add("c2", s);

    let ups: Vec<_> = (0..3).map(|_| store.up(s, "live input")).collect();
    assert_eq!(ups, vec!["c2", "c1", "c0"]);

    assert_eq!(store.down(s, "c0"), "c1");
    assert_eq!(store.down(s, "c1"), "c2");
    assert_eq!(store.down(s, "c2"), "live input");
}

/// Own commands come first, then older global history
#[test]
fn test_own_commands_precede_global_history() {
    let (store, _) = test_store();
    store.add("g0", sid(1));
    store.add("g1", sid(1));

    // Session 2 starts after g0 and g1 exist
    store.add("mine", sid(2));
    store.add("g2", sid(1));

    let walk: Vec<_> = (0..4).map(|_| store.up(sid(2), "")).collect();
    assert_eq!(walk, vec!["mine", "g1", "g0", "g0"]);
}

/// A session never recalls global ids created after it started
#[test]
fn test_session_isolation_at_creation_boundary() {
    let (store, _) = test_store();
    let old = sid(1);
    let new = sid(2);
    for i in 0..5 {
        store.add(&format!("early {}", i), old);
    }

    // Lazily create the new session with an empty own log
    assert_eq!(store.search("nothing-matches", new), "");

    store.add("late 1", old);
    store.add("late 2", old);

    let walk: Vec<_> = (0..7).map(|_| store.up(new, "")).collect();
    assert_eq!(
        walk,
        vec!["early 4", "early 3", "early 2", "early 1", "early 0", "early 0", "early 0"]
    );
}

/// Sessions navigate independently
#[test]
fn test_sessions_have_independent_cursors() {
    let (store, _) = test_store();
    store.add("a", sid(1));
    store.add("b", sid(1));
    store.add("x", sid(2));
    store.add("y", sid(2));

    assert_eq!(store.up(sid(1), ""), "b");
    assert_eq!(store.up(sid(2), ""), "y");
    assert_eq!(store.up(sid(1), ""), "a");
    assert_eq!(store.up(sid(2), ""), "x");
}

/// Removing a session and reusing its id starts fresh
#[test]
fn test_removed_session_restarts_at_current_history() {
    let (store, _) = test_store();
    store.add("one", sid(1));
    store.add("two", sid(1));
    store.remove_session(sid(1));

    store.add("three", sid(2));
    assert_eq!(store.up(sid(1), ""), "three");
    assert_eq!(store.up(sid(1), ""), "two");
}

// ============================================================================
// Ranking Tests
// ============================================================================

/// Own-session candidate wins when the other signals differ by less than 100
#[test]
fn test_affinity_dominance() {
    let (store, clock) = test_store();
    store.add("docker ps", sid(1));
    clock.advance(Duration::from_secs(86_400 * 30));
    store.add("docker push registry/app", sid(2));
    store.add("docker push registry/app", sid(2));

    let candidates = store.search_candidates("docker p", sid(1));
    assert_eq!(candidates.len(), 2);
    let own = candidates.iter().find(|c| c.in_session).unwrap();
    let other = candidates.iter().find(|c| !c.in_session).unwrap();
    let non_affinity = |c: &recall::Candidate| c.breakdown.total - c.breakdown.affinity;
    assert!((non_affinity(own) - non_affinity(other)).abs() < 100.0);

    assert_eq!(store.search("docker p", sid(1)), "docker ps");
    assert_eq!(store.search("docker p", sid(2)), "docker push registry/app");
}

/// With equal relevance and counts, the more recent line scores at least as high
#[test]
fn test_recency_monotonicity() {
    let (store, clock) = test_store();
    store.add("ssh alpha", sid(1));
    clock.advance(Duration::from_secs(3600));
    store.add("ssh bravo", sid(1));
    clock.advance(Duration::from_secs(60));

    let candidates = store.search_candidates("ssh", sid(9));
    let alpha = candidates.iter().find(|c| c.text == "ssh alpha").unwrap();
    let bravo = candidates.iter().find(|c| c.text == "ssh bravo").unwrap();

    assert_eq!(alpha.breakdown.tfidf, bravo.breakdown.tfidf);
    assert!(bravo.breakdown.time >= alpha.breakdown.time);
    assert!(alpha.breakdown.time <= 0.0);
    assert_eq!(store.search("ssh", sid(9)), "ssh bravo");
}

/// Prefix tokens find the command
#[test]
fn test_prefix_match() {
    let (store, _) = test_store();
    store.add("git commit -m foo", sid(1));
    assert_eq!(store.search("com", sid(1)), "git commit -m foo");
    assert_eq!(store.search("  git   co  ", sid(1)), "git commit -m foo");
}

/// Matching more query tokens outranks matching fewer
#[test]
fn test_more_matched_terms_rank_higher() {
    let (store, _) = test_store();
    store.add("kubectl get pods", sid(1));
    store.add("kubectl logs web", sid(1));
    store.add("cat pods.yaml", sid(1));

    assert_eq!(store.search("kub get", sid(1)), "kubectl get pods");
    assert_eq!(store.search("kub lo", sid(1)), "kubectl logs web");
}

/// Blank queries return nothing, with or without history
#[test]
fn test_empty_query() {
    let (store, _) = test_store();
    assert_eq!(store.search("", sid(1)), "");
    assert_eq!(store.search("   ", sid(1)), "");

    store.add("echo hi", sid(1));
    assert_eq!(store.search("", sid(1)), "");
    assert_eq!(store.search("   ", sid(2)), "");
}

/// Queries are case-sensitive literal prefixes
#[test]
fn test_search_is_case_sensitive() {
    let (store, _) = test_store();
    store.add("echo HELLO", sid(1));
    assert_eq!(store.search("HEL", sid(1)), "echo HELLO");
    assert_eq!(store.search("hel", sid(1)), "");
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_dedup_matches_distinct_texts(
        texts in prop::collection::vec("[a-c]{1,2}( [a-c]{1,2})?", 1..40)
    ) {
        let (store, _) = test_store();
        for (i, text) in texts.iter().enumerate() {
            store.add(text, sid((i % 4) as u32));
        }

        let mut distinct: Vec<&String> = Vec::new();
        for text in &texts {
            if !distinct.contains(&text) {
                distinct.push(text);
            }
        }
        prop_assert_eq!(store.len(), distinct.len());
        prop_assert_eq!(store.stats().total_docs, distinct.len());

        for (id, text) in distinct.iter().enumerate() {
            let line = store.line(id as u32).unwrap();
            prop_assert_eq!(&line.text, *text);
            let count = texts.iter().filter(|t| t == text).count() as u64;
            prop_assert_eq!(line.occurrence_count, count);
        }
    }

    #[test]
    fn prop_search_result_is_a_history_line(
        texts in prop::collection::vec("[a-d]{1,3}( [a-d]{1,3}){0,2}", 1..20),
        query in "[a-d]{1,2}",
    ) {
        let (store, _) = test_store();
        for text in &texts {
            store.add(text, sid(1));
        }
        let result = store.search(&query, sid(1));
        if !result.is_empty() {
            prop_assert!(texts.contains(&result));
            prop_assert!(result.split_whitespace().any(|t| t.starts_with(&query)));
        } else {
            prop_assert!(!texts.iter().any(|t| t.split_whitespace().any(|w| w.starts_with(&query))));
        }
    }
}
