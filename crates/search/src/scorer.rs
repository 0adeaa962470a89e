//! Scoring infrastructure for history search
//!
//! This module provides:
//! - Scorer trait for pluggable ranking
//! - ScorerContext for per-search statistics (clock reading)
//! - CandidateSignals, the raw signals of one candidate
//! - ScoreBreakdown, every weighted component plus the total
//! - BlendedScorer default implementation

use recall_core::{DocId, ScoringWeights, NANOS_PER_SEC};
use serde::{Deserialize, Serialize};

// ============================================================================
// CandidateSignals
// ============================================================================

/// Raw ranking signals of one candidate
///
/// This is an ephemeral view created during search, not stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateSignals {
    /// Candidate document
    pub doc_id: DocId,
    /// Summed tf-idf from the boolean-OR query
    pub tfidf: f32,
    /// Last execution time, nanoseconds since the Unix epoch
    pub timestamp_nanos: u64,
    /// Times the command was executed
    pub occurrence_count: u64,
    /// Whether the calling session executed this command itself
    pub in_session: bool,
}

// ============================================================================
// ScorerContext
// ============================================================================

/// Per-search context shared by every candidate
#[derive(Debug, Clone, Copy)]
pub struct ScorerContext {
    /// Total documents in the corpus
    pub total_docs: usize,
    /// Clock reading taken once per search, nanoseconds since the Unix epoch
    pub now_nanos: u64,
}

impl ScorerContext {
    /// Create a new ScorerContext
    pub fn new(total_docs: usize, now_nanos: u64) -> Self {
        ScorerContext {
            total_docs,
            now_nanos,
        }
    }

    /// Whole seconds between `timestamp_nanos` and now, saturating at zero
    pub fn age_secs(&self, timestamp_nanos: u64) -> u64 {
        (self.now_nanos / NANOS_PER_SEC).saturating_sub(timestamp_nanos / NANOS_PER_SEC)
    }
}

// ============================================================================
// ScoreBreakdown
// ============================================================================

/// Weighted score components of one candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Weighted tf-idf relevance
    pub tfidf: f32,
    /// Weighted `-log10(1 + age_secs)`; zero at age 0, never positive
    pub time: f32,
    /// Session affinity bonus, or zero
    pub affinity: f32,
    /// Weighted `ln(1 + occurrence_count)`
    pub frequency: f32,
    /// Sum of the four components
    pub total: f32,
}

// ============================================================================
// Scorer Trait
// ============================================================================

/// Pluggable scoring interface
///
/// Scorers must be Send + Sync: the store holding one is shared between
/// terminal handlers.
pub trait Scorer: Send + Sync {
    /// Score one candidate
    ///
    /// Higher totals rank first.
    fn score(&self, signals: &CandidateSignals, ctx: &ScorerContext) -> ScoreBreakdown;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

// ============================================================================
// BlendedScorer
// ============================================================================

/// Blend of relevance, recency, session affinity and repetition
///
/// ```text
/// total = w_rel * tfidf
///       + w_rec * -log10(1 + age_secs)
///       + (in_session ? w_aff : 0)
///       + w_freq * ln(1 + occurrence_count)
/// ```
///
/// With default weights the frequency term is computed but multiplied by
/// zero.
#[derive(Debug, Clone, Default)]
pub struct BlendedScorer {
    weights: ScoringWeights,
}

impl BlendedScorer {
    /// Create a scorer with explicit weights
    pub fn new(weights: ScoringWeights) -> Self {
        BlendedScorer { weights }
    }

    /// Weights in use
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }
}

/// `-log10(1 + age_secs)`
pub fn time_score(age_secs: u64) -> f32 {
    -(1.0 + age_secs as f64).log10() as f32
}

/// `ln(1 + occurrence_count)`
pub fn frequency_score(occurrence_count: u64) -> f32 {
    (occurrence_count as f64).ln_1p() as f32
}

impl Scorer for BlendedScorer {
    fn score(&self, signals: &CandidateSignals, ctx: &ScorerContext) -> ScoreBreakdown {
        let w = &self.weights;

        let tfidf = w.relevance * signals.tfidf;
        let time = w.recency * time_score(ctx.age_secs(signals.timestamp_nanos));
        let affinity = if signals.in_session {
            w.session_affinity
        } else {
            0.0
        };
        let frequency = w.frequency * frequency_score(signals.occurrence_count);

        ScoreBreakdown {
            tfidf,
            time,
            affinity,
            frequency,
            total: tfidf + time + affinity + frequency,
        }
    }

    fn name(&self) -> &str {
        "blended"
    }
}

// ============================================================================
// Tests
// ============================================================================
