//! Contract with an external ranking collaborator
//!
//! A learned re-ranker (bandit, external model process, ...) can see every
//! scored candidate of a search and override the final order. The core only
//! exposes candidates and honors per-document rank overrides; encoding and
//! learning are the collaborator's business.
//!
//! ## Selection Rule
//!
//! 1. Candidates with an override beat candidates without one.
//! 2. Among overridden candidates the lowest rank wins.
//! 3. Otherwise the highest `total` score wins. Ties are unordered.

use recall_core::{DocId, SessionId};
use recall_search::ScoreBreakdown;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// One scored search candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// Candidate document
    pub doc_id: DocId,
    /// Command text
    pub text: String,
    /// Times the command was executed
    pub occurrence_count: u64,
    /// Last execution time, nanoseconds since the Unix epoch
    pub timestamp_nanos: u64,
    /// Whether the searching session executed this command itself
    pub in_session: bool,
    /// Weighted score components
    pub breakdown: ScoreBreakdown,
}

impl Candidate {
    /// Final blended score
    pub fn total(&self) -> f32 {
        self.breakdown.total
    }
}

/// Per-document rank overrides (lower rank is better)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankOverrides {
    ranks: FxHashMap<DocId, u32>,
}

impl RankOverrides {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rank of `doc_id`
    pub fn set(&mut self, doc_id: DocId, rank: u32) {
        self.ranks.insert(doc_id, rank);
    }

    /// Builder: set the rank of `doc_id`
    pub fn with(mut self, doc_id: DocId, rank: u32) -> Self {
        self.set(doc_id, rank);
        self
    }

    /// Rank override for `doc_id`, if any
    pub fn get(&self, doc_id: DocId) -> Option<u32> {
        self.ranks.get(&doc_id).copied()
    }

    /// Number of overrides
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Check if there are no overrides
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl FromIterator<(DocId, u32)> for RankOverrides {
    fn from_iter<I: IntoIterator<Item = (DocId, u32)>>(iter: I) -> Self {
        RankOverrides {
            ranks: iter.into_iter().collect(),
        }
    }
}

/// External re-ranking hook
///
/// Called once per search with every scored candidate, after the store lock
/// has been released. Implementations may block on an external process and
/// may call back into the store.
pub trait RankingCollaborator: Send + Sync {
    /// Produce rank overrides for some (or none) of the candidates
    fn rank(&self, session: SessionId, candidates: &[Candidate]) -> RankOverrides;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

/// Pick the winning candidate under `overrides`
pub fn select_best<'a>(
    candidates: &'a [Candidate],
    overrides: &RankOverrides,
) -> Option<&'a Candidate> {
    if !overrides.is_empty() {
        let overridden = candidates
            .iter()
            .filter_map(|c| overrides.get(c.doc_id).map(|rank| (rank, c)))
            .min_by_key(|(rank, _)| *rank);
        if let Some((_, best)) = overridden {
            return Some(best);
        }
    }
    candidates
        .iter()
        .max_by(|a, b| a.total().total_cmp(&b.total()))
}
