//! History store: canonical history, inverted index and terminal sessions
//!
//! The store is the single context object a service creates at start and
//! hands to every request handler (usually as `Arc<HistoryStore>`).
//!
//! # Concurrency
//!
//! All mutable state lives behind one `parking_lot::Mutex`, held for the
//! whole of `add`, `navigate`, `goto_end` and `remove_session`. `search`
//! holds it only while collecting and scoring candidates. No operation
//! performs I/O or calls another locking operation while holding it.
//! Queries borrow the index and are drained before the guard is dropped.
//!
//! The clock is read under the lock, so timestamps and ages follow the
//! order in which operations apply.
//!
//! The optional ranking collaborator is consulted after the state lock is
//! released, on an owned snapshot of the candidates, and the winner is
//! picked from that snapshot.
//!
//! # Totality
//!
//! No operation fails. Unknown sessions are created lazily (`add`,
//! `navigate`, `search`) or ignored (`goto_end`, `remove_session`); blank
//! queries and empty histories yield an empty string.

use crate::clock::{Clock, SystemClock};
use crate::ranking::{select_best, Candidate, RankOverrides, RankingCollaborator};
use crate::terminal::{Direction, Recall, TerminalSession};
use parking_lot::{Mutex, RwLock};
use recall_core::{DocId, HistoryLine, RecallConfig, SessionId};
use recall_search::scorer::frequency_score;
use recall_search::{
    tokenize, BlendedScorer, BoolOrQuery, CandidateSignals, Field, InvertedIndex, Query, Scorer,
    ScorerContext,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

// ============================================================================
// HistoryStats
// ============================================================================

/// Point-in-time counters for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    /// Distinct lines in the canonical history
    pub lines: usize,
    /// Documents counted by the inverted index
    pub total_docs: usize,
    /// Distinct term keys in the inverted index
    pub terms: usize,
    /// Live terminal sessions
    pub sessions: usize,
}

// ============================================================================
// HistoryState
// ============================================================================

#[derive(Debug, Default)]
struct HistoryState {
    /// Canonical history, indexed by doc id
    lines: Vec<HistoryLine>,
    /// Dedup index: text -> doc id
    by_text: FxHashMap<String, DocId>,
    index: InvertedIndex,
    terminals: FxHashMap<SessionId, TerminalSession>,
}

fn terminal_entry(
    terminals: &mut FxHashMap<SessionId, TerminalSession>,
    session: SessionId,
    global_id_at_start: DocId,
) -> &mut TerminalSession {
    terminals.entry(session).or_insert_with(|| {
        debug!(
            target: "recall::history",
            session = %session,
            global_id_at_start,
            "Terminal session created"
        );
        TerminalSession::new(global_id_at_start)
    })
}

// ============================================================================
// HistoryStore
// ============================================================================

/// Process-wide command history with per-terminal recall and ranked search
pub struct HistoryStore {
    state: Mutex<HistoryState>,
    scorer: Box<dyn Scorer>,
    clock: Arc<dyn Clock>,
    collaborator: RwLock<Option<Arc<dyn RankingCollaborator>>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("stats", &self.stats())
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl HistoryStore {
    /// Create an empty store with default weights and the system clock
    pub fn new() -> Self {
        Self::with_config(&RecallConfig::default())
    }

    /// Create an empty store using the weights from `config`
    pub fn with_config(config: &RecallConfig) -> Self {
        HistoryStore {
            state: Mutex::new(HistoryState::default()),
            scorer: Box::new(BlendedScorer::new(config.scoring)),
            clock: Arc::new(SystemClock),
            collaborator: RwLock::new(None),
        }
    }

    /// Builder: replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builder: replace the scorer
    pub fn with_scorer<S: Scorer + 'static>(mut self, scorer: S) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Install an external ranking collaborator
    pub fn set_ranking_collaborator(&self, collaborator: Arc<dyn RankingCollaborator>) {
        debug!(
            target: "recall::search",
            collaborator = collaborator.name(),
            "Ranking collaborator installed"
        );
        *self.collaborator.write() = Some(collaborator);
    }

    /// Remove the external ranking collaborator, if any
    pub fn clear_ranking_collaborator(&self) {
        *self.collaborator.write() = None;
    }

    // ========================================================================
    // Ingress
    // ========================================================================

    /// Record an executed command for `session`
    ///
    /// New text gets the next dense id and is indexed; repeated text only
    /// bumps its count and timestamp. Either way the id is appended to the
    /// session's own log and any recall in progress is cancelled.
    ///
    /// Returns the id the text resolved to.
    pub fn add(&self, text: &str, session: SessionId) -> DocId {
        let mut guard = self.state.lock();
        let now = self.clock.now_nanos();
        let HistoryState {
            lines,
            by_text,
            index,
            terminals,
        } = &mut *guard;

        // Created before the line is appended, so a new session's global
        // partition starts just below its own first command.
        let terminal = terminal_entry(terminals, session, lines.len() as DocId);

        let doc_id = match by_text.get(text) {
            Some(&doc_id) => {
                if let Some(line) = lines.get_mut(doc_id as usize) {
                    line.touch(now);
                }
                doc_id
            }
            None => {
                let doc_id = lines.len() as DocId;
                lines.push(HistoryLine::new(doc_id, text.to_string(), now));
                by_text.insert(text.to_string(), doc_id);
                index.index_document(doc_id, text);
                debug!(
                    target: "recall::history",
                    doc_id,
                    terms = index.num_terms(),
                    "History line indexed"
                );
                doc_id
            }
        };

        terminal.record(doc_id);
        doc_id
    }

    /// Drop the state of `session`; unknown sessions are ignored
    pub fn remove_session(&self, session: SessionId) {
        if self.state.lock().terminals.remove(&session).is_some() {
            debug!(target: "recall::history", session = %session, "Terminal session removed");
        }
    }

    /// Cancel any recall in progress for `session`; unknown sessions are ignored
    pub fn goto_end(&self, session: SessionId) {
        if let Some(terminal) = self.state.lock().terminals.get_mut(&session) {
            terminal.goto_end();
        }
    }

    /// Move the recall cursor of `session` and return the text to display
    ///
    /// `buffer` is the caller's current input line; it is stashed when recall
    /// starts and returned when the cursor moves back past the newest entry.
    pub fn navigate(&self, direction: Direction, session: SessionId, buffer: &str) -> String {
        let mut guard = self.state.lock();
        let HistoryState {
            lines, terminals, ..
        } = &mut *guard;

        let terminal = terminal_entry(terminals, session, lines.len() as DocId);
        if lines.is_empty() {
            return String::new();
        }

        let recall = terminal.navigate(direction, buffer);
        trace!(
            target: "recall::nav",
            session = %session,
            ?direction,
            cursor = ?terminal.cursor(),
            "Cursor moved"
        );

        match recall {
            Recall::Line(doc_id) => lines
                .get(doc_id as usize)
                .map(|line| line.text.clone())
                .unwrap_or_default(),
            Recall::Buffer(text) => text,
        }
    }

    /// Recall the next older entry
    pub fn up(&self, session: SessionId, buffer: &str) -> String {
        self.navigate(Direction::Up, session, buffer)
    }

    /// Recall the next newer entry, or the stashed live buffer
    pub fn down(&self, session: SessionId, buffer: &str) -> String {
        self.navigate(Direction::Down, session, buffer)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Best-matching prior command for `text`, or an empty string
    ///
    /// Each whitespace token is matched as a prefix; candidates are ranked by
    /// the scorer, then by the ranking collaborator's overrides if one is
    /// installed.
    pub fn search(&self, text: &str, session: SessionId) -> String {
        let candidates = self.search_candidates(text, session);
        if candidates.is_empty() {
            return String::new();
        }

        let collaborator = self.collaborator.read().clone();
        let overrides = match collaborator {
            Some(c) => c.rank(session, &candidates),
            None => RankOverrides::new(),
        };

        match select_best(&candidates, &overrides) {
            Some(best) => {
                trace!(
                    target: "recall::search",
                    session = %session,
                    doc_id = best.doc_id,
                    total = best.total(),
                    overridden = overrides.get(best.doc_id).is_some(),
                    "Search result selected"
                );
                best.text.clone()
            }
            None => String::new(),
        }
    }

    /// Every candidate matching `text`, scored, in ascending doc id order
    ///
    /// Blank queries yield no candidates.
    pub fn search_candidates(&self, text: &str, session: SessionId) -> Vec<Candidate> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let mut guard = self.state.lock();
        let now = self.clock.now_nanos();
        let HistoryState {
            lines,
            index,
            terminals,
            ..
        } = &mut *guard;

        let terminal: &TerminalSession =
            terminal_entry(terminals, session, lines.len() as DocId);
        let index: &InvertedIndex = index;
        let ctx = ScorerContext::new(index.total_docs(), now);

        let terms: Vec<Query> = tokenize(text)
            .into_iter()
            .map(|token| index.term(Field::Prefix, token).into())
            .collect();
        let query: Query = BoolOrQuery::new(terms).into();

        let mut candidates = Vec::new();
        for hit in query {
            let Some(line) = lines.get(hit.doc_id as usize) else {
                continue;
            };
            let in_session = terminal.executed(hit.doc_id);
            let breakdown = self.scorer.score(
                &CandidateSignals {
                    doc_id: hit.doc_id,
                    tfidf: hit.score,
                    timestamp_nanos: line.timestamp_nanos,
                    occurrence_count: line.occurrence_count,
                    in_session,
                },
                &ctx,
            );

            debug!(
                target: "recall::search",
                doc_id = hit.doc_id,
                tfidf = breakdown.tfidf,
                time = breakdown.time,
                affinity = breakdown.affinity,
                frequency = frequency_score(line.occurrence_count),
                total = breakdown.total,
                age_secs = ctx.age_secs(line.timestamp_nanos),
                line = %line.text,
                "Scored candidate"
            );

            candidates.push(Candidate {
                doc_id: hit.doc_id,
                text: line.text.clone(),
                occurrence_count: line.occurrence_count,
                timestamp_nanos: line.timestamp_nanos,
                in_session,
                breakdown,
            });
        }
        candidates
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.state.lock().lines.len()
    }

    /// Check if no command was ever added
    pub fn is_empty(&self) -> bool {
        self.state.lock().lines.is_empty()
    }

    /// Snapshot of the line with `doc_id`
    pub fn line(&self, doc_id: DocId) -> Option<HistoryLine> {
        self.state.lock().lines.get(doc_id as usize).cloned()
    }

    /// Snapshot of the line with exactly this text
    pub fn line_by_text(&self, text: &str) -> Option<HistoryLine> {
        let guard = self.state.lock();
        guard
            .by_text
            .get(text)
            .and_then(|&doc_id| guard.lines.get(doc_id as usize))
            .cloned()
    }

    /// Whether `session` currently has state
    pub fn has_session(&self, session: SessionId) -> bool {
        self.state.lock().terminals.contains_key(&session)
    }

    /// Number of live terminal sessions
    pub fn session_count(&self) -> usize {
        self.state.lock().terminals.len()
    }

    /// Point-in-time counters
    pub fn stats(&self) -> HistoryStats {
        let guard = self.state.lock();
        HistoryStats {
            lines: guard.lines.len(),
            total_docs: guard.index.total_docs(),
            terms: guard.index.num_terms(),
            sessions: guard.terminals.len(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
