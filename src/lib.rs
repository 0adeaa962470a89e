//! Recall - interactive shell command history
//!
//! Recall records executed commands, lets each terminal session walk back and
//! forth through history (arrow-key recall), and answers free-text searches
//! with the single best-matching prior command, ranked by prefix relevance,
//! recency and session affinity.
//!
//! # Quick Start
//!
//! ```
//! use recall::{HistoryStore, SessionId};
//!
//! let store = HistoryStore::new();
//! let shell = SessionId::new(4242);
//!
//! store.add("git commit -m foo", shell);
//! store.add("ls -la", shell);
//!
//! assert_eq!(store.up(shell, "gi"), "ls -la");
//! assert_eq!(store.up(shell, ""), "git commit -m foo");
//! assert_eq!(store.down(shell, ""), "ls -la");
//! assert_eq!(store.down(shell, ""), "gi");
//!
//! assert_eq!(store.search("com", shell), "git commit -m foo");
//! ```
//!
//! # Architecture
//!
//! - `recall-core`: ids, history lines, config and errors
//! - `recall-search`: tokenizer, inverted index, query engine, scorer
//! - `recall-engine`: terminal sessions and the locked `HistoryStore`

pub use recall_core::{
    DocId, Error, HistoryLine, RecallConfig, Result, ScoringWeights, SessionId, CONFIG_FILE_NAME,
    NANOS_PER_SEC,
};
pub use recall_engine::{
    select_best, Candidate, Clock, Cursor, Direction, HistoryStats, HistoryStore, ManualClock,
    RankOverrides, RankingCollaborator, Recall, SystemClock, TerminalSession,
};
pub use recall_search::{
    BlendedScorer, BoolOrQuery, CandidateSignals, Field, InvertedIndex, Query, ScoreBreakdown,
    ScoredDocId, Scorer, ScorerContext, TermQuery,
};
