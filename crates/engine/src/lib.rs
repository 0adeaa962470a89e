//! History engine for command recall
//!
//! This crate orchestrates the search layer and per-terminal state:
//! - HistoryStore: canonical history, dedup, inverted index and sessions
//!   behind a single lock
//! - TerminalSession: per-terminal command log and recall cursor
//! - Clock: injectable time source
//! - RankingCollaborator: contract for external re-ranking

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod history;
pub mod ranking;
pub mod terminal;

pub use clock::{Clock, ManualClock, SystemClock};
pub use history::{HistoryStats, HistoryStore};
pub use ranking::{select_best, Candidate, RankOverrides, RankingCollaborator};
pub use terminal::{Cursor, Direction, Recall, TerminalSession};
