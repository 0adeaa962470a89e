//! Core types for command history recall
//!
//! This crate defines the foundational types used throughout the system:
//! - DocId: Dense id of a distinct history line
//! - SessionId: Identifier of an interactive terminal session
//! - HistoryLine: One distinct command with its count and timestamp
//! - Error: Error type for the configuration boundary
//! - RecallConfig / ScoringWeights: Ranking configuration (`recall.toml`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{RecallConfig, ScoringWeights, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use types::{DocId, HistoryLine, SessionId, NANOS_PER_SEC};
