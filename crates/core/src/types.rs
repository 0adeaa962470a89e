//! Core types for command history recall
//!
//! This module defines the foundational types:
//! - DocId: Dense identifier of a distinct history line
//! - SessionId: Identifier of an interactive terminal session
//! - HistoryLine: One distinct command text with its usage statistics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense document identifier
///
/// Assigned in insertion order of first occurrence, starting at 0.
/// Never reused and never reassigned.
pub type DocId = u32;

/// Nanoseconds per second, for converting history timestamps
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Identifier of an interactive terminal session
///
/// Supplied by the caller (typically the shell's process id). Assumed unique
/// for the lifetime of one interactive session and not reused until the
/// session has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl SessionId {
    /// Create a SessionId from a raw process/session number
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw session number
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for SessionId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One distinct command in the canonical history
///
/// Identity is `text`: at most one HistoryLine exists per distinct text.
/// Repeat insertion mutates the line in place (count and timestamp), it is
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLine {
    /// Dense id assigned on first occurrence
    pub id: DocId,
    /// Exact command text
    pub text: String,
    /// Time of the most recent execution, nanoseconds since the Unix epoch
    pub timestamp_nanos: u64,
    /// Number of times this exact text has been executed
    pub occurrence_count: u64,
}

impl HistoryLine {
    /// Create a line for its first occurrence
    pub fn new(id: DocId, text: String, timestamp_nanos: u64) -> Self {
        HistoryLine {
            id,
            text,
            timestamp_nanos,
            occurrence_count: 1,
        }
    }

    /// Record a repeat execution of the same text
    pub fn touch(&mut self, timestamp_nanos: u64) {
        self.occurrence_count += 1;
        self.timestamp_nanos = timestamp_nanos;
    }
}
