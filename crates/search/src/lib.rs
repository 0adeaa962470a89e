//! Search infrastructure for command history recall
//!
//! This crate provides:
//! - Whitespace tokenizer and edge-ngram (prefix) expansion
//! - InvertedIndex with exact and prefix term keys
//! - Document-at-a-time query engine (term + boolean-OR)
//! - Scorer trait and BlendedScorer default implementation
//!
//! # Usage
//!
//! ```
//! use recall_search::{BoolOrQuery, Field, InvertedIndex, Query};
//!
//! let mut index = InvertedIndex::new();
//! index.index_document(0, "git commit -m foo");
//! index.index_document(1, "cargo check");
//!
//! let query: Query = BoolOrQuery::new(vec![index.term(Field::Prefix, "com").into()]).into();
//! let hits: Vec<_> = query.map(|hit| hit.doc_id).collect();
//! assert_eq!(hits, vec![0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod query;
pub mod scorer;
pub mod tokenizer;

// Re-export commonly used types
pub use index::{Field, InvertedIndex, PostingList};
pub use query::{BoolOrQuery, Query, ScoredDocId, TermQuery};
pub use scorer::{BlendedScorer, CandidateSignals, ScoreBreakdown, Scorer, ScorerContext};
pub use tokenizer::{edge_ngrams, tokenize};
