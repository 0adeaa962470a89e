//! Inverted index over command history
//!
//! This module provides:
//! - Field: exact-token vs. prefix (edge ngram) term keys
//! - PostingList: ordered doc ids with repeats as term frequency
//! - InvertedIndex: term key -> posting list, plus corpus statistics
//!
//! # Posting Layout
//!
//! A posting list stores one `u32` doc id per occurrence. Documents are
//! indexed in increasing id order, so every list is non-decreasing, and
//! repeats of an id are always adjacent. The run length of an id is the term
//! frequency of that (term, document) pair.
//!
//! # Thread Safety
//!
//! The index is plain data. The history store owns it behind its single
//! lock; it is never shared on its own.

use crate::query::TermQuery;
use crate::tokenizer::{edge_ngrams, tokenize};
use recall_core::DocId;
use rustc_hash::FxHashMap;

// ============================================================================
// Field
// ============================================================================

/// Which family of terms a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Whole token, keyed `t_<token>`
    Exact,
    /// Leading prefix of a token, keyed `e_<prefix>`
    Prefix,
}

impl Field {
    /// Key prefix used in the term table
    pub const fn tag(&self) -> &'static str {
        match self {
            Field::Exact => "t_",
            Field::Prefix => "e_",
        }
    }

    /// Build the term key for `token` in this field
    pub fn key(&self, token: &str) -> String {
        let tag = self.tag();
        let mut key = String::with_capacity(tag.len() + token.len());
        key.push_str(tag);
        key.push_str(token);
        key
    }
}

// ============================================================================
// PostingList
// ============================================================================

/// Occurrences of one term, in non-decreasing doc id order
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    /// One entry per occurrence; adjacent repeats encode term frequency
    doc_ids: Vec<DocId>,
    /// Number of distinct documents in `doc_ids`
    doc_freq: usize,
}

impl PostingList {
    /// Create a new empty posting list
    pub fn new() -> Self {
        PostingList {
            doc_ids: vec![],
            doc_freq: 0,
        }
    }

    /// Append one occurrence of the term in `doc_id`
    ///
    /// Ids must arrive in non-decreasing order.
    pub fn add(&mut self, doc_id: DocId) {
        match self.doc_ids.last() {
            Some(&last) if last == doc_id => {}
            last => {
                debug_assert!(
                    last.map_or(true, |&l| l < doc_id),
                    "posting ids must be appended in non-decreasing order"
                );
                self.doc_freq += 1;
            }
        }
        self.doc_ids.push(doc_id);
    }

    /// Raw occurrence entries
    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    /// Number of distinct documents containing this term
    pub fn doc_freq(&self) -> usize {
        self.doc_freq
    }

    /// Number of occurrence entries (repeats included)
    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    /// Check if posting list is empty
    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }
}

// ============================================================================
// InvertedIndex
// ============================================================================

/// Term key -> posting list mapping with document statistics
#[derive(Debug, Default)]
pub struct InvertedIndex {
    /// Term key -> PostingList mapping
    postings: FxHashMap<String, PostingList>,

    /// Distinct documents indexed
    total_docs: usize,
}

impl InvertedIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        InvertedIndex {
            postings: FxHashMap::default(),
            total_docs: 0,
        }
    }

    // ========================================================================
    // Index Updates
    // ========================================================================

    /// Append `doc_id` to the posting list of `term_key`
    ///
    /// Repeats are allowed and count as term frequency.
    pub fn add(&mut self, doc_id: DocId, term_key: &str) {
        match self.postings.get_mut(term_key) {
            Some(list) => list.add(doc_id),
            None => {
                let mut list = PostingList::new();
                list.add(doc_id);
                self.postings.insert(term_key.to_string(), list);
            }
        }
    }

    /// Index every term of a new document and count it
    ///
    /// For each token: one exact key, plus one prefix key per leading prefix.
    /// Must be called once per distinct document, in increasing id order.
    pub fn index_document(&mut self, doc_id: DocId, text: &str) {
        for token in tokenize(text) {
            self.add(doc_id, &Field::Exact.key(token));
            for prefix in edge_ngrams(token) {
                self.add(doc_id, &Field::Prefix.key(prefix));
            }
        }
        self.total_docs += 1;
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Get total number of indexed documents
    pub fn total_docs(&self) -> usize {
        self.total_docs
    }

    /// Get number of distinct term keys
    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// Get document frequency for a term key
    pub fn doc_freq(&self, term_key: &str) -> usize {
        self.postings.get(term_key).map_or(0, PostingList::doc_freq)
    }

    /// Inverse document frequency of a term key
    ///
    /// `IDF(t) = ln(1 + N / df)`; zero for a term that was never indexed.
    pub fn idf(&self, term_key: &str) -> f32 {
        idf(self.total_docs, self.doc_freq(term_key))
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Lookup the posting list of a term key
    pub fn lookup(&self, term_key: &str) -> Option<&PostingList> {
        self.postings.get(term_key)
    }

    /// Build a single-term query over `field` + `token`
    ///
    /// A term that was never indexed yields a query that is immediately
    /// exhausted.
    pub fn term(&self, field: Field, token: &str) -> TermQuery<'_> {
        let key = field.key(token);
        match self.postings.get(&key) {
            Some(list) => TermQuery::new(list.doc_ids(), idf(self.total_docs, list.doc_freq())),
            None => TermQuery::empty(),
        }
    }
}

fn idf(total_docs: usize, doc_freq: usize) -> f32 {
    if doc_freq == 0 {
        return 0.0;
    }
    (1.0 + total_docs as f32 / doc_freq as f32).ln()
}

// ============================================================================
// Tests
// ============================================================================
