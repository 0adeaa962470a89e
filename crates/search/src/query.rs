//! Document-at-a-time query engine
//!
//! Queries are pull-based cursors over posting lists:
//! - `advance()` moves to the next matching document and reports whether one exists
//! - `doc_id()` is the document the cursor is positioned on
//! - `score()` is the relevance of that position
//!
//! `Query` is a closed enum over the two query shapes. A boolean-OR composes
//! sub-queries through the same three operations, so further shapes slot in
//! as new variants without touching callers.
//!
//! Queries borrow posting slices from the index. They are single-use,
//! single-threaded, and cannot outlive the borrow of the index that built
//! them.

use recall_core::DocId;

// ============================================================================
// ScoredDocId
// ============================================================================

/// One emitted query position: doc id + relevance score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDocId {
    /// Matching document
    pub doc_id: DocId,
    /// Summed tf-idf relevance
    pub score: f32,
}

// ============================================================================
// TermQuery
// ============================================================================

/// Cursor over a single posting list
///
/// Adjacent repeats of a doc id are coalesced into one position scored
/// `tf * idf`, where `tf` is the repeat count.
#[derive(Debug, Clone)]
pub struct TermQuery<'a> {
    postings: &'a [DocId],
    idf: f32,
    pos: usize,
    current: Option<DocId>,
    score: f32,
}

impl<'a> TermQuery<'a> {
    /// Create a cursor over `postings` with the term's inverse document frequency
    pub fn new(postings: &'a [DocId], idf: f32) -> Self {
        TermQuery {
            postings,
            idf,
            pos: 0,
            current: None,
            score: 0.0,
        }
    }

    /// A query for a term that was never indexed
    pub fn empty() -> Self {
        Self::new(&[], 0.0)
    }

    /// Move to the next distinct document
    pub fn advance(&mut self) -> bool {
        let Some(&doc_id) = self.postings.get(self.pos) else {
            self.current = None;
            self.score = 0.0;
            return false;
        };

        let start = self.pos;
        while self.pos < self.postings.len() && self.postings[self.pos] == doc_id {
            self.pos += 1;
        }
        let tf = (self.pos - start) as f32;

        self.current = Some(doc_id);
        self.score = tf * self.idf;
        true
    }

    /// Current document, `None` before the first advance and after exhaustion
    pub fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    /// Score of the current position
    pub fn score(&self) -> f32 {
        self.score
    }
}

// ============================================================================
// BoolOrQuery
// ============================================================================

/// Union of sub-queries, merged by ascending doc id
///
/// Each step emits the smallest doc id any live sub-query is positioned on,
/// with the sum of the scores of every sub-query positioned there.
#[derive(Debug, Clone)]
pub struct BoolOrQuery<'a> {
    subs: Vec<Query<'a>>,
    started: bool,
    current: Option<DocId>,
    score: f32,
}

impl<'a> BoolOrQuery<'a> {
    /// Create a union over `subs`
    pub fn new(subs: Vec<Query<'a>>) -> Self {
        BoolOrQuery {
            subs,
            started: false,
            current: None,
            score: 0.0,
        }
    }

    /// Number of sub-queries
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Check if the union has no sub-queries
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Move to the next document matched by any sub-query
    pub fn advance(&mut self) -> bool {
        if !self.started {
            self.started = true;
            for sub in &mut self.subs {
                sub.advance();
            }
        } else if self.current.is_none() {
            return false;
        }

        let Some(min) = self.subs.iter().filter_map(Query::doc_id).min() else {
            self.current = None;
            self.score = 0.0;
            return false;
        };

        let mut sum = 0.0;
        for sub in &mut self.subs {
            if sub.doc_id() == Some(min) {
                sum += sub.score();
                sub.advance();
            }
        }

        self.current = Some(min);
        self.score = sum;
        true
    }

    /// Current document, `None` before the first advance and after exhaustion
    pub fn doc_id(&self) -> Option<DocId> {
        self.current
    }

    /// Summed score of the current position
    pub fn score(&self) -> f32 {
        self.score
    }
}

// ============================================================================
// Query
// ============================================================================

/// Any query shape
#[derive(Debug, Clone)]
pub enum Query<'a> {
    /// Single posting list
    Term(TermQuery<'a>),
    /// Union of sub-queries
    BoolOr(BoolOrQuery<'a>),
}

impl<'a> Query<'a> {
    /// Move to the next matching document
    pub fn advance(&mut self) -> bool {
        match self {
            Query::Term(q) => q.advance(),
            Query::BoolOr(q) => q.advance(),
        }
    }

    /// Current document, `None` before the first advance and after exhaustion
    pub fn doc_id(&self) -> Option<DocId> {
        match self {
            Query::Term(q) => q.doc_id(),
            Query::BoolOr(q) => q.doc_id(),
        }
    }

    /// Score of the current position
    pub fn score(&self) -> f32 {
        match self {
            Query::Term(q) => q.score(),
            Query::BoolOr(q) => q.score(),
        }
    }

    /// Drain every remaining position
    pub fn collect_all(self) -> Vec<ScoredDocId> {
        self.collect()
    }
}

impl<'a> Iterator for Query<'a> {
    type Item = ScoredDocId;

    fn next(&mut self) -> Option<ScoredDocId> {
        if !self.advance() {
            return None;
        }
        self.doc_id().map(|doc_id| ScoredDocId {
            doc_id,
            score: self.score(),
        })
    }
}

impl<'a> From<TermQuery<'a>> for Query<'a> {
    fn from(q: TermQuery<'a>) -> Self {
        Query::Term(q)
    }
}

impl<'a> From<BoolOrQuery<'a>> for Query<'a> {
    fn from(q: BoolOrQuery<'a>) -> Self {
        Query::BoolOr(q)
    }
}

// ============================================================================
// Tests
// ============================================================================
