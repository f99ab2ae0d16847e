//! Inverted index store with batched persistence
//!
//! `add_word` buffers weight deltas in memory; `flush` merges them into
//! the on-disk posting lists, one read-merge-write per touched term.
//! Lookups read the on-disk state only — callers that need buffered
//! writes visible must flush first.
//!
//! # Key Invariants
//!
//! - At most one posting per (term, document) pair; repeated additions
//!   accumulate into that posting's score, saturating at the i16 bounds.
//! - A flush failure leaves every unflushed term buffered; re-flushing is
//!   idempotent because the merge always reads the current on-disk list
//!   before writing.
//! - `close` never flushes implicitly.

use crate::bucket::BucketStore;
use crate::posting::{decode_list, encode_list, Posting};
use lexica_core::{Error, Result};
use rustc_hash::FxHashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Keys are length-prefixed with a u16 in the backing store
const MAX_TERM_LEN: usize = u16::MAX as usize;

/// Persistent inverted index: term → posting list
///
/// Not internally thread-safe; callers serialize all access (the daemon
/// drives one instance from a single worker).
pub struct InvertedIndex {
    store: BucketStore,
    pending: FxHashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    /// Open or create the index store at `path`
    ///
    /// `bucket_count` applies only when the store is created; an existing
    /// store keeps its geometry.
    pub fn open(path: &Path, bucket_count: u32) -> Result<Self> {
        let store = BucketStore::open(path, bucket_count)?;
        Ok(InvertedIndex {
            store,
            pending: FxHashMap::default(),
        })
    }

    /// Buffer a weight delta for `(term, document_id)`
    ///
    /// Cheap and non-blocking: no disk I/O happens here. A delta for a
    /// pair already buffered accumulates (saturating) instead of
    /// duplicating.
    pub fn add_word(&mut self, term: &str, document_id: u32, weight: i16, flags: u16) -> Result<()> {
        if term.is_empty() {
            return Err(Error::InvalidInput("empty term".to_string()));
        }
        if term.len() > MAX_TERM_LEN {
            return Err(Error::InvalidInput(format!(
                "term length {} exceeds {}",
                term.len(),
                MAX_TERM_LEN
            )));
        }

        let deltas = self.pending.entry(term.to_string()).or_default();
        match deltas.iter_mut().find(|p| p.document_id == document_id) {
            Some(posting) => posting.add_score(weight),
            None => deltas.push(Posting::new(document_id, weight, flags)),
        }
        Ok(())
    }

    /// Merge every buffered delta into the on-disk posting lists
    ///
    /// Terms are dropped from the buffer one by one as their merged lists
    /// land in the store, so a failure partway keeps the unflushed
    /// remainder (including the failing term) for retry. Returns the
    /// number of terms written; an empty buffer is a no-op.
    pub fn flush(&mut self) -> Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        let terms: Vec<String> = self.pending.keys().cloned().collect();
        let mut flushed = 0;

        for term in terms {
            let merged = {
                let mut postings = match self.store.get(term.as_bytes()) {
                    Ok(Some(bytes)) => match decode_list(&bytes) {
                        Ok(postings) => postings,
                        Err(Error::CorruptRecord(detail)) => {
                            // Treat the term as unindexed and rebuild it
                            // from the buffered deltas.
                            warn!(
                                target: "lexica::store",
                                term = %term,
                                detail = %detail,
                                "Corrupt posting list replaced during flush"
                            );
                            Vec::new()
                        }
                        Err(e) => return Err(e),
                    },
                    Ok(None) => Vec::new(),
                    Err(Error::CorruptRecord(detail)) => {
                        warn!(
                            target: "lexica::store",
                            term = %term,
                            detail = %detail,
                            "Corrupt record replaced during flush"
                        );
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                };
                merge_postings(&mut postings, &self.pending[&term]);
                encode_list(&postings)
            };

            self.store.put(term.as_bytes(), &merged)?;
            self.pending.remove(&term);
            flushed += 1;
        }

        self.store.sync()?;
        debug!(target: "lexica::store", terms = flushed, "Flushed pending postings");
        Ok(flushed)
    }

    /// Read the posting list persisted for `term`
    ///
    /// Never consults the pending buffer; an absent term yields an empty
    /// list.
    pub fn lookup(&mut self, term: &str) -> Result<Vec<Posting>> {
        match self.store.get(term.as_bytes())? {
            Some(bytes) => decode_list(&bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Number of distinct terms persisted in the store
    pub fn word_count(&self) -> u64 {
        self.store.term_count()
    }

    /// Number of terms with buffered, not-yet-flushed deltas
    pub fn pending_words(&self) -> usize {
        self.pending.len()
    }

    /// Release the store handle
    ///
    /// Does NOT flush; buffered deltas still pending at this point are
    /// dropped (and logged).
    pub fn close(self) -> Result<()> {
        if !self.pending.is_empty() {
            warn!(
                target: "lexica::store",
                dropped = self.pending.len(),
                "Closing index with unflushed postings"
            );
        }
        self.store.close()
    }
}

/// Fold `deltas` into `postings`, matching by document id
///
/// Score accumulates saturating; the existing posting's flags win. Deltas
/// for unseen documents append.
fn merge_postings(postings: &mut Vec<Posting>, deltas: &[Posting]) {
    for delta in deltas {
        match postings.iter_mut().find(|p| p.document_id == delta.document_id) {
            Some(existing) => existing.add_score(delta.score),
            None => postings.push(*delta),
        }
    }
}
