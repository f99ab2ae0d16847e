//! Lexica - desktop full-text indexing engine
//!
//! Lexica turns document text into normalized, weighted index terms and
//! maintains a persistent inverted index over them, built for a desktop
//! search daemon indexing the local filesystem.
//!
//! # Quick Start
//!
//! ```no_run
//! use lexica::{Indexer, IndexerConfig};
//!
//! # fn main() -> lexica::Result<()> {
//! let mut indexer = Indexer::open(std::path::Path::new("/var/lib/search"),
//!                                 IndexerConfig::default())?;
//!
//! // Buffer a document's terms, then commit them to disk.
//! indexer.index_text(42, "The quick brown fox", 1, 0)?;
//! indexer.flush()?;
//!
//! // Query the persisted posting list for one term.
//! let postings = indexer.lookup("quick")?;
//! # let _ = postings;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The write path is batched: [`Indexer::index_text`] tokenizes and
//! buffers deltas in memory; [`Indexer::flush`] merges them into the
//! on-disk posting lists. Reads go straight to disk. The engine is
//! single-writer; callers serialize access to one [`Indexer`].

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use lexica_core::{limits, Error, IndexerConfig, Result};
pub use lexica_store::{BucketStore, InvertedIndex, Posting, POSTING_SIZE};
pub use lexica_text::{tokenize, Language, ParserSettings};

/// File name of the word index inside the index directory
pub const INDEX_FILE_NAME: &str = "words.idx";

/// The ingestion pipeline: one config, one language, one index store
///
/// Owns every moving part explicitly — there are no process-wide
/// singletons. The external crawler feeds documents in; the external
/// file watcher calls [`Indexer::reload_config`] when the config file
/// changes.
pub struct Indexer {
    config: IndexerConfig,
    language: Language,
    index: InvertedIndex,
    index_path: PathBuf,
}

impl Indexer {
    /// Open the index under `dir`, creating the directory and store as
    /// needed
    pub fn open(dir: &Path, config: IndexerConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(dir)?;

        let index_path = dir.join(INDEX_FILE_NAME);
        let index = InvertedIndex::open(&index_path, config.bucket_count)?;
        let language = Language::new(&config.language);

        info!(
            target: "lexica::indexer",
            path = ?index_path,
            language = %config.language,
            "Indexer ready"
        );

        Ok(Indexer {
            config,
            language,
            index,
            index_path,
        })
    }

    /// Tokenize `text` and buffer its terms for `document_id`
    ///
    /// Returns the number of distinct terms buffered for this document.
    pub fn index_text(
        &mut self,
        document_id: u32,
        text: &str,
        weight: i16,
        flags: u16,
    ) -> Result<usize> {
        let settings = ParserSettings::from_config(&self.config);
        let terms = tokenize(text, weight, &self.language, &settings);
        let count = terms.len();

        for (term, accumulated) in terms {
            self.index.add_word(&term, document_id, accumulated, flags)?;
        }

        debug!(
            target: "lexica::indexer",
            document_id,
            terms = count,
            "Buffered document terms"
        );
        Ok(count)
    }

    /// Commit buffered postings to disk; see [`InvertedIndex::flush`]
    pub fn flush(&mut self) -> Result<usize> {
        self.index.flush()
    }

    /// Read the persisted posting list for `term`
    pub fn lookup(&mut self, term: &str) -> Result<Vec<Posting>> {
        self.index.lookup(term)
    }

    /// Number of distinct terms persisted
    pub fn word_count(&self) -> u64 {
        self.index.word_count()
    }

    /// Number of terms with buffered, unflushed deltas
    pub fn pending_words(&self) -> usize {
        self.index.pending_words()
    }

    /// The configuration currently in effect
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Path of the on-disk word index
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Apply an externally-triggered configuration reload
    ///
    /// The engine never watches files itself; the collaborator that does
    /// calls this with the re-read configuration. Rebuilds the language
    /// rules when the language code changed. Store geometry is fixed at
    /// creation, so `bucket_count` changes only apply to future stores.
    pub fn reload_config(&mut self, config: IndexerConfig) -> Result<()> {
        config.validate()?;
        if config.language != self.config.language {
            self.language = Language::new(&config.language);
            info!(
                target: "lexica::indexer",
                language = %config.language,
                "Language rules rebuilt"
            );
        }
        self.config = config;
        Ok(())
    }

    /// Release the store handle
    ///
    /// Buffered deltas are NOT flushed implicitly; call [`Indexer::flush`]
    /// first.
    pub fn close(self) -> Result<()> {
        self.index.close()
    }
}
