//! Indexer configuration
//!
//! Typed configuration persisted as pretty-printed JSON. The engine never
//! watches the config file itself; an external watcher is expected to call
//! [`IndexerConfig::reload`] when the file changes on disk.

use crate::error::{Error, Result};
use crate::limits::{
    DEFAULT_BUCKET_COUNT, DEFAULT_FILTER_NUMBERS, DEFAULT_LANGUAGE, DEFAULT_MAX_WORDS_TO_INDEX,
    DEFAULT_MAX_WORD_LENGTH, DEFAULT_MIN_WORD_LENGTH, DEFAULT_SPLIT_COMPOUNDS,
    MAX_BUCKET_COUNT_LIMIT, MAX_WORDS_TO_INDEX_LIMIT, MAX_WORD_LENGTH_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Configuration for the indexing engine
///
/// Controls the tokenizer bounds and the store geometry. Unknown keys in
/// the file are ignored on load so older daemons can read newer files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Language code used to select the stop-word set
    pub language: String,
    /// Tokens shorter than this are discarded
    pub min_word_length: u32,
    /// Tokens longer than this are truncated
    pub max_word_length: u32,
    /// Cap on distinct terms admitted per document
    pub max_words_to_index: u32,
    /// Discard tokens consisting entirely of digits
    pub filter_numbers: bool,
    /// Split camel-case compounds into sub-tokens
    pub split_compounds: bool,
    /// Trade index throughput for a smaller pending buffer
    pub low_memory_mode: bool,
    /// Bucket count for a newly created store (immutable once created)
    pub bucket_count: u32,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        IndexerConfig {
            language: DEFAULT_LANGUAGE.to_string(),
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
            max_word_length: DEFAULT_MAX_WORD_LENGTH,
            max_words_to_index: DEFAULT_MAX_WORDS_TO_INDEX,
            filter_numbers: DEFAULT_FILTER_NUMBERS,
            split_compounds: DEFAULT_SPLIT_COMPOUNDS,
            low_memory_mode: false,
            bucket_count: DEFAULT_BUCKET_COUNT,
        }
    }
}

impl IndexerConfig {
    /// Set the language code
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the minimum and maximum word lengths
    pub fn with_word_lengths(mut self, min: u32, max: u32) -> Self {
        self.min_word_length = min;
        self.max_word_length = max;
        self
    }

    /// Set the distinct-term cap
    pub fn with_max_words_to_index(mut self, max_words: u32) -> Self {
        self.max_words_to_index = max_words;
        self
    }

    /// Enable or disable all-digit token filtering
    pub fn with_filter_numbers(mut self, filter: bool) -> Self {
        self.filter_numbers = filter;
        self
    }

    /// Enable or disable compound splitting
    pub fn with_split_compounds(mut self, split: bool) -> Self {
        self.split_compounds = split;
        self
    }

    /// Set the bucket count used when creating a new store
    pub fn with_bucket_count(mut self, bucket_count: u32) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    /// Validate the configuration
    ///
    /// Rejects inconsistent bounds before they reach the tokenizer or the
    /// store.
    pub fn validate(&self) -> Result<()> {
        if self.max_word_length == 0 {
            return Err(Error::InvalidInput(
                "max_word_length must be non-zero".to_string(),
            ));
        }
        if self.min_word_length > self.max_word_length {
            return Err(Error::InvalidInput(format!(
                "min_word_length {} exceeds max_word_length {}",
                self.min_word_length, self.max_word_length
            )));
        }
        if self.max_word_length > MAX_WORD_LENGTH_LIMIT {
            return Err(Error::InvalidInput(format!(
                "max_word_length {} exceeds limit {}",
                self.max_word_length, MAX_WORD_LENGTH_LIMIT
            )));
        }
        if self.max_words_to_index > MAX_WORDS_TO_INDEX_LIMIT {
            return Err(Error::InvalidInput(format!(
                "max_words_to_index {} exceeds limit {}",
                self.max_words_to_index, MAX_WORDS_TO_INDEX_LIMIT
            )));
        }
        if self.bucket_count == 0 || self.bucket_count > MAX_BUCKET_COUNT_LIMIT {
            return Err(Error::InvalidInput(format!(
                "bucket_count {} out of range 1..={}",
                self.bucket_count, MAX_BUCKET_COUNT_LIMIT
            )));
        }
        Ok(())
    }

    /// Load configuration from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: IndexerConfig = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(target: "lexica::config", path = ?path, "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults if the file is absent
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = IndexerConfig::default();
            config.save(path)?;
            info!(target: "lexica::config", path = ?path, "Wrote default configuration");
            return Ok(config);
        }
        Self::load(path)
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Re-read the file at `path`, replacing this configuration in place
    ///
    /// Invoked by the external file-watch collaborator. Returns `true` when
    /// any field changed.
    pub fn reload(&mut self, path: &Path) -> Result<bool> {
        let fresh = Self::load(path)?;
        if fresh == *self {
            return Ok(false);
        }
        info!(target: "lexica::config", path = ?path, "Configuration reloaded");
        *self = fresh;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexerConfig::default();
        assert_eq!(config.language, "en");
        assert_eq!(config.min_word_length, DEFAULT_MIN_WORD_LENGTH);
        assert_eq!(config.max_word_length, DEFAULT_MAX_WORD_LENGTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = IndexerConfig::default()
            .with_language("sv")
            .with_word_lengths(2, 64)
            .with_max_words_to_index(500)
            .with_filter_numbers(true)
            .with_bucket_count(128);

        assert_eq!(config.language, "sv");
        assert_eq!(config.min_word_length, 2);
        assert_eq!(config.max_word_length, 64);
        assert_eq!(config.max_words_to_index, 500);
        assert!(config.filter_numbers);
        assert_eq!(config.bucket_count, 128);
    }

    #[test]
    fn test_validate_rejects_inverted_lengths() {
        let config = IndexerConfig::default().with_word_lengths(10, 5);
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_zero_buckets() {
        let config = IndexerConfig::default().with_bucket_count(0);
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.cfg");

        let config = IndexerConfig::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, IndexerConfig::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.cfg");

        let config = IndexerConfig::default()
            .with_word_lengths(2, 18)
            .with_filter_numbers(true);
        config.save(&path).unwrap();

        let loaded = IndexerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_reload_detects_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.cfg");

        let mut config = IndexerConfig::default();
        config.save(&path).unwrap();
        assert!(!config.reload(&path).unwrap());

        IndexerConfig::default()
            .with_language("de")
            .save(&path)
            .unwrap();
        assert!(config.reload(&path).unwrap());
        assert_eq!(config.language, "de");
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.cfg");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            IndexerConfig::load(&path),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_load_ignores_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.cfg");
        std::fs::write(&path, r#"{ "language": "en", "future_knob": 9 }"#).unwrap();

        let config = IndexerConfig::load(&path).unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.max_word_length, DEFAULT_MAX_WORD_LENGTH);
    }
}
