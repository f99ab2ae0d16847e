//! Default bounds for the indexing engine
//!
//! These values mirror the desktop daemon's shipped defaults. Hard limits
//! exist so a bad config file cannot push the tokenizer or the store into
//! pathological territory.

/// Default minimum word length; shorter tokens are discarded
pub const DEFAULT_MIN_WORD_LENGTH: u32 = 3;

/// Default maximum word length; longer tokens are truncated, not discarded
pub const DEFAULT_MAX_WORD_LENGTH: u32 = 30;

/// Default cap on distinct terms admitted per document
pub const DEFAULT_MAX_WORDS_TO_INDEX: u32 = 10_000;

/// Default language code for stop-word selection
pub const DEFAULT_LANGUAGE: &str = "en";

/// Whether all-digit tokens are filtered out by default
pub const DEFAULT_FILTER_NUMBERS: bool = false;

/// Whether camel-case compounds are split into sub-tokens by default
pub const DEFAULT_SPLIT_COMPOUNDS: bool = true;

/// Default bucket count for a newly created index store
///
/// Fixed at creation time; reopening an existing store keeps the count it
/// was created with.
pub const DEFAULT_BUCKET_COUNT: u32 = 65_536;

/// Hard upper bound accepted for `max_word_length`
pub const MAX_WORD_LENGTH_LIMIT: u32 = 200;

/// Hard upper bound accepted for `max_words_to_index`
pub const MAX_WORDS_TO_INDEX_LIMIT: u32 = 1_000_000;

/// Hard upper bound accepted for `bucket_count`
pub const MAX_BUCKET_COUNT_LIMIT: u32 = 1 << 24;
