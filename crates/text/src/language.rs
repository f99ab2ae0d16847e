//! Language rules: stop-word sets and normalization
//!
//! A [`Language`] is built once from a language code and is read-only
//! thereafter. The tokenizer holds a reference to it; nothing mutates the
//! rules after construction.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Built-in English stop words
///
/// Function words that carry no retrieval value. The set matches what the
/// desktop daemon ships for "en".
static STOP_WORDS_EN: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so",
    "some", "such", "than", "that", "the", "their", "theirs", "them", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
    "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "you", "your", "yours", "yourself",
];

static BUILTIN_STOP_WORDS: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| {
        let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        map.insert("en", STOP_WORDS_EN);
        map
    });

/// Stop-word set and normalization rules for one language
#[derive(Debug, Clone)]
pub struct Language {
    code: String,
    stop_words: HashSet<String>,
}

impl Language {
    /// Build the rules for a language code
    ///
    /// Known codes get their built-in stop-word set; unknown codes get an
    /// empty one (every term is indexable).
    pub fn new(code: &str) -> Self {
        let stop_words = BUILTIN_STOP_WORDS
            .get(code)
            .map(|words| words.iter().map(|w| (*w).to_string()).collect())
            .unwrap_or_default();
        Language {
            code: code.to_string(),
            stop_words,
        }
    }

    /// Rules with no stop words at all
    pub fn none() -> Self {
        Language {
            code: String::new(),
            stop_words: HashSet::new(),
        }
    }

    /// Rules with a caller-supplied stop-word set
    pub fn with_stop_words<I, S>(code: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Language {
            code: code.to_string(),
            stop_words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// The language code these rules were built for
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether `term` carries no retrieval value in this language
    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }

    /// Number of stop words in the set
    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }

    /// Case-fold a raw token
    ///
    /// Unicode-aware lowercase. Case folding is the only normalization the
    /// engine applies; stemming is a per-language concern left to future
    /// rules.
    pub fn normalize(&self, raw: &str) -> String {
        raw.to_lowercase()
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::new("en")
    }
}
