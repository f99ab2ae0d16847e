//! Tokenizer: raw text to a bounded, weighted term mapping
//!
//! Turns document text into normalized index terms with accumulated
//! weights. The tokenizer never fails on malformed text; anything it
//! cannot use is discarded.

use crate::language::Language;
use lexica_core::IndexerConfig;
use std::collections::HashMap;
use tracing::debug;

/// Bounds applied by [`tokenize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserSettings {
    /// Cap on distinct terms admitted per call
    pub max_words: usize,
    /// Terms longer than this are truncated to this many characters
    pub max_word_length: usize,
    /// Tokens shorter than this are discarded
    pub min_word_length: usize,
    /// Discard tokens consisting entirely of digits
    pub filter_numbers: bool,
    /// Split camel-case compounds into sub-tokens
    pub split_compounds: bool,
}

impl ParserSettings {
    /// Bridge from the daemon configuration
    pub fn from_config(config: &IndexerConfig) -> Self {
        ParserSettings {
            max_words: config.max_words_to_index as usize,
            max_word_length: config.max_word_length as usize,
            min_word_length: config.min_word_length as usize,
            filter_numbers: config.filter_numbers,
            split_compounds: config.split_compounds,
        }
    }
}

/// Tokenize `text`, accumulating `weight` per occurrence into a term map
///
/// Raw tokens are word-character runs. Each token is case-folded,
/// length-bounded and checked against the language's stop words; surviving
/// terms accumulate `weight` per occurrence (saturating). Once `max_words`
/// distinct terms have been admitted, new terms are discarded but admitted
/// terms keep accumulating.
///
/// Empty input yields an empty map.
pub fn tokenize(
    text: &str,
    weight: i16,
    language: &Language,
    settings: &ParserSettings,
) -> HashMap<String, i16> {
    let mut terms: HashMap<String, i16> = HashMap::new();

    for raw in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        if settings.split_compounds {
            for part in split_compound(raw) {
                admit(part, weight, language, settings, &mut terms);
            }
        } else {
            admit(raw, weight, language, settings, &mut terms);
        }
    }

    debug!(
        target: "lexica::parser",
        terms = terms.len(),
        bytes = text.len(),
        "Tokenized text"
    );

    terms
}

/// Process one raw token through the filter chain
fn admit(
    raw: &str,
    weight: i16,
    language: &Language,
    settings: &ParserSettings,
    terms: &mut HashMap<String, i16>,
) {
    let mut term = language.normalize(raw);

    let length = term.chars().count();
    if length < settings.min_word_length {
        return;
    }

    if settings.filter_numbers && term.chars().all(|c| c.is_numeric()) {
        return;
    }

    // Truncate, never discard for length alone.
    if length > settings.max_word_length {
        term = term.chars().take(settings.max_word_length).collect();
    }

    if term.is_empty() || language.is_stop_word(&term) {
        return;
    }

    if !terms.contains_key(&term) && terms.len() >= settings.max_words {
        // Cap reached: no new terms, but admitted ones keep accumulating.
        return;
    }

    let total = terms.entry(term).or_insert(0);
    *total = total.saturating_add(weight);
}

/// Split a raw token at camel-case boundaries
///
/// Boundaries sit at lower→upper transitions and before the final upper of
/// an acronym run followed by lowercase ("XMLParser" → "XML", "Parser").
/// A token with no boundary comes back whole.
fn split_compound(token: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = token.char_indices().collect();
    if chars.len() < 2 {
        return vec![token];
    }

    let mut parts = Vec::new();
    let mut start = 0;
    for i in 1..chars.len() {
        let (offset, current) = chars[i];
        let prev = chars[i - 1].1;
        let next_is_lower = chars.get(i + 1).map_or(false, |&(_, n)| n.is_lowercase());

        let boundary = (prev.is_lowercase() && current.is_uppercase())
            || (prev.is_uppercase() && current.is_uppercase() && next_is_lower);

        if boundary {
            parts.push(&token[start..offset]);
            start = offset;
        }
    }
    parts.push(&token[start..]);
    parts
}
