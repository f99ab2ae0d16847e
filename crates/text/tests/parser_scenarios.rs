//! Tokenizer scenario tests
//!
//! Exercises the documented bound semantics against one fixed sample text,
//! plus property checks over arbitrary input.

use lexica_text::{tokenize, Language, ParserSettings};
use proptest::prelude::*;

// len(word) >= 3: 7 candidates; longest word: 10 chars
const SAMPLE_TEXT: &str = "Here a good collection of various words to parse 12345678";

fn settings(
    max_words: usize,
    max_word_length: usize,
    min_word_length: usize,
    filter_numbers: bool,
) -> ParserSettings {
    ParserSettings {
        max_words,
        max_word_length,
        min_word_length,
        filter_numbers,
        split_compounds: false,
    }
}

#[test]
fn max_words_to_index_caps_distinct_terms() {
    let terms = tokenize(
        SAMPLE_TEXT,
        1,
        &Language::none(),
        &settings(5, 18, 3, false),
    );
    assert_eq!(terms.len(), 5);
}

#[test]
fn max_length_truncates_instead_of_excluding() {
    let max_length = 6;
    let terms = tokenize(
        SAMPLE_TEXT,
        1,
        &Language::none(),
        &settings(10, max_length, 3, false),
    );
    assert_eq!(terms.len(), 7);
    for term in terms.keys() {
        assert!(term.chars().count() <= max_length, "term too long: {term}");
    }
}

#[test]
fn filter_numbers_drops_all_digit_tokens() {
    let terms = tokenize(
        SAMPLE_TEXT,
        1,
        &Language::none(),
        &settings(100, 100, 1, true),
    );
    assert!(!terms.contains_key("12345678"));
    assert_eq!(terms.len(), 9);

    let terms = tokenize(
        SAMPLE_TEXT,
        1,
        &Language::none(),
        &settings(100, 100, 1, false),
    );
    assert!(terms.contains_key("12345678"));
    assert_eq!(terms.len(), 10);
}

#[test]
fn stop_words_are_discarded() {
    let terms = tokenize(
        SAMPLE_TEXT,
        1,
        &Language::new("en"),
        &settings(100, 100, 1, false),
    );
    // "here", "a", "of", "to" are English stop words.
    assert!(!terms.contains_key("here"));
    assert!(!terms.contains_key("of"));
    assert!(terms.contains_key("collection"));
    assert!(terms.contains_key("parse"));
}

#[test]
fn default_english_stop_words_present() {
    let language = Language::new("en");
    assert!(language.stop_word_count() > 1);
    assert!(language.is_stop_word("after"));
}

proptest! {
    #[test]
    fn no_term_shorter_than_min_length(text in ".{0,200}", min in 1usize..8) {
        let terms = tokenize(&text, 1, &Language::none(), &settings(100, 50, min, false));
        for term in terms.keys() {
            prop_assert!(term.chars().count() >= min);
        }
    }

    #[test]
    fn no_term_longer_than_max_length(text in ".{0,200}", max in 1usize..20) {
        let terms = tokenize(&text, 1, &Language::none(), &settings(100, max, 1, false));
        for term in terms.keys() {
            prop_assert!(term.chars().count() <= max);
        }
    }

    #[test]
    fn digit_only_terms_absent_when_filtered(text in "[a-z0-9 ]{0,200}") {
        // max_word_length covers the whole input so truncation cannot
        // shear a mixed token down to its digit prefix.
        let terms = tokenize(&text, 1, &Language::none(), &settings(100, 200, 1, true));
        for term in terms.keys() {
            prop_assert!(!term.chars().all(|c| c.is_numeric()));
        }
    }

    #[test]
    fn distinct_terms_never_exceed_cap(text in ".{0,300}", cap in 1usize..10) {
        let terms = tokenize(&text, 1, &Language::none(), &settings(cap, 50, 1, false));
        prop_assert!(terms.len() <= cap);
    }
}
