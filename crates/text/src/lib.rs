//! Text analysis for the lexica indexing engine
//!
//! This crate provides:
//! - [`Language`]: stop-word sets and normalization rules, built once and
//!   read-only thereafter
//! - [`tokenize`]: bounded, weighted tokenization of document text
//!
//! The tokenizer degrades rather than errors: malformed text loses tokens,
//! it never fails a document.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod language;
pub mod tokenizer;

pub use language::Language;
pub use tokenizer::{tokenize, ParserSettings};
