//! Persistent inverted index for the lexica engine
//!
//! This crate provides:
//! - [`Posting`] and its fixed 8-byte codec (`posting`)
//! - [`BucketStore`], the hash-bucketed on-disk key-value store (`bucket`)
//! - [`InvertedIndex`], the buffered index store built on both (`index`)
//!
//! The write path is batched: deltas accumulate in memory and reach disk
//! on an explicit flush. The whole crate is single-writer by design —
//! callers serialize access to a store instance.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bucket;
pub mod index;
pub mod posting;

pub use bucket::{BucketStore, StoreHeader, StoreHeaderError};
pub use index::InvertedIndex;
pub use posting::{decode_list, encode_list, Posting, POSTING_SIZE};
