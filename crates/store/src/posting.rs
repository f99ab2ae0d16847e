//! Posting records and their fixed binary layout
//!
//! A posting ties one document to one term: a document id plus an
//! "amalgamated" 32-bit field packing the auxiliary flags and the signed
//! score.
//!
//! # Record Layout (8 bytes, little-endian)
//!
//! ```text
//! ┌──────────────────────┬───────────────────────────────────────────┐
//! │ document_id (4 bytes)│ amalgamated (4 bytes)                     │
//! └──────────────────────┴───────────────────────────────────────────┘
//!
//! amalgamated bits [31:16] = flags
//! amalgamated bits [15:0]  = score (two's complement, sign-extended on decode)
//! ```
//!
//! Posting lists are concatenations of these fixed-size records with no
//! framing; a blob whose length is not a multiple of the record size is
//! corrupt.

use lexica_core::{Error, Result};

/// Size of one encoded posting in bytes
pub const POSTING_SIZE: usize = 8;

/// One (document, score, flags) record under a term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Identifier of the indexed document or service
    pub document_id: u32,
    /// Accumulated weight, saturating at the i16 bounds
    pub score: i16,
    /// Auxiliary bits (service/category tag)
    pub flags: u16,
}

impl Posting {
    /// Create a posting
    pub fn new(document_id: u32, score: i16, flags: u16) -> Self {
        Posting {
            document_id,
            score,
            flags,
        }
    }

    /// Pack flags and score into the amalgamated field
    pub fn amalgamated(&self) -> u32 {
        (u32::from(self.flags) << 16) | u32::from(self.score as u16)
    }

    /// Rebuild a posting from its amalgamated field
    pub fn from_amalgamated(document_id: u32, amalgamated: u32) -> Self {
        Posting {
            document_id,
            score: (amalgamated & 0xFFFF) as u16 as i16,
            flags: (amalgamated >> 16) as u16,
        }
    }

    /// Add a weight delta to the score, saturating at the i16 bounds
    pub fn add_score(&mut self, delta: i16) {
        self.score = self.score.saturating_add(delta);
    }

    /// Append the 8-byte encoding of this posting to `buf`
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.document_id.to_le_bytes());
        buf.extend_from_slice(&self.amalgamated().to_le_bytes());
    }

    /// Decode one posting from exactly [`POSTING_SIZE`] bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != POSTING_SIZE {
            return Err(Error::CorruptRecord(format!(
                "posting record is {} bytes, expected {}",
                bytes.len(),
                POSTING_SIZE
            )));
        }
        let document_id = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let amalgamated = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        Ok(Posting::from_amalgamated(document_id, amalgamated))
    }
}

/// Serialize a posting list to a contiguous blob
pub fn encode_list(postings: &[Posting]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(postings.len() * POSTING_SIZE);
    for posting in postings {
        posting.encode_into(&mut buf);
    }
    buf
}

/// Deserialize a posting-list blob
///
/// The blob length must be a multiple of [`POSTING_SIZE`].
pub fn decode_list(bytes: &[u8]) -> Result<Vec<Posting>> {
    if bytes.len() % POSTING_SIZE != 0 {
        return Err(Error::CorruptRecord(format!(
            "posting list length {} is not a multiple of {}",
            bytes.len(),
            POSTING_SIZE
        )));
    }
    bytes.chunks_exact(POSTING_SIZE).map(Posting::decode).collect()
}
