//! Hash-bucketed persistent key-value store
//!
//! Single-file store backing the inverted index. The bucket count is fixed
//! when the file is created; keys hash to a bucket whose table slot points
//! at the head of a chain of records.
//!
//! # File Structure
//!
//! ```text
//! +------------------+ 0
//! | StoreHeader      | 32 bytes
//! +------------------+ 32
//! | Bucket table     | bucket_count × u64 chain-head offsets (0 = empty)
//! +------------------+
//! | Record           | next u64 | key_len u16 | value_len u32 | crc32 u32
//! |                  | key bytes | value bytes
//! +------------------+
//! | Record           | ...
//! +------------------+
//! ```
//!
//! # Key Invariants
//!
//! - Records are append-only; an update appends a fresh record and swings
//!   the bucket head, shadowing the old record in chain order.
//! - The record is fully on disk before the head pointer moves, so a crash
//!   mid-update leaves the previous value reachable.
//! - The bucket count is immutable for the store's lifetime; reopening
//!   keeps the count the file was created with.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use lexica_core::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

/// Magic bytes: "LIDX"
pub const STORE_MAGIC: [u8; 4] = *b"LIDX";

/// Store format version for forward compatibility
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Store header size in bytes
pub const STORE_HEADER_SIZE: usize = 32;

/// Fixed part of every record: next, key_len, value_len, crc32
const RECORD_HEADER_SIZE: u64 = 8 + 2 + 4 + 4;

/// Keys are length-prefixed with a u16
const MAX_KEY_LEN: usize = u16::MAX as usize;

// ============================================================================
// StoreHeader
// ============================================================================

/// Store header (32 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHeader {
    /// Magic bytes: "LIDX"
    pub magic: [u8; 4],
    /// Format version for forward compatibility
    pub format_version: u32,
    /// Bucket count fixed at creation
    pub bucket_count: u32,
    /// Number of distinct live keys
    pub term_count: u64,
    /// Reserved for future use
    pub reserved: [u8; 12],
}

impl StoreHeader {
    /// Create a header for a new store
    pub fn new(bucket_count: u32) -> Self {
        StoreHeader {
            magic: STORE_MAGIC,
            format_version: STORE_FORMAT_VERSION,
            bucket_count,
            term_count: 0,
            reserved: [0u8; 12],
        }
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> [u8; STORE_HEADER_SIZE] {
        let mut bytes = [0u8; STORE_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.format_version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.bucket_count.to_le_bytes());
        bytes[12..20].copy_from_slice(&self.term_count.to_le_bytes());
        bytes[20..32].copy_from_slice(&self.reserved);
        bytes
    }

    /// Parse header from bytes
    pub fn from_bytes(bytes: &[u8; STORE_HEADER_SIZE]) -> Self {
        StoreHeader {
            magic: bytes[0..4].try_into().unwrap(),
            format_version: u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            bucket_count: u32::from_le_bytes(bytes[8..12].try_into().unwrap()),
            term_count: u64::from_le_bytes(bytes[12..20].try_into().unwrap()),
            reserved: bytes[20..32].try_into().unwrap(),
        }
    }

    /// Validate the header
    pub fn validate(&self) -> std::result::Result<(), StoreHeaderError> {
        if self.magic != STORE_MAGIC {
            return Err(StoreHeaderError::InvalidMagic {
                expected: STORE_MAGIC,
                actual: self.magic,
            });
        }
        if self.format_version > STORE_FORMAT_VERSION {
            return Err(StoreHeaderError::UnsupportedVersion {
                version: self.format_version,
                max_supported: STORE_FORMAT_VERSION,
            });
        }
        if self.bucket_count == 0 {
            return Err(StoreHeaderError::ZeroBuckets);
        }
        Ok(())
    }
}

/// Errors that can occur when validating a store header
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreHeaderError {
    /// Invalid magic bytes
    #[error("Invalid magic bytes: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        /// Expected magic bytes
        expected: [u8; 4],
        /// Actual magic bytes found
        actual: [u8; 4],
    },
    /// Unsupported format version
    #[error("Unsupported store version {version}, max supported is {max_supported}")]
    UnsupportedVersion {
        /// Version found in the file
        version: u32,
        /// Maximum supported version
        max_supported: u32,
    },
    /// Bucket count of zero
    #[error("Store header declares zero buckets")]
    ZeroBuckets,
}

// ============================================================================
// BucketStore
// ============================================================================

/// Header of one on-disk record
#[derive(Debug, Clone, Copy)]
struct RecordHeader {
    next: u64,
    key_len: u16,
    value_len: u32,
    crc: u32,
}

/// Hash-bucketed persistent key-value store
///
/// Single-writer: every operation takes `&mut self` because the store
/// seeks one shared file handle. Callers serialize access.
pub struct BucketStore {
    file: File,
    path: PathBuf,
    bucket_count: u32,
    term_count: u64,
    /// Tracked file length; appends extend it, used for bounds checks
    file_len: u64,
}

impl BucketStore {
    /// Open or create the store at `path`
    ///
    /// A new store is sized for `bucket_count` buckets; an existing store
    /// keeps the count it was created with.
    pub fn open(path: &Path, bucket_count: u32) -> Result<Self> {
        if bucket_count == 0 {
            return Err(Error::InvalidInput("bucket_count must be non-zero".to_string()));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        let len = file.metadata()?.len();

        if len == 0 {
            let header = StoreHeader::new(bucket_count);
            file.write_all(&header.to_bytes())?;
            let table = vec![0u8; bucket_count as usize * 8];
            file.write_all(&table)?;
            file.sync_all()?;
            info!(
                target: "lexica::store",
                path = ?path,
                bucket_count,
                "Created index store"
            );
            return Ok(BucketStore {
                file,
                path: path.to_path_buf(),
                bucket_count,
                term_count: 0,
                file_len: STORE_HEADER_SIZE as u64 + bucket_count as u64 * 8,
            });
        }

        let mut bytes = [0u8; STORE_HEADER_SIZE];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut bytes).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::CorruptRecord("store header truncated".to_string())
            } else {
                Error::Io(e)
            }
        })?;
        let header = StoreHeader::from_bytes(&bytes);
        header
            .validate()
            .map_err(|e| Error::CorruptRecord(e.to_string()))?;

        let table_end = STORE_HEADER_SIZE as u64 + header.bucket_count as u64 * 8;
        if len < table_end {
            return Err(Error::CorruptRecord(format!(
                "store file length {} does not cover the bucket table ({} buckets)",
                len, header.bucket_count
            )));
        }

        if header.bucket_count != bucket_count {
            debug!(
                target: "lexica::store",
                requested = bucket_count,
                on_disk = header.bucket_count,
                "Bucket count fixed at creation; keeping the on-disk value"
            );
        }

        debug!(
            target: "lexica::store",
            path = ?path,
            terms = header.term_count,
            "Opened index store"
        );

        Ok(BucketStore {
            file,
            path: path.to_path_buf(),
            bucket_count: header.bucket_count,
            term_count: header.term_count,
            file_len: len,
        })
    }

    /// Path this store was opened at
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bucket count the store was created with
    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    /// Number of distinct keys currently stored
    pub fn term_count(&self) -> u64 {
        self.term_count
    }

    /// Read the value stored under `key`
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let bucket = self.bucket_of(key);
        let mut offset = self.read_head(bucket)?;

        while offset != 0 {
            let record = self.read_record_header(offset)?;
            if record.key_len as usize == key.len() {
                let stored_key = self.read_bytes(offset + RECORD_HEADER_SIZE, key.len() as u64)?;
                if stored_key == key {
                    let value = self.read_bytes(
                        offset + RECORD_HEADER_SIZE + record.key_len as u64,
                        record.value_len as u64,
                    )?;
                    let mut hasher = crc32fast::Hasher::new();
                    hasher.update(&stored_key);
                    hasher.update(&value);
                    if hasher.finalize() != record.crc {
                        return Err(Error::CorruptRecord(format!(
                            "CRC mismatch for record at offset {offset}"
                        )));
                    }
                    return Ok(Some(value));
                }
            }
            offset = record.next;
        }
        Ok(None)
    }

    /// Store `value` under `key`
    ///
    /// Returns `true` when the key was not present before. The new record
    /// is fully written and its bytes are on their way to disk before the
    /// bucket head is swung; older records for the same key stay in the
    /// chain, shadowed.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<bool> {
        if key.is_empty() {
            return Err(Error::InvalidInput("empty key".to_string()));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(Error::InvalidInput(format!(
                "key length {} exceeds {}",
                key.len(),
                MAX_KEY_LEN
            )));
        }

        let bucket = self.bucket_of(key);
        let head = self.read_head(bucket)?;
        let is_new = !self.chain_contains(head, key)?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(key);
        hasher.update(value);
        let crc = hasher.finalize();

        let record_offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_u64::<LittleEndian>(head)?;
        self.file.write_u16::<LittleEndian>(key.len() as u16)?;
        self.file.write_u32::<LittleEndian>(value.len() as u32)?;
        self.file.write_u32::<LittleEndian>(crc)?;
        self.file.write_all(key)?;
        self.file.write_all(value)?;
        self.file_len = record_offset + RECORD_HEADER_SIZE + key.len() as u64 + value.len() as u64;

        self.write_head(bucket, record_offset)?;

        if is_new {
            self.term_count += 1;
        }
        Ok(is_new)
    }

    /// Persist the header counters and fsync the file
    pub fn sync(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(12))?;
        self.file.write_u64::<LittleEndian>(self.term_count)?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Sync and release the store handle
    pub fn close(mut self) -> Result<()> {
        self.sync()?;
        debug!(target: "lexica::store", path = ?self.path, "Closed index store");
        Ok(())
    }

    // ========================================================================
    // Chain plumbing
    // ========================================================================

    fn bucket_of(&self, key: &[u8]) -> u32 {
        (xxh3_64(key) % u64::from(self.bucket_count)) as u32
    }

    fn slot_offset(&self, bucket: u32) -> u64 {
        STORE_HEADER_SIZE as u64 + u64::from(bucket) * 8
    }

    fn read_head(&mut self, bucket: u32) -> Result<u64> {
        let slot = self.slot_offset(bucket);
        self.file.seek(SeekFrom::Start(slot))?;
        Ok(self.file.read_u64::<LittleEndian>()?)
    }

    fn write_head(&mut self, bucket: u32, offset: u64) -> Result<()> {
        let slot = self.slot_offset(bucket);
        self.file.seek(SeekFrom::Start(slot))?;
        self.file.write_u64::<LittleEndian>(offset)?;
        Ok(())
    }

    /// Walk a chain looking for `key`
    fn chain_contains(&mut self, head: u64, key: &[u8]) -> Result<bool> {
        let mut offset = head;
        while offset != 0 {
            let record = self.read_record_header(offset)?;
            if record.key_len as usize == key.len() {
                let stored_key = self.read_bytes(offset + RECORD_HEADER_SIZE, key.len() as u64)?;
                if stored_key == key {
                    return Ok(true);
                }
            }
            offset = record.next;
        }
        Ok(false)
    }

    fn read_record_header(&mut self, offset: u64) -> Result<RecordHeader> {
        if offset + RECORD_HEADER_SIZE > self.file_len {
            return Err(Error::CorruptRecord(format!(
                "record header at offset {offset} exceeds file length {}",
                self.file_len
            )));
        }
        self.file.seek(SeekFrom::Start(offset))?;
        let next = self.file.read_u64::<LittleEndian>()?;
        let key_len = self.file.read_u16::<LittleEndian>()?;
        let value_len = self.file.read_u32::<LittleEndian>()?;
        let crc = self.file.read_u32::<LittleEndian>()?;

        let record_end =
            offset + RECORD_HEADER_SIZE + u64::from(key_len) + u64::from(value_len);
        if record_end > self.file_len {
            return Err(Error::CorruptRecord(format!(
                "record at offset {offset} runs past file length {}",
                self.file_len
            )));
        }

        Ok(RecordHeader {
            next,
            key_len,
            value_len,
            crc,
        })
    }

    fn read_bytes(&mut self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len as usize];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::CorruptRecord(format!("record data truncated at offset {offset}"))
            } else {
                Error::Io(e)
            }
        })?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp(bucket_count: u32) -> (tempfile::TempDir, BucketStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = BucketStore::open(&dir.path().join("words.idx"), bucket_count).unwrap();
        (dir, store)
    }

    #[test]
    fn test_header_roundtrip() {
        let mut header = StoreHeader::new(100);
        header.term_count = 42;

        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), STORE_HEADER_SIZE);
        assert_eq!(&bytes[0..4], b"LIDX");

        let parsed = StoreHeader::from_bytes(&bytes);
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_header_validation() {
        let header = StoreHeader::new(100);
        assert!(header.validate().is_ok());

        let mut bad_magic = header.clone();
        bad_magic.magic = *b"BADM";
        assert!(matches!(
            bad_magic.validate(),
            Err(StoreHeaderError::InvalidMagic { .. })
        ));

        let mut future = header.clone();
        future.format_version = 999;
        assert!(matches!(
            future.validate(),
            Err(StoreHeaderError::UnsupportedVersion { .. })
        ));

        let mut zero = header;
        zero.bucket_count = 0;
        assert_eq!(zero.validate(), Err(StoreHeaderError::ZeroBuckets));
    }

    #[test]
    fn test_get_missing_key() {
        let (_dir, mut store) = open_temp(16);
        assert_eq!(store.get(b"absent").unwrap(), None);
    }

    #[test]
    fn test_put_get_roundtrip() {
        let (_dir, mut store) = open_temp(16);

        assert!(store.put(b"alpha", b"one").unwrap());
        assert!(store.put(b"beta", b"two").unwrap());

        assert_eq!(store.get(b"alpha").unwrap().unwrap(), b"one");
        assert_eq!(store.get(b"beta").unwrap().unwrap(), b"two");
        assert_eq!(store.term_count(), 2);
    }

    #[test]
    fn test_put_overwrites_and_shadows() {
        let (_dir, mut store) = open_temp(16);

        assert!(store.put(b"alpha", b"one").unwrap());
        assert!(!store.put(b"alpha", b"uno").unwrap());

        assert_eq!(store.get(b"alpha").unwrap().unwrap(), b"uno");
        assert_eq!(store.term_count(), 1);
    }

    #[test]
    fn test_put_rejects_empty_key() {
        let (_dir, mut store) = open_temp(16);
        assert!(matches!(
            store.put(b"", b"value"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_chain_collisions_resolved() {
        // One bucket forces every key into the same chain.
        let (_dir, mut store) = open_temp(1);

        for i in 0..50u32 {
            let key = format!("key{i}");
            store.put(key.as_bytes(), &i.to_le_bytes()).unwrap();
        }
        assert_eq!(store.term_count(), 50);

        for i in 0..50u32 {
            let key = format!("key{i}");
            assert_eq!(
                store.get(key.as_bytes()).unwrap().unwrap(),
                i.to_le_bytes()
            );
        }
    }

    #[test]
    fn test_reopen_preserves_contents_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.idx");

        {
            let mut store = BucketStore::open(&path, 16).unwrap();
            store.put(b"alpha", b"one").unwrap();
            store.put(b"beta", b"two").unwrap();
            store.close().unwrap();
        }

        let mut store = BucketStore::open(&path, 16).unwrap();
        assert_eq!(store.term_count(), 2);
        assert_eq!(store.get(b"alpha").unwrap().unwrap(), b"one");
    }

    #[test]
    fn test_reopen_keeps_creation_bucket_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.idx");

        {
            let store = BucketStore::open(&path, 8).unwrap();
            store.close().unwrap();
        }

        let store = BucketStore::open(&path, 1024).unwrap();
        assert_eq!(store.bucket_count(), 8);
    }

    #[test]
    fn test_open_rejects_foreign_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.idx");
        std::fs::write(&path, b"this is not an index store, promise").unwrap();

        assert!(matches!(
            BucketStore::open(&path, 16),
            Err(Error::CorruptRecord(_))
        ));
    }

    #[test]
    fn test_crc_detects_flipped_value_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.idx");

        {
            let mut store = BucketStore::open(&path, 1).unwrap();
            store.put(b"alpha", b"payload-bytes").unwrap();
            store.close().unwrap();
        }

        // Flip one byte inside the value region (last byte of the file).
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        let mut store = BucketStore::open(&path, 1).unwrap();
        assert!(matches!(
            store.get(b"alpha"),
            Err(Error::CorruptRecord(_))
        ));
    }
}
