//! # name: Naming Table
//!
//! Records are copied in on add, so the caller keeps its own. On the wire the
//! records are sorted by (platform, encoding, language, name ID) while their
//! strings sit in one pool in insertion order; each record's offset and length
//! point into that pool. The pool must stay below 64K because its offsets are
//! 16-bit.

use crate::error::{Result, TtcrError};

/// The pool must be strictly smaller than this.
pub const MAX_POOL_LEN: usize = 0x10000;
/// Most records whose header still leaves `stringOffset` within a u16.
pub const MAX_RECORDS: usize = (0xFFFF - 6) / 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    /// String bytes, already in the platform's encoding.
    pub string: Vec<u8>,
}

impl NameRecord {
    pub fn new(platform_id: u16, encoding_id: u16, language_id: u16, name_id: u16, string: Vec<u8>) -> Self {
        NameRecord {
            platform_id,
            encoding_id,
            language_id,
            name_id,
            string,
        }
    }

    /// A record whose text is encoded as UTF-16BE, as platforms 0 (Unicode)
    /// and 3 (Windows) expect.
    pub fn utf16(platform_id: u16, encoding_id: u16, language_id: u16, name_id: u16, text: &str) -> Self {
        let string = text.encode_utf16().flat_map(|c| c.to_be_bytes()).collect();
        NameRecord::new(platform_id, encoding_id, language_id, name_id, string)
    }

    fn sort_key(&self) -> (u16, u16, u16, u16) {
        (self.platform_id, self.encoding_id, self.language_id, self.name_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    records: Vec<NameRecord>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[NameRecord]) -> Self {
        NameTable {
            records: records.to_vec(),
        }
    }

    pub fn add(&mut self, record: &NameRecord) {
        self.records.push(record.clone());
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    pub fn pool_len(&self) -> usize {
        self.records.iter().map(|r| r.string.len()).sum()
    }

    /// At least one record, at most [`MAX_RECORDS`], and a pool below 64K.
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(TtcrError::NoNames);
        }
        if self.records.len() > MAX_RECORDS {
            return Err(TtcrError::TooManyNames {
                count: self.records.len(),
            });
        }
        let len = self.pool_len();
        if len >= MAX_POOL_LEN {
            return Err(TtcrError::NameTooLong { len });
        }
        Ok(())
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let count = self.records.len();
        let string_offset = 6 + 12 * count;

        // (record index, pool offset)
        let mut placed: Vec<(usize, usize)> = Vec::with_capacity(count);
        let mut pool: Vec<u8> = Vec::new();
        pool.try_reserve_exact(self.pool_len())?;
        for (i, record) in self.records.iter().enumerate() {
            placed.push((i, pool.len()));
            pool.extend_from_slice(&record.string);
        }
        placed.sort_by_key(|&(i, _)| self.records[i].sort_key());

        let mut data: Vec<u8> = Vec::new();
        data.try_reserve_exact(string_offset + pool.len())?;
        data.extend_from_slice(&0u16.to_be_bytes()); // format
        data.extend_from_slice(&(count as u16).to_be_bytes());
        data.extend_from_slice(&(string_offset as u16).to_be_bytes());
        for (i, offset) in placed {
            let r = &self.records[i];
            data.extend_from_slice(&r.platform_id.to_be_bytes());
            data.extend_from_slice(&r.encoding_id.to_be_bytes());
            data.extend_from_slice(&r.language_id.to_be_bytes());
            data.extend_from_slice(&r.name_id.to_be_bytes());
            data.extend_from_slice(&(r.string.len() as u16).to_be_bytes());
            data.extend_from_slice(&(offset as u16).to_be_bytes());
        }
        data.extend_from_slice(&pool);
        Ok(data)
    }
}
