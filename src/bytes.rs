//! Big-endian byte helpers shared by the table codecs and the assembler.

/// Binary search helper fields used by the sfnt header and cmap format 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRange {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl SearchRange {
    /// Compute the helper fields for `count` records of `unit` bytes each.
    ///
    /// `search_range` is the largest power of two not above `count`, times
    /// `unit`; `entry_selector` is its base-2 logarithm.
    pub fn compute(count: usize, unit: usize) -> Self {
        if count == 0 {
            return SearchRange { search_range: 0, entry_selector: 0, range_shift: 0 };
        }
        let entry_selector = (usize::BITS - 1 - count.leading_zeros()) as u16;
        let search_range = (1usize << entry_selector) * unit;
        let range_shift = count * unit - search_range;
        SearchRange {
            search_range: search_range as u16,
            entry_selector,
            range_shift: range_shift as u16,
        }
    }
}

/// Wrapping sum of `data` read as big-endian `u32` words. A trailing partial
/// word is zero-padded.
pub fn table_checksum(data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(4);
    let mut sum = chunks
        .by_ref()
        .fold(0u32, |acc, w| acc.wrapping_add(u32::from_be_bytes([w[0], w[1], w[2], w[3]])));
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut last = [0u8; 4];
        last[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

/// Round up to the next multiple of four.
pub fn round4(len: usize) -> usize {
    (len + 3) & !3
}

/// Append zero bytes until `data` is 4-byte aligned.
pub fn pad4(data: &mut Vec<u8>) {
    data.resize(round4(data.len()), 0);
}

pub fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

pub fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([data[offset], data[offset + 1]])
}

pub fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

pub fn write_u16(data: &mut [u8], offset: usize, val: u16) {
    data[offset..offset + 2].copy_from_slice(&val.to_be_bytes());
}

pub fn write_u32(data: &mut [u8], offset: usize, val: u32) {
    data[offset..offset + 4].copy_from_slice(&val.to_be_bytes());
}
