//! loca: glyph offsets, always rebuilt from the glyf table during finalize.

/// Largest final offset the short format can express (stored halved in a u16).
const SHORT_LOCA_LIMIT: u32 = 0x1FFFE;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaTable {
    offsets: Vec<u32>,
}

impl LocaTable {
    /// Cumulative offsets: `offsets[0] = 0`, `offsets[i + 1] = offsets[i] + sizes[i]`.
    pub fn from_record_sizes(sizes: &[u32]) -> Self {
        let mut offsets = Vec::with_capacity(sizes.len() + 1);
        let mut pos = 0u32;
        offsets.push(pos);
        for &size in sizes {
            pos += size;
            offsets.push(pos);
        }
        LocaTable { offsets }
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Whether the long (32-bit) format is needed.
    pub fn is_long(&self) -> bool {
        self.offsets.last().copied().unwrap_or(0) > SHORT_LOCA_LIMIT
            || self.offsets.iter().any(|o| o % 2 != 0)
    }

    /// `indexToLocFormat` value for head.
    pub fn index_to_loc_format(&self) -> i16 {
        self.is_long() as i16
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::new();
        if self.is_long() {
            for &offset in &self.offsets {
                data.extend_from_slice(&offset.to_be_bytes());
            }
        } else {
            for &offset in &self.offsets {
                let short = (offset / 2) as u16;
                data.extend_from_slice(&short.to_be_bytes());
            }
        }
        data
    }
}
