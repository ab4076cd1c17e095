//! head: font header.
//!
//! The bounding box and `indexToLocFormat` are refreshed from the glyph store
//! at finalize time. `checkSumAdjustment` is always serialized as zero; the
//! assembler patches it in the output buffer once every checksum is known.

use serde::Deserialize;

use super::{GlyphStore, LocaTable};

pub const HEAD_LENGTH: usize = 54;
/// Byte offset of `checkSumAdjustment` within the table.
pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadTable {
    /// 16.16 fixed point.
    pub font_revision: u32,
    pub flags: u16,
    pub units_per_em: u16,
    /// Seconds since 1904-01-01T00:00:00Z.
    pub created: i64,
    pub modified: i64,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    #[serde(skip)]
    pub x_min: i16,
    #[serde(skip)]
    pub y_min: i16,
    #[serde(skip)]
    pub x_max: i16,
    #[serde(skip)]
    pub y_max: i16,
    #[serde(skip)]
    pub index_to_loc_format: i16,
}

impl Default for HeadTable {
    fn default() -> Self {
        HeadTable {
            font_revision: 0x00010000,
            flags: 0,
            units_per_em: 1000,
            created: 0,
            modified: 0,
            mac_style: 0,
            lowest_rec_ppem: 8,
            font_direction_hint: 2,
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
            index_to_loc_format: 0,
        }
    }
}

impl HeadTable {
    /// A head table whose modification date equals its creation date.
    pub fn new(
        font_revision: u32,
        flags: u16,
        units_per_em: u16,
        created: i64,
        mac_style: u16,
        lowest_rec_ppem: u16,
        font_direction_hint: i16,
    ) -> Self {
        HeadTable {
            font_revision,
            flags,
            units_per_em,
            created,
            modified: created,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            ..Default::default()
        }
    }

    /// Refresh the font bounding box and loca format.
    pub(crate) fn update_from_glyphs(&mut self, store: &GlyphStore, loca: &LocaTable) {
        let mut outlines = store.glyphs().iter().filter(|g| !g.is_empty()).peekable();
        if outlines.peek().is_none() {
            self.x_min = 0;
            self.y_min = 0;
            self.x_max = 0;
            self.y_max = 0;
        } else {
            let (mut x_min, mut y_min) = (i16::MAX, i16::MAX);
            let (mut x_max, mut y_max) = (i16::MIN, i16::MIN);
            for g in outlines {
                x_min = x_min.min(g.x_min);
                y_min = y_min.min(g.y_min);
                x_max = x_max.max(g.x_max);
                y_max = y_max.max(g.y_max);
            }
            self.x_min = x_min;
            self.y_min = y_min;
            self.x_max = x_max;
            self.y_max = y_max;
        }
        self.index_to_loc_format = loca.index_to_loc_format();
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(HEAD_LENGTH);
        data.extend_from_slice(&0x00010000u32.to_be_bytes()); // version
        data.extend_from_slice(&self.font_revision.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes()); // checkSumAdjustment
        data.extend_from_slice(&MAGIC_NUMBER.to_be_bytes());
        data.extend_from_slice(&self.flags.to_be_bytes());
        data.extend_from_slice(&self.units_per_em.to_be_bytes());
        data.extend_from_slice(&self.created.to_be_bytes());
        data.extend_from_slice(&self.modified.to_be_bytes());
        data.extend_from_slice(&self.x_min.to_be_bytes());
        data.extend_from_slice(&self.y_min.to_be_bytes());
        data.extend_from_slice(&self.x_max.to_be_bytes());
        data.extend_from_slice(&self.y_max.to_be_bytes());
        data.extend_from_slice(&self.mac_style.to_be_bytes());
        data.extend_from_slice(&self.lowest_rec_ppem.to_be_bytes());
        data.extend_from_slice(&self.font_direction_hint.to_be_bytes());
        data.extend_from_slice(&self.index_to_loc_format.to_be_bytes());
        data.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
        data
    }
}
