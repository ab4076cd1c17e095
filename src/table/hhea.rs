//! hhea: horizontal header.

use serde::Deserialize;

use super::GlyphStore;

pub const HHEA_LENGTH: usize = 36;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HheaTable {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    #[serde(skip)]
    pub advance_width_max: u16,
    #[serde(skip)]
    pub min_left_side_bearing: i16,
    #[serde(skip)]
    pub min_right_side_bearing: i16,
    #[serde(skip)]
    pub x_max_extent: i16,
    #[serde(skip)]
    pub number_of_hmetrics: u16,
}

impl HheaTable {
    pub fn new(ascender: i16, descender: i16, line_gap: i16, caret_slope_rise: i16, caret_slope_run: i16) -> Self {
        HheaTable {
            ascender,
            descender,
            line_gap,
            caret_slope_rise,
            caret_slope_run,
            ..Default::default()
        }
    }

    /// Refresh the metric extrema from the glyphs. Glyphs without an outline
    /// only contribute their advance width.
    pub(crate) fn update_from_glyphs(&mut self, store: &GlyphStore) {
        let glyphs = store.glyphs();
        self.number_of_hmetrics = glyphs.len() as u16;
        self.advance_width_max = glyphs.iter().map(|g| g.advance_width).max().unwrap_or(0);

        let mut min_lsb: Option<i32> = None;
        let mut min_rsb: Option<i32> = None;
        let mut max_extent: Option<i32> = None;
        for g in glyphs.iter().filter(|g| !g.is_empty()) {
            let width = g.x_max as i32 - g.x_min as i32;
            let lsb = g.lsb as i32;
            let rsb = g.advance_width as i32 - lsb - width;
            let extent = lsb + width;
            min_lsb = Some(min_lsb.map_or(lsb, |m| m.min(lsb)));
            min_rsb = Some(min_rsb.map_or(rsb, |m| m.min(rsb)));
            max_extent = Some(max_extent.map_or(extent, |m| m.max(extent)));
        }
        self.min_left_side_bearing = clamp_i16(min_lsb.unwrap_or(0));
        self.min_right_side_bearing = clamp_i16(min_rsb.unwrap_or(0));
        self.x_max_extent = clamp_i16(max_extent.unwrap_or(0));
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(HHEA_LENGTH);
        data.extend_from_slice(&0x00010000u32.to_be_bytes()); // version
        data.extend_from_slice(&self.ascender.to_be_bytes());
        data.extend_from_slice(&self.descender.to_be_bytes());
        data.extend_from_slice(&self.line_gap.to_be_bytes());
        data.extend_from_slice(&self.advance_width_max.to_be_bytes());
        data.extend_from_slice(&self.min_left_side_bearing.to_be_bytes());
        data.extend_from_slice(&self.min_right_side_bearing.to_be_bytes());
        data.extend_from_slice(&self.x_max_extent.to_be_bytes());
        data.extend_from_slice(&self.caret_slope_rise.to_be_bytes());
        data.extend_from_slice(&self.caret_slope_run.to_be_bytes());
        data.extend_from_slice(&[0u8; 10]); // caretOffset + 4 reserved
        data.extend_from_slice(&0i16.to_be_bytes()); // metricDataFormat
        data.extend_from_slice(&self.number_of_hmetrics.to_be_bytes());
        data
    }
}

fn clamp_i16(v: i32) -> i16 {
    v.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
