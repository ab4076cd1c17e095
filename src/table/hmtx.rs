//! hmtx: horizontal metrics, synthesized from the glyph store during finalize.
//!
//! Every glyph gets a full `longHorMetric` record, so hhea's
//! `numberOfHMetrics` equals the glyph count.

use super::GlyphStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HmtxTable {
    /// (advance width, left side bearing) per glyph.
    pub metrics: Vec<(u16, i16)>,
}

impl HmtxTable {
    pub fn from_glyphs(store: &GlyphStore) -> Self {
        HmtxTable {
            metrics: store.glyphs().iter().map(|g| (g.advance_width, g.lsb)).collect(),
        }
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.metrics.len() * 4);
        for &(advance, lsb) in &self.metrics {
            data.extend_from_slice(&advance.to_be_bytes());
            data.extend_from_slice(&lsb.to_be_bytes());
        }
        data
    }
}
