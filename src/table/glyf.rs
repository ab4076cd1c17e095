//! # glyf: Glyph Store
//!
//! Ordered glyph outlines with IDs `0..N-1`. Glyphs appended through
//! [`GlyphStore::append`] always get the next sequential ID; a store built
//! with [`GlyphStore::from_records`] keeps whatever IDs it is given, so the
//! sequence is re-checked before the font is assembled.
//!
//! Each serialized glyph record is padded to four bytes, which keeps every
//! loca offset even and lets the short loca format cover glyf tables up to
//! 128K.

use std::collections::HashMap;

use crate::bytes::{pad4, write_u16};
use crate::error::{Result, TtcrError};
use crate::source::{component_refs, GlyphData, SourceFont};

/// `numGlyphs` is a u16.
pub const MAX_GLYPHS: usize = 0xFFFF;

#[derive(Debug, Clone, Default)]
pub struct GlyphStore {
    glyphs: Vec<GlyphData>,
}

impl GlyphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from externally supplied records, keeping their
    /// `new_id` values untouched.
    pub fn from_records(glyphs: Vec<GlyphData>) -> Self {
        GlyphStore { glyphs }
    }

    /// Append `glyph`, taking ownership of it, and return its new ID.
    ///
    /// With a source font, every component the glyph references that is not
    /// already stored (matched by source glyph ID) is fetched and appended
    /// after it, so composites stay resolvable in the new font. Fails with
    /// `TooManyGlyphs` once the store holds [`MAX_GLYPHS`].
    pub fn append(&mut self, glyph: GlyphData, font: Option<&dyn SourceFont>) -> Result<u32> {
        let components = match font {
            Some(font) => font.glyph_components(glyph.glyph_id),
            None => Vec::new(),
        };

        let id = self.push(glyph)?;

        // The glyph itself is always first in the component list.
        if let Some(font) = font {
            for component in components.into_iter().skip(1) {
                if self.glyphs.iter().any(|g| g.glyph_id == component) {
                    continue;
                }
                match font.glyph_data(component) {
                    Some(data) => {
                        self.push(data)?;
                    }
                    None => log::warn!("component glyph {} missing from source font", component),
                }
            }
        }
        Ok(id)
    }

    fn push(&mut self, mut glyph: GlyphData) -> Result<u32> {
        if self.glyphs.len() >= MAX_GLYPHS {
            return Err(TtcrError::TooManyGlyphs {
                count: self.glyphs.len() + 1,
            });
        }
        let id = self.count();
        glyph.new_id = id;
        self.glyphs.try_reserve(1)?;
        self.glyphs.push(glyph);
        Ok(id)
    }

    pub fn count(&self) -> u32 {
        self.glyphs.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[GlyphData] {
        &self.glyphs
    }

    /// Every glyph must sit at the position equal to its ID, and the store
    /// must fit the 16-bit glyph count.
    pub fn check_sequence(&self) -> Result<()> {
        if self.glyphs.len() > MAX_GLYPHS {
            return Err(TtcrError::TooManyGlyphs {
                count: self.glyphs.len(),
            });
        }
        for (position, glyph) in self.glyphs.iter().enumerate() {
            if glyph.new_id as usize != position {
                return Err(TtcrError::GlyphSequence {
                    position,
                    found: glyph.new_id,
                });
            }
        }
        Ok(())
    }

    /// Source glyph ID → new glyph ID, first occurrence wins.
    fn id_map(&self) -> HashMap<u16, u16> {
        let mut map = HashMap::with_capacity(self.glyphs.len());
        for glyph in &self.glyphs {
            map.entry(glyph.glyph_id).or_insert(glyph.new_id as u16);
        }
        map
    }

    /// Serialized size of each glyph record, padding included.
    pub fn record_sizes(&self) -> Vec<u32> {
        self.glyphs
            .iter()
            .map(|g| crate::bytes::round4(g.data.len()) as u32)
            .collect()
    }

    /// Glyph records concatenated, each padded to four bytes, with composite
    /// component references rewritten to new IDs.
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        let sizes = self.record_sizes();
        let total: usize = sizes.iter().map(|&s| s as usize).sum();
        let mut out: Vec<u8> = Vec::new();
        out.try_reserve_exact(total)?;

        let remap = self.id_map();
        for glyph in &self.glyphs {
            let start = out.len();
            out.extend_from_slice(&glyph.data);
            if glyph.composite {
                rewrite_components(&mut out[start..], &remap, glyph.new_id);
            }
            pad4(&mut out);
        }
        Ok(out)
    }
}

fn rewrite_components(glyph: &mut [u8], remap: &HashMap<u16, u16>, new_id: u32) {
    for (pos, old_gid) in component_refs(glyph) {
        match remap.get(&old_gid) {
            Some(&gid) => write_u16(glyph, pos, gid),
            None => log::warn!(
                "glyph {} references glyph {} which is not in the font",
                new_id,
                old_gid
            ),
        }
    }
}
