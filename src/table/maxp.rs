//! maxp: maximum profile (version 1.0).
//!
//! The hinting limits are caller-supplied or copied from the source font;
//! the glyph count and the outline maxima are recomputed from the glyph
//! store at finalize time.

use std::collections::HashMap;

use serde::Deserialize;

use super::GlyphStore;
use crate::bytes::{read_u16, read_u32};
use crate::source::GlyphData;

pub const MAXP_LENGTH: usize = 32;
const VERSION_1_0: u32 = 0x00010000;
const MAX_NESTING: u16 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaxpTable {
    #[serde(skip)]
    pub num_glyphs: u16,
    #[serde(skip)]
    pub max_points: u16,
    #[serde(skip)]
    pub max_contours: u16,
    #[serde(skip)]
    pub max_composite_points: u16,
    #[serde(skip)]
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    #[serde(skip)]
    pub max_component_elements: u16,
    #[serde(skip)]
    pub max_component_depth: u16,
}

impl Default for MaxpTable {
    fn default() -> Self {
        MaxpTable {
            num_glyphs: 0,
            max_points: 0,
            max_contours: 0,
            max_composite_points: 0,
            max_composite_contours: 0,
            max_zones: 2,
            max_twilight_points: 0,
            max_storage: 0,
            max_function_defs: 0,
            max_instruction_defs: 0,
            max_stack_elements: 0,
            max_size_of_instructions: 0,
            max_component_elements: 0,
            max_component_depth: 0,
        }
    }
}

impl MaxpTable {
    /// Copy an existing version 1.0 maxp table. Anything else (absent,
    /// truncated, or version 0.5) yields the defaults.
    pub fn from_bytes(data: Option<&[u8]>) -> Self {
        let d = match data {
            Some(d) if d.len() >= MAXP_LENGTH && read_u32(d, 0) == VERSION_1_0 => d,
            _ => return MaxpTable::default(),
        };
        MaxpTable {
            num_glyphs: read_u16(d, 4),
            max_points: read_u16(d, 6),
            max_contours: read_u16(d, 8),
            max_composite_points: read_u16(d, 10),
            max_composite_contours: read_u16(d, 12),
            max_zones: read_u16(d, 14),
            max_twilight_points: read_u16(d, 16),
            max_storage: read_u16(d, 18),
            max_function_defs: read_u16(d, 20),
            max_instruction_defs: read_u16(d, 22),
            max_stack_elements: read_u16(d, 24),
            max_size_of_instructions: read_u16(d, 26),
            max_component_elements: read_u16(d, 28),
            max_component_depth: read_u16(d, 30),
        }
    }

    /// Refresh the glyph count and outline maxima.
    pub(crate) fn update_from_glyphs(&mut self, store: &GlyphStore) {
        let glyphs = store.glyphs();
        self.num_glyphs = glyphs.len() as u16;

        let by_source: HashMap<u16, &GlyphData> =
            glyphs.iter().rev().map(|g| (g.glyph_id, g)).collect();

        self.max_points = 0;
        self.max_contours = 0;
        self.max_composite_points = 0;
        self.max_composite_contours = 0;
        self.max_component_elements = 0;
        self.max_component_depth = 0;
        for g in glyphs {
            if g.composite {
                let (points, contours, depth) = composite_totals(g, &by_source, 0);
                self.max_composite_points = self.max_composite_points.max(points);
                self.max_composite_contours = self.max_composite_contours.max(contours);
                self.max_component_depth = self.max_component_depth.max(depth);
                self.max_component_elements =
                    self.max_component_elements.max(g.components().len() as u16);
            } else {
                self.max_points = self.max_points.max(g.num_points);
                self.max_contours = self.max_contours.max(g.num_contours);
            }
        }
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(MAXP_LENGTH);
        data.extend_from_slice(&VERSION_1_0.to_be_bytes());
        for v in [
            self.num_glyphs,
            self.max_points,
            self.max_contours,
            self.max_composite_points,
            self.max_composite_contours,
            self.max_zones,
            self.max_twilight_points,
            self.max_storage,
            self.max_function_defs,
            self.max_instruction_defs,
            self.max_stack_elements,
            self.max_size_of_instructions,
            self.max_component_elements,
            self.max_component_depth,
        ] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data
    }
}

/// Points, contours and nesting depth of a composite glyph, summed over the
/// components present in the store.
fn composite_totals(glyph: &GlyphData, by_source: &HashMap<u16, &GlyphData>, level: u16) -> (u16, u16, u16) {
    if !glyph.composite {
        return (glyph.num_points, glyph.num_contours, 0);
    }
    if level >= MAX_NESTING {
        return (0, 0, level);
    }
    let (mut points, mut contours, mut depth) = (0u16, 0u16, 0u16);
    for gid in glyph.components() {
        if let Some(component) = by_source.get(&gid) {
            let (p, c, d) = composite_totals(component, by_source, level + 1);
            points = points.saturating_add(p);
            contours = contours.saturating_add(c);
            depth = depth.max(d);
        }
    }
    (points, contours, depth + 1)
}
