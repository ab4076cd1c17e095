//! # Source Fonts and Glyph Data
//!
//! A [`GlyphData`] is one glyph's raw `glyf` record together with the metrics
//! the creator needs to synthesize `hmtx`, `hhea`, `head` and `maxp`. Glyphs
//! come from a [`SourceFont`], the font being subset. [`TtfSource`] is the
//! stock implementation over an in-memory TrueType file.

use std::collections::HashSet;

use crate::bytes::{read_i16, read_u16, read_u32};
use crate::error::{Result, TtcrError};

// Composite glyph flags
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// Guard against cyclic composite references in malformed fonts.
const MAX_COMPONENT_DEPTH: usize = 64;

/// One glyph outline plus the metrics derived from its header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphData {
    /// Glyph ID in the source font.
    pub glyph_id: u16,
    /// Glyph ID in the font being built. Assigned by the glyph store.
    pub new_id: u32,
    /// Raw `glyf` record. Empty for glyphs without an outline.
    pub data: Vec<u8>,
    pub advance_width: u16,
    pub lsb: i16,
    pub composite: bool,
    pub num_points: u16,
    pub num_contours: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl GlyphData {
    /// Wrap a raw `glyf` record, reading contour/point counts and the
    /// bounding box from its header. Truncated records are treated as empty
    /// outlines for metric purposes but their bytes are kept as-is.
    pub fn new(glyph_id: u16, data: Vec<u8>, advance_width: u16, lsb: i16) -> Self {
        let mut glyph = GlyphData {
            glyph_id,
            data,
            advance_width,
            lsb,
            ..Default::default()
        };
        if glyph.data.len() < 10 {
            return glyph;
        }

        let d = &glyph.data;
        let num_contours = read_i16(d, 0);
        glyph.x_min = read_i16(d, 2);
        glyph.y_min = read_i16(d, 4);
        glyph.x_max = read_i16(d, 6);
        glyph.y_max = read_i16(d, 8);

        if num_contours < 0 {
            glyph.composite = true;
        } else if num_contours > 0 {
            let nc = num_contours as usize;
            glyph.num_contours = num_contours as u16;
            let last_end = 10 + (nc - 1) * 2;
            if last_end + 2 <= d.len() {
                glyph.num_points = read_u16(d, last_end).wrapping_add(1);
            }
        }
        glyph
    }

    /// A glyph with no outline (e.g. a space).
    pub fn empty(glyph_id: u16, advance_width: u16) -> Self {
        GlyphData::new(glyph_id, Vec::new(), advance_width, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Source glyph IDs referenced directly by this glyph, in record order.
    pub fn components(&self) -> Vec<u16> {
        if !self.composite {
            return Vec::new();
        }
        component_refs(&self.data).into_iter().map(|(_, gid)| gid).collect()
    }
}

/// Walk the component records of a composite glyph, returning the byte
/// offset of each component's glyph index field and the index itself.
pub(crate) fn component_refs(glyph: &[u8]) -> Vec<(usize, u16)> {
    let mut refs = Vec::new();
    if glyph.len() < 10 || read_i16(glyph, 0) >= 0 {
        return refs;
    }

    let mut pos = 10; // skip header (numContours + bbox)
    loop {
        if pos + 4 > glyph.len() {
            break;
        }
        let flags = read_u16(glyph, pos);
        refs.push((pos + 2, read_u16(glyph, pos + 2)));
        pos += 4;

        pos += if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            pos += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            pos += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            pos += 8;
        }

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    refs
}

/// The font glyphs are taken from.
pub trait SourceFont {
    /// Raw glyph record and metrics for a source glyph ID, or `None` if the
    /// ID is out of range.
    fn glyph_data(&self, glyph_id: u16) -> Option<GlyphData>;

    /// The glyph itself followed by every glyph it references, transitively,
    /// each listed once in depth-first order.
    fn glyph_components(&self, glyph_id: u16) -> Vec<u16> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        collect_components(self, glyph_id, 0, &mut seen, &mut out);
        out
    }
}

fn collect_components<S: SourceFont + ?Sized>(
    font: &S,
    glyph_id: u16,
    depth: usize,
    seen: &mut HashSet<u16>,
    out: &mut Vec<u16>,
) {
    if depth > MAX_COMPONENT_DEPTH || !seen.insert(glyph_id) {
        return;
    }
    out.push(glyph_id);
    if let Some(glyph) = font.glyph_data(glyph_id) {
        for component in glyph.components() {
            collect_components(font, component, depth + 1, seen, out);
        }
    }
}

/// A [`SourceFont`] over TrueType bytes, parsed with `ttf-parser`.
pub struct TtfSource<'a> {
    face: ttf_parser::Face<'a>,
    glyf: &'a [u8],
    loca: Vec<u32>,
}

impl<'a> TtfSource<'a> {
    pub fn new(data: &'a [u8], index: u32) -> Result<Self> {
        let face = ttf_parser::Face::parse(data, index)
            .map_err(|e| TtcrError::InvalidData(format!("failed to parse font: {}", e)))?;

        let raw = face.raw_face();
        let table = |tag: &[u8; 4]| {
            raw.table(ttf_parser::Tag::from_bytes(tag)).ok_or_else(|| {
                TtcrError::InvalidData(format!(
                    "source font has no '{}' table",
                    String::from_utf8_lossy(tag)
                ))
            })
        };
        let glyf = table(b"glyf")?;
        let raw_loca = table(b"loca")?;
        let head = table(b"head")?;
        if head.len() < 54 {
            return Err(TtcrError::InvalidData("source 'head' table is truncated".to_string()));
        }

        let long = read_i16(head, 50) != 0;
        let loca = parse_loca(raw_loca, long, face.number_of_glyphs());

        Ok(TtfSource { face, glyf, loca })
    }

    pub fn face(&self) -> &ttf_parser::Face<'a> {
        &self.face
    }

    pub fn number_of_glyphs(&self) -> u16 {
        self.face.number_of_glyphs()
    }

    /// Source glyph ID for a character, via the font's Unicode cmap.
    pub fn glyph_index(&self, ch: char) -> Option<u16> {
        self.face.glyph_index(ch).map(|g| g.0)
    }

    /// The raw `maxp` table, for seeding [`crate::table::MaxpTable::from_bytes`].
    pub fn maxp_bytes(&self) -> Option<&'a [u8]> {
        self.face.raw_face().table(ttf_parser::Tag::from_bytes(b"maxp"))
    }
}

impl SourceFont for TtfSource<'_> {
    fn glyph_data(&self, glyph_id: u16) -> Option<GlyphData> {
        let idx = glyph_id as usize;
        if idx + 1 >= self.loca.len() {
            return None;
        }

        let start = self.loca[idx] as usize;
        let end = (self.loca[idx + 1] as usize).min(self.glyf.len());
        let bytes = if start < end { self.glyf[start..end].to_vec() } else { Vec::new() };

        let gid = ttf_parser::GlyphId(glyph_id);
        let advance = self.face.glyph_hor_advance(gid).unwrap_or(0);
        let lsb = self.face.glyph_hor_side_bearing(gid).unwrap_or(0);
        Some(GlyphData::new(glyph_id, bytes, advance, lsb))
    }
}

fn parse_loca(data: &[u8], long: bool, num_glyphs: u16) -> Vec<u32> {
    let count = num_glyphs as usize + 1;
    let mut offsets: Vec<u32> = Vec::with_capacity(count);
    let width = if long { 4 } else { 2 };

    for i in 0..count {
        let pos = i * width;
        if pos + width > data.len() {
            offsets.push(offsets.last().copied().unwrap_or(0));
        } else if long {
            offsets.push(read_u32(data, pos));
        } else {
            offsets.push(read_u16(data, pos) as u32 * 2);
        }
    }
    offsets
}
