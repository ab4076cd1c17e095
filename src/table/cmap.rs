//! # cmap: Character to Glyph Mapping
//!
//! Mappings are grouped by subtable identifier (`platformID << 16 |
//! encodingID`). Each subtable is written in the smallest format that covers
//! all of its pairs:
//!
//! - format 0 when every code and glyph ID is below 256,
//! - format 4 when every code is below 0xFFFF (0xFFFF is the format 4 sentinel)
//!   and the subtable fits its 16-bit length and offset fields,
//! - format 12 otherwise.

use std::collections::BTreeMap;

use crate::bytes::SearchRange;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmapTable {
    subtables: BTreeMap<u32, BTreeMap<u32, u16>>,
}

impl CmapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `code` to `glyph` in subtable `id`. A later mapping for the same
    /// code replaces the earlier one.
    pub fn add(&mut self, id: u32, code: u32, glyph: u16) {
        self.subtables.entry(id).or_default().insert(code, glyph);
    }

    pub fn subtable(&self, id: u32) -> Option<&BTreeMap<u32, u16>> {
        self.subtables.get(&id)
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let bodies: Vec<Vec<u8>> = self.subtables.values().map(build_subtable).collect();

        let mut cmap: Vec<u8> = Vec::new();
        cmap.extend_from_slice(&0u16.to_be_bytes()); // version
        cmap.extend_from_slice(&(self.subtables.len() as u16).to_be_bytes());

        let mut offset = 4 + 8 * self.subtables.len();
        for (&id, body) in self.subtables.keys().zip(&bodies) {
            cmap.extend_from_slice(&((id >> 16) as u16).to_be_bytes()); // platformID
            cmap.extend_from_slice(&((id & 0xFFFF) as u16).to_be_bytes()); // encodingID
            cmap.extend_from_slice(&(offset as u32).to_be_bytes());
            offset += body.len();
        }
        for body in &bodies {
            cmap.extend_from_slice(body);
        }
        cmap
    }
}

fn build_subtable(map: &BTreeMap<u32, u16>) -> Vec<u8> {
    if map.iter().all(|(&c, &g)| c < 256 && g < 256) {
        build_format0(map)
    } else if map.keys().all(|&c| c < 0xFFFF) {
        let pairs: Vec<(u16, u16)> = map.iter().map(|(&c, &g)| (c as u16, g)).collect();
        build_format4(&pairs).unwrap_or_else(|| {
            log::debug!("{} mappings overflow cmap format 4, using format 12", map.len());
            build_format12(map)
        })
    } else {
        build_format12(map)
    }
}

fn build_format0(map: &BTreeMap<u32, u16>) -> Vec<u8> {
    let mut data = Vec::with_capacity(262);
    data.extend_from_slice(&0u16.to_be_bytes()); // format
    data.extend_from_slice(&262u16.to_be_bytes()); // length
    data.extend_from_slice(&0u16.to_be_bytes()); // language
    let mut glyphs = [0u8; 256];
    for (&c, &g) in map {
        glyphs[c as usize] = g as u8;
    }
    data.extend_from_slice(&glyphs);
    data
}

/// `pairs` must be sorted by code, with every code below 0xFFFF. Returns
/// `None` when `segCountX2`, the length or an `idRangeOffset` would not fit
/// in 16 bits.
fn build_format4(pairs: &[(u16, u16)]) -> Option<Vec<u8>> {
    // Contiguous runs of codes: (start, end, glyphs)
    let mut segments: Vec<(u16, u16, Vec<u16>)> = Vec::new();
    for &(ch, gid) in pairs {
        if let Some(last) = segments.last_mut() {
            if ch == last.1 + 1 {
                last.1 = ch;
                last.2.push(gid);
                continue;
            }
        }
        segments.push((ch, ch, vec![gid]));
    }
    segments.push((0xFFFF, 0xFFFF, vec![0]));

    let seg_count = segments.len();
    if seg_count * 2 > u16::MAX as usize {
        return None;
    }
    let sr = SearchRange::compute(seg_count, 2);

    let mut glyph_id_array: Vec<u16> = Vec::new();
    let mut id_deltas: Vec<i16> = Vec::with_capacity(seg_count);
    let mut id_range_offsets: Vec<u16> = Vec::with_capacity(seg_count);

    for (i, (start, _, gids)) in segments.iter().enumerate() {
        if *start == 0xFFFF {
            id_deltas.push(1);
            id_range_offsets.push(0);
        } else if gids.len() == 1 {
            id_deltas.push(gids[0].wrapping_sub(*start) as i16);
            id_range_offsets.push(0);
        } else {
            // Offset from this idRangeOffset slot to the run's first entry
            // in glyphIdArray.
            id_deltas.push(0);
            let offset = (seg_count - i + glyph_id_array.len()) * 2;
            id_range_offsets.push(u16::try_from(offset).ok()?);
            glyph_id_array.extend_from_slice(gids);
        }
    }

    let length = 16 + seg_count * 8 + glyph_id_array.len() * 2;
    if length > u16::MAX as usize {
        return None;
    }
    let mut data: Vec<u8> = Vec::with_capacity(length);
    data.extend_from_slice(&4u16.to_be_bytes()); // format
    data.extend_from_slice(&(length as u16).to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes()); // language
    data.extend_from_slice(&((seg_count * 2) as u16).to_be_bytes());
    data.extend_from_slice(&sr.search_range.to_be_bytes());
    data.extend_from_slice(&sr.entry_selector.to_be_bytes());
    data.extend_from_slice(&sr.range_shift.to_be_bytes());
    for (_, end, _) in &segments {
        data.extend_from_slice(&end.to_be_bytes());
    }
    data.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
    for (start, _, _) in &segments {
        data.extend_from_slice(&start.to_be_bytes());
    }
    for d in &id_deltas {
        data.extend_from_slice(&d.to_be_bytes());
    }
    for r in &id_range_offsets {
        data.extend_from_slice(&r.to_be_bytes());
    }
    for g in &glyph_id_array {
        data.extend_from_slice(&g.to_be_bytes());
    }
    Some(data)
}

fn build_format12(map: &BTreeMap<u32, u16>) -> Vec<u8> {
    // (startCharCode, endCharCode, startGlyphID)
    let mut groups: Vec<(u32, u32, u32)> = Vec::new();
    for (&c, &g) in map {
        let g = g as u32;
        if let Some(last) = groups.last_mut() {
            if c == last.1 + 1 && g == last.2 + (c - last.0) {
                last.1 = c;
                continue;
            }
        }
        groups.push((c, c, g));
    }

    let length = 16 + groups.len() * 12;
    let mut data: Vec<u8> = Vec::with_capacity(length);
    data.extend_from_slice(&12u16.to_be_bytes()); // format
    data.extend_from_slice(&0u16.to_be_bytes()); // reserved
    data.extend_from_slice(&(length as u32).to_be_bytes());
    data.extend_from_slice(&0u32.to_be_bytes()); // language
    data.extend_from_slice(&(groups.len() as u32).to_be_bytes());
    for (start, end, glyph) in groups {
        data.extend_from_slice(&start.to_be_bytes());
        data.extend_from_slice(&end.to_be_bytes());
        data.extend_from_slice(&glyph.to_be_bytes());
    }
    data
}
