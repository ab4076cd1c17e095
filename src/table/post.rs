//! post: PostScript information.
//!
//! Formats 1.0 and 3.0 are the 32-byte header alone. Format 2.0 adds a name
//! index per glyph with custom names stored as Pascal strings; format 2.5
//! adds a (zero) standard-order offset per glyph. The per-glyph arrays are
//! sized from the glyph store at finalize time.

use std::collections::HashMap;

use serde::Deserialize;

use super::GlyphStore;
use crate::error::{Result, TtcrError};

pub const POST_1_0: u32 = 0x00010000;
pub const POST_2_0: u32 = 0x00020000;
pub const POST_2_5: u32 = 0x00025000;
pub const POST_3_0: u32 = 0x00030000;

const SUPPORTED_FORMATS: [u32; 4] = [POST_1_0, POST_2_0, POST_2_5, POST_3_0];
/// Indices below this refer to the standard Macintosh glyph names.
const FIRST_CUSTOM_INDEX: u16 = 258;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostTable {
    /// 16.16 fixed point version.
    pub format: u32,
    /// 16.16 fixed point, degrees counter-clockwise from vertical.
    pub italic_angle: i32,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
    /// Glyph names for format 2.0, indexed by glyph ID. Missing or empty
    /// names map to `.notdef`.
    pub glyph_names: Vec<String>,
    #[serde(skip)]
    pub num_glyphs: u16,
}

impl Default for PostTable {
    fn default() -> Self {
        PostTable::new(POST_3_0, 0, 0, 0, 0)
    }
}

impl PostTable {
    pub fn new(
        format: u32,
        italic_angle: i32,
        underline_position: i16,
        underline_thickness: i16,
        is_fixed_pitch: u32,
    ) -> Self {
        PostTable {
            format,
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
            glyph_names: Vec::new(),
            num_glyphs: 0,
        }
    }

    pub fn check_format(&self) -> Result<()> {
        if SUPPORTED_FORMATS.contains(&self.format) {
            Ok(())
        } else {
            Err(TtcrError::PostFormat(self.format))
        }
    }

    pub(crate) fn update_from_glyphs(&mut self, store: &GlyphStore) {
        self.num_glyphs = store.count() as u16;
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        self.check_format()?;

        let mut data = Vec::with_capacity(32);
        data.extend_from_slice(&self.format.to_be_bytes());
        data.extend_from_slice(&self.italic_angle.to_be_bytes());
        data.extend_from_slice(&self.underline_position.to_be_bytes());
        data.extend_from_slice(&self.underline_thickness.to_be_bytes());
        data.extend_from_slice(&self.is_fixed_pitch.to_be_bytes());
        data.extend_from_slice(&[0u8; 16]); // min/max memory usage

        match self.format {
            POST_2_0 => self.write_names(&mut data),
            POST_2_5 => {
                data.extend_from_slice(&self.num_glyphs.to_be_bytes());
                data.resize(data.len() + self.num_glyphs as usize, 0);
            }
            _ => {}
        }
        Ok(data)
    }

    fn write_names(&self, data: &mut Vec<u8>) {
        let mut custom: HashMap<&str, u16> = HashMap::new();
        let mut strings: Vec<u8> = Vec::new();

        data.extend_from_slice(&self.num_glyphs.to_be_bytes());
        for gid in 0..self.num_glyphs as usize {
            let name = self.glyph_names.get(gid).map(String::as_str).unwrap_or("");
            if name.is_empty() || name == ".notdef" {
                data.extend_from_slice(&0u16.to_be_bytes());
                continue;
            }
            let index = match custom.get(name) {
                Some(&index) => index,
                None => {
                    let Some(next) = u16::try_from(custom.len())
                        .ok()
                        .and_then(|n| FIRST_CUSTOM_INDEX.checked_add(n))
                    else {
                        log::warn!("no name index left for glyph {}, using .notdef", gid);
                        data.extend_from_slice(&0u16.to_be_bytes());
                        continue;
                    };
                    let bytes = name.as_bytes();
                    let len = if bytes.len() > 255 {
                        log::warn!("glyph name for glyph {} truncated to 255 bytes", gid);
                        255
                    } else {
                        bytes.len()
                    };
                    strings.push(len as u8);
                    strings.extend_from_slice(&bytes[..len]);
                    custom.insert(name, next);
                    next
                }
            };
            data.extend_from_slice(&index.to_be_bytes());
        }
        data.extend_from_slice(&strings);
    }
}
