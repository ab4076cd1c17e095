//! # Font Descriptions
//!
//! A JSON description of a whole font, for callers that would rather hand
//! over a document than drive the table API. Glyph outlines and raw tables
//! travel as base64 (optionally as a `data:` URI).
//!
//! ```json
//! {
//!   "head": { "unitsPerEm": 1000 },
//!   "hhea": { "ascender": 800, "descender": -200 },
//!   "post": { "format": 196608 },
//!   "names": [{ "platformId": 3, "encodingId": 1, "languageId": 1033, "nameId": 1, "text": "Demo" }],
//!   "cmap": [{ "code": 65, "glyph": 1 }],
//!   "glyphs": [{ "advanceWidth": 500 }, { "advanceWidth": 600, "data": "AAEAAAAA..." }],
//!   "rawTables": [{ "tag": "OS/2", "data": "AAMC..." }]
//! }
//! ```

use serde::Deserialize;

use crate::error::{Result, TtcrError};
use crate::registry::{TableRegistry, SFNT_TRUETYPE};
use crate::source::GlyphData;
use crate::table::{HeadTable, HheaTable, MaxpTable, NameRecord, PostTable, Table};
use crate::tag::Tag;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontDescription {
    #[serde(default = "default_sfnt_version")]
    pub sfnt_version: u32,
    #[serde(default)]
    pub head: HeadTable,
    #[serde(default)]
    pub hhea: HheaTable,
    #[serde(default)]
    pub maxp: MaxpTable,
    /// No post table is written when absent.
    #[serde(default)]
    pub post: Option<PostTable>,
    /// No name table is written when empty.
    #[serde(default)]
    pub names: Vec<NameEntry>,
    /// No cmap table is written when empty.
    #[serde(default)]
    pub cmap: Vec<CmapEntry>,
    pub glyphs: Vec<GlyphEntry>,
    #[serde(default)]
    pub raw_tables: Vec<RawTableEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameEntry {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmapEntry {
    #[serde(default = "default_platform")]
    pub platform_id: u16,
    #[serde(default = "default_encoding")]
    pub encoding_id: u16,
    pub code: u32,
    pub glyph: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphEntry {
    /// Glyph ID in the font the outline came from. Defaults to the entry's
    /// position.
    #[serde(default)]
    pub source_id: Option<u16>,
    pub advance_width: u16,
    #[serde(default)]
    pub lsb: i16,
    /// Base64 `glyf` record. Absent for glyphs without an outline.
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTableEntry {
    pub tag: Tag,
    pub data: String,
}

fn default_sfnt_version() -> u32 {
    SFNT_TRUETYPE
}

fn default_platform() -> u16 {
    3
}

fn default_encoding() -> u16 {
    1
}

impl FontDescription {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a registry holding every table the description names.
    pub fn into_registry(self) -> Result<TableRegistry> {
        let mut registry = TableRegistry::new(self.sfnt_version);

        let mut glyf = Table::glyf();
        for (i, entry) in self.glyphs.into_iter().enumerate() {
            let data = match &entry.data {
                Some(encoded) => base64_decode(encoded)?,
                None => Vec::new(),
            };
            let source_id = entry.source_id.unwrap_or(i as u16);
            glyf.glyf_add(GlyphData::new(source_id, data, entry.advance_width, entry.lsb), None)?;
        }
        registry.add_table(glyf)?;

        registry.add_table(Table::head(self.head))?;
        registry.add_table(Table::hhea(self.hhea))?;
        registry.add_table(Table::maxp(self.maxp))?;
        if let Some(post) = self.post {
            registry.add_table(Table::post(post)?)?;
        }

        if !self.names.is_empty() {
            let records: Vec<NameRecord> = self.names.iter().map(NameEntry::to_record).collect();
            registry.add_table(Table::name(&records))?;
        }

        if !self.cmap.is_empty() {
            let mut cmap = Table::cmap();
            for entry in &self.cmap {
                let id = ((entry.platform_id as u32) << 16) | entry.encoding_id as u32;
                cmap.cmap_add(id, entry.code, entry.glyph)?;
            }
            registry.add_table(cmap)?;
        }

        for raw in &self.raw_tables {
            registry.add_table(Table::raw(raw.tag, &base64_decode(&raw.data)?))?;
        }

        log::debug!("font description produced {} tables", registry.len());
        Ok(registry)
    }
}

impl NameEntry {
    /// Platforms 0 and 3 take UTF-16BE; others take one byte per character,
    /// with characters above U+00FF replaced by `?`.
    fn to_record(&self) -> NameRecord {
        match self.platform_id {
            0 | 3 => NameRecord::utf16(
                self.platform_id,
                self.encoding_id,
                self.language_id,
                self.name_id,
                &self.text,
            ),
            _ => {
                let bytes = self
                    .text
                    .chars()
                    .map(|c| u8::try_from(c as u32).unwrap_or(b'?'))
                    .collect();
                NameRecord::new(self.platform_id, self.encoding_id, self.language_id, self.name_id, bytes)
            }
        }
    }
}

/// Decode base64, accepting a `data:...;base64,` prefix.
fn base64_decode(input: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    let payload = match input.strip_prefix("data:") {
        Some(uri) => uri
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| TtcrError::InvalidData("invalid data URI: missing comma".to_string()))?,
        None => input,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| TtcrError::InvalidData(format!("base64 decode error: {}", e)))
}

/// Parse a JSON font description and assemble it.
pub fn assemble_json(json: &str) -> Result<Vec<u8>> {
    FontDescription::from_json(json)?.into_registry()?.finalize()
}
