//! # Tables
//!
//! A [`Table`] pairs a tag with a typed representation ([`TableData`]) and a
//! memoized serialized form. Structured kinds each live in their own module
//! and know their exact on-wire layout; raw tables carry opaque bytes that
//! are written unchanged.
//!
//! Raw tables are kept under [`Tag::RAW`] in a registry and carry their real
//! directory tag inside, so several of them can coexist and all of them can be
//! removed at once.

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod post;

pub use cmap::CmapTable;
pub use glyf::GlyphStore;
pub use head::HeadTable;
pub use hhea::HheaTable;
pub use hmtx::HmtxTable;
pub use loca::LocaTable;
pub use maxp::MaxpTable;
pub use name::{NameRecord, NameTable};
pub use post::PostTable;

use crate::error::{Result, TtcrError};
use crate::source::{GlyphData, SourceFont};
use crate::tag::Tag;

/// Typed payload of a table, selected by its tag.
#[derive(Debug, Clone)]
pub enum TableData {
    /// Opaque bytes written under `tag`.
    Raw { tag: Tag, data: Vec<u8> },
    Head(HeadTable),
    Hhea(HheaTable),
    Hmtx(HmtxTable),
    Loca(LocaTable),
    Maxp(MaxpTable),
    Glyf(GlyphStore),
    Cmap(CmapTable),
    Name(NameTable),
    Post(PostTable),
}

impl TableData {
    /// The tag this payload is stored under in a registry.
    fn registry_tag(&self) -> Tag {
        match self {
            TableData::Raw { .. } => Tag::RAW,
            TableData::Head(_) => Tag::HEAD,
            TableData::Hhea(_) => Tag::HHEA,
            TableData::Hmtx(_) => Tag::HMTX,
            TableData::Loca(_) => Tag::LOCA,
            TableData::Maxp(_) => Tag::MAXP,
            TableData::Glyf(_) => Tag::GLYF,
            TableData::Cmap(_) => Tag::CMAP,
            TableData::Name(_) => Tag::NAME,
            TableData::Post(_) => Tag::POST,
        }
    }
}

/// One font table.
#[derive(Debug, Clone)]
pub struct Table {
    tag: Tag,
    data: TableData,
    serialized: Option<Vec<u8>>,
}

impl Table {
    fn from_data(data: TableData) -> Self {
        Table {
            tag: data.registry_tag(),
            data,
            serialized: None,
        }
    }

    /// A raw table holding a copy of `data`, written under `tag`.
    pub fn raw(tag: Tag, data: &[u8]) -> Self {
        Table::from_data(TableData::Raw {
            tag,
            data: data.to_vec(),
        })
    }

    pub fn head(head: HeadTable) -> Self {
        Table::from_data(TableData::Head(head))
    }

    pub fn hhea(hhea: HheaTable) -> Self {
        Table::from_data(TableData::Hhea(hhea))
    }

    pub fn maxp(maxp: MaxpTable) -> Self {
        Table::from_data(TableData::Maxp(maxp))
    }

    /// An empty glyf table.
    pub fn glyf() -> Self {
        Table::from_data(TableData::Glyf(GlyphStore::new()))
    }

    /// A glyf table over an existing store, e.g. one built with
    /// [`GlyphStore::from_records`].
    pub fn glyf_from(store: GlyphStore) -> Self {
        Table::from_data(TableData::Glyf(store))
    }

    /// An empty cmap table.
    pub fn cmap() -> Self {
        Table::from_data(TableData::Cmap(CmapTable::new()))
    }

    /// A name table populated with copies of `records`.
    pub fn name(records: &[NameRecord]) -> Self {
        Table::from_data(TableData::Name(NameTable::from_records(records)))
    }

    /// A post table. Fails for formats other than 1.0, 2.0, 2.5 and 3.0.
    pub fn post(post: PostTable) -> Result<Self> {
        post.check_format()?;
        Ok(Table::from_data(TableData::Post(post)))
    }

    pub(crate) fn loca(loca: LocaTable) -> Self {
        Table::from_data(TableData::Loca(loca))
    }

    pub(crate) fn hmtx(hmtx: HmtxTable) -> Self {
        Table::from_data(TableData::Hmtx(hmtx))
    }

    /// The tag this table is stored under; [`Tag::RAW`] for raw tables.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The tag written to the table directory.
    pub fn directory_tag(&self) -> Tag {
        match &self.data {
            TableData::Raw { tag, .. } => *tag,
            _ => self.tag,
        }
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    /// Mutable access to the payload. Drops any cached serialized bytes.
    pub fn data_mut(&mut self) -> &mut TableData {
        self.serialized = None;
        &mut self.data
    }

    pub fn is_serialized(&self) -> bool {
        self.serialized.is_some()
    }

    pub(crate) fn cached_bytes(&self) -> Option<&[u8]> {
        self.serialized.as_deref()
    }

    /// Serialize the table, returning the cached bytes if already computed.
    /// On failure the cache is left untouched.
    pub fn serialize(&mut self) -> Result<&[u8]> {
        if self.serialized.is_none() {
            let bytes = match &self.data {
                TableData::Raw { data, .. } => data.clone(),
                TableData::Head(t) => t.to_bytes(),
                TableData::Hhea(t) => t.to_bytes(),
                TableData::Hmtx(t) => t.to_bytes(),
                TableData::Loca(t) => t.to_bytes(),
                TableData::Maxp(t) => t.to_bytes(),
                TableData::Glyf(t) => t.to_bytes()?,
                TableData::Cmap(t) => t.to_bytes(),
                TableData::Name(t) => t.to_bytes()?,
                TableData::Post(t) => t.to_bytes()?,
            };
            self.serialized = Some(bytes);
        }
        Ok(self.serialized.as_deref().unwrap_or_default())
    }

    // ─── Table-specific operations ──────────────────────────────

    pub fn as_glyf(&self) -> Result<&GlyphStore> {
        match &self.data {
            TableData::Glyf(store) => Ok(store),
            _ => Err(TtcrError::UnknownTable(self.directory_tag())),
        }
    }

    pub fn as_glyf_mut(&mut self) -> Result<&mut GlyphStore> {
        let tag = self.directory_tag();
        match self.data_mut() {
            TableData::Glyf(store) => Ok(store),
            _ => Err(TtcrError::UnknownTable(tag)),
        }
    }

    pub fn as_name_mut(&mut self) -> Result<&mut NameTable> {
        let tag = self.directory_tag();
        match self.data_mut() {
            TableData::Name(name) => Ok(name),
            _ => Err(TtcrError::UnknownTable(tag)),
        }
    }

    pub fn as_cmap_mut(&mut self) -> Result<&mut CmapTable> {
        let tag = self.directory_tag();
        match self.data_mut() {
            TableData::Cmap(cmap) => Ok(cmap),
            _ => Err(TtcrError::UnknownTable(tag)),
        }
    }

    /// Add a glyph to a glyf table, taking ownership of it. Returns the
    /// glyph's ID in the new font.
    pub fn glyf_add(&mut self, glyph: GlyphData, font: Option<&dyn SourceFont>) -> Result<u32> {
        self.as_glyf_mut()?.append(glyph, font)
    }

    /// Number of glyphs in a glyf table.
    pub fn glyf_count(&self) -> Result<u32> {
        Ok(self.as_glyf()?.count())
    }

    /// Add a copy of `record` to a name table.
    pub fn name_add(&mut self, record: &NameRecord) -> Result<()> {
        self.as_name_mut()?.add(record);
        Ok(())
    }

    /// Map character `code` to `glyph` in the cmap subtable `id`
    /// (`platformID << 16 | encodingID`).
    pub fn cmap_add(&mut self, id: u32, code: u32, glyph: u16) -> Result<()> {
        self.as_cmap_mut()?.add(id, code, glyph);
        Ok(())
    }
}
