//! # Table Registry
//!
//! An ordered collection of tables for one font. Insertion order is kept;
//! the assembler sorts by directory tag only when laying out the file, and
//! that sort is stable, so raw tables sharing a tag stay in the order they
//! were added.
//!
//! Duplicate structured tables are not rejected here. The registry owns its
//! tables outright: dropping it drops every table and its cached bytes.

use crate::error::Result;
use crate::table::Table;
use crate::tag::Tag;

/// sfnt version for TrueType outlines.
pub const SFNT_TRUETYPE: u32 = 0x00010000;
/// sfnt version for CFF outlines (`OTTO`).
pub const SFNT_OPENTYPE: u32 = 0x4F54544F;

#[derive(Debug, Clone)]
pub struct TableRegistry {
    font_tag: u32,
    pub(crate) tables: Vec<Table>,
}

impl TableRegistry {
    /// An empty registry for a font with the given sfnt version.
    pub fn new(font_tag: u32) -> Self {
        TableRegistry {
            font_tag,
            tables: Vec::new(),
        }
    }

    pub fn font_tag(&self) -> u32 {
        self.font_tag
    }

    /// Append a table.
    pub fn add_table(&mut self, table: Table) -> Result<()> {
        self.tables.try_reserve(1)?;
        self.tables.push(table);
        Ok(())
    }

    /// Remove every table stored under `tag`. [`Tag::RAW`] removes all raw
    /// tables whatever their directory tag.
    pub fn remove_table(&mut self, tag: Tag) {
        self.tables.retain(|t| t.tag() != tag);
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// First table stored under `tag`.
    pub fn table(&self, tag: Tag) -> Option<&Table> {
        self.tables.iter().find(|t| t.tag() == tag)
    }

    pub fn table_mut(&mut self, tag: Tag) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.tag() == tag)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
