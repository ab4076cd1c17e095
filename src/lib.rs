//! # ttcreator
//!
//! Assembles TrueType font files from a set of tables, typically to embed a
//! subset of a font in a document.
//!
//! Callers fill a [`TableRegistry`] with structured tables (head, hhea, maxp,
//! glyf, cmap, name, post) and raw ones, then call
//! [`TableRegistry::finalize`]. The loca and hmtx tables are never supplied
//! by the caller; they are rebuilt from the glyph store on every finalize.
//!
//! ## Architecture
//!
//! ```text
//! SourceFont ──glyphs──▶ [table]      typed tables, memoized bytes
//!                            ↓
//!                        [registry]   ordered table collection
//!                            ↓
//!                        [assembler]  validate, derive, lay out, checksum
//!                            ↓
//!                        font bytes
//! ```
//!
//! ```no_run
//! use ttcreator::{GlyphData, HeadTable, HheaTable, MaxpTable, NameRecord, PostTable};
//! use ttcreator::{Table, TableRegistry, SFNT_TRUETYPE};
//!
//! # fn main() -> ttcreator::Result<()> {
//! let mut registry = TableRegistry::new(SFNT_TRUETYPE);
//!
//! let mut glyf = Table::glyf();
//! glyf.glyf_add(GlyphData::empty(0, 500), None)?;
//! registry.add_table(glyf)?;
//!
//! registry.add_table(Table::head(HeadTable::default()))?;
//! registry.add_table(Table::hhea(HheaTable::new(800, -200, 0, 1, 0)))?;
//! registry.add_table(Table::maxp(MaxpTable::default()))?;
//! registry.add_table(Table::post(PostTable::default())?)?;
//! registry.add_table(Table::name(&[NameRecord::utf16(3, 1, 0x409, 1, "Subset")]))?;
//!
//! registry.finalize_to_file("subset.ttf")?;
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod bytes;
pub mod config;
pub mod error;
pub mod registry;
pub mod source;
pub mod table;
pub mod tag;

pub use assembler::CHECKSUM_MAGIC;
pub use config::{assemble_json, FontDescription};
pub use error::{ErrorKind, Result, TtcrError};
pub use registry::{TableRegistry, SFNT_OPENTYPE, SFNT_TRUETYPE};
pub use source::{GlyphData, SourceFont, TtfSource};
pub use table::{
    CmapTable, GlyphStore, HeadTable, HheaTable, MaxpTable, NameRecord, NameTable, PostTable, Table,
    TableData,
};
pub use tag::Tag;
