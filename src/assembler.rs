//! # Font Assembler
//!
//! Turns a [`TableRegistry`] into a TrueType file in one synchronous call:
//!
//! 1. Validate the glyph store, name and post tables
//! 2. Rebuild loca and hmtx; refresh head, hhea, maxp and post from the glyphs
//! 3. Serialize every table (memoized per table)
//! 4. Order tables by directory tag (stable, so raw tables keep their order)
//! 5. Write the sfnt header, the table directory and the 4-byte aligned bodies
//! 6. Checksum each table over its true length, head's `checkSumAdjustment`
//!    counted as zero
//! 7. Patch `checkSumAdjustment = 0xB1B0AFBA - sum(table checksums)` into the
//!    finished buffer
//!
//! Any failure aborts before a byte of output exists.

use std::path::Path;

use crate::bytes::{pad4, read_u32, round4, table_checksum, write_u32, SearchRange};
use crate::error::{Result, TtcrError};
use crate::registry::TableRegistry;
use crate::table::head::CHECKSUM_ADJUSTMENT_OFFSET;
use crate::table::{GlyphStore, HmtxTable, LocaTable, Table, TableData};
use crate::tag::Tag;

/// The whole-font checksum target.
pub const CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

const HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

impl TableRegistry {
    /// Assemble the font and return its bytes.
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        self.validate()?;
        self.derive_tables()?;

        for table in &mut self.tables {
            table.serialize()?;
        }

        let mut order: Vec<usize> = (0..self.tables.len()).collect();
        order.sort_by_key(|&i| self.tables[i].directory_tag());

        let entries: Vec<(Tag, &[u8])> = order
            .iter()
            .map(|&i| {
                let table = &self.tables[i];
                (table.directory_tag(), table.cached_bytes().unwrap_or_default())
            })
            .collect();

        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                log::warn!("table '{}' appears more than once in the directory", pair[0].0);
            }
        }

        let output = write_sfnt(self.font_tag(), &entries)?;
        log::debug!("assembled {} tables into {} bytes", entries.len(), output.len());
        Ok(output)
    }

    /// Assemble the font and write it to `path`. Nothing is written if
    /// assembly fails.
    pub fn finalize_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = self.finalize()?;
        std::fs::write(path.as_ref(), &data)?;
        log::debug!("wrote {} bytes to {}", data.len(), path.as_ref().display());
        Ok(())
    }

    /// Glyph store first, then name, then post.
    fn validate(&self) -> Result<()> {
        let store = self
            .table(Tag::GLYF)
            .ok_or(TtcrError::ZeroGlyphs)?
            .as_glyf()?;
        if store.is_empty() {
            return Err(TtcrError::ZeroGlyphs);
        }
        store.check_sequence()?;

        for table in &self.tables {
            if let TableData::Name(name) = table.data() {
                name.validate()?;
            }
        }
        for table in &self.tables {
            if let TableData::Post(post) = table.data() {
                post.check_format()?;
            }
        }
        Ok(())
    }

    /// Rebuild loca and hmtx, and refresh the glyph-dependent fields of
    /// head, hhea, maxp and post.
    fn derive_tables(&mut self) -> Result<()> {
        let glyf_index = self
            .tables
            .iter()
            .position(|t| t.tag() == Tag::GLYF)
            .ok_or(TtcrError::ZeroGlyphs)?;

        let (before, rest) = self.tables.split_at_mut(glyf_index);
        let Some((glyf, after)) = rest.split_first_mut() else {
            return Err(TtcrError::ZeroGlyphs);
        };
        let store = glyf.as_glyf()?;
        let loca = LocaTable::from_record_sizes(&store.record_sizes());
        let hmtx = HmtxTable::from_glyphs(store);

        for table in before.iter_mut().chain(after.iter_mut()) {
            refresh_from_glyphs(table, store, &loca);
        }

        self.remove_table(Tag::LOCA);
        self.remove_table(Tag::HMTX);
        self.add_table(Table::loca(loca))?;
        self.add_table(Table::hmtx(hmtx))?;
        Ok(())
    }
}

fn refresh_from_glyphs(table: &mut Table, store: &GlyphStore, loca: &LocaTable) {
    let derived = matches!(
        table.data(),
        TableData::Head(_) | TableData::Hhea(_) | TableData::Maxp(_) | TableData::Post(_)
    );
    if !derived {
        return;
    }
    match table.data_mut() {
        TableData::Head(head) => head.update_from_glyphs(store, loca),
        TableData::Hhea(hhea) => hhea.update_from_glyphs(store),
        TableData::Maxp(maxp) => maxp.update_from_glyphs(store),
        TableData::Post(post) => post.update_from_glyphs(store),
        _ => {}
    }
}

/// Checksum of one table over its true length. For head the
/// `checkSumAdjustment` field counts as zero.
fn entry_checksum(tag: Tag, data: &[u8]) -> u32 {
    let sum = table_checksum(data);
    if tag == Tag::HEAD && data.len() >= CHECKSUM_ADJUSTMENT_OFFSET + 4 {
        sum.wrapping_sub(read_u32(data, CHECKSUM_ADJUSTMENT_OFFSET))
    } else {
        sum
    }
}

/// Lay out the sfnt container for `entries`, already in directory order,
/// and patch head's `checkSumAdjustment`.
fn write_sfnt(font_tag: u32, entries: &[(Tag, &[u8])]) -> Result<Vec<u8>> {
    let num_tables = entries.len();
    let dir_len = HEADER_LEN + num_tables * TABLE_RECORD_LEN;
    let total = dir_len + entries.iter().map(|(_, d)| round4(d.len())).sum::<usize>();

    let mut output: Vec<u8> = Vec::new();
    output.try_reserve_exact(total)?;

    let sr = SearchRange::compute(num_tables, TABLE_RECORD_LEN);
    output.extend_from_slice(&font_tag.to_be_bytes());
    output.extend_from_slice(&(num_tables as u16).to_be_bytes());
    output.extend_from_slice(&sr.search_range.to_be_bytes());
    output.extend_from_slice(&sr.entry_selector.to_be_bytes());
    output.extend_from_slice(&sr.range_shift.to_be_bytes());

    let mut offset = dir_len;
    let mut file_checksum = 0u32;
    let mut head_offset = None;
    for &(tag, data) in entries {
        let checksum = entry_checksum(tag, data);
        file_checksum = file_checksum.wrapping_add(checksum);
        if tag == Tag::HEAD && head_offset.is_none() && data.len() >= CHECKSUM_ADJUSTMENT_OFFSET + 4 {
            head_offset = Some(offset);
        }
        log::trace!(
            "'{}' checksum={:#010X} offset={} length={}",
            tag,
            checksum,
            offset,
            data.len()
        );

        output.extend_from_slice(&tag.0.to_be_bytes());
        output.extend_from_slice(&checksum.to_be_bytes());
        output.extend_from_slice(&(offset as u32).to_be_bytes());
        output.extend_from_slice(&(data.len() as u32).to_be_bytes());
        offset += round4(data.len());
    }

    for &(_, data) in entries {
        output.extend_from_slice(data);
        pad4(&mut output);
    }

    if let Some(head) = head_offset {
        let adjustment = CHECKSUM_MAGIC.wrapping_sub(file_checksum);
        write_u32(&mut output, head + CHECKSUM_ADJUSTMENT_OFFSET, adjustment);
    }
    Ok(output)
}
