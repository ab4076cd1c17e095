//! Integration tests for font assembly.
//!
//! These tests build fonts through the public API and read them back with
//! ttf-parser. They verify:
//! - The checksum adjustment makes table checksums sum to the magic value
//! - Structural errors abort finalize with the right error kind
//! - Glyphs, names and character mappings survive a round trip
//! - Composite glyphs taken from a source font stay resolvable

use ttf_parser::{Face, GlyphId, PlatformId};
use ttcreator::*;

// ─── Helpers ────────────────────────────────────────────────────

const WIN_BMP: u32 = 0x0003_0001;
const WIN_FULL: u32 = 0x0003_000A;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A one-contour triangle: (0,0) (100,0) (50,100).
fn triangle() -> Vec<u8> {
    let mut d = Vec::new();
    d.extend_from_slice(&1i16.to_be_bytes());
    for v in [0i16, 0, 100, 100] {
        d.extend_from_slice(&v.to_be_bytes());
    }
    d.extend_from_slice(&2u16.to_be_bytes());
    d.extend_from_slice(&0u16.to_be_bytes());
    d.extend_from_slice(&[0x01, 0x01, 0x01]);
    for v in [0i16, 100, -50, 0, 0, 100] {
        d.extend_from_slice(&v.to_be_bytes());
    }
    d
}

/// A composite glyph placing one component at (0, 0).
fn composite_of(component: u16) -> Vec<u8> {
    let mut d = Vec::new();
    d.extend_from_slice(&(-1i16).to_be_bytes());
    for v in [0i16, 0, 100, 100] {
        d.extend_from_slice(&v.to_be_bytes());
    }
    d.extend_from_slice(&0x0002u16.to_be_bytes()); // ARGS_ARE_XY_VALUES
    d.extend_from_slice(&component.to_be_bytes());
    d.extend_from_slice(&[0, 0]);
    d
}

fn base_registry(glyphs: Vec<GlyphData>) -> TableRegistry {
    let mut registry = TableRegistry::new(SFNT_TRUETYPE);
    let mut glyf = Table::glyf();
    for glyph in glyphs {
        glyf.glyf_add(glyph, None).unwrap();
    }
    registry.add_table(glyf).unwrap();
    registry.add_table(Table::head(HeadTable::new(0x00010000, 0, 1000, 0, 0, 8, 2))).unwrap();
    registry.add_table(Table::hhea(HheaTable::new(800, -200, 0, 1, 0))).unwrap();
    registry.add_table(Table::maxp(MaxpTable::default())).unwrap();
    registry
}

fn three_glyphs() -> Vec<GlyphData> {
    vec![
        GlyphData::new(0, triangle(), 500, 0),
        GlyphData::new(1, triangle(), 600, 0),
        GlyphData::empty(2, 250),
    ]
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// (tag, checksum, offset, length) for each directory entry.
fn directory(font: &[u8]) -> Vec<(u32, u32, usize, usize)> {
    let n = read_u16(font, 4) as usize;
    (0..n)
        .map(|i| {
            let rec = 12 + i * 16;
            (
                read_u32(font, rec),
                read_u32(font, rec + 4),
                read_u32(font, rec + 8) as usize,
                read_u32(font, rec + 12) as usize,
            )
        })
        .collect()
}

fn assert_checksum_law(font: &[u8]) {
    let dir = directory(font);
    let head = dir
        .iter()
        .find(|e| e.0 == Tag::HEAD.0)
        .expect("font has a head table");
    let adjustment = read_u32(font, head.2 + 8);
    let sum = dir.iter().fold(0u32, |acc, e| acc.wrapping_add(e.1));
    assert_eq!(sum.wrapping_add(adjustment), CHECKSUM_MAGIC);
}

// ─── Round Trip ─────────────────────────────────────────────────

#[test]
fn test_round_trip_glyphs_names_and_mapping() {
    init_logging();
    let mut registry = base_registry(three_glyphs());

    let family = NameRecord::utf16(3, 1, 0x409, 1, "Test Family");
    let style = NameRecord::utf16(3, 1, 0x409, 2, "Regular");
    registry.add_table(Table::name(&[family.clone(), style.clone()])).unwrap();

    let mut cmap = Table::cmap();
    cmap.cmap_add(WIN_BMP, 'A' as u32, 1).unwrap();
    registry.add_table(cmap).unwrap();
    registry.add_table(Table::post(PostTable::default()).unwrap()).unwrap();

    let font = registry.finalize().unwrap();
    assert_checksum_law(&font);

    let face = Face::parse(&font, 0).expect("assembled font parses");
    assert_eq!(face.number_of_glyphs(), 3);
    assert_eq!(face.units_per_em(), 1000);
    assert!(face.glyph_bounding_box(GlyphId(0)).is_some());
    assert!(face.glyph_bounding_box(GlyphId(1)).is_some());
    assert!(face.glyph_bounding_box(GlyphId(2)).is_none());
    assert_eq!(face.glyph_hor_advance(GlyphId(0)), Some(500));
    assert_eq!(face.glyph_hor_advance(GlyphId(1)), Some(600));
    assert_eq!(face.glyph_hor_advance(GlyphId(2)), Some(250));

    let names: Vec<_> = face.names().into_iter().collect();
    assert_eq!(names.len(), 2);
    for (record, text) in [(&family, "Test Family"), (&style, "Regular")] {
        let name = names
            .iter()
            .find(|n| n.name_id == record.name_id)
            .expect("name record present");
        assert_eq!(name.platform_id, PlatformId::Windows);
        assert_eq!(name.encoding_id, record.encoding_id);
        assert_eq!(name.language_id, record.language_id);
        assert_eq!(name.to_string().as_deref(), Some(text));
    }

    assert_eq!(face.glyph_index('A'), Some(GlyphId(1)));
    assert_eq!(face.glyph_index('B'), None);
}

#[test]
fn test_format4_and_format12_mappings_resolve() {
    init_logging();
    let glyphs = (0..4u16).map(|i| GlyphData::new(i, triangle(), 500, 0)).collect();
    let mut registry = base_registry(glyphs);

    let mut cmap = Table::cmap();
    let bmp = [('a', 1u16), ('b', 2), ('c', 3), ('\u{4E00}', 2), ('\u{FFFD}', 1)];
    for &(ch, gid) in &bmp {
        cmap.cmap_add(WIN_BMP, ch as u32, gid).unwrap();
    }
    cmap.cmap_add(WIN_FULL, 0x1F600, 3).unwrap();
    cmap.cmap_add(WIN_FULL, 'a' as u32, 1).unwrap();
    registry.add_table(cmap).unwrap();

    let font = registry.finalize().unwrap();
    let face = Face::parse(&font, 0).unwrap();
    for &(ch, gid) in &bmp {
        assert_eq!(face.glyph_index(ch), Some(GlyphId(gid)), "char {:?}", ch);
    }
    assert_eq!(face.glyph_index('\u{1F600}'), Some(GlyphId(3)));

    let cmap = face.tables().cmap.unwrap();
    let formats: Vec<_> = cmap
        .subtables
        .into_iter()
        .map(|s| (s.encoding_id, matches!(s.format, ttf_parser::cmap::Format::SegmentMappingToDeltaValues(_))))
        .collect();
    assert_eq!(formats, vec![(1, true), (10, false)]);
}

#[test]
fn test_sparse_bmp_mapping_resolves() {
    let glyphs = (0..2u16).map(|i| GlyphData::new(i, triangle(), 500, 0)).collect();
    let mut registry = base_registry(glyphs);

    let mut cmap = Table::cmap();
    let codes: Vec<u32> = (0..0xFFFEu32).step_by(2).filter(|c| !(0xD800..0xE000).contains(c)).collect();
    for &code in &codes {
        cmap.cmap_add(WIN_BMP, code, 1).unwrap();
    }
    registry.add_table(cmap).unwrap();

    let font = registry.finalize().unwrap();
    let face = Face::parse(&font, 0).unwrap();
    let unresolved = codes
        .iter()
        .filter_map(|&c| char::from_u32(c))
        .filter(|&ch| face.glyph_index(ch) != Some(GlyphId(1)))
        .count();
    assert_eq!(unresolved, 0);
    assert_eq!(face.glyph_index('\u{1}'), None);
}

#[test]
fn test_post_format2_glyph_names() {
    let mut registry = base_registry(three_glyphs());
    let mut post = PostTable::new(0x00020000, 0, -100, 50, 0);
    post.glyph_names = vec![".notdef".to_string(), "A".to_string(), "space".to_string()];
    registry.add_table(Table::post(post).unwrap()).unwrap();

    let font = registry.finalize().unwrap();
    let face = Face::parse(&font, 0).unwrap();
    assert_eq!(face.glyph_name(GlyphId(1)), Some("A"));
    assert_eq!(face.glyph_name(GlyphId(2)), Some("space"));
}

// ─── Checksums and Layout ───────────────────────────────────────

#[test]
fn test_checksum_law_with_raw_tables() {
    let mut registry = base_registry(three_glyphs());
    registry.add_table(Table::raw(Tag::from_bytes(b"cvt "), &[0, 1, 0, 2, 0, 3])).unwrap();
    registry.add_table(Table::raw(Tag::from_bytes(b"prep"), &[0xB0, 0x01])).unwrap();
    let font = registry.finalize().unwrap();
    assert_checksum_law(&font);
}

#[test]
fn test_directory_strictly_ascending() {
    let mut registry = base_registry(three_glyphs());
    for tag in [b"prep", b"OS/2", b"fpgm", b"cvt ", b"gasp"] {
        registry.add_table(Table::raw(Tag::from_bytes(tag), &[1, 2, 3])).unwrap();
    }
    registry.add_table(Table::name(&[NameRecord::utf16(3, 1, 0x409, 1, "X")])).unwrap();
    registry.add_table(Table::cmap()).unwrap();
    registry.add_table(Table::post(PostTable::default()).unwrap()).unwrap();

    let font = registry.finalize().unwrap();
    let tags: Vec<u32> = directory(&font).iter().map(|e| e.0).collect();
    assert_eq!(tags.len(), 14);
    for pair in tags.windows(2) {
        assert!(pair[0] < pair[1], "{:#X} !< {:#X}", pair[0], pair[1]);
    }
}

#[test]
fn test_same_tag_raw_tables_keep_insertion_order() {
    let mut registry = base_registry(three_glyphs());
    registry.add_table(Table::raw(Tag::from_bytes(b"cvt "), &[0, 1, 0, 2])).unwrap();
    registry.add_table(Table::raw(Tag::from_bytes(b"fpgm"), &[0xB0])).unwrap();
    registry.add_table(Table::raw(Tag::from_bytes(b"cvt "), &[0, 3, 0, 4, 0, 5])).unwrap();

    let font = registry.finalize().unwrap();
    let cvt: Vec<&[u8]> = directory(&font)
        .iter()
        .filter(|e| e.0 == Tag::from_bytes(b"cvt ").0)
        .map(|e| &font[e.2..e.2 + e.3])
        .collect();
    assert_eq!(cvt, vec![&[0u8, 1, 0, 2][..], &[0, 3, 0, 4, 0, 5][..]]);
    assert_checksum_law(&font);
}

#[test]
fn test_finalize_is_idempotent() {
    let mut registry = base_registry(three_glyphs());
    registry.add_table(Table::name(&[NameRecord::utf16(3, 1, 0x409, 1, "X")])).unwrap();
    let first = registry.finalize().unwrap();
    let second = registry.finalize().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_finalize_to_file() {
    let path = std::env::temp_dir().join(format!("ttcreator-{}.ttf", std::process::id()));
    let mut registry = base_registry(three_glyphs());
    registry.finalize_to_file(&path).unwrap();
    let written = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(written, registry.finalize().unwrap());
}

// ─── Structural Errors ──────────────────────────────────────────

#[test]
fn test_zero_glyphs_then_one() {
    let mut registry = base_registry(Vec::new());
    let err = registry.finalize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ZeroGlyphs);
    assert_eq!(err.code(), 1);

    let glyf = registry.table_mut(Tag::GLYF).unwrap();
    assert_eq!(glyf.glyf_add(GlyphData::empty(0, 500), None).unwrap(), 0);
    assert!(registry.finalize().is_ok());
}

#[test]
fn test_glyph_sequence_gap() {
    let mut glyphs = three_glyphs();
    for (i, g) in glyphs.iter_mut().enumerate() {
        g.new_id = i as u32;
    }
    glyphs[2].new_id = 5;

    let mut registry = base_registry(Vec::new());
    registry.remove_table(Tag::GLYF);
    registry.add_table(Table::glyf_from(GlyphStore::from_records(glyphs))).unwrap();
    let err = registry.finalize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GlyphSequence);
    assert_eq!(err.code(), 3);
}

#[test]
fn test_glyph_count_limited_to_u16() {
    let mut registry = base_registry(Vec::new());
    let glyf = registry.table_mut(Tag::GLYF).unwrap();
    for i in 0..0xFFFFu32 {
        glyf.glyf_add(GlyphData::empty(i as u16, 0), None).unwrap();
    }
    let err = glyf.glyf_add(GlyphData::empty(0, 0), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooManyGlyphs);

    let font = registry.finalize().unwrap();
    let face = Face::parse(&font, 0).unwrap();
    assert_eq!(face.number_of_glyphs(), 0xFFFF);
}

#[test]
fn test_appended_ids_are_sequential() {
    let mut glyf = Table::glyf();
    for i in 0..10u16 {
        assert_eq!(glyf.glyf_add(GlyphData::empty(100 + i, 500), None).unwrap(), i as u32);
    }
    assert_eq!(glyf.glyf_count().unwrap(), 10);
}

#[test]
fn test_name_constraints() {
    let mut registry = base_registry(three_glyphs());
    registry.add_table(Table::name(&[])).unwrap();
    assert_eq!(registry.finalize().unwrap_err().kind(), ErrorKind::NoNames);

    let mut name = Table::name(&[]);
    name.name_add(&NameRecord::new(1, 0, 0, 1, vec![b'x'; 65535])).unwrap();
    registry.remove_table(Tag::NAME);
    registry.add_table(name).unwrap();
    assert!(registry.finalize().is_ok());

    registry
        .table_mut(Tag::NAME)
        .unwrap()
        .name_add(&NameRecord::new(1, 0, 0, 2, vec![b'y']))
        .unwrap();
    let err = registry.finalize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameTooLong);
    assert_eq!(err.code(), 5);
}

#[test]
fn test_post_formats() {
    for format in [0x00010000, 0x00020000, 0x00025000, 0x00030000] {
        let mut registry = base_registry(three_glyphs());
        registry.add_table(Table::post(PostTable::new(format, 0, 0, 0, 0)).unwrap()).unwrap();
        let font = registry.finalize().unwrap();
        assert!(Face::parse(&font, 0).is_ok(), "format {:#X}", format);
    }

    let err = Table::post(PostTable::new(0x00040000, 0, 0, 0, 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PostFormat);
    assert_eq!(err.code(), 6);
}

#[test]
fn test_failed_finalize_leaves_registry_usable() {
    let mut registry = base_registry(three_glyphs());
    registry.add_table(Table::name(&[])).unwrap();
    assert!(registry.finalize().is_err());
    registry.remove_table(Tag::NAME);
    let font = registry.finalize().unwrap();
    assert_checksum_law(&font);
}

// ─── Subsetting From a Source Font ──────────────────────────────

#[test]
fn test_subset_composite_from_source_font() {
    init_logging();
    // Source: 0 = .notdef, 1 = triangle, 2 = composite of 1, 3 = triangle
    let source_glyphs = vec![
        GlyphData::empty(0, 500),
        GlyphData::new(1, triangle(), 600, 0),
        GlyphData::new(2, composite_of(1), 700, 0),
        GlyphData::new(3, triangle(), 800, 0),
    ];
    let source_font = base_registry(source_glyphs).finalize().unwrap();
    let source = TtfSource::new(&source_font, 0).unwrap();
    assert_eq!(source.number_of_glyphs(), 4);
    assert_eq!(source.glyph_components(2), vec![2, 1]);

    let mut registry = TableRegistry::new(SFNT_TRUETYPE);
    let mut glyf = Table::glyf();
    glyf.glyf_add(source.glyph_data(0).unwrap(), Some(&source)).unwrap();
    let id = glyf.glyf_add(source.glyph_data(2).unwrap(), Some(&source)).unwrap();
    assert_eq!(id, 1);
    assert_eq!(glyf.glyf_count().unwrap(), 3);
    registry.add_table(glyf).unwrap();
    registry.add_table(Table::head(HeadTable::default())).unwrap();
    registry.add_table(Table::hhea(HheaTable::new(800, -200, 0, 1, 0))).unwrap();
    registry.add_table(Table::maxp(MaxpTable::from_bytes(source.maxp_bytes()))).unwrap();

    let font = registry.finalize().unwrap();
    assert_checksum_law(&font);

    let face = Face::parse(&font, 0).unwrap();
    assert_eq!(face.number_of_glyphs(), 3);
    assert_eq!(face.glyph_hor_advance(GlyphId(1)), Some(700));
    assert_eq!(face.glyph_hor_advance(GlyphId(2)), Some(600));
    // The composite now points at new glyph 2.
    let bbox = face.glyph_bounding_box(GlyphId(1)).expect("composite resolves");
    assert_eq!((bbox.x_max, bbox.y_max), (100, 100));

    let maxp = face.raw_face().table(ttf_parser::Tag::from_bytes(b"maxp")).unwrap();
    assert_eq!(read_u16(maxp, 4), 3); // numGlyphs
    assert_eq!(read_u16(maxp, 10), 3); // maxCompositePoints
    assert_eq!(read_u16(maxp, 30), 1); // maxComponentDepth
}

// ─── JSON Descriptions ──────────────────────────────────────────

#[test]
fn test_assemble_json_round_trip() {
    use base64::Engine;
    let outline = base64::engine::general_purpose::STANDARD.encode(triangle());
    let json = format!(
        r#"{{
            "head": {{ "unitsPerEm": 2048 }},
            "hhea": {{ "ascender": 1900, "descender": -500 }},
            "post": {{ "format": 196608 }},
            "names": [{{ "platformId": 3, "encodingId": 1, "languageId": 1033, "nameId": 4, "text": "Json Font" }}],
            "cmap": [{{ "code": 65, "glyph": 1 }}],
            "glyphs": [{{ "advanceWidth": 500 }}, {{ "advanceWidth": 1200, "data": "{}" }}]
        }}"#,
        outline
    );
    let font = assemble_json(&json).unwrap();
    assert_checksum_law(&font);

    let face = Face::parse(&font, 0).unwrap();
    assert_eq!(face.units_per_em(), 2048);
    assert_eq!(face.ascender(), 1900);
    assert_eq!(face.glyph_index('A'), Some(GlyphId(1)));
    assert_eq!(face.glyph_hor_advance(GlyphId(1)), Some(1200));
    let full_name = face
        .names()
        .into_iter()
        .find(|n| n.name_id == ttf_parser::name_id::FULL_NAME)
        .and_then(|n| n.to_string());
    assert_eq!(full_name.as_deref(), Some("Json Font"));
}

#[test]
fn test_assemble_json_syntax_error() {
    let err = assemble_json("{ \"glyphs\": [,] }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("Hint:"));
}
