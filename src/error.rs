//! Structured error types for the TrueType creator.
//!
//! Every fallible operation returns a [`TtcrError`]. The first six variants are
//! the structural errors of font assembly; the rest cover allocation, I/O and
//! input decoding. Each maps to a stable numeric [`ErrorKind`] so callers can
//! match on a code without inspecting the payload.

use thiserror::Error;

use crate::tag::Tag;

/// Numeric error codes. `Ok` is never produced by an error value; it exists so
/// callers bridging to integer status codes have a name for success.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Ok = 0,
    /// At least one glyph must be defined.
    ZeroGlyphs = 1,
    /// Unknown or mismatched table.
    UnknownTable = 2,
    /// Glyph IDs are not sequential in the glyf table.
    GlyphSequence = 3,
    /// The name table does not contain any records.
    NoNames = 4,
    /// The name table's string data is 64K or larger, or its record array
    /// pushes the string offset past 16 bits.
    NameTooLong = 5,
    /// Unsupported post table format.
    PostFormat = 6,
    OutOfMemory = 7,
    Io = 8,
    InvalidData = 9,
    Parse = 10,
    /// More glyphs than the 16-bit glyph count can hold.
    TooManyGlyphs = 11,
}

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum TtcrError {
    #[error("at least one glyph must be defined")]
    ZeroGlyphs,

    #[error("unknown table '{0}'")]
    UnknownTable(Tag),

    #[error("glyph IDs are not sequential: position {position} holds glyph ID {found}")]
    GlyphSequence { position: usize, found: u32 },

    #[error("'name' table does not contain any names")]
    NoNames,

    #[error("'name' table string data is too long ({len} bytes, limit 65535)")]
    NameTooLong { len: usize },

    #[error("'name' table has too many records ({count}, limit 5460)")]
    TooManyNames { count: usize },

    #[error("unsupported 'post' table format {0:#010X}")]
    PostFormat(u32),

    #[error("out of memory")]
    OutOfMemory,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("too many glyphs: {count} (limit 65535)")]
    TooManyGlyphs { count: usize },

    #[error("failed to parse font description: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },
}

pub type Result<T> = std::result::Result<T, TtcrError>;

impl TtcrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TtcrError::ZeroGlyphs => ErrorKind::ZeroGlyphs,
            TtcrError::UnknownTable(_) => ErrorKind::UnknownTable,
            TtcrError::GlyphSequence { .. } => ErrorKind::GlyphSequence,
            TtcrError::NoNames => ErrorKind::NoNames,
            TtcrError::NameTooLong { .. } | TtcrError::TooManyNames { .. } => ErrorKind::NameTooLong,
            TtcrError::PostFormat(_) => ErrorKind::PostFormat,
            TtcrError::OutOfMemory => ErrorKind::OutOfMemory,
            TtcrError::Io(_) => ErrorKind::Io,
            TtcrError::InvalidData(_) => ErrorKind::InvalidData,
            TtcrError::Parse { .. } => ErrorKind::Parse,
            TtcrError::TooManyGlyphs { .. } => ErrorKind::TooManyGlyphs,
        }
    }

    /// The numeric code of this error's kind.
    pub fn code(&self) -> u32 {
        self.kind() as u32
    }
}

impl From<std::collections::TryReserveError> for TtcrError {
    fn from(_: std::collections::TryReserveError) -> Self {
        TtcrError::OutOfMemory
    }
}

impl From<serde_json::Error> for TtcrError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the font description schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        TtcrError::Parse { source: e, hint }
    }
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}
