//! Four-byte table tags.

use std::fmt;

use serde::{de, Deserialize, Deserializer};

/// A table tag, stored as its big-endian `u32` value so that ordering the
/// directory by tag is plain numeric ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u32);

impl Tag {
    /// Tag under which raw tables are kept in a registry.
    pub const RAW: Tag = Tag(0);

    pub const CMAP: Tag = Tag::from_bytes(b"cmap");
    pub const GLYF: Tag = Tag::from_bytes(b"glyf");
    pub const HEAD: Tag = Tag::from_bytes(b"head");
    pub const HHEA: Tag = Tag::from_bytes(b"hhea");
    pub const HMTX: Tag = Tag::from_bytes(b"hmtx");
    pub const LOCA: Tag = Tag::from_bytes(b"loca");
    pub const MAXP: Tag = Tag::from_bytes(b"maxp");
    pub const NAME: Tag = Tag::from_bytes(b"name");
    pub const POST: Tag = Tag::from_bytes(b"post");

    pub const fn from_bytes(bytes: &[u8; 4]) -> Tag {
        Tag(u32::from_be_bytes(*bytes))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Parse a tag from a string of exactly four ASCII characters.
    pub fn parse(s: &str) -> Option<Tag> {
        let bytes: [u8; 4] = s.as_bytes().try_into().ok()?;
        bytes.iter().all(|b| b.is_ascii()).then(|| Tag::from_bytes(&bytes))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| (0x20..0x7F).contains(b)) {
            bytes.iter().try_for_each(|&b| write!(f, "{}", b as char))
        } else {
            write!(f, "{:#010X}", self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Tag::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid table tag '{}'", s)))
    }
}
