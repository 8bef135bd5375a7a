use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fixed columns in every sheet.
pub const COLUMN_COUNT: usize = 26;

/// One of the 26 fixed column identifiers ("A".."Z").
///
/// Ordering derives from the identifier itself, not from any storage
/// order. Internally a 0-based offset, so "A" is 0 and "Z" is 25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey(u8);

impl ColumnKey {
    pub const A: ColumnKey = ColumnKey(0);

    /// Create from a 0-based offset; `None` if offset >= 26.
    pub fn from_offset(offset: usize) -> Option<Self> {
        if offset < COLUMN_COUNT {
            Some(ColumnKey(offset as u8))
        } else {
            None
        }
    }

    /// Create from a column letter ('A'..'Z', case-insensitive).
    pub fn from_letter(letter: char) -> Option<Self> {
        let upper = letter.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(ColumnKey(upper as u8 - b'A'))
        } else {
            None
        }
    }

    /// 0-based offset of this column ("A" -> 0).
    pub fn offset(self) -> usize {
        self.0 as usize
    }

    /// The identifying letter ("A".."Z").
    pub fn letter(self) -> char {
        char::from(b'A' + self.0)
    }

    /// Shift right by `offset` columns; `None` past "Z".
    pub fn checked_add(self, offset: usize) -> Option<Self> {
        Self::from_offset(self.offset() + offset)
    }

    /// All 26 columns in identifier order.
    pub fn all() -> impl Iterator<Item = ColumnKey> {
        (0..COLUMN_COUNT as u8).map(ColumnKey)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for ColumnKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => ColumnKey::from_letter(c).ok_or(()),
            _ => Err(()),
        }
    }
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.letter())
    }
}

impl<'de> Deserialize<'de> for ColumnKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| de::Error::custom(format!("invalid column key: {s:?}")))
    }
}
