use serde::{Deserialize, Serialize};
use std::fmt;

use crate::column::ColumnKey;

/// Identifies one cell: (row index, column key).
///
/// Used as the key type for selection and for the style/format
/// overlays. The string key form is `"{row}-{letter}"` (e.g. `"3-B"`),
/// matching the persisted document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: ColumnKey,
}

impl CellAddress {
    pub fn new(row: usize, col: ColumnKey) -> Self {
        Self { row, col }
    }

    /// String key form used in persisted documents ("3-B").
    pub fn to_key(self) -> String {
        format!("{}-{}", self.row, self.col.letter())
    }

    /// Parse the string key form back into an address.
    pub fn from_key(key: &str) -> Option<Self> {
        let (row, col) = key.split_once('-')?;
        Some(Self {
            row: row.parse().ok()?,
            col: col.parse().ok()?,
        })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col.letter())
    }
}
