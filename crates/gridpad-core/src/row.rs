use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::column::{ColumnKey, COLUMN_COUNT};

/// A single row: every one of the 26 columns always present, each a
/// string. Absent entries are the empty string, so a fresh `Row` reads
/// as all-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: [String; COLUMN_COUNT],
}

impl Row {
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| String::new()),
        }
    }

    pub fn get(&self, col: ColumnKey) -> &str {
        &self.cells[col.offset()]
    }

    pub fn set(&mut self, col: ColumnKey, value: impl Into<String>) {
        self.cells[col.offset()] = value.into();
    }

    /// Iterate the cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = (ColumnKey, &str)> {
        ColumnKey::all().map(move |col| (col, self.get(col)))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Case-insensitive substring match over any cell (search box).
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.cells
            .iter()
            .any(|c| c.to_lowercase().contains(needle_lower))
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

// Serialized as a map keyed by column letter, matching the document
// format ({"A": "", "B": "42", ...}). Missing keys deserialize to "".
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLUMN_COUNT))?;
        for (col, value) in self.cells() {
            map.serialize_entry(&col, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map keyed by column letters")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Row, M::Error> {
                let mut row = Row::new();
                while let Some((col, value)) = map.next_entry::<ColumnKey, String>()? {
                    row.set(col, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}
