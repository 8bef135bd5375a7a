use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::column::ColumnKey;
use crate::error::StoreError;
use crate::row::Row;

/// Sparse, lazily-materialized row table with a capacity ceiling and a
/// tracked logical length.
///
/// Conceptually an array of `Row` indexed by row index, but only rows
/// that have been written are physically stored; reading an
/// unmaterialized index yields a fresh all-empty row. `logical_len` is
/// the high-water mark of any index ever written, distinct from the
/// capacity ceiling (`MAX_ROWS`) and from the materialized count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowStore {
    rows: HashMap<usize, Row>,
    logical_len: usize,
}

impl RowStore {
    /// Hard capacity ceiling; indices at or beyond it are rejected.
    pub const MAX_ROWS: usize = 500_000;
    /// Logical length of a freshly created store.
    pub const INITIAL_ROWS: usize = 1_000;

    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            logical_len: Self::INITIAL_ROWS,
        }
    }

    fn check_bounds(index: usize) -> Result<(), StoreError> {
        if index < Self::MAX_ROWS {
            Ok(())
        } else {
            Err(StoreError::OutOfRange {
                index,
                max: Self::MAX_ROWS,
            })
        }
    }

    /// The materialized row at `index`, or a fresh all-empty row
    /// (constructed, not persisted). Fails for `index >= MAX_ROWS`.
    pub fn get(&self, index: usize) -> Result<Cow<'_, Row>, StoreError> {
        Self::check_bounds(index)?;
        Ok(match self.rows.get(&index) {
            Some(row) => Cow::Borrowed(row),
            None => Cow::Owned(Row::new()),
        })
    }

    /// Read one cell without cloning; "" for unmaterialized rows.
    pub fn value(&self, index: usize, col: ColumnKey) -> Result<&str, StoreError> {
        Self::check_bounds(index)?;
        Ok(self.rows.get(&index).map(|r| r.get(col)).unwrap_or(""))
    }

    /// Write one cell, materializing the row (all 26 columns empty
    /// first) if needed, and raising `logical_len` past `index`.
    pub fn set(
        &mut self,
        index: usize,
        col: ColumnKey,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        Self::check_bounds(index)?;
        self.rows.entry(index).or_default().set(col, value);
        self.touch(index);
        Ok(())
    }

    /// Replace the whole row at `index` (document import, sort).
    pub fn set_row(&mut self, index: usize, row: Row) -> Result<(), StoreError> {
        Self::check_bounds(index)?;
        self.rows.insert(index, row);
        self.touch(index);
        Ok(())
    }

    fn touch(&mut self, index: usize) {
        if index >= self.logical_len {
            self.logical_len = index + 1;
        }
    }

    /// Logical length: high-water mark of any index ever written.
    pub fn len(&self) -> usize {
        self.logical_len
    }

    /// True only when every logical row has been removed; pairs with
    /// `len()`.
    pub fn is_empty(&self) -> bool {
        self.logical_len == 0
    }

    /// Number of physically stored rows.
    pub fn materialized_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_materialized(&self, index: usize) -> bool {
        self.rows.contains_key(&index)
    }

    /// Iterate materialized rows (no ordering guarantee).
    pub fn materialized(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().map(|(&i, row)| (i, row))
    }

    /// Append one empty logical row. Silent no-op at the capacity
    /// ceiling; returns whether a row was added.
    pub fn add_row(&mut self) -> bool {
        if self.logical_len >= Self::MAX_ROWS {
            return false;
        }
        self.logical_len += 1;
        true
    }

    /// Keep only the logical indices satisfying `keep`, renumbered
    /// contiguously from 0. `logical_len` becomes the kept count.
    pub fn compact(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let mut renumbered = HashMap::new();
        let mut next = 0;
        for index in 0..self.logical_len {
            if keep(index) {
                if let Some(row) = self.rows.remove(&index) {
                    renumbered.insert(next, row);
                }
                next += 1;
            }
        }
        self.rows = renumbered;
        self.logical_len = next;
    }

    /// Reset to a fresh store ("new file").
    pub fn clear(&mut self) {
        self.rows.clear();
        self.logical_len = Self::INITIAL_ROWS;
    }
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}
