use serde::{Deserialize, Serialize};

use crate::address::CellAddress;
use crate::column::ColumnKey;

/// The set of currently selected cell addresses, in insertion order.
///
/// Insertion order matters: calculation results are placed relative to
/// the last-selected address. No bounds validation happens here;
/// callers only select addresses that exist on the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionModel {
    cells: Vec<CellAddress>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the address if absent, remove it if present.
    pub fn toggle(&mut self, address: CellAddress) {
        match self.cells.iter().position(|&a| a == address) {
            Some(i) => {
                self.cells.remove(i);
            }
            None => self.cells.push(address),
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Selected addresses in insertion order.
    pub fn addresses(&self) -> &[CellAddress] {
        &self.cells
    }

    /// The most recently selected address.
    pub fn last(&self) -> Option<CellAddress> {
        self.cells.last().copied()
    }

    pub fn contains(&self, address: CellAddress) -> bool {
        self.cells.contains(&address)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Top-left corner of the selection's bounding box: the minimum
    /// selected row paired with the minimum selected column. This is
    /// the clipboard anchor.
    pub fn top_left(&self) -> Option<CellAddress> {
        let row = self.cells.iter().map(|a| a.row).min()?;
        let col_offset = self.cells.iter().map(|a| a.col.offset()).min()?;
        ColumnKey::from_offset(col_offset).map(|col| CellAddress::new(row, col))
    }
}
