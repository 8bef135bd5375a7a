use std::collections::HashMap;

use gridpad_core::{CellAddress, CellStyle, ColumnKey, Row, RowStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::formatting::FormattingEngine;

/// Fixed descriptor for one of the 26 columns, carried in saved
/// documents for compatibility with older files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub header_name: String,
    pub field: String,
    pub editable: bool,
}

fn default_column_defs() -> Vec<ColumnDef> {
    ColumnKey::all()
        .map(|c| ColumnDef {
            header_name: c.letter().to_string(),
            field: c.letter().to_string(),
            editable: true,
        })
        .collect()
}

/// The persisted snapshot format: a row-indexed `data` array (nulls for
/// rows that were never written), styles keyed by `"row-letter"`, and
/// the fixed column descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDocument {
    pub data: Vec<Option<Row>>,
    #[serde(default)]
    pub cell_styles: HashMap<String, CellStyle>,
    #[serde(default = "default_column_defs")]
    pub column_defs: Vec<ColumnDef>,
}

impl SheetDocument {
    /// Snapshot the live state into the persisted shape.
    pub fn capture(store: &RowStore, formatting: &FormattingEngine) -> Self {
        let mut data = vec![None; store.len()];
        for (index, row) in store.materialized() {
            if index < data.len() {
                data[index] = Some(row.clone());
            }
        }
        let cell_styles = formatting
            .styles()
            .map(|(addr, style)| (addr.to_key(), style))
            .collect();
        Self {
            data,
            cell_styles,
            column_defs: default_column_defs(),
        }
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|e| EngineError::Save(e.to_string()))
    }

    /// Parse a saved document. A bare top-level array is accepted as
    /// the `data` field alone; an object must carry `data` as an array.
    /// Nothing is applied here, so a failed parse leaves all live state
    /// untouched.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| EngineError::Import(e.to_string()))?;
        if value.is_array() {
            let data =
                serde_json::from_value(value).map_err(|e| EngineError::Import(e.to_string()))?;
            return Ok(Self {
                data,
                cell_styles: HashMap::new(),
                column_defs: default_column_defs(),
            });
        }
        let Value::Object(map) = value else {
            return Err(EngineError::Import(
                "expected an object or an array of rows".to_string(),
            ));
        };
        match map.get("data") {
            Some(Value::Array(_)) => serde_json::from_value(Value::Object(map))
                .map_err(|e| EngineError::Import(e.to_string())),
            Some(_) => Err(EngineError::Import(
                "\"data\" must be an array of rows".to_string(),
            )),
            None => Err(EngineError::Import("missing \"data\" array".to_string())),
        }
    }

    /// Replace the live state with this document's contents. Rejected
    /// documents leave both the store and the overlays as they were.
    pub fn apply(
        &self,
        store: &mut RowStore,
        formatting: &mut FormattingEngine,
    ) -> Result<(), EngineError> {
        // Checked up front: no write below can fail once the data fits
        if self.data.len() > RowStore::MAX_ROWS {
            return Err(EngineError::Import(format!(
                "document has {} rows, capacity is {}",
                self.data.len(),
                RowStore::MAX_ROWS
            )));
        }
        store.clear();
        formatting.clear();
        for (index, entry) in self.data.iter().enumerate() {
            if let Some(row) = entry {
                store.set_row(index, row.clone())?;
            }
        }
        for (key, &style) in &self.cell_styles {
            match CellAddress::from_key(key) {
                Some(addr) => formatting.set_style(addr, style),
                None => warn!(key = key.as_str(), "skipping unparsable style key"),
            }
        }
        debug!(
            rows = self.data.len(),
            styles = self.cell_styles.len(),
            "document applied"
        );
        Ok(())
    }
}
