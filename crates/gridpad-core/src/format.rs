use serde::{Deserialize, Serialize};
use std::fmt;

/// Display interpretation of a cell's raw string value.
///
/// Formats are an overlay, not a transformation: the raw value in the
/// row store is never rewritten. The serialized names match the
/// persisted document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    #[default]
    #[serde(rename = "Plain Text")]
    PlainText,
    Currency,
    Percentage,
    Scientific,
    #[serde(rename = "Date/Time")]
    DateTime,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatKind::PlainText => "Plain Text",
            FormatKind::Currency => "Currency",
            FormatKind::Percentage => "Percentage",
            FormatKind::Scientific => "Scientific",
            FormatKind::DateTime => "Date/Time",
        };
        f.write_str(name)
    }
}

/// A format entry in the overlay: the kind plus the rendered display
/// string, cached at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFormat {
    #[serde(rename = "type")]
    pub kind: FormatKind,
    #[serde(rename = "value")]
    pub display_value: String,
}

impl CellFormat {
    pub fn new(kind: FormatKind, display_value: impl Into<String>) -> Self {
        Self {
            kind,
            display_value: display_value.into(),
        }
    }
}
