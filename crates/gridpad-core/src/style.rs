use serde::{Deserialize, Serialize};

fn is_false(b: &bool) -> bool {
    !*b
}

/// Boolean style flags applied on top of a cell's raw value.
///
/// Stored as an overlay keyed by cell address; cells with no entry are
/// plain. Serialization skips unset flags to keep saved documents
/// small.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}

impl CellStyle {
    pub const BOLD: Self = Self {
        bold: true,
        italic: false,
        underline: false,
    };
    pub const ITALIC: Self = Self {
        bold: false,
        italic: true,
        underline: false,
    };
    pub const UNDERLINE: Self = Self {
        bold: false,
        italic: false,
        underline: true,
    };

    /// Union of both flag sets. Applying bold to an italic cell keeps
    /// the italic.
    pub fn merge(&mut self, other: Self) {
        self.bold |= other.bold;
        self.italic |= other.italic;
        self.underline |= other.underline;
    }

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_union() {
        let mut style = CellStyle::ITALIC;
        style.merge(CellStyle::BOLD);
        assert!(style.bold);
        assert!(style.italic);
        assert!(!style.underline);
    }

    #[test]
    fn test_merge_idempotent() {
        let mut style = CellStyle::BOLD;
        style.merge(CellStyle::BOLD);
        assert_eq!(style, CellStyle::BOLD);
    }

    #[test]
    fn test_default_is_plain() {
        assert!(CellStyle::default().is_plain());
        assert!(!CellStyle::UNDERLINE.is_plain());
    }

    #[test]
    fn test_serialization_skips_unset_flags() {
        let json = serde_json::to_string(&CellStyle::BOLD).unwrap();
        assert_eq!(json, r#"{"bold":true}"#);

        let back: CellStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellStyle::BOLD);
    }
}
