use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use gridpad_core::{CellAddress, CellFormat, CellStyle, FormatKind, RowStore};
use tracing::debug;

use crate::error::EngineError;

const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Presentation overlays: style flags, number/date formats and decimal
/// precision, all keyed by cell address. The raw string in the row
/// store is never rewritten; formats only change what is displayed.
#[derive(Debug, Clone, Default)]
pub struct FormattingEngine {
    styles: HashMap<CellAddress, CellStyle>,
    formats: HashMap<CellAddress, CellFormat>,
    decimals: HashMap<CellAddress, u32>,
}

impl FormattingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union-merge `delta` into each address's style flags.
    pub fn apply_style(&mut self, addresses: &[CellAddress], delta: CellStyle) {
        for &addr in addresses {
            self.styles.entry(addr).or_default().merge(delta);
        }
    }

    pub fn style(&self, addr: CellAddress) -> Option<CellStyle> {
        self.styles.get(&addr).copied()
    }

    pub fn set_style(&mut self, addr: CellAddress, style: CellStyle) {
        if style.is_plain() {
            self.styles.remove(&addr);
        } else {
            self.styles.insert(addr, style);
        }
    }

    pub fn remove_style(&mut self, addr: CellAddress) {
        self.styles.remove(&addr);
    }

    pub fn styles(&self) -> impl Iterator<Item = (CellAddress, CellStyle)> + '_ {
        self.styles.iter().map(|(&a, &s)| (a, s))
    }

    pub fn format(&self, addr: CellAddress) -> Option<&CellFormat> {
        self.formats.get(&addr)
    }

    /// Apply a display format to every address, reading raw values from
    /// the store.
    ///
    /// Numeric kinds silently skip cells whose raw value is not a
    /// number. `DateTime` is all-or-nothing: every raw value must parse
    /// as a date or the whole call fails with `InvalidDate` and no
    /// overlay entry changes. `PlainText` drops the overlay entries.
    pub fn apply_number_format(
        &mut self,
        store: &RowStore,
        addresses: &[CellAddress],
        kind: FormatKind,
    ) -> Result<(), EngineError> {
        if kind == FormatKind::DateTime {
            for &addr in addresses {
                let raw = store.value(addr.row, addr.col)?;
                if parse_date(raw).is_none() {
                    return Err(EngineError::InvalidDate(raw.to_string()));
                }
            }
        }

        for &addr in addresses {
            let raw = store.value(addr.row, addr.col)?;
            match kind {
                FormatKind::PlainText => {
                    self.formats.remove(&addr);
                }
                FormatKind::DateTime => {
                    // Validated above
                    if let Some(date) = parse_date(raw) {
                        let display = date.format("%m/%d/%Y").to_string();
                        self.formats.insert(addr, CellFormat::new(kind, display));
                    }
                }
                FormatKind::Currency | FormatKind::Percentage | FormatKind::Scientific => {
                    let Ok(value) = raw.trim().parse::<f64>() else {
                        continue;
                    };
                    let display = self.render_numeric(addr, kind, value);
                    self.formats.insert(addr, CellFormat::new(kind, display));
                }
            }
        }
        debug!(count = addresses.len(), ?kind, "applied number format");
        Ok(())
    }

    /// Shift each address's decimal precision by `delta` (floored at
    /// zero) and re-render any existing Currency/Percentage overlay
    /// from the raw store value.
    pub fn adjust_decimal_places(
        &mut self,
        store: &RowStore,
        addresses: &[CellAddress],
        delta: i32,
    ) -> Result<(), EngineError> {
        for &addr in addresses {
            let current = self.decimal_places(addr) as i64;
            let next = (current + delta as i64).max(0) as u32;
            self.decimals.insert(addr, next);

            let Some(kind) = self.formats.get(&addr).map(|f| f.kind) else {
                continue;
            };
            if !matches!(kind, FormatKind::Currency | FormatKind::Percentage) {
                continue;
            }
            let raw = store.value(addr.row, addr.col)?;
            if let Ok(value) = raw.trim().parse::<f64>() {
                let display = self.render_numeric(addr, kind, value);
                self.formats.insert(addr, CellFormat::new(kind, display));
            }
        }
        Ok(())
    }

    pub fn decimal_places(&self, addr: CellAddress) -> u32 {
        self.decimals
            .get(&addr)
            .copied()
            .unwrap_or(DEFAULT_DECIMAL_PLACES)
    }

    /// Drop every overlay (new file / document open).
    pub fn clear(&mut self) {
        self.styles.clear();
        self.formats.clear();
        self.decimals.clear();
    }

    fn render_numeric(&self, addr: CellAddress, kind: FormatKind, value: f64) -> String {
        let places = self.decimal_places(addr);
        match kind {
            FormatKind::Currency => format_currency(value, places),
            FormatKind::Percentage => format_percentage(value, places),
            FormatKind::Scientific => format_scientific(value),
            _ => unreachable!("render_numeric only handles numeric kinds"),
        }
    }
}

/// `1234.5` -> `$1,234.50`; negatives carry a leading minus.
pub fn format_currency(value: f64, places: u32) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(value.abs(), places))
}

/// Longstanding convention: the raw value is divided by 100, then
/// rendered as a percent (which multiplies by 100 again), so `"50"`
/// displays as `50.00%`.
pub fn format_percentage(value: f64, places: u32) -> String {
    let scaled = value / 100.0;
    let sign = if scaled < 0.0 { "-" } else { "" };
    format!("{sign}{}%", group_thousands((scaled * 100.0).abs(), places))
}

/// `12345.0` -> `1.23e+4`, matching two-digit exponential notation
/// with an always-signed exponent.
pub fn format_scientific(value: f64) -> String {
    if value == 0.0 {
        return "0.00e+0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    let mut exponent = magnitude.log10().floor() as i32;
    let mut mantissa = magnitude / 10f64.powi(exponent);
    // Rounding the mantissa to two digits can push it to 10.0
    if format!("{mantissa:.2}").starts_with("10") {
        mantissa /= 10.0;
        exponent += 1;
    }
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{mantissa:.2}e{exp_sign}{}", exponent.abs())
}

fn group_thousands(value: f64, places: u32) -> String {
    let places = places as usize;
    let formatted = format!("{value:.places$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

/// Lenient date parse covering the formats users actually type:
/// RFC 3339, ISO dates, and US-style `MM/DD/YYYY`, each with an
/// optional time part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpad_core::ColumnKey;

    fn addr(row: usize, letter: char) -> CellAddress {
        CellAddress::new(row, ColumnKey::from_letter(letter).unwrap())
    }

    fn store_with(values: &[(usize, char, &str)]) -> RowStore {
        let mut store = RowStore::new();
        for &(row, letter, value) in values {
            store
                .set(row, ColumnKey::from_letter(letter).unwrap(), value)
                .unwrap();
        }
        store
    }

    #[test]
    fn test_style_merge_keeps_existing_flags() {
        let mut fmt = FormattingEngine::new();
        fmt.apply_style(&[addr(0, 'A')], CellStyle::ITALIC);
        fmt.apply_style(&[addr(0, 'A')], CellStyle::BOLD);

        let style = fmt.style(addr(0, 'A')).unwrap();
        assert!(style.bold && style.italic);
    }

    #[test]
    fn test_currency_format() {
        assert_eq!(format_currency(1234.5, 2), "$1,234.50");
        assert_eq!(format_currency(-9876543.21, 2), "-$9,876,543.21");
        assert_eq!(format_currency(0.0, 2), "$0.00");
        assert_eq!(format_currency(12.345, 0), "$12");
    }

    #[test]
    fn test_percentage_keeps_legacy_scaling() {
        // "50" displays as 50.00%, not 5000.00%
        assert_eq!(format_percentage(50.0, 2), "50.00%");
        assert_eq!(format_percentage(1234.0, 2), "1,234.00%");
        assert_eq!(format_percentage(-3.5, 1), "-3.5%");
    }

    #[test]
    fn test_scientific_format() {
        assert_eq!(format_scientific(12345.0), "1.23e+4");
        assert_eq!(format_scientific(0.00123), "1.23e-3");
        assert_eq!(format_scientific(-42.0), "-4.20e+1");
        assert_eq!(format_scientific(0.0), "0.00e+0");
        // Mantissa rounding carry: 9.999 rounds up a magnitude
        assert_eq!(format_scientific(9.999e5), "1.00e+6");
    }

    #[test]
    fn test_numeric_format_skips_unparsable() {
        let store = store_with(&[(0, 'A', "100"), (1, 'A', "abc")]);
        let mut fmt = FormattingEngine::new();
        fmt.apply_number_format(&store, &[addr(0, 'A'), addr(1, 'A')], FormatKind::Currency)
            .unwrap();

        assert_eq!(fmt.format(addr(0, 'A')).unwrap().display_value, "$100.00");
        assert!(fmt.format(addr(1, 'A')).is_none());
    }

    #[test]
    fn test_datetime_all_or_nothing() {
        let store = store_with(&[(0, 'A', "2024-03-15"), (1, 'A', "not a date")]);
        let mut fmt = FormattingEngine::new();

        let err = fmt
            .apply_number_format(&store, &[addr(0, 'A'), addr(1, 'A')], FormatKind::DateTime)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));
        // Nothing was written, not even the valid cell
        assert!(fmt.format(addr(0, 'A')).is_none());

        fmt.apply_number_format(&store, &[addr(0, 'A')], FormatKind::DateTime)
            .unwrap();
        assert_eq!(
            fmt.format(addr(0, 'A')).unwrap().display_value,
            "03/15/2024"
        );
    }

    #[test]
    fn test_parse_date_accepted_forms() {
        for raw in [
            "2024-03-15",
            "03/15/2024",
            "2024-03-15 10:30:00",
            "2024-03-15T10:30:00+00:00",
        ] {
            let date = parse_date(raw).unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        }
        assert!(parse_date("").is_none());
        assert!(parse_date("15th of March").is_none());
    }

    #[test]
    fn test_plain_text_clears_overlay() {
        let store = store_with(&[(0, 'A', "7")]);
        let mut fmt = FormattingEngine::new();
        fmt.apply_number_format(&store, &[addr(0, 'A')], FormatKind::Scientific)
            .unwrap();
        assert!(fmt.format(addr(0, 'A')).is_some());

        fmt.apply_number_format(&store, &[addr(0, 'A')], FormatKind::PlainText)
            .unwrap();
        assert!(fmt.format(addr(0, 'A')).is_none());
    }

    #[test]
    fn test_adjust_decimal_places_floors_at_zero() {
        let store = store_with(&[(0, 'A', "1234.5678")]);
        let mut fmt = FormattingEngine::new();
        fmt.apply_number_format(&store, &[addr(0, 'A')], FormatKind::Currency)
            .unwrap();

        fmt.adjust_decimal_places(&store, &[addr(0, 'A')], 1).unwrap();
        assert_eq!(fmt.decimal_places(addr(0, 'A')), 3);
        assert_eq!(
            fmt.format(addr(0, 'A')).unwrap().display_value,
            "$1,234.568"
        );

        fmt.adjust_decimal_places(&store, &[addr(0, 'A')], -10).unwrap();
        assert_eq!(fmt.decimal_places(addr(0, 'A')), 0);
        assert_eq!(fmt.format(addr(0, 'A')).unwrap().display_value, "$1,235");
    }

    #[test]
    fn test_formats_never_touch_raw_values() {
        let mut store = store_with(&[(0, 'A', "1234.5")]);
        let mut fmt = FormattingEngine::new();
        fmt.apply_number_format(&store, &[addr(0, 'A')], FormatKind::Currency)
            .unwrap();

        let col = ColumnKey::from_letter('A').unwrap();
        assert_eq!(store.value(0, col).unwrap(), "1234.5");
        // Re-reading through the store still gives the raw value
        store.set(0, col, "1234.5").unwrap();
        assert_eq!(store.value(0, col).unwrap(), "1234.5");
    }
}
