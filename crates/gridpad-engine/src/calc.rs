use std::cmp::Ordering;

use gridpad_core::{ColumnKey, Row, RowStore, SelectionModel};
use gridpad_history::HistoryManager;
use tracing::debug;

use crate::error::EngineError;
use crate::formatting::parse_date;

/// Sum of the selection's raw values, counting non-numeric cells as
/// zero. The result is written below the last-selected cell; a silent
/// no-op when the selection is empty or the target row would fall past
/// the capacity ceiling. One history snapshot.
pub fn sum(
    store: &mut RowStore,
    selection: &SelectionModel,
    history: &mut HistoryManager,
) -> Result<Option<f64>, EngineError> {
    let total = selection
        .addresses()
        .iter()
        .map(|addr| {
            store
                .value(addr.row, addr.col)
                .map(|raw| raw.trim().parse::<f64>().unwrap_or(0.0))
        })
        .sum::<Result<f64, _>>()?;
    write_result(store, selection, history, total)
}

/// Mean of the selection's numeric raw values; non-numeric cells are
/// excluded from the count entirely. A selection with no numeric cells
/// averages to zero. Placement and history behave like `sum`.
pub fn average(
    store: &mut RowStore,
    selection: &SelectionModel,
    history: &mut HistoryManager,
) -> Result<Option<f64>, EngineError> {
    let mut total = 0.0;
    let mut count = 0usize;
    for addr in selection.addresses() {
        if let Ok(value) = store.value(addr.row, addr.col)?.trim().parse::<f64>() {
            total += value;
            count += 1;
        }
    }
    let mean = if count == 0 { 0.0 } else { total / count as f64 };
    write_result(store, selection, history, mean)
}

fn write_result(
    store: &mut RowStore,
    selection: &SelectionModel,
    history: &mut HistoryManager,
    value: f64,
) -> Result<Option<f64>, EngineError> {
    let Some(last) = selection.last() else {
        return Ok(None);
    };
    let target_row = last.row + 1;
    if target_row >= RowStore::MAX_ROWS {
        return Ok(None);
    }
    history.commit(store.clone());
    store.set(target_row, last.col, format_number(value))?;
    Ok(Some(value))
}

/// Render a result the way a cell edit would have typed it: integral
/// values without a trailing fraction.
fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Sort the materialized rows by one column and write them back into
/// the same materialized slots in ascending index order; never-written
/// rows keep their gaps. One history snapshot; no-op on a store with
/// nothing materialized.
pub fn sort_by_column(
    store: &mut RowStore,
    col: ColumnKey,
    history: &mut HistoryManager,
) -> Result<(), EngineError> {
    let mut entries: Vec<(usize, Row)> = store
        .materialized()
        .map(|(i, row)| (i, row.clone()))
        .collect();
    if entries.is_empty() {
        return Ok(());
    }

    history.commit(store.clone());

    entries.sort_by_key(|&(i, _)| i);
    let slots: Vec<usize> = entries.iter().map(|&(i, _)| i).collect();
    let mut rows: Vec<Row> = entries.into_iter().map(|(_, row)| row).collect();
    rows.sort_by(|a, b| compare_values(a.get(col), b.get(col)));

    for (slot, row) in slots.into_iter().zip(rows) {
        store.set_row(slot, row)?;
    }
    debug!(column = %col, "sorted by column");
    Ok(())
}

/// How a raw value participates in sorting. Classifying each value
/// once keeps the comparison a total order on mixed columns: all
/// numbers sort before all dates, which sort before all text.
enum SortKey<'a> {
    Number(f64),
    Date(chrono::NaiveDate),
    Text(&'a str),
}

fn sort_key(raw: &str) -> SortKey<'_> {
    if let Ok(n) = raw.trim().parse::<f64>() {
        return SortKey::Number(n);
    }
    if let Some(d) = parse_date(raw) {
        return SortKey::Date(d);
    }
    SortKey::Text(raw)
}

/// Three-tier comparison: numbers, then dates, then plain string
/// order.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (sort_key(a), sort_key(b)) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(&y),
        (SortKey::Date(x), SortKey::Date(y)) => x.cmp(&y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Number(_), _) => Ordering::Less,
        (_, SortKey::Number(_)) => Ordering::Greater,
        (SortKey::Date(_), _) => Ordering::Less,
        (_, SortKey::Date(_)) => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpad_core::CellAddress;

    fn col(letter: char) -> ColumnKey {
        ColumnKey::from_letter(letter).unwrap()
    }

    fn addr(row: usize, letter: char) -> CellAddress {
        CellAddress::new(row, col(letter))
    }

    #[test]
    fn test_sum_treats_non_numeric_as_zero() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        store.set(0, col('A'), "10").unwrap();
        store.set(1, col('A'), "20").unwrap();
        store.set(2, col('A'), "abc").unwrap();

        let mut sel = SelectionModel::new();
        sel.toggle(addr(0, 'A'));
        sel.toggle(addr(1, 'A'));
        sel.toggle(addr(2, 'A'));

        let result = sum(&mut store, &sel, &mut history).unwrap();
        assert_eq!(result, Some(30.0));
        // Written below the last-selected cell
        assert_eq!(store.value(3, col('A')).unwrap(), "30");
        assert_eq!(history.undo_count(), 1);
    }

    #[test]
    fn test_average_excludes_non_numeric() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        store.set(0, col('B'), "10").unwrap();
        store.set(1, col('B'), "20").unwrap();
        store.set(2, col('B'), "abc").unwrap();

        let mut sel = SelectionModel::new();
        sel.toggle(addr(0, 'B'));
        sel.toggle(addr(1, 'B'));
        sel.toggle(addr(2, 'B'));

        // abc is excluded from the count, so (10 + 20) / 2
        let result = average(&mut store, &sel, &mut history).unwrap();
        assert_eq!(result, Some(15.0));
        assert_eq!(store.value(3, col('B')).unwrap(), "15");
    }

    #[test]
    fn test_average_of_no_numeric_cells_is_zero() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        store.set(0, col('A'), "x").unwrap();

        let mut sel = SelectionModel::new();
        sel.toggle(addr(0, 'A'));

        assert_eq!(average(&mut store, &sel, &mut history).unwrap(), Some(0.0));
        assert_eq!(store.value(1, col('A')).unwrap(), "0");
    }

    #[test]
    fn test_empty_selection_is_silent_no_op() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        let sel = SelectionModel::new();

        assert_eq!(sum(&mut store, &sel, &mut history).unwrap(), None);
        assert_eq!(store.materialized_count(), 0);
        assert_eq!(history.undo_count(), 0);
    }

    #[test]
    fn test_result_at_ceiling_is_silent_no_op() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        let last = RowStore::MAX_ROWS - 1;
        store.set(last, col('A'), "5").unwrap();

        let mut sel = SelectionModel::new();
        sel.toggle(addr(last, 'A'));

        assert_eq!(sum(&mut store, &sel, &mut history).unwrap(), None);
        assert_eq!(history.undo_count(), 0);
    }

    #[test]
    fn test_numeric_tier_beats_string_order() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        for (i, v) in ["10", "2", "1"].iter().enumerate() {
            store.set(i, col('A'), *v).unwrap();
        }

        sort_by_column(&mut store, col('A'), &mut history).unwrap();

        assert_eq!(store.value(0, col('A')).unwrap(), "1");
        assert_eq!(store.value(1, col('A')).unwrap(), "2");
        assert_eq!(store.value(2, col('A')).unwrap(), "10");
        assert_eq!(history.undo_count(), 1);
    }

    #[test]
    fn test_date_tier() {
        assert_eq!(
            compare_values("01/02/2024", "2023-12-31"),
            Ordering::Greater
        );
        assert_eq!(compare_values("2024-01-01", "01/01/2024"), Ordering::Equal);
    }

    #[test]
    fn test_string_tier_fallback() {
        assert_eq!(compare_values("apple", "banana"), Ordering::Less);
        // Mixed pairs compare by class: numbers and dates before text
        assert_eq!(compare_values("10", "apple"), Ordering::Less);
        assert_eq!(compare_values("2024-01-01", "apple"), Ordering::Less);
        assert_eq!(compare_values("apple", "3"), Ordering::Greater);
    }

    #[test]
    fn test_comparator_is_transitive_on_mixed_values() {
        // "2" < "10" numerically while "10" < "1x" < "2"
        // lexicographically; class-first comparison keeps the three
        // pairwise results consistent.
        assert_eq!(compare_values("2", "10"), Ordering::Less);
        assert_eq!(compare_values("10", "1x"), Ordering::Less);
        assert_eq!(compare_values("2", "1x"), Ordering::Less);
    }

    #[test]
    fn test_sort_mixed_column_groups_numbers_first() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        let values = ["2", "10", "1x"];
        for i in 0..300 {
            store.set(i, col('A'), values[i % 3]).unwrap();
        }

        sort_by_column(&mut store, col('A'), &mut history).unwrap();

        assert_eq!(store.value(0, col('A')).unwrap(), "2");
        assert_eq!(store.value(99, col('A')).unwrap(), "2");
        assert_eq!(store.value(100, col('A')).unwrap(), "10");
        assert_eq!(store.value(199, col('A')).unwrap(), "10");
        assert_eq!(store.value(200, col('A')).unwrap(), "1x");
        assert_eq!(store.value(299, col('A')).unwrap(), "1x");
    }

    #[test]
    fn test_sort_keeps_gaps_and_whole_rows() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        // Rows 1, 3, 5 materialized; 0, 2, 4 are gaps
        store.set(1, col('A'), "30").unwrap();
        store.set(1, col('B'), "thirty").unwrap();
        store.set(3, col('A'), "10").unwrap();
        store.set(3, col('B'), "ten").unwrap();
        store.set(5, col('A'), "20").unwrap();
        store.set(5, col('B'), "twenty").unwrap();

        sort_by_column(&mut store, col('A'), &mut history).unwrap();

        // Same slots, sorted contents, row cells travel together
        assert_eq!(store.value(1, col('A')).unwrap(), "10");
        assert_eq!(store.value(1, col('B')).unwrap(), "ten");
        assert_eq!(store.value(3, col('A')).unwrap(), "20");
        assert_eq!(store.value(3, col('B')).unwrap(), "twenty");
        assert_eq!(store.value(5, col('A')).unwrap(), "30");
        assert!(!store.is_materialized(0));
        assert!(!store.is_materialized(2));

        // Undo restores the original arrangement
        history.undo(&mut store);
        assert_eq!(store.value(1, col('A')).unwrap(), "30");
    }

    #[test]
    fn test_sort_is_stable() {
        let mut store = RowStore::new();
        let mut history = HistoryManager::new(100);
        store.set(0, col('A'), "1").unwrap();
        store.set(0, col('B'), "first").unwrap();
        store.set(1, col('A'), "1").unwrap();
        store.set(1, col('B'), "second").unwrap();

        sort_by_column(&mut store, col('A'), &mut history).unwrap();

        assert_eq!(store.value(0, col('B')).unwrap(), "first");
        assert_eq!(store.value(1, col('B')).unwrap(), "second");
    }
}
