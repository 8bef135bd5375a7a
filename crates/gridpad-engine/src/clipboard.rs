use std::collections::BTreeMap;

use gridpad_core::{CellAddress, CellStyle, RowStore, SelectionModel};
use gridpad_history::HistoryManager;
use tracing::debug;

use crate::error::EngineError;
use crate::task::{CancelToken, Progress};

/// One copied cell: its raw value plus any style flags it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipEntry {
    pub value: String,
    pub style: Option<CellStyle>,
}

/// Copied cells keyed by (row offset, column offset) relative to the
/// selection's top-left corner. The BTreeMap gives a deterministic
/// row-major processing order for chunked paste.
pub type ClipboardPayload = BTreeMap<(usize, usize), ClipEntry>;

/// Capture the selected cells as offset-keyed entries. An empty
/// selection yields an empty payload.
pub fn copy(
    store: &RowStore,
    selection: &SelectionModel,
    formatting: &crate::formatting::FormattingEngine,
) -> Result<ClipboardPayload, EngineError> {
    let Some(origin) = selection.top_left() else {
        return Ok(ClipboardPayload::new());
    };

    let mut payload = ClipboardPayload::new();
    for &addr in selection.addresses() {
        let value = store.value(addr.row, addr.col)?.to_string();
        let key = (addr.row - origin.row, addr.col.offset() - origin.col.offset());
        payload.insert(
            key,
            ClipEntry {
                value,
                style: formatting.style(addr),
            },
        );
    }
    Ok(payload)
}

/// Copy, then blank every selected cell and drop its style. Commits one
/// history snapshot; a no-op (and no commit) on an empty selection.
pub fn cut(
    store: &mut RowStore,
    selection: &SelectionModel,
    formatting: &mut crate::formatting::FormattingEngine,
    history: &mut HistoryManager,
) -> Result<ClipboardPayload, EngineError> {
    let payload = copy(store, selection, formatting)?;
    if selection.is_empty() {
        return Ok(payload);
    }

    history.commit(store.clone());
    for &addr in selection.addresses() {
        store.set(addr.row, addr.col, "")?;
        formatting.remove_style(addr);
    }
    debug!(cells = payload.len(), "cut selection");
    Ok(payload)
}

/// A paste in flight, processed in chunks so huge payloads never block
/// the caller's loop.
///
/// Targets are `anchor + offset`; entries landing past the capacity
/// ceiling or past column Z are skipped. Exactly one history snapshot
/// is committed, when the final chunk completes; a cancelled paste
/// keeps the rows already written but commits nothing.
#[derive(Debug)]
pub struct PasteOp {
    entries: Vec<((usize, usize), ClipEntry)>,
    anchor: CellAddress,
    cursor: usize,
    chunk_size: usize,
    token: CancelToken,
    before: Option<RowStore>,
}

impl PasteOp {
    pub fn new(
        payload: &ClipboardPayload,
        anchor: CellAddress,
        chunk_size: usize,
        token: CancelToken,
        before: RowStore,
    ) -> Self {
        Self {
            entries: payload.iter().map(|(&k, e)| (k, e.clone())).collect(),
            anchor,
            cursor: 0,
            chunk_size: chunk_size.max(1),
            token,
            before: Some(before),
        }
    }

    /// Process the next chunk. Safe to call again after `Done` or
    /// `Cancelled` (further calls are no-ops).
    pub fn resume(
        &mut self,
        store: &mut RowStore,
        formatting: &mut crate::formatting::FormattingEngine,
        history: &mut HistoryManager,
    ) -> Result<Progress, EngineError> {
        if self.before.is_none() {
            return Ok(Progress::Done);
        }
        if self.token.is_cancelled() {
            self.before = None;
            debug!(completed = self.cursor, "paste cancelled");
            return Ok(Progress::Cancelled);
        }

        let end = (self.cursor + self.chunk_size).min(self.entries.len());
        for ((row_offset, col_offset), entry) in &self.entries[self.cursor..end] {
            let row = self.anchor.row + row_offset;
            if row >= RowStore::MAX_ROWS {
                continue;
            }
            let Some(col) = self.anchor.col.checked_add(*col_offset) else {
                continue;
            };
            store.set(row, col, entry.value.clone())?;
            let target = CellAddress::new(row, col);
            match entry.style {
                Some(style) => formatting.set_style(target, style),
                None => formatting.remove_style(target),
            }
        }
        self.cursor = end;

        if self.cursor >= self.entries.len() {
            // Exactly one snapshot for the whole logical paste
            if let Some(before) = self.before.take() {
                history.commit(before);
            }
            debug!(cells = self.entries.len(), "paste complete");
            return Ok(Progress::Done);
        }
        Ok(Progress::Pending {
            completed: self.cursor,
        })
    }

    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }
}
