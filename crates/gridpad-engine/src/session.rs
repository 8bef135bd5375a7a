use std::borrow::Cow;
use std::collections::HashSet;

use gridpad_core::{
    CellAddress, CellStyle, ColumnKey, FormatKind, Row, RowStore, SelectionModel, Viewport,
    ViewportController,
};
use gridpad_history::HistoryManager;
use tracing::info;

use crate::clipboard::{self, ClipboardPayload, PasteOp};
use crate::document::SheetDocument;
use crate::error::EngineError;
use crate::export;
use crate::formatting::FormattingEngine;
use crate::task::{BulkGate, CancelToken, Progress, DEFAULT_CHUNK_SIZE};

/// One editing session: the store plus every piece of state that hangs
/// off it. Front ends drive this and render from `rows_to_render`;
/// keyboard chords and menus map onto these methods outside the
/// engine.
pub struct Session {
    store: RowStore,
    selection: SelectionModel,
    formatting: FormattingEngine,
    history: HistoryManager,
    viewport: ViewportController,
    clipboard: ClipboardPayload,
    pending_paste: Option<PasteOp>,
    gate: BulkGate,
    filter: Option<String>,
}

impl Session {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            store: RowStore::new(),
            selection: SelectionModel::new(),
            formatting: FormattingEngine::new(),
            history: HistoryManager::new(HistoryManager::DEFAULT_MAX_DEPTH),
            viewport: ViewportController::new(viewport_height),
            clipboard: ClipboardPayload::new(),
            pending_paste: None,
            gate: BulkGate::new(),
            filter: None,
        }
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn formatting(&self) -> &FormattingEngine {
        &self.formatting
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    // --- editing ---

    /// Renderer edit callback: one cell write, one undo step.
    pub fn edit_cell(
        &mut self,
        row: usize,
        col: ColumnKey,
        value: impl Into<String>,
    ) -> Result<(), EngineError> {
        let before = self.store.clone();
        self.store.set(row, col, value)?;
        self.history.commit(before);
        Ok(())
    }

    pub fn add_row(&mut self) -> bool {
        if self.store.len() >= RowStore::MAX_ROWS {
            return false;
        }
        self.history.commit(self.store.clone());
        self.store.add_row()
    }

    /// Delete the rows any selected cell sits on, closing the gaps.
    pub fn remove_selected_rows(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let doomed: HashSet<usize> = self.selection.addresses().iter().map(|a| a.row).collect();
        self.history.commit(self.store.clone());
        self.store.compact(|i| !doomed.contains(&i));
        self.selection.clear();
    }

    // --- viewport ---

    pub fn on_scroll(&mut self, scroll_top: f64, viewport_height: f64) -> Viewport {
        self.viewport.on_scroll(scroll_top, viewport_height)
    }

    pub fn rows_to_render(&self) -> impl Iterator<Item = (usize, Cow<'_, Row>)> {
        self.viewport.rows_to_render(&self.store)
    }

    // --- selection ---

    pub fn toggle_select(&mut self, addr: CellAddress) {
        self.selection.toggle(addr);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- clipboard ---

    pub fn copy(&mut self) -> Result<(), EngineError> {
        self.clipboard = clipboard::copy(&self.store, &self.selection, &self.formatting)?;
        Ok(())
    }

    pub fn cut(&mut self) -> Result<(), EngineError> {
        self.clipboard = clipboard::cut(
            &mut self.store,
            &self.selection,
            &mut self.formatting,
            &mut self.history,
        )?;
        Ok(())
    }

    /// Queue a chunked paste of the clipboard at the selection's
    /// top-left. Returns false when there is nothing to paste, no
    /// anchor, or another bulk operation is running.
    pub fn begin_paste(&mut self, chunk_size: usize, token: CancelToken) -> bool {
        let Some(anchor) = self.selection.top_left() else {
            return false;
        };
        if self.clipboard.is_empty() || !self.gate.try_begin() {
            return false;
        }
        self.pending_paste = Some(PasteOp::new(
            &self.clipboard,
            anchor,
            chunk_size,
            token,
            self.store.clone(),
        ));
        true
    }

    /// Advance the queued paste by one chunk.
    pub fn resume_paste(&mut self) -> Result<Progress, EngineError> {
        let Some(op) = self.pending_paste.as_mut() else {
            return Ok(Progress::Done);
        };
        let progress = op.resume(&mut self.store, &mut self.formatting, &mut self.history)?;
        if !matches!(progress, Progress::Pending { .. }) {
            self.pending_paste = None;
            self.gate.finish();
        }
        Ok(progress)
    }

    /// Run a whole paste to completion.
    pub fn paste_all(&mut self) -> Result<Progress, EngineError> {
        if !self.begin_paste(DEFAULT_CHUNK_SIZE, CancelToken::new()) {
            return Ok(Progress::Done);
        }
        loop {
            let progress = self.resume_paste()?;
            if !matches!(progress, Progress::Pending { .. }) {
                return Ok(progress);
            }
        }
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.store)
    }

    // --- formatting ---

    pub fn apply_style(&mut self, delta: CellStyle) {
        let addresses: Vec<CellAddress> = self.selection.addresses().to_vec();
        self.formatting.apply_style(&addresses, delta);
    }

    pub fn apply_number_format(&mut self, kind: FormatKind) -> Result<(), EngineError> {
        let addresses: Vec<CellAddress> = self.selection.addresses().to_vec();
        self.formatting
            .apply_number_format(&self.store, &addresses, kind)
    }

    pub fn adjust_decimal_places(&mut self, delta: i32) -> Result<(), EngineError> {
        let addresses: Vec<CellAddress> = self.selection.addresses().to_vec();
        self.formatting
            .adjust_decimal_places(&self.store, &addresses, delta)
    }

    // --- calculation ---

    pub fn sum(&mut self) -> Result<Option<f64>, EngineError> {
        crate::calc::sum(&mut self.store, &self.selection, &mut self.history)
    }

    pub fn average(&mut self) -> Result<Option<f64>, EngineError> {
        crate::calc::average(&mut self.store, &self.selection, &mut self.history)
    }

    pub fn sort_by_column(&mut self, col: ColumnKey) -> Result<(), EngineError> {
        crate::calc::sort_by_column(&mut self.store, col, &mut self.history)
    }

    // --- search ---

    pub fn set_filter(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.filter = if query.is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    /// Indices of the materialized rows the active filter matches, in
    /// ascending order. With no filter, every materialized row.
    pub fn matching_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .store
            .materialized()
            .filter(|(_, row)| match &self.filter {
                Some(needle) => row.matches(needle),
                None => true,
            })
            .map(|(i, _)| i)
            .collect();
        rows.sort_unstable();
        rows
    }

    // --- documents ---

    pub fn new_file(&mut self) {
        self.store.clear();
        self.formatting.clear();
        self.selection.clear();
        self.history.clear();
        self.clipboard.clear();
        self.filter = None;
        info!("new file");
    }

    pub fn save_document(&self) -> Result<String, EngineError> {
        SheetDocument::capture(&self.store, &self.formatting).to_json()
    }

    /// Load a saved document, replacing all live state. A parse failure
    /// leaves the session exactly as it was.
    pub fn open_document(&mut self, json: &str) -> Result<(), EngineError> {
        let doc = SheetDocument::from_json(json)?;
        doc.apply(&mut self.store, &mut self.formatting)?;
        self.selection.clear();
        self.history.clear();
        info!(rows = doc.data.len(), "document opened");
        Ok(())
    }

    pub fn export_csv(&self) -> Result<String, EngineError> {
        export::to_delimited_text(&self.store)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(600.0)
    }
}
