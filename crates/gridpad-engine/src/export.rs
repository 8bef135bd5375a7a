use csv::Writer;
use gridpad_core::{ColumnKey, RowStore};
use tracing::debug;

use crate::error::EngineError;
use crate::task::{CancelToken, Progress, DEFAULT_CHUNK_SIZE};

/// A CSV export in flight, emitting `chunk_size` rows per `resume`.
///
/// Output covers the full logical length, one record per row, reading
/// through the store so never-written rows come out as empty fields.
/// Quoting follows RFC 4180 via the `csv` writer. The finished text is
/// identical whatever the chunk size.
pub struct CsvExportOp {
    writer: Writer<Vec<u8>>,
    next_row: usize,
    total_rows: usize,
    chunk_size: usize,
    token: CancelToken,
}

impl CsvExportOp {
    pub fn new(
        store: &RowStore,
        chunk_size: usize,
        token: CancelToken,
    ) -> Result<Self, EngineError> {
        let mut writer = Writer::from_writer(Vec::new());
        writer
            .write_record(ColumnKey::all().map(|c| c.letter().to_string()))
            .map_err(|e| EngineError::Export(e.to_string()))?;
        Ok(Self {
            writer,
            next_row: 0,
            total_rows: store.len(),
            chunk_size: chunk_size.max(1),
            token,
        })
    }

    /// Emit the next batch of rows.
    pub fn resume(&mut self, store: &RowStore) -> Result<Progress, EngineError> {
        if self.next_row >= self.total_rows {
            return Ok(Progress::Done);
        }
        if self.token.is_cancelled() {
            debug!(completed = self.next_row, "csv export cancelled");
            return Ok(Progress::Cancelled);
        }

        let end = (self.next_row + self.chunk_size).min(self.total_rows);
        for index in self.next_row..end {
            // In range: total_rows never exceeds the capacity ceiling
            let row = store.get(index)?;
            self.writer
                .write_record(row.cells().map(|(_, v)| v))
                .map_err(|e| EngineError::Export(e.to_string()))?;
        }
        self.next_row = end;

        if self.next_row >= self.total_rows {
            debug!(rows = self.total_rows, "csv export complete");
            Ok(Progress::Done)
        } else {
            Ok(Progress::Pending {
                completed: self.next_row,
            })
        }
    }

    /// The assembled document. Meaningful once `resume` returned
    /// `Done`; a cancelled export's partial text is discarded by
    /// convention.
    pub fn into_output(self) -> Result<String, EngineError> {
        let bytes = self
            .writer
            .into_inner()
            .map_err(|e| EngineError::Export(e.to_string()))?;
        let mut text =
            String::from_utf8(bytes).map_err(|e| EngineError::Export(e.to_string()))?;
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(text)
    }
}

/// Run a whole export in one call.
pub fn to_delimited_text(store: &RowStore) -> Result<String, EngineError> {
    let mut op = CsvExportOp::new(store, DEFAULT_CHUNK_SIZE, CancelToken::new())?;
    while let Progress::Pending { .. } = op.resume(store)? {}
    op.into_output()
}
