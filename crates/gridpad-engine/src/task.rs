use std::cell::Cell;
use std::rc::Rc;

/// Entries or rows processed per cooperative batch.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;

/// Outcome of one `resume` call on a chunked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More work remains; `completed` counts units processed so far.
    Pending { completed: usize },
    Done,
    Cancelled,
}

impl Progress {
    pub fn is_done(self) -> bool {
        matches!(self, Progress::Done)
    }
}

/// Cooperative cancellation flag shared between the holder of a
/// resumable operation and whoever wants to abort it. Checked at chunk
/// boundaries only; work inside a chunk always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Admission flag for bulk operations: at most one paste or export may
/// be in flight on a store at a time.
#[derive(Debug, Default)]
pub struct BulkGate {
    busy: bool,
}

impl BulkGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate. Returns false if another bulk operation already
    /// holds it.
    pub fn try_begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn finish(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
