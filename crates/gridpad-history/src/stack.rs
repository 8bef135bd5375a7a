use gridpad_core::RowStore;

/// Manages undo/redo history as whole-store snapshots.
///
/// Each logical operation commits exactly one snapshot of the store as
/// it looked *before* the mutation, however many rows the operation
/// touched. Undo and redo swap the live store with a stack top; both
/// are silent no-ops when their stack is empty.
#[derive(Default)]
pub struct HistoryManager {
    /// Pre-mutation snapshots, oldest first
    undo_stack: Vec<RowStore>,
    /// Snapshots displaced by undo
    redo_stack: Vec<RowStore>,
    /// Maximum number of undo levels
    max_depth: usize,
}

impl HistoryManager {
    pub const DEFAULT_MAX_DEPTH: usize = 100;

    /// Create a new history manager with the specified max undo levels
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record the pre-mutation state of a completed operation. Clears
    /// the redo stack: a new edit forks history.
    pub fn commit(&mut self, before: RowStore) {
        self.redo_stack.clear();
        self.undo_stack.push(before);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Swap the live store with the most recent undo snapshot. Returns
    /// false (leaving the store untouched) when there is nothing to
    /// undo.
    pub fn undo(&mut self, current: &mut RowStore) -> bool {
        let Some(mut snapshot) = self.undo_stack.pop() else {
            return false;
        };
        std::mem::swap(current, &mut snapshot);
        self.redo_stack.push(snapshot);
        true
    }

    /// Swap the live store with the most recent redo snapshot. Returns
    /// false (leaving the store untouched) when there is nothing to
    /// redo.
    pub fn redo(&mut self, current: &mut RowStore) -> bool {
        let Some(mut snapshot) = self.redo_stack.pop() else {
            return false;
        };
        std::mem::swap(current, &mut snapshot);
        self.undo_stack.push(snapshot);
        true
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of snapshots in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of snapshots in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
