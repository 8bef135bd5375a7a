use thiserror::Error;

/// Errors raised at the row-store boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A row index outside `[0, MAX_ROWS)` was addressed. Never
    /// silently clamped.
    #[error("row index {index} is out of range (capacity {max})")]
    OutOfRange { index: usize, max: usize },
}
