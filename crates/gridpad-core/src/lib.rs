pub mod address;
pub mod column;
pub mod error;
pub mod format;
pub mod row;
pub mod selection;
pub mod store;
pub mod style;
pub mod viewport;

pub use address::CellAddress;
pub use column::{ColumnKey, COLUMN_COUNT};
pub use error::StoreError;
pub use format::{CellFormat, FormatKind};
pub use row::Row;
pub use selection::SelectionModel;
pub use store::RowStore;
pub use style::CellStyle;
pub use viewport::{Viewport, ViewportController, BUFFER_ROWS, ROW_HEIGHT};
