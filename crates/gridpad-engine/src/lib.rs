pub mod calc;
pub mod clipboard;
pub mod commands;
pub mod document;
pub mod error;
pub mod export;
pub mod formatting;
pub mod session;
pub mod task;

pub use clipboard::{ClipEntry, ClipboardPayload, PasteOp};
pub use commands::ToolbarCommand;
pub use document::{ColumnDef, SheetDocument};
pub use error::EngineError;
pub use export::CsvExportOp;
pub use formatting::FormattingEngine;
pub use session::Session;
pub use task::{BulkGate, CancelToken, Progress, DEFAULT_CHUNK_SIZE};
