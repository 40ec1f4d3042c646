//! `report-model` defines the in-memory tabular data used by the report editor.
//!
//! The crate is intentionally free of persistence and UI concerns so it can be
//! shared by:
//! - the SQLite store (`report-storage`), which persists [`ReportRecord`]s
//! - the editor shell, which renders [`Table`]s into a grid and routes edits
//!   back through the [`ReportPipeline`]

pub mod import;
mod pipeline;
mod report;
mod table;

pub use import::{import_csv, import_csv_path, CsvImportError, CsvOptions, CsvTextEncoding};
pub use pipeline::{PipelineError, ReportPipeline};
pub use report::{Report, ReportRecord, REQUIRED_COLUMNS};
pub use table::{Table, TableError};
