use std::path::Path;

use thiserror::Error;

use crate::import::{import_csv_path, CsvImportError, CsvOptions};
use crate::report::{Report, REQUIRED_COLUMNS};
use crate::table::{Table, TableError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] CsvImportError),
    #[error("source data does not contain required columns for report")]
    MissingRequiredColumns { missing: Vec<String> },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Owner of the current working [`Table`].
///
/// Reads hand out copies and writes install whole tables, so a table obtained
/// from [`ReportPipeline::current_model`] never observes later pipeline changes
/// (and vice versa). A failed operation leaves the current table as it was.
#[derive(Debug, Default)]
pub struct ReportPipeline {
    current: Table,
    csv_options: CsvOptions,
}

impl ReportPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_csv_options(csv_options: CsvOptions) -> Self {
        Self {
            current: Table::new(),
            csv_options,
        }
    }

    /// Parse the CSV file at `path` and make it the current table.
    pub fn load_from_source(&mut self, path: impl AsRef<Path>) -> Result<Table, PipelineError> {
        let path = path.as_ref();
        let table = import_csv_path(path, &self.csv_options)?;
        log::info!(
            "loaded {} rows from {}",
            table.row_count(),
            path.display()
        );
        self.current = table.clone();
        Ok(table)
    }

    pub fn current_model(&self) -> Table {
        self.current.clone()
    }

    /// Borrow the current table without copying it.
    pub fn peek(&self) -> &Table {
        &self.current
    }

    pub fn replace_model(&mut self, table: Table) {
        self.current = table;
    }

    /// Validate the current table and sort it by `Name`.
    ///
    /// The sorted table becomes current. `name` and `date` are passed through
    /// untouched.
    pub fn generate_report(&mut self, name: &str, date: &str) -> Result<Report, PipelineError> {
        let missing = self.current.missing_columns(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            log::debug!("report generation rejected, missing columns {missing:?}");
            return Err(PipelineError::MissingRequiredColumns { missing });
        }

        let sorted = self.current.sorted_by_column(REQUIRED_COLUMNS[0])?;
        self.current = sorted.clone();
        Ok(Report {
            name: name.to_string(),
            date: date.to_string(),
            table: sorted,
        })
    }

    pub fn append_blank_row(&mut self, default_columns: &[String]) -> Table {
        let next = self.current.append_blank_row(default_columns);
        self.current = next.clone();
        next
    }

    pub fn append_column(&mut self, name: &str) -> Result<Table, PipelineError> {
        let next = self.current.append_column(name)?;
        self.current = next.clone();
        Ok(next)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<Table, PipelineError> {
        let next = self.current.with_cell(row, col, value)?;
        self.current = next.clone();
        Ok(next)
    }
}
