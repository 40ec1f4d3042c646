use crate::config::{AppConfig, ConfigError};
use report_model::{
    CsvOptions, PipelineError, Report, ReportPipeline, Table, TableError, REQUIRED_COLUMNS,
};
use report_storage::{ReportStore, StorageError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shown in place of an empty stored report name after a reload.
pub const FALLBACK_REPORT_NAME: &str = "No Name";
/// Shown in place of an empty stored report date after a reload.
pub const FALLBACK_REPORT_DATE: &str = "2024-01-01";

#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("table is missing required columns ({})", REQUIRED_COLUMNS.join(", "))]
    MissingRequiredColumns,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppStateError {
    /// True when the error is an attempt to add a column that already exists.
    pub fn is_duplicate_column(&self) -> bool {
        matches!(
            self,
            AppStateError::Pipeline(PipelineError::Table(TableError::DuplicateColumn(_)))
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded(Table),
    NoData,
}

/// Everything the editor window owns: the working table, the store connection and
/// the report name/date fields.
pub struct AppState {
    pipeline: ReportPipeline,
    store: ReportStore,
    report_name: String,
    report_date: String,
    blank_row_columns: Vec<String>,
}

impl AppState {
    /// Open the configured store and start with an empty table.
    pub fn open(config: &AppConfig) -> Result<Self, AppStateError> {
        let store = ReportStore::open(&config.database.location())?;
        Self::with_store(store, config)
    }

    pub fn with_store(store: ReportStore, config: &AppConfig) -> Result<Self, AppStateError> {
        let csv_options = CsvOptions {
            delimiter: config.csv_delimiter_byte()?,
            ..CsvOptions::default()
        };
        Ok(Self {
            pipeline: ReportPipeline::with_csv_options(csv_options),
            store,
            report_name: config.default_report_name.clone(),
            report_date: config.default_report_date.clone(),
            blank_row_columns: config.blank_row_columns.clone(),
        })
    }

    pub fn table(&self) -> Table {
        self.pipeline.current_model()
    }

    pub fn report_name(&self) -> &str {
        &self.report_name
    }

    pub fn report_date(&self) -> &str {
        &self.report_date
    }

    pub fn set_report_name(&mut self, name: impl Into<String>) {
        self.report_name = name.into();
    }

    pub fn set_report_date(&mut self, date: impl Into<String>) {
        self.report_date = date.into();
    }

    pub fn load_csv(&mut self, path: &Path) -> Result<Table, AppStateError> {
        if !path.exists() {
            return Err(AppStateError::FileNotFound(path.to_path_buf()));
        }
        Ok(self.pipeline.load_from_source(path)?)
    }

    pub fn generate_report(&mut self) -> Result<Report, AppStateError> {
        let report = self
            .pipeline
            .generate_report(&self.report_name, &self.report_date)?;
        log::info!(
            "generated report {:?} with {} rows",
            report.name,
            report.table.row_count()
        );
        Ok(report)
    }

    /// Persist the current table's `Name`/`Role`/`Department` columns, replacing
    /// whatever the store held. Returns the number of rows written.
    pub fn save_to_db(&mut self) -> Result<usize, AppStateError> {
        let table = self.pipeline.peek();
        if !table.missing_columns(&REQUIRED_COLUMNS).is_empty() {
            return Err(AppStateError::MissingRequiredColumns);
        }
        let records = table
            .report_records()
            .map_err(|_| AppStateError::MissingRequiredColumns)?;
        self.store
            .save_report(&self.report_name, &self.report_date, &records)?;
        Ok(records.len())
    }

    /// Replace the working table with the stored report.
    ///
    /// A store that cannot be read is treated like an empty one: the failure is
    /// logged and nothing changes.
    pub fn reload_from_db(&mut self) -> ReloadOutcome {
        let stored = match self.store.load_report() {
            Ok(stored) => stored,
            Err(err) => {
                log::warn!("failed to load stored report: {err}");
                return ReloadOutcome::NoData;
            }
        };
        if stored.is_empty() {
            return ReloadOutcome::NoData;
        }

        self.report_name = non_empty_or(stored.name, FALLBACK_REPORT_NAME);
        self.report_date = non_empty_or(stored.date, FALLBACK_REPORT_DATE);
        let table = Table::from_records(&stored.records);
        self.pipeline.replace_model(table.clone());
        ReloadOutcome::Reloaded(table)
    }

    pub fn add_row(&mut self) -> Table {
        self.pipeline.append_blank_row(&self.blank_row_columns)
    }

    /// Add a column named `name` (surrounding whitespace ignored).
    ///
    /// Returns `Ok(None)` without touching the table when the name is blank.
    pub fn add_column(&mut self, name: &str) -> Result<Option<Table>, AppStateError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.pipeline.append_column(name)?))
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<Table, AppStateError> {
        Ok(self.pipeline.set_cell(row, col, value)?)
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
