//! SQLite-backed storage for generated reports.
//!
//! The store keeps exactly one report at a time in a single `report_data`
//! table. It exposes:
//! - schema creation on open (in-memory, file-backed or URI databases)
//! - transactional full-table replace on save
//! - fetch-all load in insertion order

mod schema;
pub mod storage;

pub use storage::{ReportStore, StorageError, StoreLocation, StoredReport};
