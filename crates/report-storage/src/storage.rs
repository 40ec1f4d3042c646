use crate::schema;
use report_model::ReportRecord;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    OnDisk(PathBuf),
}

/// The report currently held by a [`ReportStore`].
///
/// An empty store loads as the default value: empty name and date, no records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredReport {
    pub name: String,
    pub date: String,
    pub records: Vec<ReportRecord>,
}

impl StoredReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Single-table store holding at most one report.
#[derive(Debug)]
pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    pub fn open(location: &StoreLocation) -> Result<Self> {
        match location {
            StoreLocation::InMemory => Self::open_in_memory(),
            StoreLocation::OnDisk(path) => Self::open_path(path),
        }
    }

    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("opening report store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open a SQLite URI such as `file:reports?mode=memory&cache=shared`.
    pub fn open_uri(uri: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI;
        Self::from_connection(Connection::open_with_flags(uri, flags)?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::init(&conn)?;
        Ok(Self { conn })
    }

    /// Replace everything in the store with `records`, all tagged with `name` and `date`.
    ///
    /// The delete and the inserts share one transaction: if any statement fails the
    /// previously stored report is left exactly as it was.
    pub fn save_report(&mut self, name: &str, date: &str, records: &[ReportRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM report_data", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO report_data (ReportName, ReportDate, Name, Role, Department)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for record in records {
                stmt.execute(params![
                    name,
                    date,
                    &record.name,
                    &record.role,
                    &record.department
                ])?;
            }
        }
        tx.commit()?;

        log::info!(
            "saved report {name:?} ({} rows, replaced {removed})",
            records.len()
        );
        Ok(())
    }

    /// Fetch the stored report, rows in insertion order.
    ///
    /// Name and date come from the first row; `save_report` writes the same
    /// values on every row.
    pub fn load_report(&self) -> Result<StoredReport> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ReportName, ReportDate, Name, Role, Department
            FROM report_data
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([], |r| {
            Ok((
                text_or_empty(r, 0)?,
                text_or_empty(r, 1)?,
                ReportRecord {
                    name: text_or_empty(r, 2)?,
                    role: text_or_empty(r, 3)?,
                    department: text_or_empty(r, 4)?,
                },
            ))
        })?;

        let mut report = StoredReport::default();
        for (idx, row) in rows.enumerate() {
            let (name, date, record) = row?;
            if idx == 0 {
                report.name = name;
                report.date = date;
            }
            report.records.push(record);
        }
        Ok(report)
    }

    pub fn row_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM report_data", [], |r| r.get(0))?;
        Ok(count.max(0) as usize)
    }
}

// NULL reads as ""; any other non-text value is an error.
fn text_or_empty(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}
