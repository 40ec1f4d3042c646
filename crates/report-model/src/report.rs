use crate::table::{Table, TableError};

/// Columns a table must carry before it can become a report.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Name", "Role", "Department"];

/// The persisted projection of one report row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReportRecord {
    pub name: String,
    pub role: String,
    pub department: String,
}

impl ReportRecord {
    pub fn new(name: impl Into<String>, role: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            department: department.into(),
        }
    }
}

/// A named, dated snapshot of a table.
///
/// `date` is free-form text and is never parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub name: String,
    pub date: String,
    pub table: Table,
}

impl Report {
    /// The `Name`/`Role`/`Department` triples of every row, in row order.
    ///
    /// Extra columns are dropped; a missing required column is an error.
    pub fn records(&self) -> Result<Vec<ReportRecord>, TableError> {
        records_from_table(&self.table)
    }
}

pub(crate) fn records_from_table(table: &Table) -> Result<Vec<ReportRecord>, TableError> {
    Ok(table
        .project(&REQUIRED_COLUMNS)?
        .into_iter()
        .map(|mut row| {
            let department = row.pop().unwrap_or_default();
            let role = row.pop().unwrap_or_default();
            let name = row.pop().unwrap_or_default();
            ReportRecord {
                name,
                role,
                department,
            }
        })
        .collect())
}

impl Table {
    /// A `Name`/`Role`/`Department` table holding `records` in order.
    pub fn from_records(records: &[ReportRecord]) -> Table {
        let columns = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = records
            .iter()
            .map(|r| vec![r.name.clone(), r.role.clone(), r.department.clone()])
            .collect();
        // Width and uniqueness hold by construction.
        Table::from_rows(columns, rows).unwrap_or_default()
    }

    /// See [`Report::records`].
    pub fn report_records(&self) -> Result<Vec<ReportRecord>, TableError> {
        records_from_table(self)
    }
}
