use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column already exists: {0}")]
    DuplicateColumn(String),
    #[error("row {row} has {found} values but the table has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({row},{col}) is outside a {rows}x{cols} table")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// An ordered set of uniquely named text columns plus ordered rows.
///
/// Each row stores exactly one value per column, positionally aligned with
/// [`Table::columns`]. Absent values are represented by the empty string.
///
/// `Table` is a value type: the editing methods (`append_*`, `with_cell`,
/// `sorted_by_column`) leave `self` untouched and return the edited copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct RawTable {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl TryFrom<RawTable> for Table {
    type Error = TableError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Table::from_rows(raw.columns, raw.rows)
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with the given columns and no rows.
    pub fn with_columns<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        Self::from_rows(columns, Vec::new())
    }

    /// Build a table from positional rows, validating column uniqueness and row widths.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        for (idx, name) in columns.iter().enumerate() {
            if columns[..idx].contains(name) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidth {
                    row: idx,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no cells (zero rows or zero columns).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Names from `required` that are not columns of this table, in the given order.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Value of `column` in `row`, looked up by column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.cell(row, col)
    }

    /// Values of the named columns for every row, in row order.
    pub fn project(&self, columns: &[&str]) -> Result<Vec<Vec<String>>, TableError> {
        let indices = columns
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect())
    }

    /// Append one row of empty values.
    ///
    /// A table without columns first takes `default_columns` as its schema so the
    /// new row has somewhere to live.
    pub fn append_blank_row(&self, default_columns: &[String]) -> Table {
        let mut next = self.clone();
        if next.columns.is_empty() {
            next.columns = dedup_preserving_order(default_columns);
            // Rows of a zero-column table carry no values; widen them to the new schema.
            for row in &mut next.rows {
                row.resize(next.columns.len(), String::new());
            }
        }
        next.rows.push(vec![String::new(); next.columns.len()]);
        next
    }

    /// Append a column named `name`, empty in every existing row.
    ///
    /// Names are compared exactly (case-sensitive).
    pub fn append_column(&self, name: &str) -> Result<Table, TableError> {
        if self.has_column(name) {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        let mut next = self.clone();
        next.columns.push(name.to_string());
        for row in &mut next.rows {
            row.push(String::new());
        }
        Ok(next)
    }

    /// Copy of the table with a single cell replaced.
    pub fn with_cell(&self, row: usize, col: usize, value: impl Into<String>) -> Result<Table, TableError> {
        if row >= self.row_count() || col >= self.column_count() {
            return Err(TableError::OutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.column_count(),
            });
        }
        let mut next = self.clone();
        next.rows[row][col] = value.into();
        Ok(next)
    }

    /// Copy of the table with rows stably sorted ascending by `column`.
    ///
    /// Values compare as plain strings, so the empty string sorts first and rows
    /// with equal keys keep their relative order.
    pub fn sorted_by_column(&self, column: &str) -> Result<Table, TableError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))?;
        let mut next = self.clone();
        next.rows.sort_by(|a, b| a[idx].cmp(&b[idx]));
        Ok(next)
    }
}

fn dedup_preserving_order(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = Table::from_rows(strings(&["a", "b"]), vec![strings(&["1"])]).unwrap_err();
        assert_eq!(
            err,
            TableError::RowWidth {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn from_rows_rejects_duplicate_columns() {
        let err = Table::from_rows(strings(&["a", "a"]), Vec::new()).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn blank_row_on_columnless_table_uses_defaults() {
        let table = Table::new();
        let next = table.append_blank_row(&strings(&["Name", "Role", "Department"]));
        assert_eq!(next.columns(), strings(&["Name", "Role", "Department"]).as_slice());
        assert_eq!(next.rows(), &[strings(&["", "", ""])]);
        assert_eq!(table, Table::new());
    }

    #[test]
    fn blank_row_keeps_existing_columns() {
        let table = Table::with_columns(["x"]).unwrap();
        let next = table.append_blank_row(&strings(&["Name"]));
        assert_eq!(next.columns(), strings(&["x"]).as_slice());
        assert_eq!(next.row_count(), 1);
    }

    #[test]
    fn with_cell_checks_bounds() {
        let table = Table::with_columns(["x"]).unwrap();
        assert!(matches!(
            table.with_cell(0, 0, "v"),
            Err(TableError::OutOfBounds { rows: 0, cols: 1, .. })
        ));
    }

    #[test]
    fn deserialize_validates_shape() {
        let err = serde_json::from_str::<Table>(r#"{"columns":["a"],"rows":[["1","2"]]}"#);
        assert!(err.is_err());

        let table: Table = serde_json::from_str(r#"{"columns":["a"],"rows":[["1"]]}"#).unwrap();
        assert_eq!(table.value(0, "a"), Some("1"));
    }
}
