use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;
use thiserror::Error;

use crate::table::Table;

#[derive(Clone, Debug)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// How to decode raw CSV bytes into text fields.
    pub encoding: CsvTextEncoding,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: CsvTextEncoding::Auto,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsvTextEncoding {
    /// Attempt to decode as UTF-8; if a field contains invalid UTF-8, fall back to Windows-1252.
    ///
    /// This matches what spreadsheet tools on Windows tend to write.
    Auto,
    /// Decode as UTF-8 and reject invalid byte sequences.
    Utf8,
    /// Decode as Windows-1252 (aka CP-1252).
    Windows1252,
}

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("csv input was empty")]
    EmptyInput,
    #[error("csv parse error at line {line}, column {column}: {reason}")]
    Parse { line: u64, column: u64, reason: String },
    #[error("csv line {line} has {found} fields, expected {expected}")]
    FieldCount { line: u64, expected: usize, found: usize },
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read the file at `path` into a [`Table`]; see [`import_csv`].
pub fn import_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Table, CsvImportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CsvImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = import_csv(BufReader::new(file), options)?;
    log::debug!(
        "imported {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Parse delimited text into a [`Table`], taking column names from the first record.
///
/// Every following record must have exactly as many fields as the header.
/// Blank lines are skipped. Empty header cells are named `Unnamed: <index>` and
/// repeated header names get a `.1`, `.2`, ... suffix so column names stay unique.
pub fn import_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Table, CsvImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Headers are handled here so field-count errors can name the offending line.
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    // The csv reader skips empty lines itself; a line holding `""` is a real empty field.
    if !csv_reader
        .read_byte_record(&mut record)
        .map_err(|e| map_csv_error(e, 1))?
    {
        return Err(CsvImportError::EmptyInput);
    }
    let header = decode_record_to_strings(&record, record_line(&record, 1), true, options.encoding)?;
    let columns = unique_header_names(header);

    let mut rows = Vec::new();
    loop {
        record.clear();
        let fallback_line = rows.len() as u64 + 2;
        match csv_reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(e) => return Err(map_csv_error(e, fallback_line)),
        }
        let line = record_line(&record, fallback_line);
        if record.len() != columns.len() {
            return Err(CsvImportError::FieldCount {
                line,
                expected: columns.len(),
                found: record.len(),
            });
        }
        rows.push(decode_record_to_strings(&record, line, false, options.encoding)?);
    }

    // Names were made unique and every row width was checked above.
    Table::from_rows(columns, rows).map_err(|e| CsvImportError::Parse {
        line: 1,
        column: 0,
        reason: e.to_string(),
    })
}

fn record_line(record: &ByteRecord, fallback: u64) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(fallback)
}

fn unique_header_names(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while out.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        out.push(candidate);
    }
    out
}

fn decode_record_to_strings(
    record: &ByteRecord,
    line: u64,
    is_header: bool,
    encoding: CsvTextEncoding,
) -> Result<Vec<String>, CsvImportError> {
    let mut out = Vec::with_capacity(record.len());
    for (idx, field) in record.iter().enumerate() {
        let strip_bom = is_header && idx == 0;
        let s = decode_field(field, line, idx as u64 + 1, strip_bom, encoding)?;
        out.push(s.into_owned());
    }
    Ok(out)
}

fn decode_field(
    field: &[u8],
    line: u64,
    column: u64,
    strip_bom: bool,
    encoding: CsvTextEncoding,
) -> Result<Cow<'_, str>, CsvImportError> {
    let field = match field.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        Some(rest) if strip_bom => rest,
        _ => field,
    };

    match encoding {
        CsvTextEncoding::Utf8 => std::str::from_utf8(field)
            .map(Cow::Borrowed)
            .map_err(|e| CsvImportError::Parse {
                line,
                column,
                reason: format!("invalid UTF-8: {e}"),
            }),
        CsvTextEncoding::Windows1252 => {
            let (cow, _, _) = WINDOWS_1252.decode(field);
            Ok(cow)
        }
        CsvTextEncoding::Auto => match std::str::from_utf8(field) {
            Ok(s) => Ok(Cow::Borrowed(s)),
            Err(_) => {
                let (cow, _, _) = WINDOWS_1252.decode(field);
                Ok(cow)
            }
        },
    }
}

fn map_csv_error(err: csv::Error, fallback_line: u64) -> CsvImportError {
    let reason = err.to_string();
    let pos = err.position().cloned();

    match err.into_kind() {
        csv::ErrorKind::Io(e) => CsvImportError::Io(e),
        _ => {
            let line = pos.map(|p| p.line()).filter(|l| *l > 0).unwrap_or(fallback_line);
            CsvImportError::Parse {
                line,
                column: 0,
                reason,
            }
        }
    }
}
