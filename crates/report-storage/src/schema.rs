use rusqlite::Connection;

pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    // No key or uniqueness constraint: duplicate names are stored as separate rows.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS report_data (
          ReportName TEXT,
          ReportDate TEXT,
          Name TEXT,
          Role TEXT,
          Department TEXT
        );
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();
        conn.execute(
            "INSERT INTO report_data VALUES ('r', 'd', 'n', 'ro', 'de')",
            [],
        )
        .unwrap();
        init(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM report_data", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn schema_has_five_text_columns() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(report_data)").unwrap();
        let cols: Vec<(String, String)> = stmt
            .query_map([], |r| Ok((r.get(1)?, r.get(2)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            cols,
            vec![
                ("ReportName".to_string(), "TEXT".to_string()),
                ("ReportDate".to_string(), "TEXT".to_string()),
                ("Name".to_string(), "TEXT".to_string()),
                ("Role".to_string(), "TEXT".to_string()),
                ("Department".to_string(), "TEXT".to_string()),
            ]
        );
    }
}
