use desktop::commands::{dispatch, Command, Notice};
use desktop::config::{AppConfig, DatabaseConfig};
use desktop::state::{AppState, AppStateError, ReloadOutcome};
use pretty_assertions::assert_eq;
use report_model::{ReportRecord, Table};
use report_storage::ReportStore;
use std::path::PathBuf;

fn write_csv(dir: &tempfile::TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("people.csv");
    std::fs::write(&path, text).expect("write csv");
    path
}

fn in_memory_state() -> AppState {
    AppState::open(&AppConfig::default()).expect("open state")
}

#[test]
fn load_generate_save_reload_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv = write_csv(&dir, "Name,Role,Department,Notes\nB,Eng,X,n1\nA,Sales,Y,n2\n");
    let db_path = dir.path().join("reports.sqlite");
    let config = AppConfig {
        database: DatabaseConfig::OnDisk {
            path: db_path.clone(),
        },
        ..AppConfig::default()
    };

    let mut state = AppState::open(&config).expect("open state");
    state.load_csv(&csv).expect("load csv");
    state.set_report_name("R1");
    state.set_report_date("2024-01-01");

    let report = state.generate_report().expect("generate");
    assert_eq!(report.table.value(0, "Name"), Some("A"));
    assert_eq!(report.table.value(1, "Name"), Some("B"));

    assert_eq!(state.save_to_db().expect("save"), 2);

    // The extra column is not persisted.
    let stored = ReportStore::open_path(&db_path)
        .expect("open store")
        .load_report()
        .expect("load");
    assert_eq!(stored.name, "R1");
    assert_eq!(
        stored.records,
        vec![
            ReportRecord::new("A", "Sales", "Y"),
            ReportRecord::new("B", "Eng", "X"),
        ]
    );

    // A second session over the same file sees the saved report.
    let mut reopened = AppState::open(&config).expect("reopen state");
    assert_eq!(reopened.report_name(), "My Report");
    let outcome = reopened.reload_from_db();
    let expected = Table::from_records(&stored.records);
    assert_eq!(outcome, ReloadOutcome::Reloaded(expected.clone()));
    assert_eq!(reopened.table(), expected);
    assert_eq!(reopened.report_name(), "R1");
    assert_eq!(reopened.report_date(), "2024-01-01");
}

#[test]
fn reload_from_empty_store_changes_nothing() {
    let mut state = in_memory_state();
    state.add_row();
    let before = state.table();

    assert_eq!(state.reload_from_db(), ReloadOutcome::NoData);
    assert_eq!(state.table(), before);
    assert_eq!(state.report_name(), "My Report");
}

#[test]
fn reload_uses_fallbacks_for_empty_metadata() {
    let mut store = ReportStore::open_in_memory().expect("open store");
    store
        .save_report("", "", &[ReportRecord::new("A", "Eng", "X")])
        .expect("save");
    let mut state = AppState::with_store(store, &AppConfig::default()).expect("state");

    assert!(matches!(state.reload_from_db(), ReloadOutcome::Reloaded(_)));
    assert_eq!(state.report_name(), "No Name");
    assert_eq!(state.report_date(), "2024-01-01");
}

#[test]
fn unreadable_store_reloads_as_no_data() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("reports.sqlite");
    let store = ReportStore::open_path(&db_path).expect("open store");

    let conn = rusqlite::Connection::open(&db_path).expect("open raw connection");
    conn.execute("DROP TABLE report_data", []).expect("drop table");
    drop(conn);

    let mut state = AppState::with_store(store, &AppConfig::default()).expect("state");
    state.add_row();
    let before = state.table();
    assert_eq!(state.reload_from_db(), ReloadOutcome::NoData);
    assert_eq!(state.table(), before);
}

#[test]
fn save_requires_report_columns() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv = write_csv(&dir, "Name,Department\nA,X\n");

    let mut state = in_memory_state();
    state.load_csv(&csv).expect("load csv");

    assert!(matches!(
        state.save_to_db(),
        Err(AppStateError::MissingRequiredColumns)
    ));
    assert_eq!(state.reload_from_db(), ReloadOutcome::NoData);
}

#[test]
fn missing_csv_is_reported_before_parsing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut state = in_memory_state();
    let err = state.load_csv(&dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, AppStateError::FileNotFound(_)));
}

#[test]
fn add_row_on_empty_table_uses_configured_columns() {
    let config = AppConfig {
        blank_row_columns: vec!["Employee".to_string(), "Team".to_string()],
        ..AppConfig::default()
    };
    let mut state = AppState::open(&config).expect("open state");

    let table = state.add_row();
    assert_eq!(table.columns(), ["Employee", "Team"]);
    assert_eq!(table.row_count(), 1);
}

#[test]
fn add_column_trims_and_ignores_blank_names() {
    let mut state = in_memory_state();
    state.add_row();

    assert_eq!(state.add_column("   ").expect("blank name"), None);
    let table = state
        .add_column("  Start Date ")
        .expect("add column")
        .expect("column added");
    assert_eq!(table.columns(), ["Name", "Role", "Department", "Start Date"]);

    let err = state.add_column("Name").unwrap_err();
    assert!(err.is_duplicate_column());
    assert_eq!(state.table(), table);
}

#[test]
fn dispatch_reports_user_messages() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv = write_csv(&dir, "Name,Role,Department\nB,Eng,X\nA,Sales,Y\n");
    let mut state = in_memory_state();

    let outcome = dispatch(&mut state, Command::Reload);
    assert_eq!(outcome.notice, Some(Notice::info("No data found in the database.")));
    assert!(!outcome.refresh);

    let outcome = dispatch(&mut state, Command::Load(csv));
    assert!(outcome.refresh);

    let outcome = dispatch(&mut state, Command::Generate);
    assert_eq!(outcome.notice, Some(Notice::info("Report generated successfully!")));
    assert!(outcome.refresh);

    let outcome = dispatch(&mut state, Command::AddColumn("Role".to_string()));
    assert_eq!(
        outcome.notice,
        Some(Notice::error(
            "Column already exists. Please choose a different name."
        ))
    );

    let outcome = dispatch(&mut state, Command::Save);
    assert_eq!(outcome.notice, Some(Notice::info("Report saved to the database!")));

    let outcome = dispatch(&mut state, Command::Reload);
    assert_eq!(outcome.notice, Some(Notice::info("Data reloaded from DB!")));
    assert_eq!(state.table().value(0, "Name"), Some("A"));

    assert!(dispatch(&mut state, Command::Quit).exit);
}

#[test]
fn dispatch_generate_failure_keeps_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv = write_csv(&dir, "Name,Department\nB,X\nA,Y\n");
    let mut state = in_memory_state();
    dispatch(&mut state, Command::Load(csv));
    let before = state.table();

    let outcome = dispatch(&mut state, Command::Generate);
    assert_eq!(
        outcome.notice,
        Some(Notice::error(
            "source data does not contain required columns for report"
        ))
    );
    assert!(!outcome.refresh);
    assert_eq!(state.table(), before);

    let outcome = dispatch(&mut state, Command::Save);
    assert_eq!(
        outcome.notice,
        Some(Notice::error(
            "Cannot save to DB. Table missing required columns (Name, Role, Department)."
        ))
    );
}
