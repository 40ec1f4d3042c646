use anyhow::{Context, Result};
use clap::Parser;
use desktop::commands::{dispatch, parse_command, Command, CommandOutcome, Notice, NoticeLevel};
use desktop::config::{AppConfig, DatabaseConfig};
use desktop::grid::{populate_grid_from_table, TextGrid};
use desktop::state::AppState;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "report-editor")]
#[command(about = "Load personnel CSVs, generate a sorted report and keep it in a local SQLite store.")]
struct Cli {
    /// SQLite database file for the report store (created if missing).
    #[arg(long, conflicts_with = "in_memory")]
    db: Option<PathBuf>,

    /// Keep the report store in memory for this session only.
    #[arg(long)]
    in_memory: bool,

    /// JSON config file. Defaults to `config.json` in the per-user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV file to load at startup.
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(env).with_writer(io::stderr).init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("load config")?;
    if let Some(path) = cli.db {
        config.database = DatabaseConfig::OnDisk { path };
    } else if cli.in_memory {
        config.database = DatabaseConfig::InMemory;
    }

    let mut state = AppState::open(&config).context("open report store")?;
    let mut grid = TextGrid::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    log::info!("report store: {:?}", config.database);

    if let Some(path) = cli.csv {
        let outcome = dispatch(&mut state, Command::Load(path));
        present(&mut out, &state, &mut grid, &outcome)?;
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("read command")?;
        let outcome = match parse_command(&line) {
            Ok(Some(command)) => dispatch(&mut state, command),
            Ok(None) => continue,
            Err(err) => CommandOutcome {
                notice: Some(Notice::error(err.to_string())),
                ..CommandOutcome::default()
            },
        };
        present(&mut out, &state, &mut grid, &outcome)?;
        if outcome.exit {
            break;
        }
    }

    Ok(())
}

fn present(
    out: &mut impl Write,
    state: &AppState,
    grid: &mut TextGrid,
    outcome: &CommandOutcome,
) -> Result<()> {
    if let Some(notice) = &outcome.notice {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        writeln!(out, "[{tag}] {}", notice.text)?;
    }
    if outcome.refresh {
        populate_grid_from_table(grid, &state.table());
        writeln!(out, "Report: {} ({})", state.report_name(), state.report_date())?;
        write!(out, "{}", grid.render())?;
    }
    out.flush()?;
    Ok(())
}
