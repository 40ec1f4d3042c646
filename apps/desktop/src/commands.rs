use crate::state::{AppState, AppStateError, ReloadOutcome};
use std::path::PathBuf;
use thiserror::Error;

pub const HELP_TEXT: &str = "\
commands:
  load <path>            load a CSV file into the grid
  generate               validate the table and sort it by Name
  save                   replace the stored report with the current table
  reload                 load the stored report into the grid
  add-row                append a blank row
  add-column <name>      append an empty column
  set <row> <col> <text> edit one cell (1-based row and column)
  name <text>            set the report name
  date <text>            set the report date
  show                   print the grid
  help                   print this help
  quit                   exit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Generate,
    Save,
    Reload,
    AddRow,
    AddColumn(String),
    SetCell { row: usize, col: usize, value: String },
    SetName(String),
    SetDate(String),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("invalid {what}: {value:?}")]
    InvalidNumber { what: &'static str, value: String },
}

/// Parse one line of shell input.
///
/// Blank lines and `#` comments parse to `Ok(None)`. Everything after the command
/// word is taken verbatim (trimmed), so paths and names may contain spaces.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "load" => Command::Load(PathBuf::from(required(rest, "load", "a file path")?)),
        "generate" => Command::Generate,
        "save" => Command::Save,
        "reload" => Command::Reload,
        "add-row" => Command::AddRow,
        "add-column" => Command::AddColumn(rest.to_string()),
        "set" => parse_set_cell(rest)?,
        "name" => Command::SetName(rest.to_string()),
        "date" => Command::SetDate(rest.to_string()),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandParseError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandParseError> {
    if rest.is_empty() {
        Err(CommandParseError::MissingArgument { command, what })
    } else {
        Ok(rest)
    }
}

fn parse_set_cell(rest: &str) -> Result<Command, CommandParseError> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let row = parse_position(parts.next(), "row")?;
    let col = parse_position(parts.next(), "column")?;
    let value = parts.next().unwrap_or("").trim().to_string();
    Ok(Command::SetCell { row, col, value })
}

fn parse_position(part: Option<&str>, what: &'static str) -> Result<usize, CommandParseError> {
    let part = part.filter(|p| !p.is_empty()).ok_or(CommandParseError::MissingArgument {
        command: "set",
        what: "a row and a column",
    })?;
    match part.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandParseError::InvalidNumber {
            what,
            value: part.to_string(),
        }),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user, the shell's stand-in for a message box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub notice: Option<Notice>,
    /// The grid must be re-populated from the current table.
    pub refresh: bool,
    pub exit: bool,
}

impl CommandOutcome {
    fn refresh() -> Self {
        Self {
            refresh: true,
            ..Self::default()
        }
    }

    fn refresh_with(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            refresh: true,
            exit: false,
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }
}

/// Run `command` against `state`.
///
/// Failures become error notices; the state is left as it was before the command.
pub fn dispatch(state: &mut AppState, command: Command) -> CommandOutcome {
    match command {
        Command::Load(path) => match state.load_csv(&path) {
            Ok(table) => CommandOutcome::refresh_with(Notice::info(format!(
                "Loaded {} rows from {}.",
                table.row_count(),
                path.display()
            ))),
            Err(err) => CommandOutcome::notice(Notice::error(err.to_string())),
        },
        Command::Generate => match state.generate_report() {
            Ok(_) => CommandOutcome::refresh_with(Notice::info("Report generated successfully!")),
            Err(err) => CommandOutcome::notice(Notice::error(err.to_string())),
        },
        Command::Save => match state.save_to_db() {
            Ok(_) => CommandOutcome::notice(Notice::info("Report saved to the database!")),
            Err(AppStateError::MissingRequiredColumns) => CommandOutcome::notice(Notice::error(
                "Cannot save to DB. Table missing required columns (Name, Role, Department).",
            )),
            Err(err) => CommandOutcome::notice(Notice::error(format!(
                "Failed to save report: {err}"
            ))),
        },
        Command::Reload => match state.reload_from_db() {
            ReloadOutcome::Reloaded(_) => {
                CommandOutcome::refresh_with(Notice::info("Data reloaded from DB!"))
            }
            ReloadOutcome::NoData => {
                CommandOutcome::notice(Notice::info("No data found in the database."))
            }
        },
        Command::AddRow => {
            state.add_row();
            CommandOutcome::refresh()
        }
        Command::AddColumn(name) => match state.add_column(&name) {
            Ok(Some(_)) => CommandOutcome::refresh(),
            Ok(None) => CommandOutcome::default(),
            Err(err) if err.is_duplicate_column() => CommandOutcome::notice(Notice::error(
                "Column already exists. Please choose a different name.",
            )),
            Err(err) => CommandOutcome::notice(Notice::error(err.to_string())),
        },
        Command::SetCell { row, col, value } => match state.set_cell(row, col, &value) {
            Ok(_) => CommandOutcome::refresh(),
            Err(err) => CommandOutcome::notice(Notice::error(err.to_string())),
        },
        Command::SetName(name) => {
            state.set_report_name(name);
            CommandOutcome::notice(Notice::info(format!(
                "Report name: {}",
                state.report_name()
            )))
        }
        Command::SetDate(date) => {
            state.set_report_date(date);
            CommandOutcome::notice(Notice::info(format!(
                "Report date: {}",
                state.report_date()
            )))
        }
        Command::Show => CommandOutcome::refresh(),
        Command::Help => CommandOutcome::notice(Notice::info(HELP_TEXT)),
        Command::Quit => CommandOutcome {
            exit: true,
            ..CommandOutcome::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse_command("load  /tmp/my people.csv ").unwrap(),
            Some(Command::Load(PathBuf::from("/tmp/my people.csv")))
        );
        assert_eq!(
            parse_command("add-column Start Date").unwrap(),
            Some(Command::AddColumn("Start Date".to_string()))
        );
        assert_eq!(
            parse_command("set 2 3 Head of Ops").unwrap(),
            Some(Command::SetCell {
                row: 1,
                col: 2,
                value: "Head of Ops".to_string()
            })
        );
        assert_eq!(parse_command("GENERATE").unwrap(), Some(Command::Generate));
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(parse_command("# comment").unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse_command("frobnicate").unwrap_err(),
            CommandParseError::Unknown("frobnicate".to_string())
        );
        assert!(matches!(
            parse_command("load").unwrap_err(),
            CommandParseError::MissingArgument { command: "load", .. }
        ));
        assert!(matches!(
            parse_command("set 0 1 x").unwrap_err(),
            CommandParseError::InvalidNumber { what: "row", .. }
        ));
        assert!(matches!(
            parse_command("set 1").unwrap_err(),
            CommandParseError::MissingArgument { command: "set", .. }
        ));
    }

    #[test]
    fn set_without_value_clears_the_cell() {
        assert_eq!(
            parse_command("set 1 1").unwrap(),
            Some(Command::SetCell {
                row: 0,
                col: 0,
                value: String::new()
            })
        );
    }
}
