//! Operator command language
//!
//! One command per line. Keywords are case-insensitive.

use gate_ledger_core::VehicleClass;
use std::str::FromStr;
use thiserror::Error;

/// Default number of events shown by `history`
pub const DEFAULT_HISTORY: usize = 20;

/// Command parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("invalid {argument}: {value:?}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },
}

/// A parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check a vehicle in; class defaults to VISITOR
    CheckIn { class: VehicleClass, plate: String },
    /// Verify a chit token and exit its record
    Verify { code: String },
    /// Exit a record by id
    Exit { id: String },
    /// Records currently inside
    Manifest,
    /// All records
    List,
    Search { query: String },
    Show { id: String },
    Occupancy,
    /// Capacity grid
    Spatial,
    History { limit: usize },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  checkin [TYPE] <PLATE>   check a vehicle in (TYPE: visitor, vendor, supplier, staff)
  verify <CODE>            verify a chit token (MM-4219 or 4219) and exit
  exit <ID>                manual exit by record id
  manifest                 vehicles currently inside
  list                     all records, newest first
  search <QUERY>           match plate, token or id
  show <ID>                one record as JSON
  occupancy                inside / slots / load
  spatial                  capacity grid
  history [N]              recent gate events
  help                     this text
  quit                     end the session";

fn rest_or<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (keyword, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));

        match keyword.to_ascii_lowercase().as_str() {
            "checkin" | "in" => {
                let rest = rest_or(rest, "checkin", "a plate")?;
                // A leading class word is only taken when a plate follows it
                let (class, plate) = match rest.split_once(char::is_whitespace) {
                    Some((first, plate)) => match first.parse::<VehicleClass>() {
                        Ok(class) => (class, plate.trim()),
                        Err(_) => (VehicleClass::Visitor, rest),
                    },
                    None => (VehicleClass::Visitor, rest),
                };
                Ok(Command::CheckIn {
                    class,
                    plate: plate.to_string(),
                })
            }
            "verify" | "v" => Ok(Command::Verify {
                code: rest_or(rest, "verify", "a token")?.to_string(),
            }),
            "exit" | "out" => Ok(Command::Exit {
                id: rest_or(rest, "exit", "a record id")?.to_string(),
            }),
            "manifest" | "inside" => Ok(Command::Manifest),
            "list" | "ls" => Ok(Command::List),
            "search" | "find" => Ok(Command::Search {
                query: rest_or(rest, "search", "a query")?.to_string(),
            }),
            "show" => Ok(Command::Show {
                id: rest_or(rest, "show", "a record id")?.to_string(),
            }),
            "occupancy" | "load" => Ok(Command::Occupancy),
            "spatial" | "grid" => Ok(Command::Spatial),
            "history" => {
                let rest = rest.trim();
                let limit = if rest.is_empty() {
                    DEFAULT_HISTORY
                } else {
                    rest.parse().map_err(|_| CommandError::InvalidArgument {
                        argument: "history length",
                        value: rest.to_string(),
                    })?
                };
                Ok(Command::History { limit })
            }
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
