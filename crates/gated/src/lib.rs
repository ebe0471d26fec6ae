//! gated - Market Hub Gate Terminal
//!
//! This binary crate provides:
//! - An interactive operator console over the gate ledger
//! - Check-in chits, chit-token verification and manual exits
//! - A bounded gate event log for `history`
//! - A sample manifest for demo sessions
//! - A runtime wrapper that exits promptly on Ctrl-C

pub mod command;
pub mod config;
pub mod console;
pub mod demo;
pub mod event_log;
pub mod runtime;

pub use command::Command;
pub use config::Config;
pub use console::Console;
pub use event_log::EventLog;
