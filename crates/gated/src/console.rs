//! gated console - operator session loop

use crate::command::{Command, CommandError, HELP};
use crate::event_log::{EventLog, GateEventKind};
use gate_ledger_core::chit::render_chit;
use gate_ledger_core::ledger::ExitReceipt;
use gate_ledger_core::occupancy::Occupancy;
use gate_ledger_core::{Error as LedgerError, GateLedger, GateRecord};
use parking_lot::RwLock;
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Slots drawn per row by `spatial`
pub const GRID_COLUMNS: usize = 10;

/// Largest grid `spatial` draws; bigger lots share one cell between slots
pub const MAX_GRID_CELLS: usize = 500;

const PROMPT: &[u8] = b"gate> ";

/// Console errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reply to one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// The session should end after this reply
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

/// Session totals reported on shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub records: usize,
    pub occupancy: Occupancy,
    pub events: u64,
}

/// Operator console over a gate ledger
pub struct Console {
    ledger: Arc<RwLock<GateLedger>>,
    events: Arc<EventLog>,
    json: bool,
    /// Shutdown signal
    shutdown_tx: broadcast::Sender<()>,
}

impl Console {
    pub fn new(ledger: GateLedger, events: EventLog, json: bool) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            events: Arc::new(events),
            json,
            shutdown_tx,
        }
    }

    pub fn ledger(&self) -> Arc<RwLock<GateLedger>> {
        self.ledger.clone()
    }

    pub fn events(&self) -> Arc<EventLog> {
        self.events.clone()
    }

    /// Ask a running session to stop at its next await point
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub fn summary(&self) -> SessionSummary {
        let ledger = self.ledger.read();
        SessionSummary {
            records: ledger.len(),
            occupancy: ledger.occupancy(),
            events: self.events.total_appended(),
        }
    }

    /// Run the session until `quit`, end of input, or shutdown.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<(), ConsoleError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        output.write_all(self.banner().as_bytes()).await?;

        loop {
            output.write_all(PROMPT).await?;
            output.flush().await?;

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Console shutdown requested");
                    break;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("End of input");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let reply = self.handle_line(&line);
                    output.write_all(reply.text.as_bytes()).await?;
                    output.write_all(b"\n").await?;
                    if reply.quit {
                        break;
                    }
                }
            }
        }

        output.flush().await?;
        Ok(())
    }

    fn banner(&self) -> String {
        let occupancy = self.ledger.read().occupancy();
        format!(
            "gated v{} - hub gate terminal\n{occupancy}\ntype `help` for commands\n",
            env!("CARGO_PKG_VERSION")
        )
    }

    /// Parse and execute one line; failures become operator alerts.
    pub fn handle_line(&self, line: &str) -> Reply {
        let result = line
            .parse::<Command>()
            .map_err(ConsoleError::from)
            .and_then(|command| self.execute(command));

        match result {
            Ok(reply) => reply,
            Err(e) => Reply::text(alert(&e)),
        }
    }

    /// Execute a parsed command
    pub fn execute(&self, command: Command) -> Result<Reply, ConsoleError> {
        match command {
            Command::CheckIn { class, plate } => {
                let mut ledger = self.ledger.write();
                let now = ledger.now();
                match ledger.check_in(&plate, class) {
                    Ok(record) => {
                        self.events.append(
                            now,
                            GateEventKind::CheckedIn {
                                record_id: record.id.clone(),
                                plate: record.plate.clone(),
                                class: record.class,
                                token: record.token.clone(),
                                charge: record.charge,
                            },
                        );
                        Ok(Reply::text(render_chit(&record)))
                    }
                    Err(e) => {
                        self.events.append(
                            now,
                            GateEventKind::CheckInRefused {
                                plate,
                                reason: e.to_string(),
                            },
                        );
                        Err(e.into())
                    }
                }
            }
            Command::Verify { code } => {
                let mut ledger = self.ledger.write();
                let result = ledger.verify_and_exit(&code);
                let now = ledger.now();
                self.exit_reply(now, &code, result)
            }
            Command::Exit { id } => {
                let mut ledger = self.ledger.write();
                let result = ledger.manual_exit(&id);
                let now = ledger.now();
                self.exit_reply(now, &id, result)
            }
            Command::Manifest => {
                let ledger = self.ledger.read();
                let inside: Vec<_> = ledger.inside().collect();
                if inside.is_empty() && !self.json {
                    return Ok(Reply::text("No vehicles inside the hub."));
                }
                self.render_records(&inside)
            }
            Command::List => {
                let ledger = self.ledger.read();
                let all: Vec<_> = ledger.records().collect();
                self.render_records(&all)
            }
            Command::Search { query } => {
                let ledger = self.ledger.read();
                let hits: Vec<_> = ledger.search(&query).collect();
                if hits.is_empty() && !self.json {
                    return Ok(Reply::text(format!("No records match {query:?}.")));
                }
                self.render_records(&hits)
            }
            Command::Show { id } => {
                let ledger = self.ledger.read();
                let record = ledger
                    .get(&id)
                    .ok_or_else(|| LedgerError::RecordNotFound(id.trim().to_uppercase()))?;
                Ok(Reply::text(serde_json::to_string_pretty(record)?))
            }
            Command::Occupancy => {
                let occupancy = self.ledger.read().occupancy();
                if self.json {
                    return Ok(Reply::text(serde_json::to_string(&occupancy)?));
                }
                Ok(Reply::text(occupancy.to_string()))
            }
            Command::Spatial => {
                let occupancy = self.ledger.read().occupancy();
                Ok(Reply::text(render_grid(&occupancy, GRID_COLUMNS)))
            }
            Command::History { limit } => {
                let events = self.events.recent(limit);
                if self.json {
                    return Ok(Reply::text(serde_json::to_string_pretty(&events)?));
                }
                if events.is_empty() {
                    return Ok(Reply::text("No gate events yet."));
                }
                let lines: Vec<_> = events.iter().map(ToString::to_string).collect();
                Ok(Reply::text(lines.join("\n")))
            }
            Command::Help => Ok(Reply::text(HELP)),
            Command::Quit => Ok(Reply {
                text: "Session closed.".into(),
                quit: true,
            }),
        }
    }

    fn exit_reply(
        &self,
        now: chrono::NaiveDateTime,
        input: &str,
        result: gate_ledger_core::Result<ExitReceipt>,
    ) -> Result<Reply, ConsoleError> {
        match result {
            Ok(receipt) => {
                let record = &receipt.record;
                self.events.append(
                    now,
                    GateEventKind::Exited {
                        record_id: record.id.clone(),
                        plate: record.plate.clone(),
                        method: receipt.method,
                    },
                );
                Ok(Reply::text(format!(
                    "Manifest verified: {} is cleared for exit ({} at {}, {}).",
                    record.plate,
                    record.id,
                    record.time_out_display().unwrap_or_default(),
                    record.payment_status,
                )))
            }
            Err(e) => {
                warn!(input, error = %e, "Exit refused");
                self.events.append(
                    now,
                    GateEventKind::ExitRefused {
                        input: input.to_string(),
                        reason: e.to_string(),
                    },
                );
                Err(e.into())
            }
        }
    }

    fn render_records(&self, records: &[&GateRecord]) -> Result<Reply, ConsoleError> {
        if self.json {
            return Ok(Reply::text(serde_json::to_string_pretty(records)?));
        }
        Ok(Reply::text(render_table(records)))
    }
}

/// Operator-facing text for a failed command
fn alert(error: &ConsoleError) -> String {
    match error {
        ConsoleError::Ledger(LedgerError::AlreadyExited { plate, .. }) => {
            format!("Alert: token for {plate} was already exited from the hub.")
        }
        ConsoleError::Ledger(LedgerError::TokenNotFound(token)) => format!(
            "Error: token {token} not found in the ledger. Please verify chit handwriting."
        ),
        ConsoleError::Ledger(LedgerError::GateFull { inside, total_slots }) => {
            format!("Alert: hub is full ({inside}/{total_slots}). Hold the vehicle at the gate.")
        }
        other => format!("Error: {other}"),
    }
}

/// Fixed-width table of records
pub fn render_table(records: &[&GateRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<12} {:<9} {:<8} {:<9} {:<9} {:<7} {:>7} {:<8}",
        "ID", "PLATE", "TYPE", "TOKEN", "IN", "OUT", "STATUS", "CHARGE", "PAYMENT"
    );
    for r in records {
        let _ = writeln!(
            out,
            "{:<8} {:<12} {:<9} {:<8} {:<9} {:<9} {:<7} {:>7} {:<8}",
            r.id.0,
            r.plate.as_str(),
            r.class.as_str(),
            r.token.0,
            r.time_in_display(),
            r.time_out_display().unwrap_or_else(|| "-".into()),
            r.status.to_string(),
            r.charge,
            r.payment_status.to_string(),
        );
    }
    let _ = write!(out, "{} record(s)", records.len());
    out
}

/// One cell per slot, `#` occupied and `.` free.
///
/// Lots larger than [`MAX_GRID_CELLS`] are drawn at a coarser scale, each
/// cell standing for the same number of slots.
pub fn render_grid(occupancy: &Occupancy, columns: usize) -> String {
    let columns = columns.max(1);
    let total = occupancy.total_slots as usize;
    let per_cell = total.div_ceil(MAX_GRID_CELLS).max(1);
    let cells: Vec<char> = (0..total.div_ceil(per_cell))
        .map(|i| if i * per_cell < occupancy.inside { '#' } else { '.' })
        .collect();

    let mut out: Vec<String> = cells
        .chunks(columns)
        .map(|row| row.iter().map(|c| format!("{c} ")).collect::<String>().trim_end().to_string())
        .collect();
    if per_cell > 1 {
        out.push(format!("(each cell is {per_cell} slots)"));
    }
    out.push(occupancy.to_string());
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gate_ledger_core::clock::FixedClock;
    use gate_ledger_core::{LedgerConfig, RecordStatus};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_console(config: LedgerConfig, json: bool) -> Console {
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        ));
        let ledger =
            GateLedger::with_parts(config, Box::new(StdRng::seed_from_u64(9)), clock).unwrap();
        Console::new(ledger, EventLog::new(100), json)
    }

    fn console() -> Console {
        create_test_console(LedgerConfig::default(), false)
    }

    fn last_token(console: &Console) -> String {
        console.ledger.read().records().next().unwrap().token.0.clone()
    }

    #[test]
    fn test_checkin_prints_chit() {
        let console = console();
        let reply = console.handle_line("checkin vendor ubb 990x");
        assert!(!reply.quit);
        assert!(reply.text.contains("UBB 990X"));
        assert!(reply.text.contains(&last_token(&console)));
        assert_eq!(console.events.len(), 1);
    }

    #[test]
    fn test_verify_twice() {
        let console = console();
        console.handle_line("checkin UAX 982P");
        let token = last_token(&console);
        let digits = token.trim_start_matches("MM-");

        let first = console.handle_line(&format!("verify {digits}"));
        assert!(first.text.starts_with("Manifest verified: UAX 982P"), "{}", first.text);
        assert!(first.text.contains("PAID"));

        let second = console.handle_line(&format!("verify {token}"));
        assert!(second.text.starts_with("Alert:"), "{}", second.text);
        assert!(second.text.contains("already exited"));

        let history = console.events.recent(10);
        assert!(matches!(history[0].kind, GateEventKind::ExitRefused { .. }));
        assert!(matches!(history[1].kind, GateEventKind::Exited { .. }));
    }

    #[test]
    fn test_unknown_token_alert() {
        let console = console();
        let reply = console.handle_line("verify 0999");
        assert_eq!(
            reply.text,
            "Error: token MM-0999 not found in the ledger. Please verify chit handwriting."
        );
    }

    #[test]
    fn test_manual_exit_and_manifest() {
        let console = console();
        console.handle_line("checkin staff UG 0001S");
        let id = console.ledger.read().records().next().unwrap().id.0.clone();

        let manifest = console.handle_line("manifest");
        assert!(manifest.text.contains("UG 0001S"));
        assert!(manifest.text.contains("EXEMPT"));

        let exit = console.handle_line(&format!("exit {}", id.to_lowercase()));
        assert!(exit.text.contains("cleared for exit"), "{}", exit.text);
        assert!(exit.text.contains("EXEMPT"));

        let record = console.ledger.read().get(&id).cloned().unwrap();
        assert_eq!(record.status, RecordStatus::Exited);
        assert_eq!(console.handle_line("manifest").text, "No vehicles inside the hub.");
    }

    #[test]
    fn test_gate_full_is_logged() {
        let config = LedgerConfig {
            total_slots: 1,
            ..LedgerConfig::default()
        };
        let console = create_test_console(config, false);
        console.handle_line("checkin A 1");
        let reply = console.handle_line("checkin A 2");
        assert!(reply.text.starts_with("Alert: hub is full (1/1)"));
        assert!(matches!(
            console.events.recent(1)[0].kind,
            GateEventKind::CheckInRefused { .. }
        ));
    }

    #[test]
    fn test_json_output() {
        let console = create_test_console(LedgerConfig::default(), true);
        console.handle_line("checkin supplier UAX 123Z");

        let list = console.handle_line("list");
        let parsed: serde_json::Value = serde_json::from_str(&list.text).unwrap();
        assert_eq!(parsed[0]["plate"], "UAX 123Z");
        assert_eq!(parsed[0]["type"], "SUPPLIER");

        let occupancy: serde_json::Value =
            serde_json::from_str(&console.handle_line("occupancy").text).unwrap();
        assert_eq!(occupancy["inside"], 1);
        assert_eq!(occupancy["percent"], 1);
    }

    #[test]
    fn test_show_and_search() {
        let console = console();
        console.handle_line("checkin UAX 123Z");
        let id = console.ledger.read().records().next().unwrap().id.0.clone();

        let shown: serde_json::Value =
            serde_json::from_str(&console.handle_line(&format!("show {id}")).text).unwrap();
        assert_eq!(shown["id"], id.as_str());

        assert!(console.handle_line("search 123").text.contains("1 record(s)"));
        assert_eq!(console.handle_line("search zzz").text, "No records match \"zzz\".");
        assert!(console.handle_line("show GT-NONE").text.starts_with("Error:"));
    }

    #[test]
    fn test_render_grid() {
        let grid = render_grid(&Occupancy::new(3, 12), 5);
        let lines: Vec<_> = grid.lines().collect();
        assert_eq!(lines[0], "# # # . .");
        assert_eq!(lines[1], ". . . . .");
        assert_eq!(lines[2], ". .");
        assert_eq!(lines[3], "3/12 slots (25% load)");
    }

    #[test]
    fn test_render_grid_scales_large_lots() {
        let grid = render_grid(&Occupancy::new(3, u32::MAX), GRID_COLUMNS);
        let lines: Vec<_> = grid.lines().collect();
        assert!(lines.len() <= MAX_GRID_CELLS / GRID_COLUMNS + 2);
        assert_eq!(lines[0], "# . . . . . . . . .");
        assert!(lines[lines.len() - 2].starts_with("(each cell is "));

        let grid = render_grid(&Occupancy::new(500, 1000), GRID_COLUMNS);
        let cells = grid.chars().filter(|c| matches!(c, '#' | '.')).count();
        assert_eq!(cells, 500);
        assert_eq!(grid.chars().filter(|c| *c == '#').count(), 250);
        assert!(grid.contains("(each cell is 2 slots)"));
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let console = console();
        assert!(console.handle_line("teleport").text.starts_with("Error: Command error"));
        assert!(console.handle_line("help").text.contains("checkin"));
    }

    #[tokio::test]
    async fn test_run_session() {
        let console = console();
        let input: &[u8] = b"checkin visitor UCA 445L\n\noccupancy\nquit\nmanifest\n";
        let mut output = Vec::new();

        console.run(input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("gated v"));
        assert!(text.contains("UCA 445L"));
        assert!(text.contains("1/150 slots (1% load)"));
        assert!(text.contains("Session closed."));
        // Nothing after quit is executed
        assert!(!text.contains("STATUS"));

        let summary = console.summary();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.occupancy.inside, 1);
        assert_eq!(summary.events, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_eof_and_shutdown() {
        let console = console();
        let mut output = Vec::new();
        console.run(&b"occupancy"[..], &mut output).await.unwrap();
        assert!(String::from_utf8(output).unwrap().contains("0/150"));

        // A shutdown sent before the session subscribes is not replayed,
        // so signal from a task once the session is waiting on input.
        let console = Arc::new(console);
        let (_writer, reader) = tokio::io::duplex(64);
        let stopper = console.clone();
        let handle = tokio::spawn(async move {
            let mut sink = Vec::new();
            stopper
                .run(tokio::io::BufReader::new(reader), &mut sink)
                .await
        });
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        console.shutdown();
        handle.await.unwrap().unwrap();
    }
}
