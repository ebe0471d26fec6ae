//! Printable check-in chit

use crate::types::{GateRecord, PaymentStatus};
use std::fmt::Write;

const WIDTH: usize = 34;

/// Render the chit handed to the operator after check-in.
///
/// The operator copies the token onto the visitor's paper chit; exit later
/// requires that token.
pub fn render_chit(record: &GateRecord) -> String {
    let rule = "-".repeat(WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "+{rule}+");
    let _ = writeln!(out, "|{:^w$}|", fit(&record.token.0, WIDTH), w = WIDTH);
    let _ = writeln!(out, "|{:^w$}|", "PAPER ID", w = WIDTH);
    let _ = writeln!(out, "+{rule}+");
    row(&mut out, "ENTITY", record.plate.as_str());
    row(&mut out, "CLASS", record.class.as_str());
    row(&mut out, "ENTRANCE", &record.time_in_display());
    row(&mut out, "RECORD", &record.id.0);
    let charge = match record.payment_status {
        PaymentStatus::Exempt => "EXEMPT".to_string(),
        status => format!("{} ({})", record.charge, status),
    };
    row(&mut out, "CHARGE", &charge);
    if record.is_regular {
        row(&mut out, "VISITS", &format!("{} (regular)", record.visit_count));
    } else {
        row(&mut out, "VISITS", &record.visit_count.to_string());
    }
    let _ = writeln!(out, "+{rule}+");
    let _ = writeln!(out, "| Write the token ID on the paper  |");
    let _ = writeln!(out, "| chit. Exit verify required.      |");
    let _ = write!(out, "+{rule}+");
    out
}

const VALUE_WIDTH: usize = WIDTH - 12;

/// Values wider than the column are cut and marked with a trailing `~`.
fn row(out: &mut String, label: &str, value: &str) {
    let label = format!("{label}:");
    let value = fit(value, VALUE_WIDTH);
    let _ = writeln!(out, "| {label:<10}{value:>w$} |", w = VALUE_WIDTH);
}

fn fit(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width - 1).collect();
    cut.push('~');
    cut
}
