//! Sample manifest for demos and training sessions

use chrono::{NaiveDate, NaiveDateTime};
use gate_ledger_core::normalize::format_token;
use gate_ledger_core::types::*;
use gate_ledger_core::{GateLedger, Result};

fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn plate(raw: &str) -> Result<Plate> {
    raw.parse()
}

/// Three records from a typical morning: a regular supplier and an
/// unpaid visitor inside, and a vendor that has already left. Tokens carry
/// the given prefix so they verify on the ledger they are seeded into.
pub fn demo_manifest(date: NaiveDate, prefix: &str) -> Result<Vec<GateRecord>> {
    Ok(vec![
        GateRecord {
            id: RecordId("GT-001".into()),
            plate: plate("UAX 123Z")?,
            class: VehicleClass::Supplier,
            time_in: at(date, 8, 45),
            time_out: None,
            status: RecordStatus::Inside,
            charge: 5000,
            payment_status: PaymentStatus::Paid,
            token: format_token(prefix, 4219),
            is_regular: true,
            visit_count: 45,
        },
        GateRecord {
            id: RecordId("GT-002".into()),
            plate: plate("UBB 990X")?,
            class: VehicleClass::Vendor,
            time_in: at(date, 9, 12),
            time_out: Some(at(date, 11, 5)),
            status: RecordStatus::Exited,
            charge: 2000,
            payment_status: PaymentStatus::Paid,
            token: format_token(prefix, 1123),
            is_regular: true,
            visit_count: 124,
        },
        GateRecord {
            id: RecordId("GT-003".into()),
            plate: plate("UCA 445L")?,
            class: VehicleClass::Visitor,
            time_in: at(date, 10, 5),
            time_out: None,
            status: RecordStatus::Inside,
            charge: 3000,
            payment_status: PaymentStatus::Pending,
            token: format_token(prefix, 5561),
            is_regular: false,
            visit_count: 1,
        },
    ])
}

/// Import the sample manifest, dated today on the ledger's clock.
pub fn seed_demo(ledger: &mut GateLedger) -> Result<usize> {
    let records = demo_manifest(ledger.now().date(), &ledger.config().token_prefix)?;
    let count = records.len();
    for record in records {
        ledger.import(record)?;
    }
    Ok(count)
}
