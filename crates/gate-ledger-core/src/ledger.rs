//! In-memory gate ledger
//!
//! The ledger owns every [`GateRecord`] issued during a session and enforces
//! the two invariants the gate depends on:
//! - A record moves INSIDE -> EXITED exactly once
//! - Tokens are unique among INSIDE records, so a keyed-in token names at
//!   most one vehicle
//!
//! Occupancy is derived from the records on every call; nothing is cached.

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::fees::FeeTable;
use crate::normalize::{normalize_plate, normalize_token_input};
use crate::occupancy::Occupancy;
use crate::token::{draw_record_id, draw_token};
use crate::types::*;
use crate::visits::VisitRegistry;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Parking slots in the hub
    pub total_slots: u32,
    /// Token prefix written on chits (`MM` in `MM-4219`)
    pub token_prefix: String,
    pub fees: FeeTable,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            total_slots: 150,
            token_prefix: "MM".to_string(),
            fees: FeeTable::default(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.total_slots == 0 {
            return Err(Error::InvalidConfig("total_slots must be at least 1".into()));
        }
        if self.token_prefix.is_empty()
            || !self.token_prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::InvalidConfig(format!(
                "token prefix must be non-empty ASCII alphanumeric, got {:?}",
                self.token_prefix
            )));
        }
        Ok(())
    }
}

/// Result of a successful exit
#[derive(Debug, Clone, PartialEq)]
pub struct ExitReceipt {
    /// The record after the transition
    pub record: GateRecord,
    pub method: ExitMethod,
}

/// In-memory registry of gate records
pub struct GateLedger {
    config: LedgerConfig,
    /// Records in check-in order (oldest first)
    records: Vec<GateRecord>,
    /// Record id -> index into `records`
    by_id: HashMap<RecordId, usize>,
    /// Token -> index of the INSIDE record holding it
    active_tokens: HashMap<Token, usize>,
    visits: VisitRegistry,
    rng: Box<dyn RngCore + Send + Sync>,
    clock: Arc<dyn Clock>,
}

impl GateLedger {
    /// Create a ledger using the system clock and an entropy-seeded RNG
    pub fn new(config: LedgerConfig) -> Result<Self> {
        Self::with_parts(
            config,
            Box::new(StdRng::from_entropy()),
            Arc::new(SystemClock),
        )
    }

    /// Create a ledger with an explicit RNG and clock
    pub fn with_parts(
        mut config: LedgerConfig,
        rng: Box<dyn RngCore + Send + Sync>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        config.token_prefix = config.token_prefix.to_uppercase();

        Ok(Self {
            config,
            records: Vec::new(),
            by_id: HashMap::new(),
            active_tokens: HashMap::new(),
            visits: VisitRegistry::new(),
            rng,
            clock,
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Current time on the ledger's clock
    pub fn now(&self) -> chrono::NaiveDateTime {
        self.clock.now()
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Check a vehicle in and issue its token.
    pub fn check_in(&mut self, plate: &str, class: VehicleClass) -> Result<GateRecord> {
        let plate = normalize_plate(plate)?;

        let occupancy = self.occupancy();
        if occupancy.is_full() {
            warn!(%plate, %occupancy, "check-in refused, gate full");
            return Err(Error::GateFull {
                inside: occupancy.inside,
                total_slots: occupancy.total_slots,
            });
        }

        let visit_count = self.visits.count(&plate).saturating_add(1);
        let assessment = self.config.fees.assess(class, visit_count);

        let token = draw_token(&mut self.rng, &self.config.token_prefix, |t| {
            self.active_tokens.contains_key(t)
        })?;
        let id = draw_record_id(&mut self.rng, |id| self.by_id.contains_key(id))?;

        self.visits.record_visit(&plate);

        let record = GateRecord {
            id,
            plate,
            class,
            time_in: self.clock.now(),
            time_out: None,
            status: RecordStatus::Inside,
            charge: assessment.charge,
            payment_status: if class.is_exempt() {
                PaymentStatus::Exempt
            } else {
                PaymentStatus::Pending
            },
            token,
            is_regular: assessment.is_regular,
            visit_count,
        };

        info!(
            record_id = %record.id,
            plate = %record.plate,
            class = %record.class,
            token = %record.token,
            charge = record.charge,
            visit_count,
            "checked in"
        );

        self.insert(record.clone());
        Ok(record)
    }

    /// Exit the INSIDE record holding the token keyed in by the operator.
    ///
    /// Accepts `MM-4219` or just `4219`.
    pub fn verify_and_exit(&mut self, input: &str) -> Result<ExitReceipt> {
        let token = normalize_token_input(&self.config.token_prefix, input)?;

        if let Some(&idx) = self.active_tokens.get(&token) {
            return Ok(self.exit_at(idx, ExitMethod::Token));
        }

        // Tokens may be reissued after exit, so report the latest holder
        match self.records.iter().rev().find(|r| r.token == token) {
            Some(record) => {
                warn!(%token, record_id = %record.id, "token already exited");
                Err(Error::AlreadyExited {
                    record_id: record.id.0.clone(),
                    plate: record.plate.0.clone(),
                })
            }
            None => {
                warn!(%token, "token not found");
                Err(Error::TokenNotFound(token.0))
            }
        }
    }

    /// Operator override: exit a record by id without a token.
    pub fn manual_exit(&mut self, id: &str) -> Result<ExitReceipt> {
        let id = RecordId(id.trim().to_uppercase());
        let idx = *self
            .by_id
            .get(&id)
            .ok_or_else(|| Error::RecordNotFound(id.0.clone()))?;

        let record = &self.records[idx];
        if !record.is_inside() {
            return Err(Error::AlreadyExited {
                record_id: record.id.0.clone(),
                plate: record.plate.0.clone(),
            });
        }

        Ok(self.exit_at(idx, ExitMethod::Manual))
    }

    /// Apply the terminal transition. `idx` must name an INSIDE record.
    fn exit_at(&mut self, idx: usize, method: ExitMethod) -> ExitReceipt {
        let now = self.clock.now();
        let record = &mut self.records[idx];

        record.status = RecordStatus::Exited;
        record.time_out = Some(now);
        if record.payment_status != PaymentStatus::Exempt {
            record.payment_status = PaymentStatus::Paid;
        }
        self.active_tokens.remove(&record.token);

        info!(
            record_id = %record.id,
            plate = %record.plate,
            token = %record.token,
            %method,
            "exited"
        );

        ExitReceipt {
            record: record.clone(),
            method,
        }
    }

    /// Insert a record issued elsewhere (e.g. a carried-over manifest).
    ///
    /// Check-in rules apply. The plate is re-normalized and the token must
    /// carry this ledger's prefix. An INSIDE record also needs a free slot
    /// and a token no active record holds.
    pub fn import(&mut self, mut record: GateRecord) -> Result<()> {
        if self.by_id.contains_key(&record.id) {
            return Err(Error::DuplicateRecord(record.id.0));
        }
        record.plate = normalize_plate(record.plate.as_str())?;
        record.token = normalize_token_input(&self.config.token_prefix, &record.token.0)?;

        if record.is_inside() {
            let occupancy = self.occupancy();
            if occupancy.is_full() {
                return Err(Error::GateFull {
                    inside: occupancy.inside,
                    total_slots: occupancy.total_slots,
                });
            }
            if self.active_tokens.contains_key(&record.token) {
                return Err(Error::DuplicateToken(record.token.0));
            }
        }
        self.visits.observe(&record.plate, record.visit_count);
        self.insert(record);
        Ok(())
    }

    fn insert(&mut self, record: GateRecord) {
        let idx = self.records.len();
        self.by_id.insert(record.id.clone(), idx);
        if record.is_inside() {
            self.active_tokens.insert(record.token.clone(), idx);
        }
        self.records.push(record);
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn get(&self, id: &str) -> Option<&GateRecord> {
        let id = RecordId(id.trim().to_uppercase());
        self.by_id.get(&id).map(|&idx| &self.records[idx])
    }

    /// All records, newest first
    pub fn records(&self) -> impl Iterator<Item = &GateRecord> {
        self.records.iter().rev()
    }

    /// INSIDE records, newest first
    pub fn inside(&self) -> impl Iterator<Item = &GateRecord> {
        self.records().filter(|r| r.is_inside())
    }

    /// Records matching `query` on plate, token or id, newest first
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a GateRecord> + 'a {
        self.records().filter(move |r| r.matches(query))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn inside_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_inside()).count()
    }

    pub fn occupancy(&self) -> Occupancy {
        Occupancy::new(self.inside_count(), self.config.total_slots)
    }

    /// Check-ins recorded for a plate (input is normalized first)
    pub fn visit_count(&self, plate: &str) -> u32 {
        normalize_plate(plate)
            .map(|p| self.visits.count(&p))
            .unwrap_or(0)
    }
}
