//! Derived lot occupancy

use serde::Serialize;
use std::fmt;

/// Occupancy snapshot, always computed from the ledger's records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub inside: usize,
    pub total_slots: u32,
    /// `round(inside / total_slots * 100)`, halves rounded up
    pub percent: u32,
}

impl Occupancy {
    pub fn new(inside: usize, total_slots: u32) -> Self {
        Self {
            inside,
            total_slots,
            percent: occupancy_percent(inside, total_slots),
        }
    }

    pub fn free_slots(&self) -> usize {
        (self.total_slots as usize).saturating_sub(self.inside)
    }

    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} slots ({}% load)",
            self.inside, self.total_slots, self.percent
        )
    }
}

/// Integer round-half-up of `inside * 100 / total_slots`.
///
/// A lot with no slots reports 0%.
pub fn occupancy_percent(inside: usize, total_slots: u32) -> u32 {
    if total_slots == 0 {
        return 0;
    }
    let total = u64::from(total_slots);
    let scaled = inside as u64 * 100;
    ((scaled * 2 + total) / (total * 2)) as u32
}
