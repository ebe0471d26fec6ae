//! Per-plate visit registry

use crate::types::Plate;
use std::collections::HashMap;

/// Cumulative check-in counts keyed by normalized plate
#[derive(Debug, Clone, Default)]
pub struct VisitRegistry {
    counts: HashMap<Plate, u32>,
}

impl VisitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-ins recorded so far for `plate`
    pub fn count(&self, plate: &Plate) -> u32 {
        self.counts.get(plate).copied().unwrap_or(0)
    }

    /// Count one more check-in and return the new total
    pub fn record_visit(&mut self, plate: &Plate) -> u32 {
        let count = self.counts.entry(plate.clone()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Raise the count for `plate` to at least `count` (imported history)
    pub fn observe(&mut self, plate: &Plate, count: u32) {
        let current = self.counts.entry(plate.clone()).or_insert(0);
        *current = (*current).max(count);
    }

    /// Number of distinct plates seen
    pub fn plates(&self) -> usize {
        self.counts.len()
    }
}
