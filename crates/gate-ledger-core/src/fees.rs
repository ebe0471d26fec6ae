//! Gate fee table

use crate::types::VehicleClass;
use serde::{Deserialize, Serialize};

/// Fees charged at check-in, in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeTable {
    /// Charged to regulars
    pub regular_fee: u64,
    /// Charged to everyone else
    pub standard_fee: u64,
    /// A plate with more check-ins than this counts as a regular
    pub regular_visit_threshold: u32,
}

impl Default for FeeTable {
    fn default() -> Self {
        Self {
            regular_fee: 1500,
            standard_fee: 3000,
            regular_visit_threshold: 5,
        }
    }
}

/// Outcome of applying the fee table to a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub is_regular: bool,
    pub charge: u64,
}

impl FeeTable {
    /// `visit_count` includes the check-in being assessed.
    pub fn is_regular(&self, class: VehicleClass, visit_count: u32) -> bool {
        class.is_always_regular() || visit_count > self.regular_visit_threshold
    }

    pub fn assess(&self, class: VehicleClass, visit_count: u32) -> Assessment {
        let is_regular = self.is_regular(class, visit_count);
        let charge = if class.is_exempt() {
            0
        } else if is_regular {
            self.regular_fee
        } else {
            self.standard_fee
        };
        Assessment { is_regular, charge }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_is_free_and_regular() {
        let table = FeeTable::default();
        for visits in [1, 6, 100] {
            let a = table.assess(VehicleClass::Staff, visits);
            assert_eq!(a.charge, 0);
            assert!(a.is_regular);
        }
    }

    #[test]
    fn test_vendor_always_regular() {
        let a = FeeTable::default().assess(VehicleClass::Vendor, 1);
        assert_eq!(a, Assessment { is_regular: true, charge: 1500 });
    }

    #[test]
    fn test_visitor_becomes_regular_after_threshold() {
        let table = FeeTable::default();
        assert_eq!(table.assess(VehicleClass::Visitor, 5).charge, 3000);
        let sixth = table.assess(VehicleClass::Visitor, 6);
        assert!(sixth.is_regular);
        assert_eq!(sixth.charge, 1500);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let table: FeeTable = serde_json::from_str(r#"{"standard_fee": 4000}"#).unwrap();
        assert_eq!(table.standard_fee, 4000);
        assert_eq!(table.regular_fee, 1500);
        assert_eq!(table.regular_visit_threshold, 5);
    }
}
