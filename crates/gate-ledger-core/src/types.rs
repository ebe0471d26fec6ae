//! Core record types for the gate ledger
//!
//! Field names serialize in camelCase and enums in SCREAMING_SNAKE_CASE so a
//! rendered record reads the same as the terminal's manifest entries.

use crate::error::Error;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display format for gate timestamps (`08:45 AM`)
pub const TIME_DISPLAY_FORMAT: &str = "%I:%M %p";

// =============================================================================
// IDENTITY TYPES (newtypes for type safety)
// =============================================================================

/// Record identifier, `GT-XXXX`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RecordId(pub String);

/// Human-writable exit token, `<PREFIX>-NNNN`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Token(pub String);

/// Normalized vehicle plate (see [`crate::normalize::normalize_plate`])
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Plate(pub(crate) String);

impl Plate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Plate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::normalize::normalize_plate(s)
    }
}

macro_rules! display_inner {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })*
    };
}

display_inner!(RecordId, Token, Plate);

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Who is passing through the gate
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleClass {
    Supplier,
    Vendor,
    Staff,
    Visitor,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Supplier,
        VehicleClass::Vendor,
        VehicleClass::Staff,
        VehicleClass::Visitor,
    ];

    /// Staff pass free of charge
    pub fn is_exempt(self) -> bool {
        matches!(self, VehicleClass::Staff)
    }

    /// Classes treated as regulars regardless of visit count
    pub fn is_always_regular(self) -> bool {
        matches!(self, VehicleClass::Staff | VehicleClass::Vendor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Supplier => "SUPPLIER",
            VehicleClass::Vendor => "VENDOR",
            VehicleClass::Staff => "STAFF",
            VehicleClass::Visitor => "VISITOR",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPPLIER" => Ok(VehicleClass::Supplier),
            "VENDOR" => Ok(VehicleClass::Vendor),
            // The check-in form labels staff as "Official"
            "STAFF" | "OFFICIAL" => Ok(VehicleClass::Staff),
            "VISITOR" => Ok(VehicleClass::Visitor),
            _ => Err(Error::InvalidVehicleClass(s.to_string())),
        }
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Record lifecycle. EXITED is terminal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Inside,
    Exited,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordStatus::Inside => "INSIDE",
            RecordStatus::Exited => "EXITED",
        })
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Exempt,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Exempt => "EXEMPT",
        })
    }
}

/// How a record left the INSIDE state
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitMethod {
    /// Operator keyed in the chit token
    Token,
    /// Operator override by record id
    Manual,
}

impl fmt::Display for ExitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExitMethod::Token => "TOKEN",
            ExitMethod::Manual => "MANUAL",
        })
    }
}

// =============================================================================
// GATE RECORD
// =============================================================================

/// One pass through the gate
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GateRecord {
    pub id: RecordId,
    pub plate: Plate,
    #[serde(rename = "type")]
    pub class: VehicleClass,
    pub time_in: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_out: Option<NaiveDateTime>,
    pub status: RecordStatus,
    /// Fee in whole currency units
    pub charge: u64,
    pub payment_status: PaymentStatus,
    pub token: Token,
    pub is_regular: bool,
    pub visit_count: u32,
}

impl GateRecord {
    pub fn is_inside(&self) -> bool {
        self.status == RecordStatus::Inside
    }

    pub fn time_in_display(&self) -> String {
        self.time_in.format(TIME_DISPLAY_FORMAT).to_string()
    }

    pub fn time_out_display(&self) -> Option<String> {
        self.time_out
            .map(|t| t.format(TIME_DISPLAY_FORMAT).to_string())
    }

    /// Case-insensitive substring match over plate, token and id
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_uppercase();
        if needle.is_empty() {
            return true;
        }
        self.plate.0.contains(&needle)
            || self.token.0.to_uppercase().contains(&needle)
            || self.id.0.to_uppercase().contains(&needle)
    }
}
