//! Error types for the gate ledger

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Gate ledger error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Plate was empty after normalization
    #[error("invalid plate: {0:?}")]
    InvalidPlate(String),

    /// Operator input is not a well-formed token
    #[error("invalid token input: {0:?}")]
    InvalidTokenInput(String),

    /// No record, inside or exited, carries this token
    #[error("token not found: {0}")]
    TokenNotFound(String),

    /// No record with this id
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// Record has already made its one INSIDE -> EXITED transition
    #[error("already exited: {record_id} ({plate})")]
    AlreadyExited { record_id: String, plate: String },

    /// Every slot is taken
    #[error("gate full: {inside}/{total_slots} slots occupied")]
    GateFull { inside: usize, total_slots: u32 },

    /// No free token or record id could be drawn
    #[error("token space exhausted after {attempts} attempts")]
    TokenSpaceExhausted { attempts: u32 },

    /// Imported record reuses an existing id
    #[error("duplicate record id: {0}")]
    DuplicateRecord(String),

    /// Imported INSIDE record reuses an active token
    #[error("duplicate active token: {0}")]
    DuplicateToken(String),

    /// Unknown vehicle class name
    #[error("invalid vehicle class: {0:?}")]
    InvalidVehicleClass(String),

    /// Ledger configuration rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
