//! Append-only gate event log
//!
//! Every operator action that touches the ledger is recorded here, including
//! refused check-ins and failed verifications. The log is bounded; the
//! oldest events are dropped once capacity is reached.

use chrono::NaiveDateTime;
use gate_ledger_core::types::*;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// What happened at the gate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateEventKind {
    CheckedIn {
        record_id: RecordId,
        plate: Plate,
        class: VehicleClass,
        token: Token,
        charge: u64,
    },
    CheckInRefused {
        plate: String,
        reason: String,
    },
    Exited {
        record_id: RecordId,
        plate: Plate,
        method: ExitMethod,
    },
    ExitRefused {
        input: String,
        reason: String,
    },
}

/// A logged gate event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateEvent {
    /// Monotonic sequence number, starting at 1
    pub seq: u64,
    pub at: NaiveDateTime,
    #[serde(flatten)]
    pub kind: GateEventKind,
}

impl fmt::Display for GateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<5} {} ", self.seq, self.at.format(TIME_DISPLAY_FORMAT))?;
        match &self.kind {
            GateEventKind::CheckedIn {
                record_id,
                plate,
                class,
                token,
                charge,
            } => write!(f, "IN     {record_id} {plate} {class} {token} charge={charge}"),
            GateEventKind::CheckInRefused { plate, reason } => {
                write!(f, "REFUSE {plate:?}: {reason}")
            }
            GateEventKind::Exited {
                record_id,
                plate,
                method,
            } => write!(f, "OUT    {record_id} {plate} via {method}"),
            GateEventKind::ExitRefused { input, reason } => {
                write!(f, "DENY   {input:?}: {reason}")
            }
        }
    }
}

struct Inner {
    events: VecDeque<GateEvent>,
    next_seq: u64,
}

/// Bounded, append-only event log
pub struct EventLog {
    inner: RwLock<Inner>,
    capacity: usize,
}

impl EventLog {
    /// Create a new event log holding at most `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                events: VecDeque::with_capacity(capacity.min(1024)),
                next_seq: 1,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Append an event, returning its sequence number
    pub fn append(&self, at: NaiveDateTime, kind: GateEventKind) -> u64 {
        let mut inner = self.inner.write();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        if inner.events.len() == self.capacity {
            inner.events.pop_front();
        }
        inner.events.push_back(GateEvent { seq, at, kind });
        seq
    }

    /// Up to `limit` most recent events, newest first
    pub fn recent(&self, limit: usize) -> Vec<GateEvent> {
        self.inner
            .read()
            .events
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Events currently retained
    pub fn len(&self) -> usize {
        self.inner.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events ever appended, including dropped ones
    pub fn total_appended(&self) -> u64 {
        self.inner.read().next_seq - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn refused(n: usize) -> GateEventKind {
        GateEventKind::ExitRefused {
            input: format!("{n}"),
            reason: "token not found".into(),
        }
    }

    #[test]
    fn test_append_event() {
        let log = EventLog::new(10);
        assert!(log.is_empty());

        assert_eq!(log.append(at(0), refused(1)), 1);
        assert_eq!(log.append(at(1), refused(2)), 2);
        assert_eq!(log.len(), 2);

        let recent = log.recent(10);
        assert_eq!(recent[0].seq, 2);
        assert_eq!(recent[1].seq, 1);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let log = EventLog::new(3);
        for n in 0..5 {
            log.append(at(n as u32), refused(n));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.total_appended(), 5);

        let seqs: Vec<_> = log.recent(10).iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![5, 4, 3]);
        assert_eq!(log.recent(1).len(), 1);
    }

    #[test]
    fn test_event_display_and_json() {
        let log = EventLog::new(4);
        log.append(
            at(12),
            GateEventKind::Exited {
                record_id: RecordId("GT-002".into()),
                plate: "UBB 990X".parse().unwrap(),
                method: ExitMethod::Token,
            },
        );
        let event = &log.recent(1)[0];
        assert_eq!(event.to_string(), "#1     09:12 AM OUT    GT-002 UBB 990X via TOKEN");

        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["kind"], "EXITED");
        assert_eq!(json["method"], "TOKEN");
        assert_eq!(json["seq"], 1);
    }
}
