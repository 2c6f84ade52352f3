//! Audit event and log types.
//!
//! `AuditEvent` wraps one `EvaluationRecord` with its chain position and
//! hashes. `AuditLog` is the exported snapshot of a whole trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gauge_contracts::evaluation::EvaluationRecord;

/// A single entry in the SHA-256 hash chain of a trail.
///
/// Modifying any field, including the embedded record, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    pub trail_id: String,

    /// The evaluation pass being recorded.
    pub record: EvaluationRecord,

    /// Hash of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hash over (trail_id, sequence, prev_hash, record).
    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A snapshot of a trail, suitable for export into an evidence bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub trail_id: String,

    /// All events in chain order.
    pub events: Vec<AuditEvent>,

    /// Wall-clock time (UTC) the log was exported.
    pub exported_at: DateTime<Utc>,

    /// The `this_hash` of the last event; empty if the log is empty.
    pub terminal_hash: String,
}

impl AuditLog {
    /// Number of recorded passes that ended in a deny.
    pub fn denied_count(&self) -> usize {
        self.events.iter().filter(|e| !e.record.allowed).count()
    }
}
