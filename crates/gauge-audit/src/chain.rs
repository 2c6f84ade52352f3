//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. trail_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the evaluation record

use sha2::{Digest, Sha256};

use gauge_contracts::{
    error::{GaugeError, GaugeResult},
    evaluation::EvaluationRecord,
};

use crate::event::AuditEvent;

/// Compute the SHA-256 hash for a single audit event.
///
/// Commits to the event's position (`sequence`), the trail it belongs to,
/// its link to the previous event, and the full evaluation record.
/// Returns a lowercase 64-character hex string.
pub fn hash_event(
    trail_id: &str,
    sequence: u64,
    record: &EvaluationRecord,
    prev_hash: &str,
) -> GaugeResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| GaugeError::AuditWriteFailed {
        reason: format!("evaluation record is not serializable: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(trail_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a hash chain.
///
/// Valid when, for every event in order:
///
/// 1. `sequence` equals its position in the slice,
/// 2. `prev_hash` equals the previous event's `this_hash` (or
///    `GENESIS_HASH` for the first), and
/// 3. `this_hash` matches the value recomputed from the event's fields.
///
/// An empty chain is valid.
pub fn verify_chain(events: &[AuditEvent]) -> bool {
    let mut expected_prev = AuditEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }

        match hash_event(&event.trail_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}
