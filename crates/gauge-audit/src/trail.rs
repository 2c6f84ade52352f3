//! In-memory audit trail.
//!
//! `AuditTrail` keeps its events in a `Vec` behind `Arc<Mutex<_>>`. Clones
//! share the same chain, so one clone can be registered as an engine hook
//! while the caller keeps another to export or verify the log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use gauge_contracts::{
    error::{GaugeError, GaugeResult},
    evaluation::EvaluationRecord,
    policy::{PolicyContext, PolicyResult},
};
use gauge_core::traits::PostEvaluateHook;

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
};

pub(crate) struct TrailState {
    pub(crate) events: Vec<AuditEvent>,
    /// `this_hash` of the last event, or `GENESIS_HASH` before the first.
    pub(crate) last_hash: String,
}

/// An append-only, SHA-256 hash-chained record of evaluation passes.
#[derive(Clone)]
pub struct AuditTrail {
    trail_id: String,
    pub(crate) state: Arc<Mutex<TrailState>>,
}

impl AuditTrail {
    pub fn new(trail_id: impl Into<String>) -> Self {
        Self {
            trail_id: trail_id.into(),
            state: Arc::new(Mutex::new(TrailState {
                events: Vec::new(),
                last_hash: AuditEvent::GENESIS_HASH.to_string(),
            })),
        }
    }

    pub fn trail_id(&self) -> &str {
        &self.trail_id
    }

    fn lock(&self) -> GaugeResult<MutexGuard<'_, TrailState>> {
        self.state.lock().map_err(|e| GaugeError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {e}"),
        })
    }

    /// Append one record to the chain.
    pub fn append(&self, record: EvaluationRecord) -> GaugeResult<()> {
        let mut state = self.lock()?;

        let sequence = state.events.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_event(&self.trail_id, sequence, &record, &prev_hash)?;

        debug!(
            trail_id = %self.trail_id,
            sequence,
            evaluation_id = %record.evaluation_id,
            allowed = record.allowed,
            "audit event appended"
        );

        state.events.push(AuditEvent {
            sequence,
            trail_id: self.trail_id.clone(),
            record,
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;
        Ok(())
    }

    /// Number of events appended. Still readable after a writer panicked
    /// while holding the lock.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot every event written so far.
    pub fn export_log(&self) -> GaugeResult<AuditLog> {
        let state = self.lock()?;
        let terminal_hash = state.events.last().map(|e| e.this_hash.clone()).unwrap_or_default();

        info!(
            trail_id = %self.trail_id,
            event_count = state.events.len(),
            terminal_hash = %terminal_hash,
            "audit log exported"
        );

        Ok(AuditLog {
            trail_id: self.trail_id.clone(),
            events: state.events.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        })
    }

    /// Whether the in-memory chain is intact. A poisoned lock counts as
    /// tampered.
    pub fn verify_integrity(&self) -> bool {
        self.lock().map(|s| verify_chain(&s.events)).unwrap_or(false)
    }
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("trail_id", &self.trail_id)
            .field("events", &self.len())
            .finish()
    }
}

impl PostEvaluateHook for AuditTrail {
    /// Record the finished pass. An append failure surfaces as a hook error,
    /// which the engine logs.
    fn post_evaluate(&self, ctx: &PolicyContext, results: &[PolicyResult]) -> GaugeResult<()> {
        self.append(EvaluationRecord::new(ctx, results))
    }
}
