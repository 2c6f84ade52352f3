//! Evaluation-pass records written to the audit trail.
//!
//! One `EvaluationRecord` is produced per `PolicyEngine::evaluate` call and
//! handed to post-evaluate hooks. Records are never modified after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::{PolicyContext, PolicyResult};

/// Unique identifier for a single evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub uuid::Uuid);

impl EvaluationId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An immutable record of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub evaluation_id: EvaluationId,
    /// The context the policies were evaluated against.
    pub context: PolicyContext,
    /// One result per enabled policy, in registration order.
    pub results: Vec<PolicyResult>,
    /// True iff no result is a deny.
    pub allowed: bool,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl EvaluationRecord {
    /// Snapshot a finished evaluation pass.
    pub fn new(context: &PolicyContext, results: &[PolicyResult]) -> Self {
        Self {
            evaluation_id: EvaluationId::new(),
            context: context.clone(),
            results: results.to_vec(),
            allowed: !results.iter().any(PolicyResult::is_deny),
            timestamp: Utc::now(),
        }
    }
}
