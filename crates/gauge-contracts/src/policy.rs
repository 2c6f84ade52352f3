//! Policy evaluation context and result types.
//!
//! The engine consumes a `PolicyContext` and every enabled policy produces
//! exactly one `PolicyResult`. Only `Decision::Deny` blocks; `Defer` and
//! `Audit` are recorded but do not change the overall verdict.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GaugeError, GaugeResult};

/// Ordered key/value map used for context metadata and result evidence.
pub type Evidence = BTreeMap<String, Value>;

/// The validation level assumed when the caller does not provide one.
pub const NO_VALIDATION: &str = "none";

/// The decision a single policy returns for a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The action is permitted.
    Allow,
    /// The action is blocked.
    Deny,
    /// A human must review before the action proceeds. Does not block.
    Defer,
    /// Permitted, but flagged for the audit trail.
    Audit,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
            Decision::Defer => "defer",
            Decision::Audit => "audit",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping tag carried by every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyCategory {
    Governance,
    Architecture,
    Implementation,
    Security,
    Compliance,
    Operational,
}

/// Everything a policy may inspect when making its decision.
///
/// Built by the caller per request and borrowed immutably for one
/// evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyContext {
    /// Who is acting (user, service, pipeline).
    pub actor: String,
    /// What they want to do (e.g. "deploy_production").
    pub action: String,
    /// What it targets (e.g. "security_config").
    pub resource: String,
    pub timestamp: DateTime<Utc>,
    /// Arbitrary caller-supplied facts, e.g. `approved = true`.
    #[serde(default)]
    pub metadata: Evidence,
    /// Latest aggregate score, usually `FrequencyReport::total_score`.
    #[serde(default)]
    pub current_score: f64,
    /// Highest validation tier reached, as a free-form tag.
    #[serde(default = "default_validation_level")]
    pub validation_level: String,
}

fn default_validation_level() -> String {
    NO_VALIDATION.to_string()
}

impl PolicyContext {
    /// Build a context stamped with the current time, a score of 0.0 and
    /// validation level `"none"`.
    pub fn new(actor: impl Into<String>, action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            resource: resource.into(),
            timestamp: Utc::now(),
            metadata: Evidence::new(),
            current_score: 0.0,
            validation_level: default_validation_level(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.current_score = score;
        self
    }

    pub fn with_validation_level(mut self, level: impl Into<String>) -> Self {
        self.validation_level = level.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Reject a context whose action or resource is blank.
    ///
    /// The engine calls this once per pass; an invalid context is denied by
    /// every enabled policy without evaluating it.
    pub fn validate(&self) -> GaugeResult<()> {
        for (field, value) in [("action", &self.action), ("resource", &self.resource)] {
            if value.trim().is_empty() {
                return Err(GaugeError::invalid_input(format!("context {field} must not be empty")));
            }
        }
        Ok(())
    }

    /// Look up a metadata value and report whether it is truthy.
    ///
    /// Missing keys, `null`, `false`, zero, and empty strings, arrays or
    /// objects are all falsy.
    pub fn metadata_flag(&self, key: &str) -> bool {
        self.metadata.get(key).is_some_and(is_truthy)
    }
}

/// Truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// One policy's decision for one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyResult {
    pub decision: Decision,
    pub policy_id: String,
    /// Human-readable explanation, written to the audit trail.
    pub reason: String,
    #[serde(default)]
    pub evidence: Evidence,
    /// The decision needs authority beyond automatic evaluation.
    #[serde(default)]
    pub requires_escalation: bool,
}

impl PolicyResult {
    fn with_decision(decision: Decision, policy_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            decision,
            policy_id: policy_id.into(),
            reason: reason.into(),
            evidence: Evidence::new(),
            requires_escalation: false,
        }
    }

    pub fn allow(policy_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::with_decision(Decision::Allow, policy_id, reason)
    }

    pub fn deny(policy_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::with_decision(Decision::Deny, policy_id, reason)
    }

    pub fn defer(policy_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::with_decision(Decision::Defer, policy_id, reason)
    }

    pub fn audit(policy_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::with_decision(Decision::Audit, policy_id, reason)
    }

    /// Add one evidence entry.
    pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }

    /// Mark the result as needing escalation.
    pub fn escalated(mut self) -> Self {
        self.requires_escalation = true;
        self
    }

    pub fn is_deny(&self) -> bool {
        self.decision == Decision::Deny
    }
}

/// The combined verdict of a `check` call.
///
/// `results` is always the full list, even when denied, so callers can
/// present every contributing reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// True iff no result is `Deny`.
    pub allowed: bool,
    pub results: Vec<PolicyResult>,
}

impl CheckOutcome {
    pub fn from_results(results: Vec<PolicyResult>) -> Self {
        let allowed = !results.iter().any(PolicyResult::is_deny);
        Self { allowed, results }
    }

    /// Results with a `Deny` decision, in evaluation order.
    pub fn denials(&self) -> impl Iterator<Item = &PolicyResult> {
        self.results.iter().filter(|r| r.is_deny())
    }

    /// Whether any result asked for escalation.
    pub fn requires_escalation(&self) -> bool {
        self.results.iter().any(|r| r.requires_escalation)
    }
}
