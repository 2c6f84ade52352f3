//! The default policy set.
//!
//! Each policy is independent, total, and contributes exactly one result per
//! evaluation. Registration order in [`crate::default_engine`] is the order
//! below.

use serde_json::Value;
use tracing::debug;

use gauge_contracts::{
    error::GaugeResult,
    policy::{PolicyCategory, PolicyContext, PolicyResult},
};
use gauge_core::traits::Policy;

pub const SCORE_THRESHOLD_ID: &str = "POL-SCORE-001";
pub const VALIDATION_REQUIRED_ID: &str = "POL-VAL-001";
pub const CRITICAL_RESOURCE_ID: &str = "POL-APPROVAL-001";
pub const AUDIT_TRAIL_ID: &str = "POL-AUDIT-001";

/// Metadata key that marks a protected resource change as approved.
pub const APPROVED_KEY: &str = "approved";
/// Metadata key naming who approved it.
pub const APPROVER_KEY: &str = "approver";

// ── Score threshold ───────────────────────────────────────────────────────────

/// Allows only when the context's aggregate score meets a minimum.
#[derive(Debug, Clone)]
pub struct ScoreThresholdPolicy {
    min_threshold: f64,
}

impl ScoreThresholdPolicy {
    pub fn new(min_threshold: f64) -> Self {
        Self { min_threshold }
    }

    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }
}

impl Default for ScoreThresholdPolicy {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Policy for ScoreThresholdPolicy {
    fn id(&self) -> &str {
        SCORE_THRESHOLD_ID
    }

    fn category(&self) -> PolicyCategory {
        PolicyCategory::Operational
    }

    fn evaluate(&self, ctx: &PolicyContext) -> GaugeResult<PolicyResult> {
        let score = ctx.current_score;
        let result = if score >= self.min_threshold {
            PolicyResult::allow(
                SCORE_THRESHOLD_ID,
                format!("score {score} >= threshold {}", self.min_threshold),
            )
        } else {
            PolicyResult::deny(
                SCORE_THRESHOLD_ID,
                format!("score {score} below threshold {}", self.min_threshold),
            )
        };
        Ok(result
            .with_evidence("score", score)
            .with_evidence("threshold", self.min_threshold))
    }
}

// ── Validation requirement ───────────────────────────────────────────────────

/// Sensitive actions need a privileged validation level; otherwise they are
/// deferred for escalation.
#[derive(Debug, Clone)]
pub struct ValidationRequiredPolicy {
    sensitive_actions: Vec<String>,
    privileged_levels: Vec<String>,
}

impl ValidationRequiredPolicy {
    pub fn new(sensitive_actions: Vec<String>, privileged_levels: Vec<String>) -> Self {
        Self { sensitive_actions, privileged_levels }
    }

    pub fn is_sensitive(&self, action: &str) -> bool {
        self.sensitive_actions.iter().any(|a| a == action)
    }

    fn is_privileged(&self, level: &str) -> bool {
        self.privileged_levels.iter().any(|l| l == level)
    }
}

impl Default for ValidationRequiredPolicy {
    fn default() -> Self {
        let config = crate::config::ValidationConfig::default();
        Self::new(config.sensitive_actions, config.privileged_levels)
    }
}

impl Policy for ValidationRequiredPolicy {
    fn id(&self) -> &str {
        VALIDATION_REQUIRED_ID
    }

    fn category(&self) -> PolicyCategory {
        PolicyCategory::Governance
    }

    fn evaluate(&self, ctx: &PolicyContext) -> GaugeResult<PolicyResult> {
        if !self.is_sensitive(&ctx.action) {
            return Ok(PolicyResult::allow(
                VALIDATION_REQUIRED_ID,
                "action does not require special validation",
            ));
        }

        if self.is_privileged(&ctx.validation_level) {
            return Ok(PolicyResult::allow(
                VALIDATION_REQUIRED_ID,
                format!("action '{}' has required validation level", ctx.action),
            )
            .with_evidence("validation_level", ctx.validation_level.as_str()));
        }

        debug!(action = %ctx.action, level = %ctx.validation_level, "sensitive action lacks validation");
        let required = self.privileged_levels.first().cloned().unwrap_or_default();
        Ok(PolicyResult::defer(
            VALIDATION_REQUIRED_ID,
            format!("action '{}' requires validation", ctx.action),
        )
        .with_evidence("required_level", required)
        .with_evidence("current_level", ctx.validation_level.as_str())
        .escalated())
    }
}

// ── Critical resource approval ───────────────────────────────────────────────

/// Protected resources need `metadata.approved` to be truthy.
#[derive(Debug, Clone)]
pub struct CriticalResourcePolicy {
    protected_resources: Vec<String>,
}

impl CriticalResourcePolicy {
    pub fn new(protected_resources: Vec<String>) -> Self {
        Self { protected_resources }
    }

    pub fn is_protected(&self, resource: &str) -> bool {
        self.protected_resources.iter().any(|r| r == resource)
    }
}

impl Default for CriticalResourcePolicy {
    fn default() -> Self {
        Self::new(crate::config::ApprovalConfig::default().protected_resources)
    }
}

impl Policy for CriticalResourcePolicy {
    fn id(&self) -> &str {
        CRITICAL_RESOURCE_ID
    }

    fn category(&self) -> PolicyCategory {
        PolicyCategory::Security
    }

    fn evaluate(&self, ctx: &PolicyContext) -> GaugeResult<PolicyResult> {
        if !self.is_protected(&ctx.resource) {
            return Ok(PolicyResult::allow(
                CRITICAL_RESOURCE_ID,
                "resource does not require approval",
            ));
        }

        if ctx.metadata_flag(APPROVED_KEY) {
            let approver = ctx.metadata.get(APPROVER_KEY).cloned().unwrap_or(Value::Null);
            return Ok(PolicyResult::allow(
                CRITICAL_RESOURCE_ID,
                format!("approval obtained for resource '{}'", ctx.resource),
            )
            .with_evidence("approver", approver));
        }

        Ok(PolicyResult::deny(
            CRITICAL_RESOURCE_ID,
            format!("resource '{}' requires explicit approval", ctx.resource),
        )
        .with_evidence("resource", ctx.resource.as_str())
        .escalated())
    }
}

// ── Always audit ─────────────────────────────────────────────────────────────

/// Never blocks; records who did what to which resource, and when.
#[derive(Debug, Clone, Default)]
pub struct AuditTrailPolicy;

impl Policy for AuditTrailPolicy {
    fn id(&self) -> &str {
        AUDIT_TRAIL_ID
    }

    fn category(&self) -> PolicyCategory {
        PolicyCategory::Compliance
    }

    fn evaluate(&self, ctx: &PolicyContext) -> GaugeResult<PolicyResult> {
        Ok(PolicyResult::audit(AUDIT_TRAIL_ID, "operation logged for evidence bundle")
            .with_evidence("actor", ctx.actor.as_str())
            .with_evidence("action", ctx.action.as_str())
            .with_evidence("resource", ctx.resource.as_str())
            .with_evidence("timestamp", ctx.timestamp.to_rfc3339()))
    }
}
