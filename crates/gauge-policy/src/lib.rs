//! # gauge-policy
//!
//! The default governance policy set for the Gauge engine.
//!
//! ## Overview
//!
//! Four independent policies, registered in this order:
//!
//! 1. [`ScoreThresholdPolicy`]: deny below a minimum aggregate score
//! 2. [`ValidationRequiredPolicy`]: defer sensitive actions lacking a
//!    privileged validation level
//! 3. [`CriticalResourcePolicy`]: deny protected resources without approval
//! 4. [`AuditTrailPolicy`]: always audit
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use gauge_policy::{engine_from_config, PolicySetConfig};
//!
//! let engine = engine_from_config(&PolicySetConfig::from_file(Path::new("policies.toml"))?)?;
//! let outcome = engine.check(&ctx);
//! ```

pub mod config;
pub mod policies;

use tracing::info;

use gauge_contracts::error::GaugeResult;
use gauge_core::PolicyEngine;

pub use config::{ApprovalConfig, AuditConfig, PolicySetConfig, ThresholdConfig, ValidationConfig};
pub use policies::{
    AuditTrailPolicy, CriticalResourcePolicy, ScoreThresholdPolicy, ValidationRequiredPolicy,
    AUDIT_TRAIL_ID, CRITICAL_RESOURCE_ID, SCORE_THRESHOLD_ID, VALIDATION_REQUIRED_ID,
};

/// An engine with the four default policies at their default settings.
pub fn default_engine() -> PolicyEngine {
    let mut engine = PolicyEngine::new();
    engine.register_policy(Box::new(ScoreThresholdPolicy::default()));
    engine.register_policy(Box::new(ValidationRequiredPolicy::default()));
    engine.register_policy(Box::new(CriticalResourcePolicy::default()));
    engine.register_policy(Box::new(AuditTrailPolicy));
    engine
}

/// Build the default policy set from `config`.
///
/// Returns `GaugeError::ConfigError` if `config` fails validation. Policies
/// disabled in `config` are registered and then disabled.
pub fn engine_from_config(config: &PolicySetConfig) -> GaugeResult<PolicyEngine> {
    config.validate()?;

    let mut engine = PolicyEngine::new();
    engine.register_policy(Box::new(ScoreThresholdPolicy::new(config.threshold.min_score)));
    engine.register_policy(Box::new(ValidationRequiredPolicy::new(
        config.validation.sensitive_actions.clone(),
        config.validation.privileged_levels.clone(),
    )));
    engine.register_policy(Box::new(CriticalResourcePolicy::new(
        config.approval.protected_resources.clone(),
    )));
    engine.register_policy(Box::new(AuditTrailPolicy));

    for (policy_id, enabled) in [
        (SCORE_THRESHOLD_ID, config.threshold.enabled),
        (VALIDATION_REQUIRED_ID, config.validation.enabled),
        (CRITICAL_RESOURCE_ID, config.approval.enabled),
        (AUDIT_TRAIL_ID, config.audit.enabled),
    ] {
        if !enabled {
            engine.set_enabled(policy_id, false)?;
        }
    }

    info!(policies = engine.len(), enabled = engine.enabled_count(), "policy engine built from config");
    Ok(engine)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use gauge_contracts::{
        error::{GaugeError, GaugeResult},
        policy::{Decision, PolicyContext, PolicyResult},
    };
    use gauge_core::{DecisionHook, Hook, Policy};

    use crate::{
        default_engine, engine_from_config, AuditTrailPolicy, CriticalResourcePolicy, PolicySetConfig,
        ScoreThresholdPolicy, ValidationRequiredPolicy, AUDIT_TRAIL_ID, CRITICAL_RESOURCE_ID,
        SCORE_THRESHOLD_ID, VALIDATION_REQUIRED_ID,
    };

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn ctx(action: &str, resource: &str, score: f64, level: &str) -> PolicyContext {
        PolicyContext::new("developer-001", action, resource)
            .with_score(score)
            .with_validation_level(level)
    }

    fn result_for<'a>(results: &'a [PolicyResult], policy_id: &str) -> &'a PolicyResult {
        results
            .iter()
            .find(|r| r.policy_id == policy_id)
            .unwrap_or_else(|| panic!("no result for {policy_id}"))
    }

    #[derive(Clone, Default)]
    struct CountingHook(Arc<AtomicUsize>);

    impl DecisionHook for CountingHook {
        fn on_decision(&self, _policy: &dyn Policy, _ctx: &PolicyContext, _result: &PolicyResult) -> GaugeResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    // ── Individual policies ──────────────────────────────────────────────────

    #[test]
    fn test_score_threshold_boundary() {
        let policy = ScoreThresholdPolicy::default();

        let at = policy.evaluate(&ctx("x", "y", 0.5, "none")).unwrap();
        assert_eq!(at.decision, Decision::Allow);
        assert_eq!(at.evidence["score"], 0.5);
        assert_eq!(at.evidence["threshold"], 0.5);

        let below = policy.evaluate(&ctx("x", "y", 0.4999, "none")).unwrap();
        assert_eq!(below.decision, Decision::Deny);
        assert!(below.reason.contains("below threshold"));
        assert!(!below.requires_escalation);
    }

    #[test]
    fn test_validation_not_required_for_routine_action() {
        let result = ValidationRequiredPolicy::default()
            .evaluate(&ctx("update_code", "feature-branch", 0.8, "none"))
            .unwrap();
        assert_eq!(result.decision, Decision::Allow);
        assert!(result.evidence.is_empty());
    }

    #[test]
    fn test_validation_privileged_levels_allow() {
        let policy = ValidationRequiredPolicy::default();
        for level in ["external", "final-authority"] {
            let result = policy.evaluate(&ctx("modify_governance", "x", 0.8, level)).unwrap();
            assert_eq!(result.decision, Decision::Allow, "level {level}");
            assert_eq!(result.evidence["validation_level"], level);
        }
    }

    #[test]
    fn test_critical_resource_with_approval() {
        let context = ctx("update_code", "security_config", 0.8, "none")
            .with_metadata("approved", true)
            .with_metadata("approver", "authority-001");
        let result = CriticalResourcePolicy::default().evaluate(&context).unwrap();
        assert_eq!(result.decision, Decision::Allow);
        assert_eq!(result.evidence["approver"], "authority-001");
    }

    #[test]
    fn test_unprotected_resource_allows() {
        let result = CriticalResourcePolicy::default()
            .evaluate(&ctx("update_code", "feature-branch", 0.8, "none"))
            .unwrap();
        assert_eq!(result.decision, Decision::Allow);
        assert!(!result.requires_escalation);
    }

    #[test]
    fn test_audit_policy_records_context() {
        let context = ctx("update_code", "feature-branch", 0.1, "none");
        let result = AuditTrailPolicy.evaluate(&context).unwrap();
        assert_eq!(result.decision, Decision::Audit);
        assert_eq!(result.evidence["actor"], "developer-001");
        assert_eq!(result.evidence["action"], "update_code");
        assert_eq!(result.evidence["resource"], "feature-branch");
        assert_eq!(result.evidence["timestamp"], context.timestamp.to_rfc3339());
    }

    // ── Default engine scenarios ─────────────────────────────────────────────

    #[test]
    fn test_default_engine_order() {
        let engine = default_engine();
        assert_eq!(
            engine.policy_ids(),
            vec![SCORE_THRESHOLD_ID, VALIDATION_REQUIRED_ID, CRITICAL_RESOURCE_ID, AUDIT_TRAIL_ID]
        );
    }

    /// Production deploy at peer level: deferred with escalation, still
    /// allowed, escalation hook fires exactly once.
    #[test]
    fn test_sensitive_action_without_privileged_validation_defers() {
        let escalations = CountingHook::default();
        let mut engine = default_engine();
        engine.register_hook(Hook::OnEscalationRequired(Box::new(escalations.clone())));

        let outcome = engine.check(&ctx("deploy_production", "feature-branch", 0.8, "peer"));

        let validation = result_for(&outcome.results, VALIDATION_REQUIRED_ID);
        assert_eq!(validation.decision, Decision::Defer);
        assert!(validation.requires_escalation);
        assert_eq!(validation.evidence["required_level"], "external");
        assert_eq!(validation.evidence["current_level"], "peer");
        assert!(outcome.allowed, "defer must not block");
        assert_eq!(escalations.0.load(Ordering::SeqCst), 1);
    }

    /// Protected resource without approval is denied.
    #[test]
    fn test_protected_resource_without_approval_denies() {
        let denials = CountingHook::default();
        let mut engine = default_engine();
        engine.register_hook(Hook::OnDeny(Box::new(denials.clone())));

        let context = ctx("update_code", "security_config", 0.8, "none").with_metadata("approved", false);
        let outcome = engine.check(&context);

        let approval = result_for(&outcome.results, CRITICAL_RESOURCE_ID);
        assert_eq!(approval.decision, Decision::Deny);
        assert!(approval.requires_escalation);
        assert_eq!(approval.evidence["resource"], "security_config");
        assert!(!outcome.allowed);
        assert_eq!(outcome.results.len(), 4, "denied checks still return every result");
        assert_eq!(denials.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_routine_operation_is_allowed() {
        let outcome = default_engine().check(&ctx("update_code", "feature-branch", 0.75, "peer"));
        assert!(outcome.allowed);
        let decisions: Vec<Decision> = outcome.results.iter().map(|r| r.decision).collect();
        assert_eq!(decisions, vec![Decision::Allow, Decision::Allow, Decision::Allow, Decision::Audit]);
    }

    #[test]
    fn test_approved_release_promotion_is_allowed() {
        let context = ctx("deploy_production", "release_promotion", 0.85, "final-authority")
            .with_metadata("approved", true)
            .with_metadata("approver", "authority-001");
        let outcome = default_engine().check(&context);
        assert!(outcome.allowed);
        assert!(!outcome.requires_escalation());
    }

    #[test]
    fn test_low_score_and_missing_approval_report_both_denials() {
        let outcome = default_engine().check(&ctx("update_code", "governance_policy", 0.2, "none"));
        let denied: Vec<&str> = outcome.denials().map(|r| r.policy_id.as_str()).collect();
        assert_eq!(denied, vec![SCORE_THRESHOLD_ID, CRITICAL_RESOURCE_ID]);
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    #[test]
    fn test_config_overrides_and_disables() {
        let toml = r#"
            [threshold]
            min_score = 0.9

            [validation]
            sensitive_actions = ["rotate_keys"]

            [audit]
            enabled = false
        "#;
        let config = PolicySetConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.validation.privileged_levels, vec!["external", "final-authority"]);

        let engine = engine_from_config(&config).unwrap();
        assert_eq!(engine.len(), 4);
        assert_eq!(engine.enabled_count(), 3);
        assert_eq!(engine.is_enabled(AUDIT_TRAIL_ID), Some(false));

        let outcome = engine.check(&ctx("rotate_keys", "feature-branch", 0.85, "peer"));
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(result_for(&outcome.results, SCORE_THRESHOLD_ID).decision, Decision::Deny);
        assert_eq!(result_for(&outcome.results, VALIDATION_REQUIRED_ID).decision, Decision::Defer);
    }

    #[test]
    fn test_empty_config_matches_defaults() {
        assert_eq!(PolicySetConfig::from_toml_str("").unwrap(), PolicySetConfig::default());
    }

    #[test]
    fn test_out_of_range_min_score_is_config_error() {
        match PolicySetConfig::from_toml_str("[threshold]\nmin_score = 1.5\n") {
            Err(GaugeError::ConfigError { reason }) => assert!(reason.contains("min_score")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_policy_toml() {
        match PolicySetConfig::from_toml_str("this is not valid toml ][[[") {
            Err(GaugeError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse policy TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_list_entry_is_rejected() {
        let config = PolicySetConfig::from_toml_str("[approval]\nprotected_resources = [\"\"]\n");
        assert!(config.is_err());
    }

    /// The default set denies a context with no action or resource even
    /// when the score is healthy.
    #[test]
    fn test_default_engine_denies_blank_context() {
        let outcome = default_engine().check(&ctx("", "", 0.9, "final-authority"));

        assert!(!outcome.allowed);
        assert_eq!(outcome.results.len(), 4);
        assert!(outcome.results.iter().all(|r| r.decision == Decision::Deny));
        assert_eq!(result_for(&outcome.results, AUDIT_TRAIL_ID).decision, Decision::Deny);
    }
}
