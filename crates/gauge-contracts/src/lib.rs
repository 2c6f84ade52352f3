//! # gauge-contracts
//!
//! Shared types and error definitions for the Gauge scoring and policy
//! pipeline.
//!
//! Every crate in the workspace imports from here. No business logic lives
//! in this crate. Only data definitions, constructors that validate their
//! inputs, and the error type.

pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod policy;
pub mod report;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use error::GaugeError;
    use evaluation::EvaluationRecord;
    use metrics::{ComponentMetrics, ValidationLevel, ValidationRecord};
    use policy::{is_truthy, CheckOutcome, Decision, PolicyContext, PolicyResult};
    use report::Band;

    // ── ComponentMetrics ─────────────────────────────────────────────────────

    #[test]
    fn component_metrics_accepts_unit_interval_bounds() {
        let m = ComponentMetrics::new("governance", 0.0, 1.0, 0.5, 0.25, 1.0).unwrap();
        assert_eq!(m.name, "governance");
        assert_eq!(m.dimensions()[4], ("evidence_score", 1.0));
    }

    #[test]
    fn component_metrics_rejects_out_of_range_dimension() {
        let err = ComponentMetrics::new("arch", 0.5, 1.2, 0.5, 0.5, 0.5).unwrap_err();
        match err {
            GaugeError::InvalidInput { reason } => {
                assert!(reason.contains("alignment"), "unexpected reason: {reason}");
                assert!(reason.contains("arch"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn component_metrics_rejects_nan_and_negative() {
        assert!(ComponentMetrics::new("a", f64::NAN, 0.5, 0.5, 0.5, 0.5).is_err());
        assert!(ComponentMetrics::new("a", 0.5, 0.5, -0.01, 0.5, 0.5).is_err());
    }

    #[test]
    fn component_metrics_rejects_blank_name() {
        assert!(ComponentMetrics::uniform("  ", 0.5).is_err());
    }

    // ── ValidationRecord ─────────────────────────────────────────────────────

    #[test]
    fn validation_record_checks_score_range() {
        assert!(ValidationRecord::new(ValidationLevel::Peer, "peer-1", true, 0.9).is_ok());
        assert!(ValidationRecord::new(ValidationLevel::Peer, "peer-1", true, 1.5).is_err());
        assert!(ValidationRecord::new(ValidationLevel::Peer, "", true, 0.5).is_err());
    }

    #[test]
    fn validation_level_serializes_as_short_tags() {
        assert_eq!(serde_json::to_string(&ValidationLevel::SelfAssessment).unwrap(), "\"self\"");
        assert_eq!(serde_json::to_string(&ValidationLevel::Final).unwrap(), "\"final\"");
        let level: ValidationLevel = serde_json::from_str("\"external\"").unwrap();
        assert_eq!(level, ValidationLevel::External);
    }

    // ── Band ─────────────────────────────────────────────────────────────────

    #[test]
    fn bands_are_ordered_and_have_distinct_recommendations() {
        let mut recommendations = std::collections::HashSet::new();
        for pair in Band::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for band in Band::ALL {
            assert!(recommendations.insert(band.recommendation()));
        }
        assert_eq!(Band::Critical.to_string(), "critical");
    }

    // ── PolicyContext ────────────────────────────────────────────────────────

    #[test]
    fn policy_context_defaults() {
        let ctx = PolicyContext::new("dev-1", "update_code", "feature-branch");
        assert_eq!(ctx.current_score, 0.0);
        assert_eq!(ctx.validation_level, "none");
        assert!(ctx.metadata.is_empty());
    }

    #[test]
    fn policy_context_deserializes_with_defaults() {
        let ctx: PolicyContext = serde_json::from_value(json!({
            "actor": "a",
            "action": "b",
            "resource": "c",
            "timestamp": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(ctx.validation_level, "none");
        assert_eq!(ctx.current_score, 0.0);
    }

    #[test]
    fn policy_context_rejects_blank_action_or_resource() {
        assert!(PolicyContext::new("dev", "update_code", "repo").validate().is_ok());
        // Actor is informational only.
        assert!(PolicyContext::new("", "update_code", "repo").validate().is_ok());

        let err = PolicyContext::new("dev", " ", "repo").validate().unwrap_err();
        assert!(matches!(err, GaugeError::InvalidInput { .. }));
        assert!(err.to_string().contains("action"));

        let err = PolicyContext::new("dev", "update_code", "").validate().unwrap_err();
        assert!(err.to_string().contains("resource"));
    }

    #[test]
    fn metadata_flag_uses_truthiness() {
        let ctx = PolicyContext::new("a", "b", "c")
            .with_metadata("yes", true)
            .with_metadata("no", false)
            .with_metadata("empty", "")
            .with_metadata("named", "alice")
            .with_metadata("zero", 0);
        assert!(ctx.metadata_flag("yes"));
        assert!(!ctx.metadata_flag("no"));
        assert!(!ctx.metadata_flag("empty"));
        assert!(ctx.metadata_flag("named"));
        assert!(!ctx.metadata_flag("zero"));
        assert!(!ctx.metadata_flag("missing"));
    }

    #[test]
    fn truthiness_of_containers() {
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!([1])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!({"k": null})));
        assert!(!is_truthy(&serde_json::Value::Null));
    }

    // ── PolicyResult / CheckOutcome ──────────────────────────────────────────

    #[test]
    fn check_outcome_only_deny_blocks() {
        let outcome = CheckOutcome::from_results(vec![
            PolicyResult::allow("p1", "ok"),
            PolicyResult::defer("p2", "needs review").escalated(),
            PolicyResult::audit("p3", "logged"),
        ]);
        assert!(outcome.allowed);
        assert!(outcome.requires_escalation());
        assert_eq!(outcome.denials().count(), 0);

        let outcome = CheckOutcome::from_results(vec![
            PolicyResult::allow("p1", "ok"),
            PolicyResult::deny("p2", "no"),
        ]);
        assert!(!outcome.allowed);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.denials().next().unwrap().policy_id, "p2");
    }

    #[test]
    fn decision_serializes_lowercase() {
        let result = PolicyResult::deny("POL-X", "blocked").with_evidence("score", 0.2);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["decision"], "deny");
        assert_eq!(json["evidence"]["score"], 0.2);
        assert_eq!(Decision::Audit.to_string(), "audit");
    }

    #[test]
    fn evaluation_record_derives_allowed() {
        let ctx = PolicyContext::new("a", "b", "c");
        let record = EvaluationRecord::new(&ctx, &[PolicyResult::deny("p", "no")]);
        assert!(!record.allowed);
        let record = EvaluationRecord::new(&ctx, &[PolicyResult::audit("p", "logged")]);
        assert!(record.allowed);
    }

    // ── GaugeError display messages ──────────────────────────────────────────

    #[test]
    fn error_display_messages() {
        let err = GaugeError::PolicyEvaluation {
            policy_id: "POL-1".to_string(),
            reason: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("POL-1"));
        assert!(msg.contains("boom"));

        let msg = GaugeError::config("critical >= low").to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("critical >= low"));

        let msg = GaugeError::UnknownPolicy { policy_id: "nope".to_string() }.to_string();
        assert!(msg.contains("nope"));
    }
}
