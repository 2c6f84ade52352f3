//! Built-in demo data: three components, two validation passes, and the
//! three policy scenarios run by `gauge demo`.

use gauge_contracts::{
    error::GaugeResult,
    metrics::{ComponentMetrics, ValidationLevel, ValidationRecord},
    policy::PolicyContext,
};

pub fn demo_components() -> GaugeResult<Vec<ComponentMetrics>> {
    Ok(vec![
        ComponentMetrics::new("governance", 0.85, 0.90, 0.75, 0.88, 0.82)?,
        ComponentMetrics::new("architecture", 0.78, 0.85, 0.70, 0.80, 0.75)?,
        ComponentMetrics::new("implementation", 0.72, 0.80, 0.85, 0.75, 0.70)?,
    ])
}

pub fn demo_validations() -> GaugeResult<Vec<ValidationRecord>> {
    Ok(vec![
        ValidationRecord::new(ValidationLevel::SelfAssessment, "self-check-001", true, 0.85)?
            .with_notes("Self-assessment complete"),
        ValidationRecord::new(ValidationLevel::Peer, "peer-review-alpha", true, 0.80)?
            .with_notes("Peer review passed"),
    ])
}

/// Labelled policy contexts, in the order they are run.
pub fn demo_scenarios() -> Vec<(&'static str, PolicyContext)> {
    vec![
        (
            "Normal operation with a healthy score",
            PolicyContext::new("developer-001", "update_code", "feature-branch")
                .with_score(0.75)
                .with_validation_level("peer"),
        ),
        (
            "Production deploy without approval",
            PolicyContext::new("developer-001", "deploy_production", "release_promotion")
                .with_score(0.80)
                .with_validation_level("external"),
        ),
        (
            "Production deploy with final authority approval",
            PolicyContext::new("developer-001", "deploy_production", "release_promotion")
                .with_score(0.85)
                .with_validation_level("final-authority")
                .with_metadata("approved", true)
                .with_metadata("approver", "authority-001"),
        ),
    ]
}
