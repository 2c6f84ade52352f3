//! Property-based tests for score aggregation.
//!
//! These tests use proptest to verify invariants around:
//! - Component frequency staying within the unit interval
//! - Validation multiplier bounds
//! - Band classification being a total, contiguous partition
//! - Determinism of repeated aggregation

use gauge_contracts::{
    metrics::{ComponentMetrics, ValidationLevel, ValidationRecord},
    report::Band,
};
use proptest::prelude::*;

use crate::{
    aggregate, classify_band, compute_component_frequency, validation_multiplier,
    validation_pass_rate, BandThresholds, ScoringConfig,
};

// ============================================================================
// Strategies
// ============================================================================

fn arb_metrics() -> impl Strategy<Value = ComponentMetrics> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(
        |(c, a, v, s, e)| ComponentMetrics {
            name: "component".to_string(),
            coherence: c,
            alignment: a,
            velocity: v,
            stability: s,
            evidence_score: e,
        },
    )
}

fn arb_components() -> impl Strategy<Value = Vec<ComponentMetrics>> {
    prop::collection::vec(arb_metrics(), 0..8).prop_map(|mut components| {
        for (i, component) in components.iter_mut().enumerate() {
            component.name = format!("component-{i}");
        }
        components
    })
}

fn arb_validations() -> impl Strategy<Value = Vec<ValidationRecord>> {
    prop::collection::vec((any::<bool>(), 0.0f64..=1.0), 0..10).prop_map(|passes| {
        passes
            .into_iter()
            .enumerate()
            .map(|(i, (passed, score))| {
                ValidationRecord::new(ValidationLevel::Peer, format!("validator-{i}"), passed, score)
                    .expect("generated validation is in range")
            })
            .collect()
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn component_frequency_stays_in_unit_interval(metrics in arb_metrics()) {
        let f = compute_component_frequency(&metrics);
        prop_assert!((0.0..=1.0 + 1e-12).contains(&f), "frequency {} out of range", f);
    }

    #[test]
    fn multiplier_is_bounded(validations in arb_validations()) {
        let m = validation_multiplier(validation_pass_rate(&validations));
        prop_assert!((0.8..=1.0).contains(&m), "multiplier {} out of range", m);
        if validations.is_empty() {
            prop_assert_eq!(m, 0.8);
        }
    }

    #[test]
    fn exactly_one_band_matches(score in 0.0f64..10.0) {
        let t = BandThresholds::default();
        let matching: Vec<Band> = Band::ALL
            .into_iter()
            .filter(|band| {
                let (lower, upper) = match band {
                    Band::Critical => (0.0, t.critical),
                    Band::Low => (t.critical, t.low),
                    Band::Nominal => (t.low, t.nominal),
                    Band::Optimal => (t.nominal, t.optimal),
                    Band::Peak => (t.optimal, f64::INFINITY),
                };
                score >= lower && score < upper
            })
            .collect();
        prop_assert_eq!(matching.len(), 1);
        prop_assert_eq!(matching[0], classify_band(score, &t));
    }

    #[test]
    fn band_is_monotonic_in_score(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let t = BandThresholds::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify_band(lo, &t) <= classify_band(hi, &t));
    }

    #[test]
    fn aggregate_score_in_unit_interval_and_deterministic(
        components in arb_components(),
        validations in arb_validations(),
    ) {
        let config = ScoringConfig::default();
        let first = aggregate(&components, &validations, &config).unwrap();
        let second = aggregate(&components, &validations, &config).unwrap();

        prop_assert!((0.0..=1.0).contains(&first.total_score));
        prop_assert_eq!(first.total_score, second.total_score);
        prop_assert_eq!(first.band, second.band);
        prop_assert_eq!(first.ready_for_final_review, second.ready_for_final_review);
        prop_assert_eq!(first.components.len(), components.len());
    }
}
