//! Score aggregation.
//!
//! Aggregation algorithm:
//!
//! 1. Each component's frequency is a fixed convex combination of its five
//!    dimensions (`compute_component_frequency`).
//! 2. The raw total is the mean of those frequencies, or 0.0 with no
//!    components.
//! 3. The raw total is attenuated by `0.8 + 0.2 * pass_rate`, where
//!    `pass_rate` is the fraction of passing validations (0.0 with none).
//! 4. The unrounded product is classified into a band and checked against
//!    the readiness gates; only the reported figures are rounded.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};

use gauge_contracts::{
    error::{GaugeError, GaugeResult},
    metrics::{ComponentMetrics, ValidationLevel, ValidationRecord},
    report::{Band, ComponentScore, FrequencyReport},
};

use crate::config::{BandThresholds, ScoringConfig};

pub const WEIGHT_COHERENCE: f64 = 0.25;
pub const WEIGHT_ALIGNMENT: f64 = 0.25;
pub const WEIGHT_VELOCITY: f64 = 0.15;
pub const WEIGHT_STABILITY: f64 = 0.20;
pub const WEIGHT_EVIDENCE: f64 = 0.15;

/// Multiplier applied when no validation passed.
pub const MULTIPLIER_FLOOR: f64 = 0.8;
/// Share of the multiplier earned by a perfect pass rate.
pub const MULTIPLIER_SPAN: f64 = 0.2;

/// Weighted frequency of one component.
///
/// Dimensions outside `[0.0, 1.0]` are not rejected here; they propagate
/// arithmetically. `aggregate` validates before calling this.
pub fn compute_component_frequency(metrics: &ComponentMetrics) -> f64 {
    metrics.coherence * WEIGHT_COHERENCE
        + metrics.alignment * WEIGHT_ALIGNMENT
        + metrics.velocity * WEIGHT_VELOCITY
        + metrics.stability * WEIGHT_STABILITY
        + metrics.evidence_score * WEIGHT_EVIDENCE
}

/// Fraction of validations that passed, 0.0 for an empty list.
pub fn validation_pass_rate(validations: &[ValidationRecord]) -> f64 {
    if validations.is_empty() {
        return 0.0;
    }
    let passed = validations.iter().filter(|v| v.passed).count();
    passed as f64 / validations.len() as f64
}

/// `0.8 + 0.2 * pass_rate`; always within `[0.8, 1.0]` for a valid rate.
pub fn validation_multiplier(pass_rate: f64) -> f64 {
    MULTIPLIER_FLOOR + MULTIPLIER_SPAN * pass_rate
}

/// Classify `score` with ascending exclusive upper bounds; first match wins.
pub fn classify_band(score: f64, thresholds: &BandThresholds) -> Band {
    if score < thresholds.critical {
        Band::Critical
    } else if score < thresholds.low {
        Band::Low
    } else if score < thresholds.nominal {
        Band::Nominal
    } else if score < thresholds.optimal {
        Band::Optimal
    } else {
        Band::Peak
    }
}

/// Round to four decimal places for reporting.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Aggregate `components` and `validations` under `config`.
///
/// Validates the configuration and every input first; nothing is clamped.
pub fn aggregate(
    components: &[ComponentMetrics],
    validations: &[ValidationRecord],
    config: &ScoringConfig,
) -> GaugeResult<FrequencyReport> {
    config.validate()?;
    build_report(components, validations, config)
}

fn validate_inputs(components: &[ComponentMetrics], validations: &[ValidationRecord]) -> GaugeResult<()> {
    let mut seen = HashSet::new();
    for component in components {
        component.validate()?;
        if !seen.insert(component.name.as_str()) {
            return Err(GaugeError::invalid_input(format!(
                "component name '{}' appears more than once",
                component.name
            )));
        }
    }
    for validation in validations {
        validation.validate()?;
    }
    Ok(())
}

fn missing_validations(validations: &[ValidationRecord], required: &[ValidationLevel]) -> Vec<ValidationLevel> {
    required
        .iter()
        .copied()
        .filter(|level| !validations.iter().any(|v| v.passed && v.level == *level))
        .collect()
}

fn build_report(
    components: &[ComponentMetrics],
    validations: &[ValidationRecord],
    config: &ScoringConfig,
) -> GaugeResult<FrequencyReport> {
    validate_inputs(components, validations)?;

    let mut frequencies = Vec::with_capacity(components.len());
    let mut scores = Vec::with_capacity(components.len());
    for component in components {
        let frequency = compute_component_frequency(component);
        debug!(component = %component.name, frequency, "component frequency computed");
        frequencies.push(frequency);
        scores.push(ComponentScore {
            name: component.name.clone(),
            frequency: round4(frequency),
            metrics: component.clone(),
        });
    }

    let raw_total = if frequencies.is_empty() {
        0.0
    } else {
        frequencies.iter().sum::<f64>() / frequencies.len() as f64
    };

    let pass_rate = validation_pass_rate(validations);
    let multiplier = validation_multiplier(pass_rate);
    let final_score = raw_total * multiplier;

    let band = classify_band(final_score, &config.thresholds);
    let ready = final_score >= config.readiness_threshold && pass_rate >= config.min_pass_rate;

    info!(
        components = components.len(),
        validations = validations.len(),
        raw_total,
        multiplier,
        final_score,
        band = %band,
        ready,
        "aggregate score computed"
    );

    Ok(FrequencyReport {
        timestamp: Utc::now(),
        version: config.version.clone(),
        total_score: round4(final_score),
        band,
        components: scores,
        validations: validations.to_vec(),
        pass_rate: round4(pass_rate),
        validation_multiplier: round4(multiplier),
        ready_for_final_review: ready,
        recommendation: band.recommendation().to_string(),
        missing_validations: missing_validations(validations, &config.required_validations),
    })
}

/// Accumulates components and validation passes, then aggregates them.
///
/// The configuration is validated once, at construction.
///
/// ```rust,ignore
/// let mut aggregator = ScoreAggregator::with_defaults();
/// aggregator.add_component(ComponentMetrics::uniform("core", 0.8)?);
/// let report = aggregator.compute()?;
/// ```
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    config: ScoringConfig,
    components: Vec<ComponentMetrics>,
    validations: Vec<ValidationRecord>,
}

impl ScoreAggregator {
    /// Returns `GaugeError::ConfigError` if `config` is inconsistent.
    pub fn new(config: ScoringConfig) -> GaugeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            components: Vec::new(),
            validations: Vec::new(),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: ScoringConfig::default(),
            components: Vec::new(),
            validations: Vec::new(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn add_component(&mut self, component: ComponentMetrics) {
        self.components.push(component);
    }

    pub fn add_validation(&mut self, validation: ValidationRecord) {
        self.validations.push(validation);
    }

    pub fn components(&self) -> &[ComponentMetrics] {
        &self.components
    }

    pub fn validations(&self) -> &[ValidationRecord] {
        &self.validations
    }

    /// Aggregate the accumulated working lists.
    pub fn compute(&self) -> GaugeResult<FrequencyReport> {
        build_report(&self.components, &self.validations, &self.config)
    }

    /// Aggregate explicit lists under this aggregator's configuration,
    /// ignoring the working lists.
    pub fn aggregate(
        &self,
        components: &[ComponentMetrics],
        validations: &[ValidationRecord],
    ) -> GaugeResult<FrequencyReport> {
        build_report(components, validations, &self.config)
    }
}
