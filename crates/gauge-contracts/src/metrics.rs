//! Component metric and validation pass types.
//!
//! These are the inputs to the score aggregator. Both are immutable once
//! built; the aggregator only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GaugeError, GaugeResult};

/// Quality signals for one monitored subsystem.
///
/// Every dimension must lie in `[0.0, 1.0]`. Use [`ComponentMetrics::new`]
/// to build a checked value; values deserialized from a manifest should be
/// passed through [`ComponentMetrics::validate`] (the aggregator does this).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentMetrics {
    /// Unique name of the subsystem within one aggregation run.
    pub name: String,
    /// Internal consistency.
    pub coherence: f64,
    /// Alignment with governance.
    pub alignment: f64,
    /// Progress rate.
    pub velocity: f64,
    /// Operational stability.
    pub stability: f64,
    /// Documentation / evidence completeness.
    pub evidence_score: f64,
}

impl ComponentMetrics {
    /// Build a metrics vector, rejecting any dimension outside `[0.0, 1.0]`.
    pub fn new(
        name: impl Into<String>,
        coherence: f64,
        alignment: f64,
        velocity: f64,
        stability: f64,
        evidence_score: f64,
    ) -> GaugeResult<Self> {
        let metrics = Self {
            name: name.into(),
            coherence,
            alignment,
            velocity,
            stability,
            evidence_score,
        };
        metrics.validate()?;
        Ok(metrics)
    }

    /// Build a metrics vector with the same value in all five dimensions.
    pub fn uniform(name: impl Into<String>, value: f64) -> GaugeResult<Self> {
        Self::new(name, value, value, value, value, value)
    }

    /// Check the name is non-empty and every dimension is a finite value in
    /// `[0.0, 1.0]`.
    pub fn validate(&self) -> GaugeResult<()> {
        if self.name.trim().is_empty() {
            return Err(GaugeError::invalid_input("component name must not be empty"));
        }
        for (dimension, value) in self.dimensions() {
            check_unit_interval(&format!("component '{}' {}", self.name, dimension), value)?;
        }
        Ok(())
    }

    /// The five dimensions paired with their field names, in declaration order.
    pub fn dimensions(&self) -> [(&'static str, f64); 5] {
        [
            ("coherence", self.coherence),
            ("alignment", self.alignment),
            ("velocity", self.velocity),
            ("stability", self.stability),
            ("evidence_score", self.evidence_score),
        ]
    }
}

/// The tier of a validation pass, from least to most authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    /// The owning team checked its own work.
    #[serde(rename = "self")]
    SelfAssessment,
    /// Reviewed by a peer team.
    Peer,
    /// Reviewed by an independent party.
    External,
    /// Signed off by the final authority.
    Final,
}

impl ValidationLevel {
    /// The lowercase tag used in configuration and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::SelfAssessment => "self",
            ValidationLevel::Peer => "peer",
            ValidationLevel::External => "external",
            ValidationLevel::Final => "final",
        }
    }
}

impl std::fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub level: ValidationLevel,
    pub validator_id: String,
    pub timestamp: DateTime<Utc>,
    pub passed: bool,
    /// Validator's own score for the pass, in `[0.0, 1.0]`.
    pub score: f64,
    #[serde(default)]
    pub notes: String,
}

impl ValidationRecord {
    /// Record a validation pass stamped with the current time.
    pub fn new(
        level: ValidationLevel,
        validator_id: impl Into<String>,
        passed: bool,
        score: f64,
    ) -> GaugeResult<Self> {
        let record = Self {
            level,
            validator_id: validator_id.into(),
            timestamp: Utc::now(),
            passed,
            score,
            notes: String::new(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Attach free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Check the validator id is present and the score is in `[0.0, 1.0]`.
    pub fn validate(&self) -> GaugeResult<()> {
        if self.validator_id.trim().is_empty() {
            return Err(GaugeError::invalid_input("validator_id must not be empty"));
        }
        check_unit_interval(&format!("validation '{}' score", self.validator_id), self.score)
    }
}

fn check_unit_interval(label: &str, value: f64) -> GaugeResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(GaugeError::invalid_input(format!(
            "{label} must be within [0.0, 1.0], got {value}"
        )));
    }
    Ok(())
}
