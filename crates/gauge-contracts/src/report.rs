//! Aggregation output types.
//!
//! `FrequencyReport` is built once per aggregation call by `gauge-score` and
//! never mutated afterwards. Serialization to files is the bundle writer's
//! concern; these types only derive serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{ComponentMetrics, ValidationLevel, ValidationRecord};

/// Operational band an aggregate score falls into, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// System unstable.
    Critical,
    /// Needs attention.
    Low,
    /// Operating normally.
    Nominal,
    /// High performance.
    Optimal,
    /// Maximum coherence.
    Peak,
}

impl Band {
    /// All bands in ascending order.
    pub const ALL: [Band; 5] = [Band::Critical, Band::Low, Band::Nominal, Band::Optimal, Band::Peak];

    /// Lowercase label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Critical => "critical",
            Band::Low => "low",
            Band::Nominal => "nominal",
            Band::Optimal => "optimal",
            Band::Peak => "peak",
        }
    }

    /// The fixed operator guidance attached to every report in this band.
    pub fn recommendation(&self) -> &'static str {
        match self {
            Band::Critical => {
                "HALT: System requires immediate attention. Do not proceed with release."
            }
            Band::Low => "CAUTION: Address deficiencies before peer validation.",
            Band::Nominal => "PROCEED: System stable. Continue with validation pipeline.",
            Band::Optimal => "ADVANCE: Ready for final authority review.",
            Band::Peak => "EXECUTE: Maximum coherence achieved. Full speed ahead.",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-component line of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub name: String,
    /// Weighted frequency, rounded to four decimals for display.
    pub frequency: f64,
    /// The inputs the frequency was computed from.
    pub metrics: ComponentMetrics,
}

/// The complete result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyReport {
    /// Wall-clock time the report was built (UTC). The only
    /// non-deterministic field.
    pub timestamp: DateTime<Utc>,
    /// Version tag of the scoring configuration in effect.
    pub version: String,
    /// Final score, rounded to four decimals.
    pub total_score: f64,
    /// Band of the unrounded final score.
    pub band: Band,
    /// Component lines in input order.
    pub components: Vec<ComponentScore>,
    /// Validation passes as consumed.
    pub validations: Vec<ValidationRecord>,
    /// Fraction of validations that passed; 0.0 when there were none.
    pub pass_rate: f64,
    /// `0.8 + 0.2 * pass_rate`.
    pub validation_multiplier: f64,
    /// Whether the score and pass rate clear the readiness gates.
    pub ready_for_final_review: bool,
    pub recommendation: String,
    /// Required validation levels with no passing record. Informational.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_validations: Vec<ValidationLevel>,
}

impl FrequencyReport {
    /// Number of validation passes that passed.
    pub fn passed_validations(&self) -> usize {
        self.validations.iter().filter(|v| v.passed).count()
    }
}
