//! Scoring configuration.
//!
//! A `ScoringConfig` is read from a TOML (or YAML) manifest, or taken from
//! the built-in defaults when no manifest is supplied. Every constructor
//! validates the document so an aggregator never runs against an
//! inconsistent threshold ordering.
//!
//! Example manifest:
//! ```toml
//! version = "1.0.0"
//! readiness_threshold = 0.7
//! min_pass_rate = 0.8
//! required_validations = ["self", "peer", "external"]
//!
//! [thresholds]
//! critical = 0.3
//! low = 0.5
//! nominal = 0.7
//! optimal = 0.9
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gauge_contracts::{
    error::{GaugeError, GaugeResult},
    metrics::ValidationLevel,
};

/// Exclusive upper bounds of the four lower bands.
///
/// A score below `critical` is critical, below `low` is low, and so on;
/// anything at or above `optimal` is peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub critical: f64,
    pub low: f64,
    pub nominal: f64,
    pub optimal: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            critical: 0.3,
            low: 0.5,
            nominal: 0.7,
            optimal: 0.9,
        }
    }
}

impl BandThresholds {
    /// Thresholds in ascending order, paired with their names.
    pub fn ordered(&self) -> [(&'static str, f64); 4] {
        [
            ("critical", self.critical),
            ("low", self.low),
            ("nominal", self.nominal),
            ("optimal", self.optimal),
        ]
    }

    /// Every threshold must be finite, within `[0.0, 1.0]`, and strictly
    /// greater than the one before it.
    pub fn validate(&self) -> GaugeResult<()> {
        let ordered = self.ordered();
        for (name, value) in ordered {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(GaugeError::config(format!(
                    "threshold '{name}' must be within [0.0, 1.0], got {value}"
                )));
            }
        }
        for pair in ordered.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if lower >= upper {
                return Err(GaugeError::config(format!(
                    "thresholds must be strictly ascending: {lower_name} ({lower}) >= {upper_name} ({upper})"
                )));
            }
        }
        Ok(())
    }
}

/// The full scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Version tag copied into every report.
    pub version: String,
    pub thresholds: BandThresholds,
    /// Minimum final score for `ready_for_final_review`.
    pub readiness_threshold: f64,
    /// Minimum validation pass rate for `ready_for_final_review`.
    pub min_pass_rate: f64,
    /// Source-level weights for multi-source scoring. Carried through but not
    /// used by the fixed per-component formula.
    pub weights: BTreeMap<String, f64>,
    /// Validation levels a release is expected to collect.
    pub required_validations: Vec<ValidationLevel>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = [
            ("governance", 0.30),
            ("architecture", 0.25),
            ("implementation", 0.25),
            ("validation", 0.20),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            version: "1.0.0".to_string(),
            thresholds: BandThresholds::default(),
            readiness_threshold: 0.7,
            min_pass_rate: 0.8,
            weights,
            required_validations: vec![
                ValidationLevel::SelfAssessment,
                ValidationLevel::Peer,
                ValidationLevel::External,
            ],
        }
    }
}

impl ScoringConfig {
    /// Parse `s` as a TOML manifest and validate it.
    pub fn from_toml_str(s: &str) -> GaugeResult<Self> {
        let config: ScoringConfig = toml::from_str(s)
            .map_err(|e| GaugeError::config(format!("failed to parse scoring TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse `s` as a YAML manifest and validate it.
    pub fn from_yaml_str(s: &str) -> GaugeResult<Self> {
        let config: ScoringConfig = serde_yaml::from_str(s)
            .map_err(|e| GaugeError::config(format!("failed to parse scoring YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a manifest from disk. Files ending in `.yaml` or `.yml` are parsed
    /// as YAML, everything else as TOML.
    pub fn from_file(path: &Path) -> GaugeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GaugeError::config(format!("failed to read manifest '{}': {e}", path.display()))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    /// Load from `path` when given, otherwise fall back to the defaults.
    pub fn load(path: Option<&Path>) -> GaugeResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject configurations the aggregator cannot evaluate consistently.
    pub fn validate(&self) -> GaugeResult<()> {
        self.thresholds.validate()?;
        for (name, value) in [
            ("readiness_threshold", self.readiness_threshold),
            ("min_pass_rate", self.min_pass_rate),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(GaugeError::config(format!(
                    "{name} must be within [0.0, 1.0], got {value}"
                )));
            }
        }
        Ok(())
    }
}
