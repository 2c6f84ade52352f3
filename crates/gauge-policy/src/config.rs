//! Policy set configuration schema.
//!
//! A `PolicySetConfig` is deserialized from TOML and parameterizes the four
//! default policies. Every table and key is optional; anything omitted keeps
//! its built-in default. A policy with `enabled = false` is still registered
//! (so it keeps its position) but skipped during evaluation.
//!
//! Example:
//! ```toml
//! [threshold]
//! min_score = 0.6
//!
//! [validation]
//! sensitive_actions = ["deploy_production", "rotate_keys"]
//! privileged_levels = ["external", "final-authority"]
//!
//! [approval]
//! protected_resources = ["security_config"]
//!
//! [audit]
//! enabled = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use gauge_contracts::error::{GaugeError, GaugeResult};

fn enabled() -> bool {
    true
}

/// Parameters for the score threshold policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Minimum `current_score` that is allowed.
    #[serde(default = "ThresholdConfig::default_min_score")]
    pub min_score: f64,
}

impl ThresholdConfig {
    fn default_min_score() -> f64 {
        0.5
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { enabled: true, min_score: Self::default_min_score() }
    }
}

/// Parameters for the validation requirement policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Actions that need a privileged validation level.
    #[serde(default = "ValidationConfig::default_sensitive_actions")]
    pub sensitive_actions: Vec<String>,
    /// Validation levels that satisfy a sensitive action.
    #[serde(default = "ValidationConfig::default_privileged_levels")]
    pub privileged_levels: Vec<String>,
}

impl ValidationConfig {
    fn default_sensitive_actions() -> Vec<String> {
        ["deploy_production", "modify_governance", "update_architecture", "final_authority_decision"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn default_privileged_levels() -> Vec<String> {
        ["external", "final-authority"].into_iter().map(String::from).collect()
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitive_actions: Self::default_sensitive_actions(),
            privileged_levels: Self::default_privileged_levels(),
        }
    }
}

/// Parameters for the critical resource approval policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Resources that need explicit approval.
    #[serde(default = "ApprovalConfig::default_protected_resources")]
    pub protected_resources: Vec<String>,
}

impl ApprovalConfig {
    fn default_protected_resources() -> Vec<String> {
        ["governance_policy", "system_architecture", "security_config", "release_promotion"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self { enabled: true, protected_resources: Self::default_protected_resources() }
    }
}

/// Parameters for the always-audit policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// The top-level structure deserialized from a TOML policy file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySetConfig {
    #[serde(default)]
    pub threshold: ThresholdConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub approval: ApprovalConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

impl PolicySetConfig {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `GaugeError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or carries out-of-range values.
    pub fn from_toml_str(s: &str) -> GaugeResult<Self> {
        let config: PolicySetConfig = toml::from_str(s)
            .map_err(|e| GaugeError::config(format!("failed to parse policy TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML policy configuration.
    pub fn from_file(path: &Path) -> GaugeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GaugeError::config(format!("failed to read policy file '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> GaugeResult<()> {
        let min = self.threshold.min_score;
        if !min.is_finite() || !(0.0..=1.0).contains(&min) {
            return Err(GaugeError::config(format!(
                "threshold.min_score must be within [0.0, 1.0], got {min}"
            )));
        }
        for (key, list) in [
            ("validation.sensitive_actions", &self.validation.sensitive_actions),
            ("validation.privileged_levels", &self.validation.privileged_levels),
            ("approval.protected_resources", &self.approval.protected_resources),
        ] {
            if list.iter().any(|entry| entry.trim().is_empty()) {
                return Err(GaugeError::config(format!("{key} must not contain empty entries")));
            }
        }
        Ok(())
    }
}
