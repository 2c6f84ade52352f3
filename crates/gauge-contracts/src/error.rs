//! Error types for the Gauge pipeline.
//!
//! All fallible operations return `GaugeResult<T>`. Variants carry enough
//! context to be written verbatim into an audit record or a CLI message.

use thiserror::Error;

/// The unified error type for the Gauge crates.
#[derive(Debug, Error)]
pub enum GaugeError {
    /// A caller-supplied value violated its documented range or shape.
    ///
    /// Gauge never clamps or coerces inputs. Out-of-range metrics and
    /// duplicate component names fail aggregation; a context with a blank
    /// action or resource is denied by every policy the engine runs.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A configuration document is missing, malformed, or internally
    /// inconsistent (e.g. band thresholds that are not strictly ascending).
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A policy could not produce a decision for the given context.
    ///
    /// The engine converts this into a synthetic `deny` result; it never
    /// escapes `PolicyEngine::evaluate`.
    #[error("policy '{policy_id}' failed to evaluate: {reason}")]
    PolicyEvaluation { policy_id: String, reason: String },

    /// A lifecycle hook failed. Logged by the engine, never propagated.
    #[error("hook '{event}' failed: {reason}")]
    HookFailed { event: String, reason: String },

    /// No policy with the given identifier is registered.
    #[error("no policy registered with id '{policy_id}'")]
    UnknownPolicy { policy_id: String },

    /// The audit trail could not append a record.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// An evidence bundle or report could not be written.
    #[error("export failed: {reason}")]
    ExportFailed { reason: String },
}

impl GaugeError {
    /// Shorthand for [`GaugeError::InvalidInput`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    /// Shorthand for [`GaugeError::ConfigError`].
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigError { reason: reason.into() }
    }
}

/// Convenience alias used throughout the Gauge crates.
pub type GaugeResult<T> = Result<T, GaugeError>;
