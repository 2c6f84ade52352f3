//! # gauge-score
//!
//! Reduces per-component quality metrics and validation passes into a single
//! score in `[0.0, 1.0]`, an operational [`Band`](gauge_contracts::report::Band)
//! and a readiness flag.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use gauge_score::{ScoreAggregator, ScoringConfig};
//!
//! let mut aggregator = ScoreAggregator::new(ScoringConfig::from_file(path)?)?;
//! aggregator.add_component(ComponentMetrics::uniform("api", 0.82)?);
//! let report = aggregator.compute()?;
//! println!("{} ({})", report.total_score, report.band);
//! ```
//!
//! Aggregation is a pure function of its inputs and configuration; the only
//! non-deterministic report field is the timestamp.

pub mod aggregator;
pub mod config;

#[cfg(test)]
mod proptest;

pub use aggregator::{
    aggregate, classify_band, compute_component_frequency, validation_multiplier,
    validation_pass_rate, ScoreAggregator,
};
pub use config::{BandThresholds, ScoringConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
