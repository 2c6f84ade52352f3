//! Gauge command line.
//!
//! Usage:
//!   gauge score --demo
//!   gauge score --input inputs.json --manifest scoring.toml --output evidence
//!   gauge check --action deploy_production --resource release_promotion --score 0.8
//!   gauge demo --output evidence

mod bundle;
mod demo;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gauge_audit::AuditTrail;
use gauge_contracts::{
    error::{GaugeError, GaugeResult},
    metrics::{ComponentMetrics, ValidationRecord},
    policy::{CheckOutcome, PolicyContext},
    report::FrequencyReport,
};
use gauge_core::Hook;
use gauge_policy::{default_engine, engine_from_config, PolicySetConfig};
use gauge_score::{ScoreAggregator, ScoringConfig};

/// Exit status of `gauge check` when the context is denied.
const EXIT_DENIED: i32 = 2;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Gauge: score system health and gate actions on governance policies.
#[derive(Parser)]
#[command(name = "gauge", version, about = "Score components, check policies, export evidence bundles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate component metrics into a frequency report.
    Score {
        /// Scoring configuration (TOML, or YAML by extension).
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Components and validations to score (JSON, or YAML by extension).
        #[arg(long, conflicts_with = "demo")]
        input: Option<PathBuf>,
        /// Score the built-in demo components.
        #[arg(long)]
        demo: bool,
        /// Print the report as JSON instead of writing a bundle.
        #[arg(long)]
        json: bool,
        /// Directory the evidence bundle is written under.
        #[arg(long, default_value = "evidence")]
        output: PathBuf,
    },
    /// Evaluate one context against the policy set.
    Check {
        #[arg(long, default_value = "cli")]
        actor: String,
        #[arg(long)]
        action: String,
        #[arg(long)]
        resource: String,
        /// Current aggregate score.
        #[arg(long, default_value_t = 0.0)]
        score: f64,
        #[arg(long, default_value = gauge_contracts::policy::NO_VALIDATION)]
        validation_level: String,
        /// Mark the action as approved.
        #[arg(long)]
        approved: bool,
        #[arg(long)]
        approver: Option<String>,
        /// Policy set configuration (TOML). Defaults apply when omitted.
        #[arg(long)]
        policies: Option<PathBuf>,
        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Score the demo data and run the built-in policy scenarios.
    Demo {
        /// Also export an evidence bundle, with audit log, under this directory.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Contents of a `--input` file.
#[derive(Debug, Deserialize)]
struct ScoreInput {
    components: Vec<ComponentMetrics>,
    #[serde(default)]
    validations: Vec<ValidationRecord>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-policy output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Score { manifest, input, demo, json, output } => {
            run_score(manifest.as_deref(), input.as_deref(), demo, json, &output)
        }
        Command::Check {
            actor,
            action,
            resource,
            score,
            validation_level,
            approved,
            approver,
            policies,
            json,
        } => {
            let mut ctx = PolicyContext::new(actor, action, resource)
                .with_score(score)
                .with_validation_level(validation_level);
            if approved {
                ctx = ctx.with_metadata(gauge_policy::policies::APPROVED_KEY, true);
            }
            if let Some(approver) = approver {
                ctx = ctx.with_metadata(gauge_policy::policies::APPROVER_KEY, approver);
            }
            run_check(&ctx, policies.as_deref(), json)
        }
        Command::Demo { output } => run_demo(output.as_deref()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_DENIED),
        Err(e) => {
            eprintln!("gauge: {e}");
            std::process::exit(1);
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────
//
// Each command returns Ok(false) only when a policy check denied.

fn run_score(
    manifest: Option<&Path>,
    input: Option<&Path>,
    demo: bool,
    json: bool,
    output: &Path,
) -> GaugeResult<bool> {
    let aggregator = ScoreAggregator::new(ScoringConfig::load(manifest)?)?;

    let input = score_input(input, demo)?;
    let report = aggregator.aggregate(&input.components, &input.validations)?;

    if json {
        let encoded = serde_json::to_string_pretty(&report)
            .map_err(|e| GaugeError::ExportFailed { reason: format!("failed to encode report: {e}") })?;
        println!("{encoded}");
    } else {
        print_report(&report);
        let path = bundle::export_evidence_bundle(&report, None, output)?;
        println!("\nEvidence bundle: {}", path.display());
    }
    Ok(true)
}

fn run_check(ctx: &PolicyContext, policies: Option<&Path>, json: bool) -> GaugeResult<bool> {
    let engine = match policies {
        Some(path) => engine_from_config(&PolicySetConfig::from_file(path)?)?,
        None => default_engine(),
    };
    let outcome = engine.check(ctx);

    if json {
        let encoded = serde_json::to_string_pretty(&outcome)
            .map_err(|e| GaugeError::ExportFailed { reason: format!("failed to encode outcome: {e}") })?;
        println!("{encoded}");
    } else {
        print_outcome(&outcome);
    }
    Ok(outcome.allowed)
}

fn run_demo(output: Option<&Path>) -> GaugeResult<bool> {
    let report = ScoreAggregator::with_defaults()
        .aggregate(&demo::demo_components()?, &demo::demo_validations()?)?;
    print_report(&report);

    let trail = AuditTrail::new(format!("demo-{}", uuid::Uuid::new_v4()));
    let mut engine = default_engine();
    engine.register_hook(Hook::PostEvaluate(Box::new(trail.clone())));

    for (idx, (label, ctx)) in demo::demo_scenarios().iter().enumerate() {
        println!("\n[Scenario {}] {label}", idx + 1);
        print_outcome(&engine.check(ctx));
    }

    if !trail.verify_integrity() {
        return Err(GaugeError::AuditWriteFailed { reason: "audit chain failed verification".into() });
    }

    if let Some(dir) = output {
        let log = trail.export_log()?;
        let path = bundle::export_evidence_bundle(&report, Some(&log), dir)?;
        println!("\nEvidence bundle: {}", path.display());
    }

    info!(trail_id = %trail.trail_id(), events = trail.len(), "demo complete");
    Ok(true)
}

/// Resolve what `gauge score` aggregates. With neither `--input` nor
/// `--demo` there is nothing to score, which reports 0.0 / critical.
fn score_input(input: Option<&Path>, demo: bool) -> GaugeResult<ScoreInput> {
    match input {
        Some(path) => load_input(path),
        None if demo => Ok(ScoreInput {
            components: demo::demo_components()?,
            validations: demo::demo_validations()?,
        }),
        None => Ok(ScoreInput { components: Vec::new(), validations: Vec::new() }),
    }
}

fn load_input(path: &Path) -> GaugeResult<ScoreInput> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| GaugeError::invalid_input(format!("failed to read input '{}': {e}", path.display())))?;
    parse_input(&contents, path.extension().and_then(|ext| ext.to_str()))
}

fn parse_input(contents: &str, extension: Option<&str>) -> GaugeResult<ScoreInput> {
    match extension {
        Some("yaml") | Some("yml") => serde_yaml::from_str(contents)
            .map_err(|e| GaugeError::invalid_input(format!("failed to parse input YAML: {e}"))),
        _ => serde_json::from_str(contents)
            .map_err(|e| GaugeError::invalid_input(format!("failed to parse input JSON: {e}"))),
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_report(report: &FrequencyReport) {
    println!("Frequency score: {} ({})", report.total_score, report.band.as_str().to_uppercase());
    for component in &report.components {
        println!("  {:<20} {}", component.name, component.frequency);
    }
    println!(
        "Validations: {}/{} passed (multiplier {})",
        report.passed_validations(),
        report.validations.len(),
        report.validation_multiplier
    );
    println!("Ready for final review: {}", if report.ready_for_final_review { "yes" } else { "no" });
    println!("{}", report.recommendation);
}

fn print_outcome(outcome: &CheckOutcome) {
    for result in &outcome.results {
        let escalation = if result.requires_escalation { " [escalate]" } else { "" };
        println!("  {:<18} {:<6} {}{escalation}", result.policy_id, result.decision.as_str(), result.reason);
    }
    println!("  => {}", if outcome.allowed { "ALLOWED" } else { "DENIED" });
}
