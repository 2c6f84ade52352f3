//! Evidence bundle export.
//!
//! A bundle is a timestamped directory holding the frequency report in JSON
//! and YAML, a Markdown summary, and optionally the exported audit log.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use gauge_audit::AuditLog;
use gauge_contracts::{
    error::{GaugeError, GaugeResult},
    report::FrequencyReport,
};

pub const REPORT_JSON: &str = "frequency_report.json";
pub const REPORT_YAML: &str = "frequency_report.yaml";
pub const SUMMARY_MD: &str = "SUMMARY.md";
pub const AUDIT_LOG_JSON: &str = "audit_log.json";

fn export_error(what: &str, e: impl std::fmt::Display) -> GaugeError {
    GaugeError::ExportFailed { reason: format!("{what}: {e}") }
}

fn write_file(path: &Path, contents: &str) -> GaugeResult<()> {
    fs::write(path, contents).map_err(|e| export_error(&format!("failed to write '{}'", path.display()), e))
}

/// Write a bundle for `report` under `output_dir` and return its path.
///
/// The directory is named after the report timestamp:
/// `evidence_bundle_YYYYmmdd_HHMMSS`.
pub fn export_evidence_bundle(
    report: &FrequencyReport,
    audit_log: Option<&AuditLog>,
    output_dir: &Path,
) -> GaugeResult<PathBuf> {
    let bundle_name = format!("evidence_bundle_{}", report.timestamp.format("%Y%m%d_%H%M%S"));
    let bundle_path = output_dir.join(bundle_name);
    fs::create_dir_all(&bundle_path).map_err(|e| {
        export_error(&format!("failed to create bundle directory '{}'", bundle_path.display()), e)
    })?;

    let json = serde_json::to_string_pretty(report).map_err(|e| export_error("failed to encode report JSON", e))?;
    write_file(&bundle_path.join(REPORT_JSON), &json)?;

    let yaml = serde_yaml::to_string(report).map_err(|e| export_error("failed to encode report YAML", e))?;
    write_file(&bundle_path.join(REPORT_YAML), &yaml)?;

    write_file(&bundle_path.join(SUMMARY_MD), &render_summary(report, audit_log))?;

    if let Some(log) = audit_log {
        let json = serde_json::to_string_pretty(log).map_err(|e| export_error("failed to encode audit log", e))?;
        write_file(&bundle_path.join(AUDIT_LOG_JSON), &json)?;
    }

    info!(path = %bundle_path.display(), "evidence bundle exported");
    Ok(bundle_path)
}

/// Markdown summary of a report and, when given, its audit trail.
pub fn render_summary(report: &FrequencyReport, audit_log: Option<&AuditLog>) -> String {
    let mut out = String::new();

    out.push_str("# Gauge Evidence Bundle\n\n## Frequency Report Summary\n\n");
    out.push_str(&format!("- **Timestamp**: {}\n", report.timestamp.to_rfc3339()));
    out.push_str(&format!("- **Score**: {}\n", report.total_score));
    out.push_str(&format!("- **Band**: {}\n", report.band.as_str().to_uppercase()));
    out.push_str(&format!(
        "- **Ready for Final Review**: {}\n",
        if report.ready_for_final_review { "Yes" } else { "No" }
    ));

    out.push_str(&format!("\n## Recommendation\n\n{}\n", report.recommendation));

    out.push_str("\n## Components Analyzed\n\n| Component | Frequency |\n|-----------|-----------|\n");
    for component in &report.components {
        out.push_str(&format!("| {} | {} |\n", component.name, component.frequency));
    }

    out.push_str("\n## Validation Passes\n\n");
    out.push_str(&format!("Total: {}\n", report.validations.len()));
    out.push_str(&format!("Passed: {}\n", report.passed_validations()));
    if !report.missing_validations.is_empty() {
        let missing: Vec<&str> = report.missing_validations.iter().map(|l| l.as_str()).collect();
        out.push_str(&format!("Missing levels: {}\n", missing.join(", ")));
    }

    if let Some(log) = audit_log {
        out.push_str("\n## Policy Evaluations\n\n");
        out.push_str(&format!("Trail: {}\n", log.trail_id));
        out.push_str(&format!("Evaluations: {}\n", log.events.len()));
        out.push_str(&format!("Denied: {}\n", log.denied_count()));
        out.push_str(&format!("Terminal hash: `{}`\n", log.terminal_hash));
    }

    out.push_str(&format!("\n---\n*Generated by gauge, scoring config v{}*\n", report.version));
    out
}
