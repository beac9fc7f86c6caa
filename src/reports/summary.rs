//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::analysis::{AnalysisResult, FailureScope, RunStatus};
use crate::risk::Severity;

/// Findings listed per pair before the rest are elided.
const MAX_FINDINGS_PER_PAIR: usize = 10;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "red",
        Severity::Medium => "yellow",
        Severity::Low => "cyan",
        Severity::Info => "dim",
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn pair_section(&self, result: &AnalysisResult, lines: &mut Vec<String>) {
        for pair in &result.pairs {
            lines.push(String::new());
            lines.push(format!(
                "{} {} → {}  {}",
                self.color(&format!("Pair {}:", pair.pair_index), "bold"),
                result.document_label(pair.old),
                result.document_label(pair.new),
                self.color(
                    &format!("score {:.2} ({})", pair.score, pair.risk_level),
                    severity_color(pair.risk_level)
                ),
            ));

            let s = &pair.diff.summary;
            lines.push(format!(
                "  {} added  {} removed  {} modified  {} unchanged",
                self.color(&format!("+{}", s.added), "green"),
                self.color(&format!("-{}", s.removed), "red"),
                self.color(&format!("~{}", s.modified), "yellow"),
                s.unchanged
            ));
            lines.push(format!(
                "  {} exact, {} fuzzy matches",
                pair.matches.exact, pair.matches.fuzzy
            ));

            for finding in pair.findings.iter().take(MAX_FINDINGS_PER_PAIR) {
                lines.push(format!(
                    "  {} {} {}",
                    self.color(
                        &format!("[{}]", finding.severity),
                        severity_color(finding.severity)
                    ),
                    self.color(&finding.rule_id, "dim"),
                    finding.message
                ));
            }
            if pair.findings.len() > MAX_FINDINGS_PER_PAIR {
                lines.push(self.color(
                    &format!(
                        "  … {} more finding(s)",
                        pair.findings.len() - MAX_FINDINGS_PER_PAIR
                    ),
                    "dim",
                ));
            }
        }
    }

    fn failure_section(&self, result: &AnalysisResult, lines: &mut Vec<String>) {
        if result.failures.is_empty() {
            return;
        }
        lines.push(String::new());
        lines.push(self.color("Failures:", "bold"));
        for failure in &result.failures {
            let scope = match &failure.scope {
                FailureScope::Document { label, .. } => label.clone(),
                FailureScope::Pair { old, new } => format!(
                    "{} → {}",
                    result.document_label(*old),
                    result.document_label(*new)
                ),
            };
            lines.push(format!(
                "  {} {}: {}",
                self.color(&format!("[{}]", failure.kind), "red"),
                scope,
                failure.message
            ));
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(&self, result: &AnalysisResult) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        lines.push(self.color("AIBOM Analysis Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        let valid = result.documents.iter().filter(|d| d.valid).count();
        lines.push(format!(
            "{}  {} of {} valid ({} mode)",
            self.color("Documents:", "cyan"),
            valid,
            result.documents.len(),
            result.mode
        ));
        for doc in &result.documents {
            let marker = if doc.valid { "✓" } else { "✗" };
            lines.push(format!(
                "  {} [{}] {} {}",
                marker,
                doc.index,
                doc.label,
                self.color(doc.subject.as_deref().unwrap_or("invalid"), "dim")
            ));
        }

        self.pair_section(result, &mut lines);
        self.failure_section(result, &mut lines);

        let overview = &result.overview;
        if !overview.common_components.is_empty() || !overview.common_licenses.is_empty() {
            lines.push(String::new());
        }
        if !overview.common_components.is_empty() {
            lines.push(format!(
                "{}  {}",
                self.color("Shared components:", "cyan"),
                overview.common_components.join(", ")
            ));
        }
        if !overview.common_licenses.is_empty() {
            lines.push(format!(
                "{}    {}",
                self.color("Shared licenses:", "cyan"),
                overview.common_licenses.join(", ")
            ));
        }

        lines.push(String::new());
        let summary = &result.summary;
        let c = &summary.severity_counts;
        lines.push(format!(
            "{}  {} critical, {} high, {} medium, {} low, {} info",
            self.color("Findings:", "cyan"),
            c.critical,
            c.high,
            c.medium,
            c.low,
            c.info
        ));
        lines.push(format!(
            "{}  {}",
            self.color("Risk score:", "cyan"),
            self.color(
                &format!("{:.2} ({})", summary.score, summary.risk_level),
                severity_color(summary.risk_level)
            )
        ));
        let status = match result.status {
            RunStatus::Done => self.color("done", "green"),
            RunStatus::Partial => self.color("partial", "yellow"),
        };
        lines.push(format!("{}  {}", self.color("Status:", "cyan"), status));

        if let Some(insights) = &result.insights {
            lines.push(String::new());
            lines.push(self.color("Insights:", "bold"));
            lines.push(format!("  {}", insights.summary));
            for rec in &insights.security_recommendations {
                lines.push(format!("  • {rec}"));
            }
            lines.push(format!("  {}", insights.risk_assessment));
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
