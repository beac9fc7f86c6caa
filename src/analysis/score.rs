//! Risk scoring.
//!
//! A pair's score is its severity-weighted finding total, normalized by the
//! number of deltas so that large documents are not penalized for size:
//!
//! ```text
//! score = min(100, 100 * sum(weight) / (10 * max(1, deltas)))
//! ```
//!
//! One Critical finding per delta saturates the scale.

use crate::risk::{Finding, Severity};

/// Score of one pair, 0-100.
#[must_use]
pub fn pair_score(findings: &[Finding], delta_count: usize) -> f64 {
    let total: u32 = findings.iter().map(|f| f.severity.weight()).sum();
    let denominator = 10.0 * delta_count.max(1) as f64;
    (100.0 * f64::from(total) / denominator).min(100.0)
}

/// Mean of pair scores, rounded to two decimals. Zero when empty.
#[must_use]
pub fn summary_score(pair_scores: &[f64]) -> f64 {
    if pair_scores.is_empty() {
        return 0.0;
    }
    let mean = pair_scores.iter().sum::<f64>() / pair_scores.len() as f64;
    round2(mean)
}

#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Risk level for a score.
#[must_use]
pub fn risk_level(score: f64) -> Severity {
    Severity::from_risk_score(score)
}
