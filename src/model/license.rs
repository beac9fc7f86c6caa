//! License handling for AIBOM components.
//!
//! Uses the `spdx` crate for expression parsing and license classification,
//! with substring-based fallback for the free-form names model registries
//! commonly carry (e.g. "apache 2.0", "llama2").

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder values that generators emit when no license is known.
///
/// `other` is not among them: registries use it for custom license terms.
const ABSENT_MARKERS: &[&str] = &["", "unknown", "noassertion", "none"];

/// License expression following SPDX license expression syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseExpression {
    /// The raw license expression string
    pub expression: String,
}

impl LicenseExpression {
    /// Create a new license expression
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    /// Interpret a declared license value, treating placeholder markers such as
    /// `unknown` or `NOASSERTION` as an absent license.
    #[must_use]
    pub fn from_declared(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if ABSENT_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
            None
        } else {
            Some(Self::new(trimmed))
        }
    }

    /// Check if this expression requires copyleft compliance.
    ///
    /// Returns true if any license term in the expression is copyleft.
    #[must_use]
    pub fn is_copyleft(&self) -> bool {
        if let Ok(expr) = spdx::Expression::parse_mode(&self.expression, spdx::ParseMode::LAX) {
            expr.requirements().any(|req| {
                if let spdx::LicenseItem::Spdx { id, .. } = req.req.license {
                    id.is_copyleft()
                } else {
                    false
                }
            })
        } else {
            let expr_lower = self.expression.to_lowercase();
            expr_lower.contains("gpl") || expr_lower.contains("mpl")
        }
    }

    /// Get the license family classification.
    ///
    /// OR expressions resolve to the most permissive option; AND expressions
    /// and single licenses to the most restrictive requirement.
    #[must_use]
    pub fn family(&self) -> LicenseFamily {
        let Ok(expr) = spdx::Expression::parse_mode(&self.expression, spdx::ParseMode::LAX) else {
            return self.family_from_substring();
        };

        let mut has_copyleft = false;
        let mut has_permissive = false;
        let mut has_or = false;

        for node in expr.iter() {
            match node {
                spdx::expression::ExprNode::Op(spdx::expression::Operator::Or) => has_or = true,
                spdx::expression::ExprNode::Req(req) => {
                    if let spdx::LicenseItem::Spdx { id, .. } = req.req.license {
                        if id.is_copyleft() {
                            has_copyleft = true;
                        } else if id.is_osi_approved() || id.is_fsf_free_libre() {
                            has_permissive = true;
                        }
                    }
                }
                spdx::expression::ExprNode::Op(_) => {}
            }
        }

        if has_or && has_permissive {
            LicenseFamily::Permissive
        } else if has_copyleft {
            LicenseFamily::Copyleft
        } else if has_permissive {
            LicenseFamily::Permissive
        } else {
            LicenseFamily::Other
        }
    }

    fn family_from_substring(&self) -> LicenseFamily {
        let expr_lower = self.expression.to_lowercase();
        if expr_lower.contains("gpl") || expr_lower.contains("mpl") {
            LicenseFamily::Copyleft
        } else if ["mit", "apache", "bsd", "isc", "unlicense", "cc0"]
            .iter()
            .any(|needle| expr_lower.contains(needle))
        {
            LicenseFamily::Permissive
        } else if expr_lower.contains("proprietary") {
            LicenseFamily::Proprietary
        } else {
            LicenseFamily::Other
        }
    }
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// License family classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LicenseFamily {
    Permissive,
    Copyleft,
    Proprietary,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_markers() {
        assert!(LicenseExpression::from_declared("unknown").is_none());
        assert!(LicenseExpression::from_declared(" NOASSERTION ").is_none());
        assert!(LicenseExpression::from_declared("").is_none());
        assert!(LicenseExpression::from_declared("None").is_none());
        assert_eq!(
            LicenseExpression::from_declared("other").map(|l| l.expression),
            Some("other".to_string())
        );
        assert!(LicenseExpression::from_declared("n/a").is_some());
        assert_eq!(
            LicenseExpression::from_declared("Apache-2.0").map(|l| l.expression),
            Some("Apache-2.0".to_string())
        );
    }

    #[test]
    fn test_family_classification() {
        assert_eq!(
            LicenseExpression::new("Apache-2.0").family(),
            LicenseFamily::Permissive
        );
        assert_eq!(
            LicenseExpression::new("GPL-3.0-only").family(),
            LicenseFamily::Copyleft
        );
        assert_eq!(
            LicenseExpression::new("MIT OR GPL-3.0-only").family(),
            LicenseFamily::Permissive
        );
        assert_eq!(
            LicenseExpression::new("proprietary research license").family(),
            LicenseFamily::Proprietary
        );
        assert_eq!(LicenseExpression::new("other").family(), LicenseFamily::Other);
    }

    #[test]
    fn test_copyleft_detection() {
        assert!(LicenseExpression::new("AGPL-3.0-only").is_copyleft());
        assert!(!LicenseExpression::new("MIT").is_copyleft());
    }
}
