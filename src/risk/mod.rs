//! Risk classification of AIBOM deltas.
//!
//! The classifier evaluates a closed set of rule categories in a fixed
//! order. Every enabled rule looks at every delta; a delta that triggers
//! several rules yields one finding per rule.
//!
//! | Order | Category | Severity |
//! |---|---|---|
//! | 1 | `unsafe-format` | Critical, or Info when resolved |
//! | 2 | `missing-license` | Medium, High when dropped |
//! | 3 | `license-change` | Medium, High when newly copyleft |
//! | 4 | `vulnerable-dependency` | highest advisory severity |
//! | 5 | `provenance-gap` | Low |
//! | 6 | `other` (content drift) | Medium |

mod advisory;
mod classifier;
mod finding;
mod rules;
mod severity;

pub use advisory::{parse_lenient, Advisory, AdvisoryFeed, AdvisoryHit};
pub use classifier::{RiskClassifier, RiskClassifierBuilder, DEFAULT_UNSAFE_FORMATS};
pub use finding::{Finding, RuleCategory, SeverityCounts};
pub use severity::Severity;
