//! Unified error types for aibom-diff.
//!
//! Document-level and pair-level errors are captured by the orchestrator and
//! attached to the `AnalysisResult` as failure entries. Only configuration
//! errors and `InsufficientInputs` escape a run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for aibom-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AibomDiffError {
    /// A single AIBOM document failed validation
    #[error("Invalid AIBOM document: {context}")]
    Document {
        context: String,
        #[source]
        source: DocumentErrorKind,
    },

    /// A rule configuration names a category outside the closed set
    #[error("Unknown rule reference '{rule}' (known rules: {known})")]
    UnknownRuleReference { rule: String, known: String },

    /// Fewer than two usable documents remained for comparison
    #[error("Insufficient inputs: {valid} valid document(s), at least {required} required")]
    InsufficientInputs { valid: usize, required: usize },

    /// An external call exceeded its time box on every attempt
    #[error("Timed out fetching '{subject}' after {attempts} attempt(s) ({per_attempt:?} each)")]
    Timeout {
        subject: String,
        attempts: u32,
        per_attempt: Duration,
    },

    /// An external provider failed for a reason other than timing out
    #[error("Provider failed for '{subject}': {message}")]
    Provider { subject: String, message: String },

    /// The run was cancelled before this unit of work started
    #[error("Cancelled before {0} started")]
    Cancelled(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific document validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Duplicate component identifier: {0}")]
    DuplicateComponent(String),

    #[error("Unsupported bom format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported schema version: {version} (supported: {supported})")]
    UnsupportedSchemaVersion { version: String, supported: String },
}

/// Machine-readable classification of an error, used in failure entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    MalformedDocument,
    UnsupportedSchemaVersion,
    UnknownRuleReference,
    InsufficientInputs,
    Timeout,
    Provider,
    Cancelled,
    Io,
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MalformedDocument => "malformed-document",
            Self::UnsupportedSchemaVersion => "unsupported-schema-version",
            Self::UnknownRuleReference => "unknown-rule-reference",
            Self::InsufficientInputs => "insufficient-inputs",
            Self::Timeout => "timeout",
            Self::Provider => "provider",
            Self::Cancelled => "cancelled",
            Self::Io => "io",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for aibom-diff operations
pub type Result<T> = std::result::Result<T, AibomDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl AibomDiffError {
    /// Create a document error with context
    pub fn document(context: impl Into<String>, source: DocumentErrorKind) -> Self {
        Self::Document {
            context: context.into(),
            source,
        }
    }

    /// Create a document error for a missing required field
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::document(
            "missing required field",
            DocumentErrorKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Classify this error for failure entries and exit codes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Document {
                source: DocumentErrorKind::UnsupportedSchemaVersion { .. },
                ..
            } => ErrorKind::UnsupportedSchemaVersion,
            Self::Document { .. } => ErrorKind::MalformedDocument,
            Self::UnknownRuleReference { .. } => ErrorKind::UnknownRuleReference,
            Self::InsufficientInputs { .. } => ErrorKind::InsufficientInputs,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::Io { .. } => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether an external call that failed with this error may be retried.
    ///
    /// IO errors are transient unless the target is missing or unreadable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Provider { .. } => true,
            Self::Io { source, .. } => !matches!(
                source.kind(),
                std::io::ErrorKind::NotFound
                    | std::io::ErrorKind::PermissionDenied
                    | std::io::ErrorKind::InvalidData
            ),
            _ => false,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for AibomDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AibomDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::document(
            "JSON deserialization",
            DocumentErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost-first, so an error raised while
/// parsing component 3 of document "b.json" reads
/// `"b.json: component 3: missing required field"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<AibomDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: AibomDiffError, new_ctx: &str) -> AibomDiffError {
    match err {
        AibomDiffError::Document {
            context: existing,
            source,
        } => AibomDiffError::Document {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AibomDiffError::Io {
            path,
            message,
            source,
        } => AibomDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        AibomDiffError::Provider { subject, message } => AibomDiffError::Provider {
            subject,
            message: chain_context(new_ctx, &message),
        },
        AibomDiffError::Config(msg) => AibomDiffError::Config(chain_context(new_ctx, &msg)),
        other => other,
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a missing-field document error.
    fn required(self, field: &str, context: &str) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn required(self, field: &str, context: &str) -> Result<T> {
        self.ok_or_else(|| AibomDiffError::missing_field(field, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AibomDiffError::missing_field("metadata.component.name", "document");
        let display = err.to_string();
        assert!(display.contains("Invalid AIBOM document"), "{display}");

        let err = AibomDiffError::InsufficientInputs {
            valid: 1,
            required: 2,
        };
        assert!(err.to_string().contains("1 valid document"));
    }

    #[test]
    fn test_kind_classification() {
        let malformed = AibomDiffError::missing_field("components", "document");
        assert_eq!(malformed.kind(), ErrorKind::MalformedDocument);

        let schema = AibomDiffError::document(
            "b.json",
            DocumentErrorKind::UnsupportedSchemaVersion {
                version: "2.0".to_string(),
                supported: "1.4-1.6".to_string(),
            },
        );
        assert_eq!(schema.kind(), ErrorKind::UnsupportedSchemaVersion);
        assert!(!schema.is_retryable());

        let timeout = AibomDiffError::Timeout {
            subject: "org/model".to_string(),
            attempts: 3,
            per_attempt: Duration::from_secs(1),
        };
        assert_eq!(timeout.kind(), ErrorKind::Timeout);
        assert!(timeout.is_retryable());
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(AibomDiffError::missing_field("name", "component"))
        }

        fn middle() -> Result<()> {
            inner().context("component 3")
        }

        fn outer() -> Result<()> {
            middle().context("b.json")
        }

        match outer() {
            Err(AibomDiffError::Document { context, .. }) => {
                assert_eq!(context, "b.json: component 3: missing required field");
            }
            other => panic!("Expected Document error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");
    }

    #[test]
    fn test_option_required() {
        let none: Option<&str> = None;
        match none.required("specVersion", "document") {
            Err(AibomDiffError::Document {
                source: DocumentErrorKind::MissingField { field, .. },
                ..
            }) => assert_eq!(field, "specVersion"),
            other => panic!("Expected MissingField, got {other:?}"),
        }
        assert_eq!(Some(1).required("x", "y").unwrap(), 1);
    }

    #[test]
    fn test_error_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ErrorKind::MalformedDocument).unwrap();
        assert_eq!(json, "\"malformed-document\"");
        assert_eq!(ErrorKind::Timeout.to_string(), "timeout");
    }
}
