//! Risk classifier: applies the enabled rules to a pair's deltas.

use super::rules::{evaluate, RuleContext};
use super::{AdvisoryFeed, Finding, RuleCategory};
use crate::diff::ComponentDelta;
use crate::error::Result;
use crate::model::AibomDocument;
use std::sync::Arc;

/// Formats whose loaders can execute arbitrary code.
pub const DEFAULT_UNSAFE_FORMATS: &[&str] =
    &["pickle", "joblib", "dill", "cloudpickle", "torch-legacy"];

/// Annotates deltas with findings.
///
/// Construction validates the rule configuration, so a classifier that
/// exists can always classify.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    rules: Vec<RuleCategory>,
    unsafe_formats: Vec<String>,
    advisories: Arc<AdvisoryFeed>,
}

impl RiskClassifier {
    /// Classifier with every rule enabled, default denylist and no feed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleCategory::ALL.to_vec(),
            unsafe_formats: DEFAULT_UNSAFE_FORMATS.iter().map(|s| (*s).to_string()).collect(),
            advisories: Arc::new(AdvisoryFeed::default()),
        }
    }

    pub fn builder() -> RiskClassifierBuilder {
        RiskClassifierBuilder::default()
    }

    /// Enabled rules, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[RuleCategory] {
        &self.rules
    }

    #[must_use]
    pub fn unsafe_formats(&self) -> &[String] {
        &self.unsafe_formats
    }

    /// Findings for one pair, ordered by delta then rule.
    #[must_use]
    pub fn classify(&self, new_doc: &AibomDocument, deltas: &[ComponentDelta]) -> Vec<Finding> {
        let ctx = RuleContext {
            new_doc,
            unsafe_formats: &self.unsafe_formats,
            advisories: &self.advisories,
        };
        let ctx = &ctx;
        let findings: Vec<Finding> = deltas
            .iter()
            .enumerate()
            .flat_map(|(index, delta)| {
                self.rules
                    .iter()
                    .filter_map(move |rule| evaluate(*rule, ctx, index, delta))
            })
            .collect();
        tracing::debug!(
            deltas = deltas.len(),
            findings = findings.len(),
            "Classified deltas"
        );
        findings
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`RiskClassifier`].
#[derive(Debug, Default)]
#[must_use]
pub struct RiskClassifierBuilder {
    rule_names: Option<Vec<String>>,
    unsafe_formats: Option<Vec<String>>,
    advisories: Option<Arc<AdvisoryFeed>>,
}

impl RiskClassifierBuilder {
    /// Restrict the enabled rules; names are validated in [`Self::build`].
    pub fn rule_set<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn unsafe_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unsafe_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    pub fn advisories(mut self, feed: Arc<AdvisoryFeed>) -> Self {
        self.advisories = Some(feed);
        self
    }

    /// Validate the configuration.
    ///
    /// Fails with `UnknownRuleReference` on the first unknown rule name.
    /// Rules always run in canonical order, whatever order they were listed in.
    pub fn build(self) -> Result<RiskClassifier> {
        let mut classifier = RiskClassifier::new();
        if let Some(names) = self.rule_names {
            let mut enabled = Vec::with_capacity(names.len());
            for name in &names {
                enabled.push(RuleCategory::parse(name)?);
            }
            classifier.rules = RuleCategory::ALL
                .into_iter()
                .filter(|c| enabled.contains(c))
                .collect();
        }
        if let Some(formats) = self.unsafe_formats {
            classifier.unsafe_formats = formats.iter().map(|f| f.trim().to_lowercase()).collect();
        }
        if let Some(feed) = self.advisories {
            classifier.advisories = feed;
        }
        Ok(classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::error::ErrorKind;
    use crate::model::{Component, ComponentType, DocumentMetadata, EmbeddedVulnerability};
    use crate::risk::Severity;

    fn doc(components: Vec<Component>) -> AibomDocument {
        let map = components.into_iter().map(|c| (c.id.clone(), c)).collect();
        AibomDocument::from_parts(DocumentMetadata::new("org/model", "1.5"), map, vec![], vec![])
    }

    fn weights(format: &str) -> Component {
        Component::new("model.bin", None, ComponentType::ModelWeights)
            .with_format(format)
            .with_checksum("SHA-256", "aa")
            .with_source_commit("abc")
    }

    fn classify(
        old: &AibomDocument,
        new: &AibomDocument,
        classifier: &RiskClassifier,
    ) -> Vec<Finding> {
        let diff = DiffEngine::new().diff(old, new);
        classifier.classify(new, &diff.component_deltas)
    }

    #[test]
    fn test_unknown_rule_is_rejected_at_build() {
        let err = RiskClassifier::builder()
            .rule_set(["unsafe-format", "typosquatting"])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownRuleReference);
    }

    #[test]
    fn test_rule_order_is_canonical() {
        let classifier = RiskClassifier::builder()
            .rule_set(["other", "unsafe-format"])
            .build()
            .unwrap();
        assert_eq!(
            classifier.rules(),
            &[RuleCategory::UnsafeFormat, RuleCategory::Other]
        );
    }

    #[test]
    fn test_rule_independence() {
        let a = doc(vec![weights("pickle")]);
        let findings = classify(&a, &a, &RiskClassifier::new());
        let categories: Vec<_> = findings.iter().map(|f| f.category).collect();
        assert_eq!(
            categories,
            vec![RuleCategory::UnsafeFormat, RuleCategory::MissingLicense]
        );
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[1].severity, Severity::Medium);
    }

    #[test]
    fn test_license_dropped_is_high() {
        let a = doc(vec![weights("safetensors").with_license("MIT")]);
        let b = doc(vec![weights("safetensors")]);
        let findings = classify(&a, &b, &RiskClassifier::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "missing-license/dropped");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_license_change_to_copyleft() {
        let a = doc(vec![weights("safetensors").with_license("MIT")]);
        let b = doc(vec![weights("safetensors").with_license("GPL-3.0-only")]);
        let findings = classify(&a, &b, &RiskClassifier::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "license-change/copyleft");
        assert_eq!(findings[0].severity, Severity::High);

        let c = doc(vec![weights("safetensors").with_license("Apache-2.0")]);
        let findings = classify(&a, &c, &RiskClassifier::new());
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_license_change_to_proprietary() {
        let a = doc(vec![weights("safetensors").with_license("Apache-2.0")]);
        let b = doc(vec![weights("safetensors").with_license("proprietary research license")]);
        let findings = classify(&a, &b, &RiskClassifier::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "license-change/proprietary");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_custom_license_is_a_change_not_a_drop() {
        let a = doc(vec![weights("safetensors").with_license("MIT")]);
        let b = doc(vec![weights("safetensors").with_license("other")]);
        let findings = classify(&a, &b, &RiskClassifier::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "license-change/changed");
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_vulnerable_dependency_takes_max_severity() {
        let torch = Component::new("torch", Some("2.1.0".to_string()), ComponentType::Library)
            .with_license("BSD-3-Clause")
            .with_checksum("SHA-256", "cc")
            .with_source_commit("def");
        let affects = vec![torch.id.clone()];
        let mut new = doc(vec![torch]);
        new.vulnerabilities.push(EmbeddedVulnerability {
            id: "AIBOM-7".to_string(),
            severity: Some("low".to_string()),
            score: None,
            description: None,
            affects,
        });
        let feed = AdvisoryFeed::parse(
            "advisories:\n  - id: GHSA-1\n    package: torch\n    affected: \"<2.2.0\"\n    severity: critical\n",
        )
        .unwrap();
        let classifier = RiskClassifier::builder()
            .advisories(Arc::new(feed))
            .build()
            .unwrap();
        let findings = classify(&new, &new, &classifier);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].advisory_ids, vec!["AIBOM-7", "GHSA-1"]);
    }

    #[test]
    fn test_content_drift() {
        let a = doc(vec![weights("safetensors").with_license("MIT")]);
        let b = doc(vec![weights("safetensors")
            .with_license("MIT")
            .with_checksum("SHA-256", "ff")]);
        let findings = classify(&a, &b, &RiskClassifier::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "other/content-drift");
    }

    #[test]
    fn test_provenance_gap() {
        let bare =
            Component::new("config.json", None, ComponentType::Configuration).with_license("MIT");
        let a = doc(vec![bare]);
        let findings = classify(&a, &a, &RiskClassifier::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Low);
        assert!(findings[0].message.contains("checksum and source commit"));
    }

    #[test]
    fn test_custom_denylist() {
        let a = doc(vec![weights("onnx").with_license("MIT")]);
        let classifier = RiskClassifier::builder()
            .unsafe_formats(["ONNX"])
            .build()
            .unwrap();
        let findings = classify(&a, &a, &classifier);
        assert_eq!(findings[0].category, RuleCategory::UnsafeFormat);
    }
}
