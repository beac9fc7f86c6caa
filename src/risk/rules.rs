//! Rule implementations, one function per category.
//!
//! Each rule looks at a single delta and returns at most one finding.
//! Rules are independent: none reads another's output.

use super::{AdvisoryFeed, AdvisoryHit, Finding, RuleCategory, Severity};
use crate::diff::{ChangedField, ComponentDelta, DeltaKind};
use crate::model::{AibomDocument, Component, LicenseFamily};

/// Inputs shared by every rule for one document pair.
pub struct RuleContext<'a> {
    /// The newer document of the pair
    pub new_doc: &'a AibomDocument,
    /// Lowercase unsafe format tags
    pub unsafe_formats: &'a [String],
    pub advisories: &'a AdvisoryFeed,
}

impl RuleContext<'_> {
    fn is_unsafe(&self, component: &Component) -> bool {
        component
            .format
            .as_deref()
            .is_some_and(|f| self.unsafe_formats.iter().any(|u| u == f))
    }
}

/// Evaluate one rule category against one delta.
#[must_use]
pub fn evaluate(
    category: RuleCategory,
    ctx: &RuleContext<'_>,
    index: usize,
    delta: &ComponentDelta,
) -> Option<Finding> {
    match category {
        RuleCategory::UnsafeFormat => unsafe_format(ctx, index, delta),
        RuleCategory::MissingLicense => missing_license(index, delta),
        RuleCategory::LicenseChange => license_change(index, delta),
        RuleCategory::VulnerableDependency => vulnerable_dependency(ctx, index, delta),
        RuleCategory::ProvenanceGap => provenance_gap(index, delta),
        RuleCategory::Other => content_drift(index, delta),
    }
}

fn unsafe_format(ctx: &RuleContext<'_>, index: usize, delta: &ComponentDelta) -> Option<Finding> {
    if let Some(new) = delta.new.as_ref().filter(|c| ctx.is_unsafe(c)) {
        let format = new.format.as_deref().unwrap_or_default();
        return Some(Finding::new(
            RuleCategory::UnsafeFormat,
            "denylisted",
            Severity::Critical,
            index,
            new.id.clone(),
            format!(
                "'{}' uses the {format} format, which can execute code on load",
                new.name()
            ),
        ));
    }

    let old = delta.old.as_ref().filter(|c| ctx.is_unsafe(c))?;
    let format = old.format.as_deref().unwrap_or_default();
    let message = match &delta.new {
        Some(new) => format!(
            "'{}' no longer uses the {format} format (now {})",
            new.name(),
            new.format.as_deref().unwrap_or("unspecified")
        ),
        None => format!("{format} artifact '{}' was removed", old.name()),
    };
    Some(Finding::new(
        RuleCategory::UnsafeFormat,
        "resolved",
        Severity::Info,
        index,
        delta.id().unwrap_or(&old.id).clone(),
        message,
    ))
}

fn missing_license(index: usize, delta: &ComponentDelta) -> Option<Finding> {
    let new = delta.new.as_ref().filter(|c| c.license.is_none())?;
    let previous = delta.old.as_ref().and_then(|c| c.license.as_ref());
    let finding = match previous {
        Some(license) => Finding::new(
            RuleCategory::MissingLicense,
            "dropped",
            Severity::High,
            index,
            new.id.clone(),
            format!("'{}' no longer declares a license (was {license})", new.name()),
        ),
        None => Finding::new(
            RuleCategory::MissingLicense,
            "absent",
            Severity::Medium,
            index,
            new.id.clone(),
            format!("'{}' declares no license", new.name()),
        ),
    };
    Some(finding)
}

fn license_change(index: usize, delta: &ComponentDelta) -> Option<Finding> {
    let (old, new) = (delta.old.as_ref()?, delta.new.as_ref()?);
    let (old_license, new_license) = (old.license.as_ref()?, new.license.as_ref()?);
    if old_license == new_license {
        return None;
    }

    let became_copyleft = new_license.is_copyleft() && !old_license.is_copyleft();
    let became_proprietary = new_license.family() == LicenseFamily::Proprietary
        && old_license.family() == LicenseFamily::Permissive;
    let (rule, severity) = if became_copyleft {
        ("copyleft", Severity::High)
    } else if became_proprietary {
        ("proprietary", Severity::High)
    } else {
        ("changed", Severity::Medium)
    };
    Some(Finding::new(
        RuleCategory::LicenseChange,
        rule,
        severity,
        index,
        new.id.clone(),
        format!(
            "License of '{}' changed from {old_license} to {new_license}",
            new.name()
        ),
    ))
}

fn vulnerable_dependency(
    ctx: &RuleContext<'_>,
    index: usize,
    delta: &ComponentDelta,
) -> Option<Finding> {
    let new = delta.new.as_ref()?;
    let mut hits: Vec<AdvisoryHit> = ctx.advisories.matching(new).map(AdvisoryHit::from).collect();
    hits.extend(ctx.new_doc.vulnerabilities_affecting(new).map(AdvisoryHit::from));

    let severity = hits.iter().map(|h| h.severity).max()?;
    let mut ids: Vec<String> = hits.into_iter().map(|h| h.id).collect();
    ids.sort();
    ids.dedup();

    let version = new.version().unwrap_or("unversioned");
    Some(
        Finding::new(
            RuleCategory::VulnerableDependency,
            "advisory",
            severity,
            index,
            new.id.clone(),
            format!("'{}' {version} is affected by {}", new.name(), ids.join(", ")),
        )
        .with_advisories(ids),
    )
}

fn provenance_gap(index: usize, delta: &ComponentDelta) -> Option<Finding> {
    let new = delta.new.as_ref()?;
    let mut missing = Vec::new();
    if new.checksum.is_none() {
        missing.push("checksum");
    }
    if new.provenance.source_commit.is_none() {
        missing.push("source commit");
    }
    if missing.is_empty() {
        return None;
    }
    Some(Finding::new(
        RuleCategory::ProvenanceGap,
        "incomplete",
        Severity::Low,
        index,
        new.id.clone(),
        format!("'{}' is missing {}", new.name(), missing.join(" and ")),
    ))
}

fn content_drift(index: usize, delta: &ComponentDelta) -> Option<Finding> {
    if delta.kind != DeltaKind::Modified
        || !delta.has_change(ChangedField::Checksum)
        || delta.has_change(ChangedField::Version)
    {
        return None;
    }
    let new = delta.new.as_ref()?;
    // A checksum appearing for the first time is not drift.
    delta.old.as_ref()?.checksum.as_ref()?;
    new.checksum.as_ref()?;
    Some(Finding::new(
        RuleCategory::Other,
        "content-drift",
        Severity::Medium,
        index,
        new.id.clone(),
        format!(
            "Content of '{}' changed without a version change",
            new.name()
        ),
    ))
}
