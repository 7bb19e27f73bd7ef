//! Issue records shared by every report.

use serde::{Deserialize, Serialize};

/// Category of a reported issue.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueType {
    /// Unclear prose or staging
    Clarity,
    /// Character voice or behavior
    Character,
    /// Pacing
    Pacing,
    /// Continuity across scenes or chapters
    Continuity,
    /// Point-of-view slips
    Pov,
    /// Emotional beats
    Emotion,
    /// Internal logic
    Logic,
    /// Image references
    Imagery,
    /// Entity slug references
    Slug,
}

/// How much an issue matters. Ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Cosmetic
    Minor,
    /// Should be fixed
    Moderate,
    /// Must be fixed
    Major,
}

/// A single finding anchored to a location in the manuscript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Issue {
    /// Category
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Severity
    pub severity: Severity,
    /// Anchor such as `ch10:scn-10-03:p7`
    pub location: String,
    /// What is wrong
    pub explanation: String,
    /// What to do about it
    pub suggested_action: String,
    /// Supporting anchors or slugs
    #[serde(default)]
    pub evidence_refs: Vec<String>,
}

impl Issue {
    /// Create an issue with no evidence references.
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        location: impl Into<String>,
        explanation: impl Into<String>,
        suggested_action: impl Into<String>,
    ) -> Self {
        Self {
            issue_type,
            severity,
            location: location.into(),
            explanation: explanation.into(),
            suggested_action: suggested_action.into(),
            evidence_refs: Vec::new(),
        }
    }

    /// Attach evidence references.
    pub fn with_evidence(mut self, refs: Vec<String>) -> Self {
        self.evidence_refs = refs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_uses_camel_case_wire_names() {
        let issue = Issue::new(
            IssueType::Pov,
            Severity::Major,
            "ch01:scn-01:p2",
            "head hop",
            "stay with Mara",
        );
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["type"], "pov");
        assert_eq!(value["severity"], "major");
        assert_eq!(value["suggestedAction"], "stay with Mara");
        assert!(value["evidenceRefs"].as_array().unwrap().is_empty());
    }

    #[test]
    fn severity_orders_by_weight() {
        assert!(Severity::Major > Severity::Moderate);
        assert!(Severity::Moderate > Severity::Minor);
    }
}
