use std::fmt;

use serde::{Deserialize, Serialize};

pub type TriggerId = u32;
pub type SynonymId = u32;
pub type RuleId = u32;
pub type EvidenceSourceId = u32;
pub type TimingProfileId = u32;

/// How strongly a trigger should push a scan towards "avoid".
///
/// Ordered so that `Low < Moderate < High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule used to compare a synonym against a single token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MatchType {
    /// Token equals the synonym text (case-insensitive).
    Exact,
    /// Synonym text occurs in the token between word boundaries, so `malt`
    /// hits `malt extract` but not `maltodextrin`.
    #[default]
    WordBoundaryContains,
    /// Synonym text occurs anywhere in the token.
    Contains,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "Exact",
            MatchType::WordBoundaryContains => "WordBoundaryContains",
            MatchType::Contains => "Contains",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical confidence of a cross-reactivity rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strength {
    Low,
    Medium,
    High,
}

impl Strength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Low => "Low",
            Strength::Medium => "Medium",
            Strength::High => "High",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named allergen or irritant the scanner can detect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trigger {
    pub id: TriggerId,
    /// Display name; also the literal a direct match looks for.
    pub name: String,
    /// Grouping used by category-wide cross-reactivity rules, e.g. `Legume`.
    pub category: String,
    pub severity: Severity,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Trigger {
    pub fn new(
        id: TriggerId,
        name: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            severity,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Alternate label text that implies a trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Synonym {
    pub id: SynonymId,
    pub trigger_id: TriggerId,
    pub text: String,
    #[serde(default)]
    pub match_type: MatchType,
    /// Parent trigger, joined by the accessor. `None` means the reference
    /// did not resolve and the synonym can never match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

impl Synonym {
    pub fn new(
        id: SynonymId,
        trigger_id: TriggerId,
        text: impl Into<String>,
        match_type: MatchType,
    ) -> Self {
        Self {
            id,
            trigger_id,
            text: text.into(),
            match_type,
            trigger: None,
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// The joined parent, only if it is present and enabled.
    pub fn active_trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref().filter(|t| t.enabled)
    }
}

/// Citation attached to cross-reactivity rules and timing profiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceSource {
    pub id: EvidenceSourceId,
    pub citation_short: String,
    #[serde(default)]
    pub citation_full: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub scope_tag: String,
}

impl EvidenceSource {
    pub fn new(id: EvidenceSourceId, citation_short: impl Into<String>) -> Self {
        Self {
            id,
            citation_short: citation_short.into(),
            citation_full: String::new(),
            url: None,
            summary: String::new(),
            scope_tag: String::new(),
        }
    }
}

/// States that sensitivity to a source trigger (or category) implies risk
/// from a target trigger (or category).
///
/// Each side is given by a trigger id, a category, or both. A side with
/// neither set is unusable: such a rule never fires or never resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossReactivityRule {
    pub id: RuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_trigger_id: Option<TriggerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_trigger_id: Option<TriggerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_category: Option<String>,
    pub strength: Strength,
    pub evidence_source_id: EvidenceSourceId,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_trigger: Option<Trigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_trigger: Option<Trigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_source: Option<EvidenceSource>,
}

impl CrossReactivityRule {
    pub fn new(id: RuleId, strength: Strength, evidence_source_id: EvidenceSourceId) -> Self {
        Self {
            id,
            source_trigger_id: None,
            source_category: None,
            target_trigger_id: None,
            target_category: None,
            strength,
            evidence_source_id,
            notes: String::new(),
            enabled: true,
            source_trigger: None,
            target_trigger: None,
            evidence_source: None,
        }
    }

    pub fn with_source_trigger(mut self, id: TriggerId) -> Self {
        self.source_trigger_id = Some(id);
        self
    }

    pub fn with_source_category(mut self, category: impl Into<String>) -> Self {
        self.source_category = Some(category.into());
        self
    }

    pub fn with_target_trigger(mut self, id: TriggerId) -> Self {
        self.target_trigger_id = Some(id);
        self
    }

    pub fn with_target_category(mut self, category: impl Into<String>) -> Self {
        self.target_category = Some(category.into());
        self
    }

    pub fn with_evidence(mut self, evidence: EvidenceSource) -> Self {
        self.evidence_source = Some(evidence);
        self
    }

    /// Source category, treating blank strings as unset.
    pub fn source_category(&self) -> Option<&str> {
        non_blank(self.source_category.as_deref())
    }

    /// Target category, treating blank strings as unset.
    pub fn target_category(&self) -> Option<&str> {
        non_blank(self.target_category.as_deref())
    }

    pub fn has_source(&self) -> bool {
        self.source_trigger_id.is_some() || self.source_category().is_some()
    }

    pub fn has_target(&self) -> bool {
        self.target_trigger_id.is_some() || self.target_category().is_some()
    }

    /// Human-readable name of the source side: the joined trigger's name,
    /// falling back to the category.
    pub fn source_name(&self) -> Option<&str> {
        self.source_trigger
            .as_ref()
            .map(|t| t.name.as_str())
            .or_else(|| self.source_category())
    }
}

/// When symptoms from a trigger (or category) tend to show up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceTimingProfile {
    pub id: TimingProfileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_id: Option<TriggerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_category: Option<String>,
    /// 0-24h.
    #[serde(default)]
    pub acute: bool,
    /// 1-7 days.
    #[serde(default)]
    pub subacute: bool,
    /// Weeks or longer, cumulative.
    #[serde(default)]
    pub chronic: bool,
    #[serde(default)]
    pub why: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_source_id: Option<EvidenceSourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_source: Option<EvidenceSource>,
}

impl EvidenceTimingProfile {
    pub fn trigger_category(&self) -> Option<&str> {
        non_blank(self.trigger_category.as_deref())
    }

    pub fn citation_short(&self) -> Option<&str> {
        self.evidence_source
            .as_ref()
            .map(|e| e.citation_short.as_str())
            .filter(|c| !c.trim().is_empty())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_enabled() -> bool {
    true
}
