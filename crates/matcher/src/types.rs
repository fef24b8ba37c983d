use std::fmt;

use knowledge::{EvidenceSourceId, KnowledgeError, Severity, Strength, TriggerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a trigger ended up in a [`MatchResult`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MatchReason {
    /// A token equals the trigger's name.
    Direct,
    /// A token satisfied one of the trigger's synonyms.
    Synonym,
    /// Surfaced by a cross-reactivity rule from a directly matched trigger or category.
    CrossReact,
}

impl MatchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchReason::Direct => "Direct",
            MatchReason::Synonym => "Synonym",
            MatchReason::CrossReact => "CrossReact",
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final verdict of a scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SafetyLevel {
    Safe,
    Caution,
    Avoid,
    /// Nothing in the label matched the knowledge base.
    #[default]
    NotFound,
}

impl SafetyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyLevel::Safe => "Safe",
            SafetyLevel::Caution => "Caution",
            SafetyLevel::Avoid => "Avoid",
            SafetyLevel::NotFound => "NotFound",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matched trigger, produced fresh per scan.
///
/// The evidence, source and strength fields are only populated for
/// [`MatchReason::CrossReact`] details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchDetail {
    pub trigger_id: TriggerId,
    pub trigger_name: String,
    pub trigger_category: String,
    /// The token that matched for synonyms; the trigger name otherwise.
    pub matched_text: String,
    pub reason: MatchReason,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_source_id: Option<EvidenceSourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_citation_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_citation_full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_summary: Option<String>,
    /// Name of the rule's source trigger, or its source category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<Strength>,
}

/// Output of a single match call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    /// Direct and synonym matches, at most one per trigger id.
    pub direct_matches: Vec<MatchDetail>,
    /// Cross-reactive matches, at most one per trigger id and never a trigger
    /// that is already in `direct_matches`.
    pub cross_reactive_matches: Vec<MatchDetail>,
    pub final_status: SafetyLevel,
}

impl MatchResult {
    /// Direct matches followed by cross-reactive ones.
    pub fn all_matches(&self) -> impl Iterator<Item = &MatchDetail> {
        self.direct_matches
            .iter()
            .chain(self.cross_reactive_matches.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.direct_matches.is_empty() && self.cross_reactive_matches.is_empty()
    }
}

/// Errors produced by the matching layer.
///
/// Label text never fails to match; only the dependencies can.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The knowledge base could not serve the reference tables.
    #[error("knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),
    /// The tokenizer configuration is invalid.
    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] canonical::CanonicalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: TriggerId, reason: MatchReason) -> MatchDetail {
        MatchDetail {
            trigger_id: id,
            trigger_name: format!("t{id}"),
            trigger_category: "Legume".into(),
            matched_text: format!("t{id}"),
            reason,
            severity: Severity::Low,
            evidence_source_id: None,
            evidence_citation_short: None,
            evidence_citation_full: None,
            evidence_summary: None,
            source_name: None,
            strength: None,
        }
    }

    #[test]
    fn default_result_is_empty_and_not_found() {
        let result = MatchResult::default();
        assert!(result.is_empty());
        assert_eq!(result.final_status, SafetyLevel::NotFound);
    }

    #[test]
    fn all_matches_lists_direct_first() {
        let result = MatchResult {
            direct_matches: vec![detail(1, MatchReason::Direct)],
            cross_reactive_matches: vec![detail(2, MatchReason::CrossReact)],
            final_status: SafetyLevel::Safe,
        };
        let ids: Vec<TriggerId> = result.all_matches().map(|d| d.trigger_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn cross_react_only_fields_are_skipped_when_unset() {
        let json = serde_json::to_value(detail(4, MatchReason::Synonym)).unwrap();
        assert_eq!(json["reason"], "Synonym");
        assert!(json.get("strength").is_none());
        assert!(json.get("evidence_source_id").is_none());
    }
}
