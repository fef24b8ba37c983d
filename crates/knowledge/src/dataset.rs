//! Loadable reference tables.
//!
//! A [`Dataset`] is the owner-side view of the knowledge base: flat tables
//! keyed by id, with relations expressed as foreign keys. The in-memory
//! accessor joins them at read time. The seed tables ship inside the crate
//! as JSON so the matching code stays free of domain literals.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::KnowledgeError;
use crate::types::{
    CrossReactivityRule, EvidenceSource, EvidenceSourceId, EvidenceTimingProfile, Synonym, Trigger,
    TriggerId,
};

const SEED_JSON: &str = include_str!("../data/seed.json");

/// Flat reference tables, as stored by the knowledge base owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    /// Free-form dataset version, e.g. `"2026.02"`.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub synonyms: Vec<Synonym>,
    #[serde(default)]
    pub evidence_sources: Vec<EvidenceSource>,
    #[serde(default)]
    pub rules: Vec<CrossReactivityRule>,
    #[serde(default)]
    pub timing_profiles: Vec<EvidenceTimingProfile>,
}

impl Dataset {
    /// The seed tables embedded in this crate.
    pub fn seed() -> Result<Self, KnowledgeError> {
        Self::from_json(SEED_JSON)
    }

    /// Parse and validate a dataset from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Read, parse and validate a dataset file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let dataset = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            version = %dataset.version,
            triggers = dataset.triggers.len(),
            synonyms = dataset.synonyms.len(),
            rules = dataset.rules.len(),
            "knowledge.load"
        );
        Ok(dataset)
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.id == id)
    }

    /// Check the ownership rules the matcher relies on.
    ///
    /// - trigger ids and names are unique (names case-insensitively)
    /// - every synonym points at an existing trigger and is non-blank
    /// - a trigger never carries the same synonym text twice
    /// - evidence ids and short citations are unique
    /// - every rule and profile reference resolves
    pub fn validate(&self) -> Result<(), KnowledgeError> {
        let mut trigger_ids = HashSet::new();
        let mut trigger_names = HashSet::new();
        for trigger in &self.triggers {
            if !trigger_ids.insert(trigger.id) {
                return Err(KnowledgeError::integrity(format!(
                    "duplicate trigger id {}",
                    trigger.id
                )));
            }
            if trigger.name.trim().is_empty() {
                return Err(KnowledgeError::integrity(format!(
                    "trigger {} has a blank name",
                    trigger.id
                )));
            }
            if !trigger_names.insert(trigger.name.to_lowercase()) {
                return Err(KnowledgeError::integrity(format!(
                    "duplicate trigger name '{}'",
                    trigger.name
                )));
            }
        }

        let mut synonym_keys = HashSet::new();
        for synonym in &self.synonyms {
            if !trigger_ids.contains(&synonym.trigger_id) {
                return Err(KnowledgeError::integrity(format!(
                    "synonym {} references unknown trigger {}",
                    synonym.id, synonym.trigger_id
                )));
            }
            if synonym.text.trim().is_empty() {
                return Err(KnowledgeError::integrity(format!(
                    "synonym {} has blank text",
                    synonym.id
                )));
            }
            if !synonym_keys.insert((synonym.trigger_id, synonym.text.to_lowercase())) {
                return Err(KnowledgeError::integrity(format!(
                    "trigger {} lists synonym '{}' twice",
                    synonym.trigger_id, synonym.text
                )));
            }
        }

        let mut evidence_ids = HashSet::new();
        let mut citations = HashSet::new();
        for evidence in &self.evidence_sources {
            if !evidence_ids.insert(evidence.id) {
                return Err(KnowledgeError::integrity(format!(
                    "duplicate evidence source id {}",
                    evidence.id
                )));
            }
            if !citations.insert(evidence.citation_short.as_str()) {
                return Err(KnowledgeError::integrity(format!(
                    "duplicate citation '{}'",
                    evidence.citation_short
                )));
            }
        }

        for rule in &self.rules {
            if !evidence_ids.contains(&rule.evidence_source_id) {
                return Err(KnowledgeError::integrity(format!(
                    "rule {} references unknown evidence source {}",
                    rule.id, rule.evidence_source_id
                )));
            }
            for side in [rule.source_trigger_id, rule.target_trigger_id]
                .into_iter()
                .flatten()
            {
                if !trigger_ids.contains(&side) {
                    return Err(KnowledgeError::integrity(format!(
                        "rule {} references unknown trigger {}",
                        rule.id, side
                    )));
                }
            }
        }

        for profile in &self.timing_profiles {
            if let Some(id) = profile.trigger_id {
                if !trigger_ids.contains(&id) {
                    return Err(KnowledgeError::integrity(format!(
                        "timing profile {} references unknown trigger {}",
                        profile.id, id
                    )));
                }
            }
            if let Some(id) = profile.evidence_source_id {
                if !evidence_ids.contains(&id) {
                    return Err(KnowledgeError::integrity(format!(
                        "timing profile {} references unknown evidence source {}",
                        profile.id, id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Enabled triggers, in table order.
    pub(crate) fn enabled_triggers(&self) -> Vec<Trigger> {
        self.triggers.iter().filter(|t| t.enabled).cloned().collect()
    }

    /// All synonyms with their parent trigger joined, disabled parents included.
    pub(crate) fn joined_synonyms(&self) -> Vec<Synonym> {
        let triggers = self.trigger_map();
        self.synonyms
            .iter()
            .map(|s| Synonym {
                trigger: triggers.get(&s.trigger_id).map(|t| (*t).clone()),
                ..s.clone()
            })
            .collect()
    }

    /// Enabled rules with source, target and evidence joined where the ids resolve.
    pub(crate) fn joined_rules(&self) -> Vec<CrossReactivityRule> {
        let triggers = self.trigger_map();
        let evidence = self.evidence_map();
        self.rules
            .iter()
            .filter(|r| r.enabled)
            .map(|r| CrossReactivityRule {
                source_trigger: r
                    .source_trigger_id
                    .and_then(|id| triggers.get(&id))
                    .map(|t| (*t).clone()),
                target_trigger: r
                    .target_trigger_id
                    .and_then(|id| triggers.get(&id))
                    .map(|t| (*t).clone()),
                evidence_source: evidence.get(&r.evidence_source_id).map(|e| (*e).clone()),
                ..r.clone()
            })
            .collect()
    }

    pub(crate) fn joined_timing_profiles(&self) -> Vec<EvidenceTimingProfile> {
        let evidence = self.evidence_map();
        self.timing_profiles
            .iter()
            .map(|p| EvidenceTimingProfile {
                evidence_source: p
                    .evidence_source_id
                    .and_then(|id| evidence.get(&id))
                    .map(|e| (*e).clone()),
                ..p.clone()
            })
            .collect()
    }

    fn trigger_map(&self) -> HashMap<TriggerId, &Trigger> {
        self.triggers.iter().map(|t| (t.id, t)).collect()
    }

    fn evidence_map(&self) -> HashMap<EvidenceSourceId, &EvidenceSource> {
        self.evidence_sources.iter().map(|e| (e.id, e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::{MatchType, Severity, Strength};

    fn small() -> Dataset {
        Dataset {
            version: "test".into(),
            triggers: vec![
                Trigger::new(3, "Malt", "Cereal", Severity::High),
                Trigger::new(4, "Soy", "Legume", Severity::High),
            ],
            synonyms: vec![Synonym::new(1, 3, "malt", MatchType::WordBoundaryContains)],
            evidence_sources: vec![EvidenceSource::new(2, "Bublin 2014")],
            rules: vec![CrossReactivityRule::new(1, Strength::Medium, 2)
                .with_source_category("Legume")
                .with_target_category("Legume")],
            timing_profiles: Vec::new(),
        }
    }

    #[test]
    fn seed_dataset_is_valid() {
        let seed = Dataset::seed().expect("seed parses and validates");
        assert!(!seed.triggers.is_empty());
        assert!(!seed.synonyms.is_empty());
        assert!(!seed.rules.is_empty());
        assert!(!seed.timing_profiles.is_empty());
    }

    #[test]
    fn small_dataset_is_valid() {
        assert!(small().validate().is_ok());
    }

    #[test]
    fn duplicate_trigger_name_rejected_case_insensitively() {
        let mut ds = small();
        ds.triggers.push(Trigger::new(9, "SOY", "Legume", Severity::Low));
        let err = ds.validate().expect_err("duplicate name");
        assert!(matches!(err, KnowledgeError::Integrity(msg) if msg.contains("SOY")));
    }

    #[test]
    fn dangling_synonym_rejected() {
        let mut ds = small();
        ds.synonyms.push(Synonym::new(2, 99, "ghost", MatchType::Exact));
        assert!(matches!(ds.validate(), Err(KnowledgeError::Integrity(_))));
    }

    #[test]
    fn rule_without_evidence_rejected() {
        let mut ds = small();
        ds.rules.push(CrossReactivityRule::new(2, Strength::Low, 42).with_source_trigger(4));
        let err = ds.validate().expect_err("missing evidence");
        assert!(err.to_string().contains("evidence source 42"));
    }

    #[test]
    fn joins_resolve_parents_and_evidence() {
        let ds = small();
        let synonyms = ds.joined_synonyms();
        assert_eq!(synonyms[0].trigger.as_ref().map(|t| t.name.as_str()), Some("Malt"));

        let rules = ds.joined_rules();
        assert_eq!(
            rules[0].evidence_source.as_ref().map(|e| e.citation_short.as_str()),
            Some("Bublin 2014")
        );
        assert!(rules[0].source_trigger.is_none());
    }

    #[test]
    fn disabled_rules_are_not_joined() {
        let mut ds = small();
        ds.rules[0].enabled = false;
        assert!(ds.joined_rules().is_empty());
    }

    #[test]
    fn load_from_file() {
        let json = serde_json::to_string(&small()).expect("serialize");
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write");

        let loaded = Dataset::from_path(file.path()).expect("load");
        assert_eq!(loaded, small());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Dataset::from_json("{ \"triggers\": [ { \"id\": 1 } ] }"),
            Err(KnowledgeError::Parse(_))
        ));
    }
}
