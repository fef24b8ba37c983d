//! Coarse "what kind of reaction" hint for a scan.
//!
//! Separates triggers that point at immune activation or barrier stress
//! from ones that look like intolerance or irritation. Category lists are
//! configurable; matching against them ignores case.

use knowledge::Severity;
use matcher::MatchResult;
use serde::{Deserialize, Serialize};

const INFLAMMATION_EXPLANATION: &str = "Possible inflammatory trigger: matched patterns are more consistent with immune activation or barrier stress.";
const SYMPTOM_EXPLANATION: &str = "Likely symptom trigger: pattern is more consistent with irritation, intolerance, osmotic load, or motility effects.";
pub(crate) const NO_MATCH_EXPLANATION: &str =
    "Unknown: no matched trigger had enough evidence to classify symptom vs inflammation risk.";
const MIXED_EXPLANATION: &str =
    "Unknown: evidence is mixed or limited, so this result cannot be confidently classified.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ImpactType {
    InflammationLikely,
    SymptomLikely,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImpactInsight {
    pub impact_type: ImpactType,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_short: Option<String>,
}

impl ImpactInsight {
    /// The insight for a scan that matched nothing.
    pub fn unknown() -> Self {
        Self {
            impact_type: ImpactType::Unknown,
            explanation: NO_MATCH_EXPLANATION.to_string(),
            citation_short: None,
        }
    }
}

impl Default for ImpactInsight {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Category lists and the intolerance special case used by [`classify`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImpactConfig {
    /// Any match in one of these points at immune activation.
    #[serde(default = "default_immune_categories")]
    pub immune_categories: Vec<String>,
    /// A scan where every match is in one of these reads as a symptom trigger.
    #[serde(default = "default_symptom_categories")]
    pub symptom_categories: Vec<String>,
    /// Trigger names that are intolerances even at High severity.
    #[serde(default = "default_intolerance_triggers")]
    pub intolerance_triggers: Vec<String>,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            immune_categories: default_immune_categories(),
            symptom_categories: default_symptom_categories(),
            intolerance_triggers: default_intolerance_triggers(),
        }
    }
}

fn default_immune_categories() -> Vec<String> {
    ["Cereal", "Legume", "Nut", "Seed", "Egg", "Seafood", "Other"]
        .map(String::from)
        .to_vec()
}

fn default_symptom_categories() -> Vec<String> {
    [
        "Additive",
        "Nightshade",
        "Fungi/Yeast",
        "Fruit",
        "Vegetable",
        "Seed Oil",
        "Dairy",
    ]
    .map(String::from)
    .to_vec()
}

fn default_intolerance_triggers() -> Vec<String> {
    vec!["Lactose".to_string()]
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    let value = value.to_lowercase();
    list.iter().any(|item| item.to_lowercase() == value)
}

/// Classify a match result.
///
/// `timeline_references` supplies a fallback citation when no cross-reactive
/// match carries one.
pub fn classify(
    result: &MatchResult,
    timeline_references: &[String],
    cfg: &ImpactConfig,
) -> ImpactInsight {
    if result.is_empty() {
        return ImpactInsight::unknown();
    }

    let cross_citations = result
        .cross_reactive_matches
        .iter()
        .filter_map(|m| m.evidence_citation_short.as_deref())
        .filter(|c| !c.trim().is_empty());

    let has_cross_evidence = cross_citations.clone().next().is_some();
    let has_immune_category = result
        .all_matches()
        .any(|m| contains_ignore_case(&cfg.immune_categories, &m.trigger_category));
    let has_high_non_intolerance = result.all_matches().any(|m| {
        m.severity == Severity::High
            && !contains_ignore_case(&cfg.intolerance_triggers, &m.trigger_name)
    });

    if has_cross_evidence || has_immune_category || has_high_non_intolerance {
        let citation = cross_citations
            .chain(timeline_references.iter().map(String::as_str))
            .find(|c| !c.trim().is_empty())
            .map(str::to_string);
        return ImpactInsight {
            impact_type: ImpactType::InflammationLikely,
            explanation: INFLAMMATION_EXPLANATION.to_string(),
            citation_short: citation,
        };
    }

    let has_intolerance = result
        .all_matches()
        .any(|m| contains_ignore_case(&cfg.intolerance_triggers, &m.trigger_name));
    let all_symptom_categories = result
        .all_matches()
        .all(|m| contains_ignore_case(&cfg.symptom_categories, &m.trigger_category));

    if has_intolerance || all_symptom_categories {
        return ImpactInsight {
            impact_type: ImpactType::SymptomLikely,
            explanation: SYMPTOM_EXPLANATION.to_string(),
            citation_short: None,
        };
    }

    ImpactInsight {
        impact_type: ImpactType::Unknown,
        explanation: MIXED_EXPLANATION.to_string(),
        citation_short: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowledge::Strength;
    use matcher::{MatchDetail, MatchReason, SafetyLevel};

    fn detail(name: &str, category: &str, severity: Severity) -> MatchDetail {
        MatchDetail {
            trigger_id: 1,
            trigger_name: name.into(),
            trigger_category: category.into(),
            matched_text: name.to_lowercase(),
            reason: MatchReason::Direct,
            severity,
            evidence_source_id: None,
            evidence_citation_short: None,
            evidence_citation_full: None,
            evidence_summary: None,
            source_name: None,
            strength: None,
        }
    }

    fn result(direct: Vec<MatchDetail>, cross: Vec<MatchDetail>) -> MatchResult {
        MatchResult {
            direct_matches: direct,
            cross_reactive_matches: cross,
            final_status: SafetyLevel::Caution,
        }
    }

    #[test]
    fn nothing_matched_is_unknown() {
        let insight = classify(&MatchResult::default(), &[], &ImpactConfig::default());
        assert_eq!(insight, ImpactInsight::unknown());
    }

    #[test]
    fn immune_category_is_inflammation() {
        let scan = result(vec![detail("Soy", "legume", Severity::Moderate)], vec![]);
        let insight = classify(&scan, &["Sicherer 2001".to_string()], &ImpactConfig::default());
        assert_eq!(insight.impact_type, ImpactType::InflammationLikely);
        assert_eq!(insight.citation_short.as_deref(), Some("Sicherer 2001"));
    }

    #[test]
    fn cross_reactive_citation_wins() {
        let mut legumes = detail("Legumes", "Legume", Severity::Moderate);
        legumes.reason = MatchReason::CrossReact;
        legumes.evidence_citation_short = Some("Bublin 2014".into());
        legumes.strength = Some(Strength::Medium);

        let scan = result(vec![detail("Soy", "Legume", Severity::High)], vec![legumes]);
        let insight = classify(&scan, &["Sicherer 2001".to_string()], &ImpactConfig::default());
        assert_eq!(insight.citation_short.as_deref(), Some("Bublin 2014"));
    }

    #[test]
    fn lactose_is_a_symptom_trigger() {
        let scan = result(vec![detail("Lactose", "Dairy", Severity::High)], vec![]);
        let insight = classify(&scan, &[], &ImpactConfig::default());
        assert_eq!(insight.impact_type, ImpactType::SymptomLikely);
        assert!(insight.citation_short.is_none());
    }

    #[test]
    fn high_severity_outside_known_categories_is_inflammation() {
        let scan = result(vec![detail("Casein", "Dairy", Severity::High)], vec![]);
        let insight = classify(&scan, &[], &ImpactConfig::default());
        assert_eq!(insight.impact_type, ImpactType::InflammationLikely);
        assert!(insight.citation_short.is_none());
    }

    #[test]
    fn all_symptom_categories_is_symptom() {
        let scan = result(
            vec![
                detail("Carrageenan", "Additive", Severity::Moderate),
                detail("Tomato", "Nightshade", Severity::Moderate),
            ],
            vec![],
        );
        let insight = classify(&scan, &[], &ImpactConfig::default());
        assert_eq!(insight.impact_type, ImpactType::SymptomLikely);
    }

    #[test]
    fn mixed_evidence_is_unknown() {
        let scan = result(
            vec![
                detail("Carrageenan", "Additive", Severity::Moderate),
                detail("Mystery", "Unlisted", Severity::Low),
            ],
            vec![],
        );
        let insight = classify(&scan, &[], &ImpactConfig::default());
        assert_eq!(insight.impact_type, ImpactType::Unknown);
        assert_ne!(insight.explanation, NO_MATCH_EXPLANATION);
    }

    #[test]
    fn categories_are_configurable() {
        let cfg = ImpactConfig {
            immune_categories: vec!["Nightshade".into()],
            ..ImpactConfig::default()
        };
        let scan = result(vec![detail("Tomato", "Nightshade", Severity::Moderate)], vec![]);
        assert_eq!(
            classify(&scan, &[], &cfg).impact_type,
            ImpactType::InflammationLikely
        );
    }
}
