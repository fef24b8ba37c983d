//! Onset timeline for a scan.
//!
//! Timing profiles in the knowledge base say when symptoms from a trigger
//! (or a whole category) tend to appear. A profile applies to a scan when
//! any match, direct or cross-reactive, has its trigger id or category.

use std::collections::HashSet;

use knowledge::{EvidenceTimingProfile, TriggerId};
use matcher::MatchDetail;
use serde::{Deserialize, Serialize};

pub const ACUTE_LABEL: &str = "Acute (0–24h)";
pub const SUBACUTE_LABEL: &str = "Subacute (1–7 days)";
pub const CHRONIC_LABEL: &str = "Chronic/Cumulative (weeks+)";

/// Which onset windows at least one applicable profile covers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineFlags {
    pub acute: bool,
    pub subacute: bool,
    pub chronic: bool,
}

/// One onset window with the reasoning and citations behind it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineBucket {
    pub label: String,
    pub applicable: bool,
    /// Distinct explanations of the profiles in this window, space-joined.
    pub why: String,
    pub evidence_citations: Vec<String>,
}

impl TimelineBucket {
    fn unused(label: &str) -> Self {
        Self {
            label: label.to_string(),
            applicable: false,
            why: String::new(),
            evidence_citations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timeline {
    pub flags: TimelineFlags,
    pub explanation: String,
    pub evidence_references: Vec<String>,
    /// Always the acute, subacute and chronic windows, in that order.
    pub buckets: Vec<TimelineBucket>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::empty()
    }
}

impl Timeline {
    /// No applicable profiles: all flags off, the three windows labelled but unused.
    pub fn empty() -> Self {
        Self {
            flags: TimelineFlags::default(),
            explanation: String::new(),
            evidence_references: Vec::new(),
            buckets: vec![
                TimelineBucket::unused(ACUTE_LABEL),
                TimelineBucket::unused(SUBACUTE_LABEL),
                TimelineBucket::unused(CHRONIC_LABEL),
            ],
        }
    }

    pub fn build<'a, I>(matches: I, profiles: &[EvidenceTimingProfile]) -> Self
    where
        I: IntoIterator<Item = &'a MatchDetail>,
    {
        let mut trigger_ids: HashSet<TriggerId> = HashSet::new();
        let mut categories: HashSet<String> = HashSet::new();
        for detail in matches {
            trigger_ids.insert(detail.trigger_id);
            if !detail.trigger_category.trim().is_empty() {
                categories.insert(detail.trigger_category.to_lowercase());
            }
        }
        if trigger_ids.is_empty() {
            return Self::empty();
        }

        let applicable: Vec<&EvidenceTimingProfile> = profiles
            .iter()
            .filter(|p| {
                p.trigger_id.is_some_and(|id| trigger_ids.contains(&id))
                    || p
                        .trigger_category()
                        .is_some_and(|c| categories.contains(&c.to_lowercase()))
            })
            .collect();
        if applicable.is_empty() {
            return Self::empty();
        }

        Self {
            flags: TimelineFlags {
                acute: applicable.iter().any(|p| p.acute),
                subacute: applicable.iter().any(|p| p.subacute),
                chronic: applicable.iter().any(|p| p.chronic),
            },
            explanation: joined_why(&applicable),
            evidence_references: citations(&applicable),
            buckets: vec![
                bucket(ACUTE_LABEL, &applicable, |p| p.acute),
                bucket(SUBACUTE_LABEL, &applicable, |p| p.subacute),
                bucket(CHRONIC_LABEL, &applicable, |p| p.chronic),
            ],
        }
    }
}

fn bucket(
    label: &str,
    profiles: &[&EvidenceTimingProfile],
    in_window: impl Fn(&EvidenceTimingProfile) -> bool,
) -> TimelineBucket {
    let selected: Vec<&EvidenceTimingProfile> =
        profiles.iter().copied().filter(|p| in_window(p)).collect();
    TimelineBucket {
        label: label.to_string(),
        applicable: !selected.is_empty(),
        why: joined_why(&selected),
        evidence_citations: citations(&selected),
    }
}

fn joined_why(profiles: &[&EvidenceTimingProfile]) -> String {
    distinct(profiles.iter().map(|p| p.why.as_str())).join(" ")
}

fn citations(profiles: &[&EvidenceTimingProfile]) -> Vec<String> {
    distinct(profiles.iter().filter_map(|p| p.citation_short()))
}

/// Non-blank values, first occurrence order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowledge::{EvidenceSource, Severity};
    use matcher::MatchReason;

    fn detail(id: TriggerId, category: &str) -> MatchDetail {
        MatchDetail {
            trigger_id: id,
            trigger_name: format!("t{id}"),
            trigger_category: category.into(),
            matched_text: format!("t{id}"),
            reason: MatchReason::Direct,
            severity: Severity::Moderate,
            evidence_source_id: None,
            evidence_citation_short: None,
            evidence_citation_full: None,
            evidence_summary: None,
            source_name: None,
            strength: None,
        }
    }

    fn profile(id: u32, why: &str, citation: Option<&str>) -> EvidenceTimingProfile {
        EvidenceTimingProfile {
            id,
            trigger_id: None,
            trigger_category: None,
            acute: false,
            subacute: false,
            chronic: false,
            why: why.into(),
            evidence_source_id: None,
            evidence_source: citation.map(|c| EvidenceSource::new(id, c)),
        }
    }

    #[test]
    fn no_matches_gives_three_unused_buckets() {
        let timeline = Timeline::build(std::iter::empty(), &[]);
        assert_eq!(timeline, Timeline::empty());
        let labels: Vec<&str> = timeline.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec![ACUTE_LABEL, SUBACUTE_LABEL, CHRONIC_LABEL]);
        assert!(timeline.buckets.iter().all(|b| !b.applicable));
    }

    #[test]
    fn unrelated_profiles_are_ignored() {
        let mut lactose = profile(1, "fast", Some("Bahna 2002"));
        lactose.trigger_id = Some(12);
        lactose.acute = true;

        let matches = [detail(4, "Legume")];
        assert_eq!(Timeline::build(&matches, &[lactose]), Timeline::empty());
    }

    #[test]
    fn profiles_apply_by_id_or_category() {
        let mut by_id = profile(1, "Shows up within hours.", Some("Bahna 2002"));
        by_id.trigger_id = Some(12);
        by_id.acute = true;

        let mut by_category = profile(2, "Builds over weeks.", Some("Iablokov 2010"));
        by_category.trigger_category = Some("nightshade".into());
        by_category.subacute = true;
        by_category.chronic = true;

        let matches = [detail(12, "Dairy"), detail(20, "Nightshade")];
        let timeline = Timeline::build(&matches, &[by_id, by_category]);

        assert_eq!(
            timeline.flags,
            TimelineFlags {
                acute: true,
                subacute: true,
                chronic: true
            }
        );
        assert_eq!(
            timeline.explanation,
            "Shows up within hours. Builds over weeks."
        );
        assert_eq!(timeline.evidence_references, vec!["Bahna 2002", "Iablokov 2010"]);

        let acute = &timeline.buckets[0];
        assert!(acute.applicable);
        assert_eq!(acute.evidence_citations, vec!["Bahna 2002"]);
        let chronic = &timeline.buckets[2];
        assert_eq!(chronic.why, "Builds over weeks.");
    }

    #[test]
    fn duplicate_text_and_blank_citations_collapse() {
        let mut a = profile(1, "Same reason.", Some("Lopata 2010"));
        a.trigger_category = Some("Seafood".into());
        a.acute = true;
        let mut b = profile(2, "Same reason.", Some("Lopata 2010"));
        b.trigger_id = Some(18);
        b.acute = true;
        let mut c = profile(3, "  ", Some(" "));
        c.trigger_id = Some(18);

        let timeline = Timeline::build(&[detail(18, "Seafood")], &[a, b, c]);
        assert_eq!(timeline.explanation, "Same reason.");
        assert_eq!(timeline.evidence_references, vec!["Lopata 2010"]);
        assert!(!timeline.flags.chronic);
        assert!(!timeline.buckets[1].applicable);
    }
}
