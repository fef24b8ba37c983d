//! Scan history rows.
//!
//! The core never stores anything. Callers that keep a scan history build a
//! [`ScanRecord`] from an analysis and persist it themselves; this is where
//! the tagged enums become plain strings.

use chrono::{DateTime, Utc};
use knowledge::{EvidenceSourceId, TriggerId};
use matcher::MatchDetail;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanMatch {
    pub trigger_id: TriggerId,
    pub trigger_name: String,
    pub trigger_category: String,
    pub matched_text: String,
    pub reason: String,
    pub severity: String,
    #[serde(default)]
    pub evidence_source_id: Option<EvidenceSourceId>,
    #[serde(default)]
    pub evidence_citation_short: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub strength: Option<String>,
}

impl From<&MatchDetail> for ScanMatch {
    fn from(detail: &MatchDetail) -> Self {
        Self {
            trigger_id: detail.trigger_id,
            trigger_name: detail.trigger_name.clone(),
            trigger_category: detail.trigger_category.clone(),
            matched_text: detail.matched_text.clone(),
            reason: detail.reason.as_str().to_string(),
            severity: detail.severity.as_str().to_string(),
            evidence_source_id: detail.evidence_source_id,
            evidence_citation_short: detail.evidence_citation_short.clone(),
            source_name: detail.source_name.clone(),
            strength: detail.strength.map(|s| s.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanRecord {
    pub scanned_at: DateTime<Utc>,
    pub ingredients: String,
    pub final_status: String,
    pub flare_mode: bool,
    pub summary: String,
    /// Direct matches first, then cross-reactive ones.
    pub matches: Vec<ScanMatch>,
}

impl ScanRecord {
    pub fn from_analysis(
        ingredients: &str,
        flare_mode: bool,
        analysis: &AnalysisResult,
        scanned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            scanned_at,
            ingredients: ingredients.to_string(),
            final_status: analysis.safety_level.as_str().to_string(),
            flare_mode,
            summary: analysis.summary.clone(),
            matches: analysis
                .direct_matches
                .iter()
                .chain(&analysis.cross_reactive_matches)
                .map(ScanMatch::from)
                .collect(),
        }
    }
}
