//! Analysis orchestrator: one call from label text to a presentable verdict.
//!
//! [`Analyzer::analyze`] runs the matcher and dresses its result up with
//! warning lines, a summary sentence, the onset timeline and an impact hint.

use std::sync::Arc;
use std::time::Instant;

use knowledge::{KnowledgeBase, KnowledgeError};
use matcher::{MatchDetail, MatchError, MatchResult, Matcher, SafetyLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span};

use crate::impact::{ImpactConfig, ImpactInsight, classify};
use crate::timeline::Timeline;

pub const EMPTY_INPUT_SUMMARY: &str = "No ingredients provided.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("match failed: {0}")]
    Match(#[from] MatchError),
    #[error("knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),
}

/// Verdict reported for blank label text, which never reaches the matcher.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyInputStatus {
    #[default]
    NotFound,
    Safe,
}

impl EmptyInputStatus {
    pub fn safety_level(self) -> SafetyLevel {
        match self {
            EmptyInputStatus::NotFound => SafetyLevel::NotFound,
            EmptyInputStatus::Safe => SafetyLevel::Safe,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub empty_input_status: EmptyInputStatus,
    /// Fetch timing profiles and build the onset timeline.
    #[serde(default = "default_timeline")]
    pub timeline: bool,
    #[serde(default)]
    pub impact: ImpactConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            empty_input_status: EmptyInputStatus::default(),
            timeline: default_timeline(),
            impact: ImpactConfig::default(),
        }
    }
}

fn default_timeline() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub safety_level: SafetyLevel,
    /// Distinct names of direct and synonym matches, in match order.
    pub detected_triggers: Vec<String>,
    pub warnings: Vec<String>,
    pub summary: String,
    pub direct_matches: Vec<MatchDetail>,
    pub cross_reactive_matches: Vec<MatchDetail>,
    pub timeline: Timeline,
    pub impact: ImpactInsight,
}

impl AnalysisResult {
    fn empty_input(status: SafetyLevel) -> Self {
        Self {
            safety_level: status,
            detected_triggers: Vec::new(),
            warnings: Vec::new(),
            summary: EMPTY_INPUT_SUMMARY.to_string(),
            direct_matches: Vec::new(),
            cross_reactive_matches: Vec::new(),
            timeline: Timeline::empty(),
            impact: ImpactInsight::unknown(),
        }
    }

    /// The matcher's view of this analysis.
    pub fn match_result(&self) -> MatchResult {
        MatchResult {
            direct_matches: self.direct_matches.clone(),
            cross_reactive_matches: self.cross_reactive_matches.clone(),
            final_status: self.safety_level,
        }
    }
}

/// Sentence shown above the match list.
pub fn summary(status: SafetyLevel, flare_mode: bool) -> &'static str {
    match status {
        SafetyLevel::Avoid if flare_mode => "AVOID - Flare mode escalation active.",
        SafetyLevel::Avoid => "AVOID - High-risk triggers found.",
        SafetyLevel::Caution => "CAUTION - Moderate-risk triggers found.",
        SafetyLevel::Safe => "SAFE - All ingredients recognized with no triggers found.",
        SafetyLevel::NotFound => "NOT FOUND - No recognized ingredients matched our database.",
    }
}

/// One line per direct match, then one per cross-reactive match.
pub fn warnings(result: &MatchResult) -> Vec<String> {
    let direct = result
        .direct_matches
        .iter()
        .map(|m| format!("{} ({})", m.trigger_name, m.reason));
    let cross = result.cross_reactive_matches.iter().map(|m| {
        format!(
            "Cross-reactive: {} → {} [{}] - {}",
            m.source_name.as_deref().unwrap_or_default(),
            m.trigger_name,
            m.strength.map(|s| s.as_str()).unwrap_or_default(),
            m.evidence_citation_short.as_deref().unwrap_or_default(),
        )
    });
    direct.chain(cross).collect()
}

fn detected_triggers(result: &MatchResult) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(result.direct_matches.len());
    for detail in &result.direct_matches {
        if !names.contains(&detail.trigger_name) {
            names.push(detail.trigger_name.clone());
        }
    }
    names
}

pub struct Analyzer<K: ?Sized> {
    config: AnalysisConfig,
    matcher: Matcher<K>,
}

impl<K: KnowledgeBase> Analyzer<K> {
    pub fn new(knowledge: K) -> Self {
        Self::with_matcher(Matcher::new(knowledge), AnalysisConfig::default())
    }
}

impl<K: KnowledgeBase + ?Sized> Analyzer<K> {
    pub fn with_knowledge_arc(knowledge: Arc<K>) -> Self {
        Self::with_matcher(Matcher::with_knowledge_arc(knowledge), AnalysisConfig::default())
    }

    pub fn with_matcher(matcher: Matcher<K>, config: AnalysisConfig) -> Self {
        Self { config, matcher }
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn matcher(&self) -> &Matcher<K> {
        &self.matcher
    }

    /// Analyze a label.
    ///
    /// Blank text short-circuits to the configured empty-input verdict
    /// without touching the knowledge base. Knowledge base failures are
    /// returned unchanged.
    pub async fn analyze(
        &self,
        raw: &str,
        flare_mode: bool,
    ) -> Result<AnalysisResult, AnalysisError> {
        if raw.trim().is_empty() {
            let status = self.config.empty_input_status.safety_level();
            debug!(status = %status, "analysis.empty_input");
            return Ok(AnalysisResult::empty_input(status));
        }

        let span = info_span!("analysis.analyze", flare_mode);
        async move {
            let start = Instant::now();
            let matched = self.matcher.match_ingredients(raw, flare_mode).await?;

            let timeline = if self.config.timeline && !matched.is_empty() {
                let profiles = self.matcher.knowledge().timing_profiles().await?;
                Timeline::build(matched.all_matches(), &profiles)
            } else {
                Timeline::empty()
            };
            let impact = classify(&matched, &timeline.evidence_references, &self.config.impact);

            let result = AnalysisResult {
                safety_level: matched.final_status,
                detected_triggers: detected_triggers(&matched),
                warnings: warnings(&matched),
                summary: summary(matched.final_status, flare_mode).to_string(),
                timeline,
                impact,
                direct_matches: matched.direct_matches,
                cross_reactive_matches: matched.cross_reactive_matches,
            };

            info!(
                status = %result.safety_level,
                direct = result.direct_matches.len(),
                cross_reactive = result.cross_reactive_matches.len(),
                impact = ?result.impact.impact_type,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "analysis.analyze"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }
}
