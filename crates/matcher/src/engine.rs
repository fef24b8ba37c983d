use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use canonical::{tokenize, tokenize_with_config, TokenizerConfig};
use knowledge::{
    CrossReactivityRule, KnowledgeBase, KnowledgeSnapshot, Synonym, Trigger, TriggerId,
};
use tracing::{debug, info_span, warn, Instrument};

use crate::metrics::metrics_recorder;
use crate::status::compute_status;
use crate::synonym::SynonymTable;
use crate::types::{MatchDetail, MatchError, MatchReason, MatchResult};


/// Matches ingredient labels against a [`KnowledgeBase`].
///
/// The matcher owns no reference data. Each call fetches a fresh
/// [`KnowledgeSnapshot`] and evaluates the label against it, so toggles made
/// by the knowledge base owner show up on the next call. Compiled synonym
/// patterns are kept between calls and rebuilt only when the synonym table
/// in the snapshot changes.
pub struct Matcher<K: ?Sized> {
    tokenizer: TokenizerConfig,
    synonyms: RwLock<Option<Arc<SynonymTable>>>,
    knowledge: Arc<K>,
}

impl<K: KnowledgeBase> Matcher<K> {
    pub fn new(knowledge: K) -> Self {
        Self::with_knowledge_arc(Arc::new(knowledge))
    }
}

impl<K: KnowledgeBase + ?Sized> Matcher<K> {
    /// Construct a matcher from a shared knowledge base handle.
    pub fn with_knowledge_arc(knowledge: Arc<K>) -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            synonyms: RwLock::new(None),
            knowledge,
        }
    }

    /// Replace the tokenizer configuration after validating it.
    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Result<Self, MatchError> {
        tokenizer.validate()?;
        self.tokenizer = tokenizer;
        Ok(self)
    }

    pub fn knowledge(&self) -> &Arc<K> {
        &self.knowledge
    }

    pub fn tokenizer(&self) -> &TokenizerConfig {
        &self.tokenizer
    }

    /// The compiled table for `synonyms`, reusing the cached one when the
    /// table is unchanged. A poisoned cache is bypassed, never fatal.
    fn synonym_table(&self, synonyms: &[Synonym]) -> Arc<SynonymTable> {
        if let Ok(guard) = self.synonyms.read() {
            if let Some(table) = guard.as_ref().filter(|t| t.is_compiled_from(synonyms)) {
                return Arc::clone(table);
            }
        }

        let table = Arc::new(SynonymTable::compile(synonyms));
        debug!(compiled = table.compiled(), "matcher.synonyms_compiled");
        if let Ok(mut guard) = self.synonyms.write() {
            *guard = Some(Arc::clone(&table));
        }
        table
    }

    #[cfg(test)]
    pub(crate) fn cached_synonyms(&self) -> Option<Arc<SynonymTable>> {
        self.synonyms.read().ok().and_then(|guard| guard.clone())
    }

    /// Tokenize `raw`, fetch the reference tables and classify.
    ///
    /// Any label text is valid input. The only failure is the knowledge base
    /// failing to answer, which is returned unchanged and never retried.
    pub async fn match_ingredients(
        &self,
        raw: &str,
        flare_mode: bool,
    ) -> Result<MatchResult, MatchError> {
        let span = info_span!("matcher.match", flare_mode, input_len = raw.len());
        async move {
            let start = Instant::now();
            let tokens = tokenize_with_config(raw, &self.tokenizer)?;

            let snapshot = match self.knowledge.snapshot().await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(error = %err, "matcher.knowledge_unavailable");
                    return Err(err.into());
                }
            };

            let synonyms = self.synonym_table(&snapshot.synonyms);
            let result = evaluate_compiled(&snapshot, &synonyms, &tokens, flare_mode);
            let latency = start.elapsed();

            debug!(
                tokens = tokens.len(),
                direct = result.direct_matches.len(),
                cross_reactive = result.cross_reactive_matches.len(),
                status = %result.final_status,
                elapsed_micros = latency.as_micros() as u64,
                "matcher.match"
            );

            if let Some(recorder) = metrics_recorder() {
                recorder.record_match(
                    latency,
                    result.direct_matches.len(),
                    result.cross_reactive_matches.len(),
                    result.final_status,
                );
            }

            Ok(result)
        }
        .instrument(span)
        .await
    }
}

/// Classify a raw label against a snapshot using the default tokenizer.
///
/// Pure: the same snapshot, label and flare flag always give an equal result.
pub fn evaluate(snapshot: &KnowledgeSnapshot, raw: &str, flare_mode: bool) -> MatchResult {
    evaluate_tokens(snapshot, &tokenize(raw), flare_mode)
}

/// Classify already tokenized label text against a snapshot.
pub fn evaluate_tokens(
    snapshot: &KnowledgeSnapshot,
    tokens: &[String],
    flare_mode: bool,
) -> MatchResult {
    let synonyms = SynonymTable::compile(&snapshot.synonyms);
    evaluate_compiled(snapshot, &synonyms, tokens, flare_mode)
}

/// [`evaluate_tokens`] with the synonym table compiled ahead of time.
///
/// `synonyms` must be compiled from `snapshot.synonyms`; the synonym pass
/// reads the table, not the snapshot.
pub fn evaluate_compiled(
    snapshot: &KnowledgeSnapshot,
    synonyms: &SynonymTable,
    tokens: &[String],
    flare_mode: bool,
) -> MatchResult {
    let folded: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let mut result = MatchResult::default();
    let mut direct_ids: HashSet<TriggerId> = HashSet::new();

    // Direct pass: whole token equals the trigger name.
    for trigger in snapshot.triggers.iter().filter(|t| t.enabled) {
        let name = trigger.name.to_lowercase();
        if folded.iter().any(|token| *token == name) && direct_ids.insert(trigger.id) {
            result.direct_matches.push(matched(
                trigger,
                trigger.name.clone(),
                MatchReason::Direct,
            ));
        }
    }

    // Synonym pass, in table order. One detail per trigger id.
    for (synonym, pattern) in synonyms.entries() {
        let (Some(trigger), Some(pattern)) = (synonym.active_trigger(), pattern) else {
            continue;
        };
        if direct_ids.contains(&trigger.id) {
            continue;
        }
        let hit = tokens
            .iter()
            .zip(&folded)
            .find(|(_, token)| pattern.matches_folded(token));
        if let Some((token, _)) = hit {
            direct_ids.insert(trigger.id);
            result
                .direct_matches
                .push(matched(trigger, token.clone(), MatchReason::Synonym));
        }
    }

    let direct_categories: HashSet<String> = result
        .direct_matches
        .iter()
        .map(|d| d.trigger_category.to_lowercase())
        .collect();

    // Cross-reactivity pass. Direct matches take precedence over expansion.
    let mut cross_ids: HashSet<TriggerId> = HashSet::new();
    for rule in snapshot.rules.iter().filter(|r| r.enabled) {
        if !rule_fires(rule, &direct_ids, &direct_categories) {
            continue;
        }
        let target_category = rule.target_category().map(str::to_lowercase);
        for target in snapshot.triggers.iter().filter(|t| t.enabled) {
            let is_target = rule.target_trigger_id == Some(target.id)
                || target_category
                    .as_deref()
                    .is_some_and(|c| target.category.to_lowercase() == c);
            if !is_target || direct_ids.contains(&target.id) || !cross_ids.insert(target.id) {
                continue;
            }
            result.cross_reactive_matches.push(cross_reactive(target, rule));
        }
    }

    result.final_status = compute_status(result.all_matches().map(|d| d.severity), flare_mode);
    result
}

fn rule_fires(
    rule: &CrossReactivityRule,
    direct_ids: &HashSet<TriggerId>,
    direct_categories: &HashSet<String>,
) -> bool {
    rule.source_trigger_id
        .is_some_and(|id| direct_ids.contains(&id))
        || rule
            .source_category()
            .is_some_and(|c| direct_categories.contains(&c.to_lowercase()))
}

fn matched(trigger: &Trigger, matched_text: String, reason: MatchReason) -> MatchDetail {
    MatchDetail {
        trigger_id: trigger.id,
        trigger_name: trigger.name.clone(),
        trigger_category: trigger.category.clone(),
        matched_text,
        reason,
        severity: trigger.severity,
        evidence_source_id: None,
        evidence_citation_short: None,
        evidence_citation_full: None,
        evidence_summary: None,
        source_name: None,
        strength: None,
    }
}

fn cross_reactive(target: &Trigger, rule: &CrossReactivityRule) -> MatchDetail {
    let evidence = rule.evidence_source.as_ref();
    MatchDetail {
        evidence_source_id: Some(rule.evidence_source_id),
        evidence_citation_short: evidence.map(|e| e.citation_short.clone()),
        evidence_citation_full: evidence.map(|e| e.citation_full.clone()),
        evidence_summary: evidence.map(|e| e.summary.clone()),
        source_name: rule.source_name().map(str::to_owned),
        strength: Some(rule.strength),
        ..matched(target, target.name.clone(), MatchReason::CrossReact)
    }
}
