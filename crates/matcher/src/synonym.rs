//! Compiled synonym predicates.

use knowledge::{MatchType, Synonym};
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// A synonym's text compiled for repeated token checks.
///
/// All three match types compare case-insensitively. `WordBoundaryContains`
/// compiles to `\b<escaped text>\b`, so `malt` hits `malt extract` and
/// `malt,` but not `maltodextrin`.
#[derive(Debug, Clone)]
pub struct SynonymPattern {
    match_type: MatchType,
    folded: String,
    boundary: Option<Regex>,
}

impl SynonymPattern {
    pub fn compile(text: &str, match_type: MatchType) -> Result<Self, regex::Error> {
        let boundary = match match_type {
            MatchType::WordBoundaryContains => Some(
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(text)))
                    .case_insensitive(true)
                    .build()?,
            ),
            MatchType::Exact | MatchType::Contains => None,
        };
        Ok(Self {
            match_type,
            folded: text.to_lowercase(),
            boundary,
        })
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// Whether `token` satisfies this synonym.
    pub fn is_match(&self, token: &str) -> bool {
        self.matches_folded(&token.to_lowercase())
    }

    /// Same as [`is_match`](Self::is_match) for a token that is already lowercased.
    pub(crate) fn matches_folded(&self, token: &str) -> bool {
        match (&self.match_type, &self.boundary) {
            (MatchType::Exact, _) => token == self.folded,
            (MatchType::Contains, _) => token.contains(self.folded.as_str()),
            (MatchType::WordBoundaryContains, Some(re)) => re.is_match(token),
            (MatchType::WordBoundaryContains, None) => false,
        }
    }
}

/// A snapshot's synonym table with every active pattern compiled once.
///
/// Slots line up with the source table. Synonyms whose parent is missing or
/// disabled, and patterns that fail to compile, are left empty.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    synonyms: Vec<Synonym>,
    patterns: Vec<Option<SynonymPattern>>,
}

impl SynonymTable {
    pub fn compile(synonyms: &[Synonym]) -> Self {
        let patterns = synonyms
            .iter()
            .map(|synonym| {
                synonym.active_trigger()?;
                match SynonymPattern::compile(&synonym.text, synonym.match_type) {
                    Ok(pattern) => Some(pattern),
                    Err(err) => {
                        warn!(synonym_id = synonym.id, error = %err, "matcher.synonym_skipped");
                        None
                    }
                }
            })
            .collect();
        Self {
            synonyms: synonyms.to_vec(),
            patterns,
        }
    }

    /// Whether this table was compiled from exactly `synonyms`, parents included.
    pub fn is_compiled_from(&self, synonyms: &[Synonym]) -> bool {
        self.synonyms == synonyms
    }

    /// Number of compiled patterns.
    pub fn compiled(&self) -> usize {
        self.patterns.iter().flatten().count()
    }

    /// Synonyms in table order with their compiled pattern, if any.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&Synonym, Option<&SynonymPattern>)> {
        self.synonyms.iter().zip(self.patterns.iter().map(Option::as_ref))
    }
}
