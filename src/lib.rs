//! Workspace umbrella crate for foodscan.
//!
//! Stitches the tokenizer (`canonical`), the trigger knowledge base
//! (`knowledge`) and the matcher (`matcher`) together behind
//! [`Analyzer::analyze`], and adds the presentation layer around a match:
//! warning lines, summary text, onset timeline and impact hint. Scan
//! history rows and the YAML configuration live here too.
//!
//! ```no_run
//! use foodscan::{Analyzer, InMemoryKnowledgeBase, SafetyLevel};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = Analyzer::new(InMemoryKnowledgeBase::seed()?);
//! let result = analyzer
//!     .analyze("Water, Soy Lecithin, Yeast Extract", false)
//!     .await?;
//! assert_eq!(result.safety_level, SafetyLevel::Avoid);
//! for warning in &result.warnings {
//!     println!("{warning}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod impact;
pub mod record;
pub mod timeline;

pub use canonical::{
    CanonicalError, DEFAULT_SEPARATORS, TokenizerConfig, collapse_whitespace, tokenize,
    tokenize_with_config,
};
pub use knowledge::{
    CrossReactivityRule, Dataset, EvidenceSource, EvidenceSourceId, EvidenceTimingProfile,
    InMemoryKnowledgeBase, KnowledgeBase, KnowledgeError, KnowledgeSnapshot, MatchType, RuleId,
    Severity, Strength, Synonym, Trigger, TriggerId,
};
pub use matcher::{
    MatchDetail, MatchError, MatchMetrics, MatchReason, MatchResult, Matcher, SafetyLevel,
    SynonymTable, compute_status, evaluate, evaluate_compiled, evaluate_tokens,
    set_match_metrics,
};

pub use crate::analysis::{
    AnalysisConfig, AnalysisError, AnalysisResult, Analyzer, EmptyInputStatus,
};
pub use crate::config::{ConfigLoadError, FoodscanConfig};
pub use crate::impact::{ImpactConfig, ImpactInsight, ImpactType};
pub use crate::record::{ScanMatch, ScanRecord};
pub use crate::timeline::{Timeline, TimelineBucket, TimelineFlags};
