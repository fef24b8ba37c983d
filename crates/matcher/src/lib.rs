//! # foodscan matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` classifies a free-text ingredient label against the trigger
//! knowledge base (`knowledge`). It tokenizes the label with `canonical`,
//! finds the triggers it names and expands them through cross-reactivity
//! rules, then reduces every match to one [`SafetyLevel`].
//!
//! A call runs three passes over a single [`knowledge::KnowledgeSnapshot`]:
//!
//! 1. **Direct**: a token equals a trigger's name (case-insensitive).
//! 2. **Synonym**: a token satisfies one of the trigger's synonyms under its
//!    [`knowledge::MatchType`]. A trigger is reported at most once across
//!    both passes.
//! 3. **Cross-reactivity**: enabled rules whose source trigger or category
//!    was matched add their targets, unless a target was already matched
//!    directly or by an earlier rule.
//!
//! [`compute_status`] then turns the severities into a verdict; flare mode
//! escalates Moderate findings to Avoid.
//!
//! ## Core Types
//!
//! - [`Matcher`]: async entry point bound to a [`knowledge::KnowledgeBase`].
//! - [`evaluate`]: the same algorithm as a pure function over a snapshot.
//! - [`MatchResult`] / [`MatchDetail`]: per-scan output, never persisted here.
//! - [`SynonymPattern`]: a synonym compiled for repeated token checks.
//! - [`SynonymTable`]: a snapshot's synonyms compiled once; [`Matcher`] caches it.
//!
//! ## Example Usage
//!
//! ```no_run
//! use knowledge::InMemoryKnowledgeBase;
//! use matcher::{Matcher, SafetyLevel};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let matcher = Matcher::new(InMemoryKnowledgeBase::seed()?);
//! let result = matcher
//!     .match_ingredients("Water, Barley Malt Extract, Salt", false)
//!     .await?;
//! assert_eq!(result.final_status, SafetyLevel::Avoid);
//! for detail in result.all_matches() {
//!     println!("{} ({})", detail.trigger_name, detail.reason);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability
//!
//! Each call runs inside a `matcher.match` tracing span. Install a
//! [`MatchMetrics`] implementation via [`set_match_metrics`] to record
//! per-call latency, match counts and verdicts.

pub mod engine;
pub mod metrics;
pub mod status;
pub mod synonym;
pub mod types;

pub use crate::engine::{evaluate, evaluate_compiled, evaluate_tokens, Matcher};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::status::compute_status;
pub use crate::synonym::{SynonymPattern, SynonymTable};
pub use crate::types::{MatchDetail, MatchError, MatchReason, MatchResult, SafetyLevel};
