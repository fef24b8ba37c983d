//! # foodscan knowledge base (`knowledge`)
//!
//! Reference data the matcher classifies against:
//!
//! - [`Trigger`]: a named allergen or irritant with a category and a [`Severity`]
//! - [`Synonym`]: alternate label text bound to one trigger, compared with a [`MatchType`]
//! - [`CrossReactivityRule`]: "sensitivity to X implies risk from Y", backed by an
//!   [`EvidenceSource`]
//! - [`EvidenceTimingProfile`]: when symptoms from a trigger tend to appear
//!
//! The [`KnowledgeBase`] trait is the read-only accessor the matcher awaits.
//! [`InMemoryKnowledgeBase`] serves a validated [`Dataset`], either the
//! embedded seed tables or a JSON file.
//!
//! ```no_run
//! use knowledge::{InMemoryKnowledgeBase, KnowledgeBase};
//!
//! # async fn run() -> Result<(), knowledge::KnowledgeError> {
//! let kb = InMemoryKnowledgeBase::seed()?;
//! let snapshot = kb.snapshot().await?;
//! println!("{} triggers, {} rules", snapshot.triggers.len(), snapshot.rules.len());
//! # Ok(())
//! # }
//! ```

mod backend;
mod dataset;
mod error;
mod types;

pub use crate::backend::{InMemoryKnowledgeBase, KnowledgeBase, KnowledgeSnapshot};
pub use crate::dataset::Dataset;
pub use crate::error::KnowledgeError;
pub use crate::types::{
    CrossReactivityRule, EvidenceSource, EvidenceSourceId, EvidenceTimingProfile, MatchType,
    RuleId, Severity, Strength, Synonym, SynonymId, TimingProfileId, Trigger, TriggerId,
};
