use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::KnowledgeError;
use crate::types::{CrossReactivityRule, EvidenceTimingProfile, RuleId, Synonym, Trigger, TriggerId};

/// The three tables a single match needs, fetched together.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeSnapshot {
    /// Enabled triggers only.
    pub triggers: Vec<Trigger>,
    /// Every synonym with its parent joined; parents may be disabled.
    pub synonyms: Vec<Synonym>,
    /// Enabled rules with source, target and evidence joined.
    pub rules: Vec<CrossReactivityRule>,
}

/// Read-only accessor for the trigger knowledge base.
///
/// This is the only suspension point of a scan. Implementations must be safe
/// for concurrent reads; nothing on the matching path writes through it.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Triggers with `enabled == true`.
    async fn enabled_triggers(&self) -> Result<Vec<Trigger>, KnowledgeError>;
    /// All synonyms, parent trigger joined. Disabled parents are left in;
    /// filtering them is the matcher's job.
    async fn all_synonyms(&self) -> Result<Vec<Synonym>, KnowledgeError>;
    /// Enabled rules, with source/target trigger and evidence joined where applicable.
    async fn enabled_rules(&self) -> Result<Vec<CrossReactivityRule>, KnowledgeError>;

    /// Onset timing profiles with evidence joined. Stores without timing
    /// data return nothing.
    async fn timing_profiles(&self) -> Result<Vec<EvidenceTimingProfile>, KnowledgeError> {
        Ok(Vec::new())
    }

    /// Fetch everything one match needs.
    async fn snapshot(&self) -> Result<KnowledgeSnapshot, KnowledgeError> {
        Ok(KnowledgeSnapshot {
            triggers: self.enabled_triggers().await?,
            synonyms: self.all_synonyms().await?,
            rules: self.enabled_rules().await?,
        })
    }
}

#[async_trait]
impl<K: KnowledgeBase + ?Sized> KnowledgeBase for Arc<K> {
    async fn enabled_triggers(&self) -> Result<Vec<Trigger>, KnowledgeError> {
        (**self).enabled_triggers().await
    }

    async fn all_synonyms(&self) -> Result<Vec<Synonym>, KnowledgeError> {
        (**self).all_synonyms().await
    }

    async fn enabled_rules(&self) -> Result<Vec<CrossReactivityRule>, KnowledgeError> {
        (**self).enabled_rules().await
    }

    async fn timing_profiles(&self) -> Result<Vec<EvidenceTimingProfile>, KnowledgeError> {
        (**self).timing_profiles().await
    }

    async fn snapshot(&self) -> Result<KnowledgeSnapshot, KnowledgeError> {
        (**self).snapshot().await
    }
}

/// An in-memory knowledge base using a `RwLock` around a [`Dataset`].
///
/// Reads join relations on the fly. Owner-side edits (toggling a trigger or
/// rule, swapping the whole dataset) take the write lock.
pub struct InMemoryKnowledgeBase {
    dataset: RwLock<Dataset>,
}

impl InMemoryKnowledgeBase {
    /// Wrap a dataset after validating it.
    pub fn new(dataset: Dataset) -> Result<Self, KnowledgeError> {
        dataset.validate()?;
        Ok(Self {
            dataset: RwLock::new(dataset),
        })
    }

    /// Backed by the embedded seed tables.
    pub fn seed() -> Result<Self, KnowledgeError> {
        Self::new(Dataset::seed()?)
    }

    /// Backed by a JSON dataset file.
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, KnowledgeError> {
        Self::new(Dataset::from_path(path)?)
    }

    /// Enable or disable a trigger. Returns `false` when the id is unknown.
    pub fn set_trigger_enabled(&self, id: TriggerId, enabled: bool) -> Result<bool, KnowledgeError> {
        let mut guard = self.write()?;
        match guard.triggers.iter_mut().find(|t| t.id == id) {
            Some(trigger) => {
                trigger.enabled = enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Enable or disable a cross-reactivity rule. Returns `false` when the id is unknown.
    pub fn set_rule_enabled(&self, id: RuleId, enabled: bool) -> Result<bool, KnowledgeError> {
        let mut guard = self.write()?;
        match guard.rules.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                rule.enabled = enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace every table at once. The new dataset is validated first and
    /// the old one stays in place on failure.
    pub fn replace_dataset(&self, dataset: Dataset) -> Result<(), KnowledgeError> {
        dataset.validate()?;
        *self.write()? = dataset;
        Ok(())
    }

    /// A copy of the owner-side tables.
    pub fn dataset(&self) -> Result<Dataset, KnowledgeError> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Dataset>, KnowledgeError> {
        self.dataset
            .read()
            .map_err(|_| KnowledgeError::unavailable("poisoned lock"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Dataset>, KnowledgeError> {
        self.dataset
            .write()
            .map_err(|_| KnowledgeError::unavailable("poisoned lock"))
    }

    fn load_snapshot(&self) -> Result<KnowledgeSnapshot, KnowledgeError> {
        // One read lock for all three tables keeps the snapshot consistent
        // with concurrent owner edits.
        let guard = self.read()?;
        Ok(KnowledgeSnapshot {
            triggers: guard.enabled_triggers(),
            synonyms: guard.joined_synonyms(),
            rules: guard.joined_rules(),
        })
    }
}

#[async_trait]
impl KnowledgeBase for InMemoryKnowledgeBase {
    async fn enabled_triggers(&self) -> Result<Vec<Trigger>, KnowledgeError> {
        Ok(self.read()?.enabled_triggers())
    }

    async fn all_synonyms(&self) -> Result<Vec<Synonym>, KnowledgeError> {
        Ok(self.read()?.joined_synonyms())
    }

    async fn enabled_rules(&self) -> Result<Vec<CrossReactivityRule>, KnowledgeError> {
        Ok(self.read()?.joined_rules())
    }

    async fn timing_profiles(&self) -> Result<Vec<EvidenceTimingProfile>, KnowledgeError> {
        Ok(self.read()?.joined_timing_profiles())
    }

    async fn snapshot(&self) -> Result<KnowledgeSnapshot, KnowledgeError> {
        self.load_snapshot()
    }
}
