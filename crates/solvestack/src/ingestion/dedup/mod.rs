mod similarity;

pub use similarity::{sequence_ratio, title_similarity};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::candidate::CandidateRecord;
use crate::catalog::{ProblemStore, StoreError};

pub const DEFAULT_RECENT_WINDOW: usize = 500;
pub const DEFAULT_TITLE_THRESHOLD: f64 = 0.85;

/// Tuning for the fuzzy-title strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// How many of the newest same-prefix records the fuzzy strategy compares against.
    pub recent_window: usize,
    pub title_threshold: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            recent_window: DEFAULT_RECENT_WINDOW,
            title_threshold: DEFAULT_TITLE_THRESHOLD,
        }
    }
}

/// Rule that classified a candidate as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStrategy {
    ReferenceLink,
    SourceId,
    FuzzyTitle,
    /// Unique-key collision raised by the store during the insert itself.
    InsertConflict,
}

impl DuplicateStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            DuplicateStrategy::ReferenceLink => "reference_link",
            DuplicateStrategy::SourceId => "source_id",
            DuplicateStrategy::FuzzyTitle => "fuzzy_title",
            DuplicateStrategy::InsertConflict => "insert_conflict",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DedupVerdict {
    Unique,
    Duplicate(DuplicateStrategy),
}

impl DedupVerdict {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DedupVerdict::Duplicate(_))
    }
}

/// Three ordered strategies, first match wins.
#[derive(Debug, Clone, Default)]
pub struct DeduplicationEngine {
    config: DedupConfig,
}

impl DeduplicationEngine {
    pub fn new(config: DedupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    pub fn is_duplicate<S>(
        &self,
        candidate: &CandidateRecord,
        store: &S,
    ) -> Result<bool, StoreError>
    where
        S: ProblemStore + ?Sized,
    {
        self.check(candidate, store)
            .map(|verdict| verdict.is_duplicate())
    }

    pub fn check<S>(
        &self,
        candidate: &CandidateRecord,
        store: &S,
    ) -> Result<DedupVerdict, StoreError>
    where
        S: ProblemStore + ?Sized,
    {
        if store.exists_by_reference_link(&candidate.reference_link)? {
            debug!(link = %candidate.reference_link, "duplicate reference link");
            return Ok(DedupVerdict::Duplicate(DuplicateStrategy::ReferenceLink));
        }

        if let Some(source_id) = candidate.source_id.as_deref() {
            if store.exists_by_source_and_id(&candidate.source, source_id)? {
                debug!(source = %candidate.source, source_id, "duplicate source id");
                return Ok(DedupVerdict::Duplicate(DuplicateStrategy::SourceId));
            }
        }

        if candidate.title.trim().is_empty() {
            return Ok(DedupVerdict::Unique);
        }

        let recent =
            store.recent_by_source_prefix(candidate.source_prefix(), self.config.recent_window)?;
        for row in &recent {
            let ratio = title_similarity(&candidate.title, &row.title);
            if ratio >= self.config.title_threshold {
                debug!(
                    title = %candidate.title,
                    existing = %row.ps_id,
                    ratio,
                    "near-duplicate title"
                );
                return Ok(DedupVerdict::Duplicate(DuplicateStrategy::FuzzyTitle));
            }
        }

        Ok(DedupVerdict::Unique)
    }
}
