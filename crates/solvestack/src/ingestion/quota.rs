use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::candidate::CandidateRecord;
use super::dedup::{DedupVerdict, DeduplicationEngine, DuplicateStrategy};
use super::source::{AdapterError, SourceAdapter};
use crate::catalog::{ProblemId, ProblemStore, StoreError};

pub const DEFAULT_TARGET_TOTAL: usize = 30;
pub const DEFAULT_INITIAL_PER_SOURCE: usize = 10;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const MIN_ADDITIONAL_PER_SOURCE: usize = 5;

/// Bounds on the shortfall phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimits {
    pub max_attempts: u32,
    pub min_additional_per_source: usize,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_additional_per_source: MIN_ADDITIONAL_PER_SOURCE,
        }
    }
}

/// Counters for one adapter across both phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTally {
    pub source: String,
    pub fetched: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub store_failures: usize,
    pub adapter_failures: usize,
}

/// Structured result of one ingestion run, returned even when sources fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub target_total: usize,
    pub per_source: Vec<SourceTally>,
    pub duplicates_skipped: usize,
    pub duplicates_by_strategy: BTreeMap<DuplicateStrategy, usize>,
    pub total_fetched: usize,
    pub total_inserted: usize,
    pub store_failures: usize,
    pub adapter_failures: usize,
    pub shortfall_attempts: u32,
    pub inserted_ids: Vec<ProblemId>,
}

impl IngestionSummary {
    pub fn target_met(&self) -> bool {
        self.total_inserted >= self.target_total
    }

    fn record_duplicate(&mut self, index: usize, strategy: DuplicateStrategy) {
        self.per_source[index].duplicates += 1;
        self.duplicates_skipped += 1;
        *self.duplicates_by_strategy.entry(strategy).or_default() += 1;
    }
}

enum Admission {
    Inserted(ProblemId),
    Duplicate(DuplicateStrategy),
    Failed(StoreError),
}

/// Drives the adapters toward a target number of newly accepted problems.
pub struct QuotaController<S: ProblemStore + ?Sized> {
    store: Arc<S>,
    dedup: DeduplicationEngine,
    limits: QuotaLimits,
}

impl<S: ProblemStore + ?Sized> QuotaController<S> {
    pub fn new(store: Arc<S>, dedup: DeduplicationEngine) -> Self {
        Self::with_limits(store, dedup, QuotaLimits::default())
    }

    pub fn with_limits(store: Arc<S>, dedup: DeduplicationEngine, limits: QuotaLimits) -> Self {
        Self {
            store,
            dedup,
            limits,
        }
    }

    pub fn limits(&self) -> QuotaLimits {
        self.limits
    }

    /// Phase 1 asks every source for `initial_per_source`; phase 2 spreads the remaining
    /// shortage across all sources for up to `max_attempts` rounds.
    pub fn run<A>(
        &self,
        target_total: usize,
        initial_per_source: usize,
        sources: &mut [A],
    ) -> IngestionSummary
    where
        A: SourceAdapter,
    {
        let mut summary = IngestionSummary {
            target_total,
            per_source: sources
                .iter()
                .map(|source| SourceTally {
                    source: source.name().to_string(),
                    ..SourceTally::default()
                })
                .collect(),
            ..IngestionSummary::default()
        };

        if sources.is_empty() {
            warn!("ingestion run started without any sources");
            return summary;
        }

        info!(
            target_total,
            initial_per_source,
            sources = sources.len(),
            "ingestion phase 1"
        );
        for (index, source) in sources.iter_mut().enumerate() {
            self.pull(index, source, initial_per_source, &mut summary);
        }

        while summary.total_inserted < target_total
            && summary.shortfall_attempts < self.limits.max_attempts
        {
            summary.shortfall_attempts += 1;
            let shortage = target_total - summary.total_inserted;
            let additional = self.additional_per_source(shortage, sources.len());

            info!(
                attempt = summary.shortfall_attempts,
                shortage, additional, "ingestion phase 2 redistribution"
            );

            for (index, source) in sources.iter_mut().enumerate() {
                self.pull(index, source, additional, &mut summary);
                if summary.total_inserted >= target_total {
                    break;
                }
            }
        }

        info!(
            fetched = summary.total_fetched,
            inserted = summary.total_inserted,
            duplicates = summary.duplicates_skipped,
            adapter_failures = summary.adapter_failures,
            store_failures = summary.store_failures,
            target_met = summary.target_met(),
            "ingestion run finished"
        );

        summary
    }

    /// `max(min_additional, shortage / sources + 1)`.
    pub fn additional_per_source(&self, shortage: usize, source_count: usize) -> usize {
        let spread = shortage / source_count.max(1) + 1;
        spread.max(self.limits.min_additional_per_source)
    }

    fn pull<A: SourceAdapter>(
        &self,
        index: usize,
        source: &mut A,
        limit: usize,
        summary: &mut IngestionSummary,
    ) {
        let candidates = match fetch_isolated(source, limit) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(source = source.name(), error = %err, "source fetch failed, treating as zero yield");
                summary.per_source[index].adapter_failures += 1;
                summary.adapter_failures += 1;
                return;
            }
        };

        debug!(
            source = source.name(),
            requested = limit,
            received = candidates.len(),
            "source fetch complete"
        );
        summary.per_source[index].fetched += candidates.len();
        summary.total_fetched += candidates.len();

        for candidate in candidates {
            match self.admit(candidate) {
                Admission::Inserted(id) => {
                    summary.per_source[index].inserted += 1;
                    summary.total_inserted += 1;
                    summary.inserted_ids.push(id);
                }
                Admission::Duplicate(strategy) => summary.record_duplicate(index, strategy),
                Admission::Failed(err) => {
                    warn!(source = source.name(), error = %err, "candidate skipped after store failure");
                    summary.per_source[index].store_failures += 1;
                    summary.store_failures += 1;
                }
            }
        }
    }

    fn admit(&self, candidate: CandidateRecord) -> Admission {
        match self.dedup.check(&candidate, self.store.as_ref()) {
            Ok(DedupVerdict::Duplicate(strategy)) => return Admission::Duplicate(strategy),
            Ok(DedupVerdict::Unique) => {}
            Err(err) => return Admission::Failed(err),
        }

        match self.store.insert(candidate) {
            Ok(id) => Admission::Inserted(id),
            Err(StoreError::DuplicateConflict) => {
                debug!("insert raced with an identical record, rolled back");
                Admission::Duplicate(DuplicateStrategy::InsertConflict)
            }
            Err(err) => Admission::Failed(err),
        }
    }
}

/// Runs one adapter call inside its own failure boundary; a panic becomes an `AdapterError`.
fn fetch_isolated<A: SourceAdapter>(
    source: &mut A,
    limit: usize,
) -> Result<Vec<CandidateRecord>, AdapterError> {
    match panic::catch_unwind(AssertUnwindSafe(|| source.fetch(limit))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|message| message.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            Err(AdapterError::Panicked(message))
        }
    }
}
