use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::catalog::{
    InMemoryProblemStore, Problem, ProblemId, ProblemStore, RecentTitle, StoreError,
};
use crate::clock::FixedClock;
use crate::ingestion::{
    AdapterError, CandidateRecord, DeduplicationEngine, QuotaController, SourceAdapter,
};

pub(super) fn store() -> Arc<InMemoryProblemStore> {
    let now = Utc
        .with_ymd_and_hms(2025, 6, 1, 8, 30, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(InMemoryProblemStore::with_clock(Arc::new(FixedClock::new(
        now,
    ))))
}

pub(super) fn controller(store: Arc<InMemoryProblemStore>) -> QuotaController<InMemoryProblemStore> {
    QuotaController::new(store, DeduplicationEngine::default())
}

/// Candidate whose title is distinct enough from every other generated title.
pub(super) fn candidate(source: &str, key: usize) -> CandidateRecord {
    CandidateRecord {
        title: unique_title(source, key),
        description: "Steps to reproduce are in the linked issue.".to_string(),
        source: source.to_string(),
        source_id: Some(format!("{source}-{key}")),
        reference_link: format!("https://example.org/{source}/{key}"),
        tags: vec!["bug".to_string()],
        suggested_tech: "Python".to_string(),
        date: "2025-05-30".to_string(),
        author_name: "octo".to_string(),
        author_id: "42".to_string(),
        ..CandidateRecord::default()
    }
}

/// Pseudo-random letters; generated titles stay well below the fuzzy threshold pairwise.
fn unique_title(source: &str, key: usize) -> String {
    let mut state = (key as u64 + 1).wrapping_mul(2_654_435_761);
    for byte in source.bytes() {
        state = state.wrapping_mul(31).wrapping_add(u64::from(byte));
    }
    let letters: String = (0..18)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            char::from(b'a' + ((state >> 33) % 26) as u8)
        })
        .collect();
    format!("issue {letters}")
}

/// Adapter that pages through a fixed list of candidates.
pub(super) struct ScriptedSource {
    name: String,
    remaining: VecDeque<CandidateRecord>,
    pub(super) requests: Vec<usize>,
}

impl ScriptedSource {
    pub(super) fn new(name: &str, candidates: Vec<CandidateRecord>) -> Self {
        Self {
            name: name.to_string(),
            remaining: candidates.into(),
            requests: Vec::new(),
        }
    }

    pub(super) fn unique(name: &str, count: usize) -> Self {
        Self::new(
            name,
            (0..count).map(|key| candidate(name, key)).collect(),
        )
    }
}

impl SourceAdapter for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self, limit: usize) -> Result<Vec<CandidateRecord>, AdapterError> {
        self.requests.push(limit);
        let take = limit.min(self.remaining.len());
        Ok(self.remaining.drain(..take).collect())
    }
}

pub(super) struct FailingSource;

impl SourceAdapter for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    fn fetch(&mut self, _limit: usize) -> Result<Vec<CandidateRecord>, AdapterError> {
        Err(AdapterError::Transport("connection reset".to_string()))
    }
}

pub(super) struct PanickingSource;

impl SourceAdapter for PanickingSource {
    fn name(&self) -> &str {
        "panicking"
    }

    fn fetch(&mut self, _limit: usize) -> Result<Vec<CandidateRecord>, AdapterError> {
        panic!("adapter bug");
    }
}

/// Store that answers every read as "unseen" so only the insert itself can detect a clash.
pub(super) struct RacingStore {
    pub(super) inner: InMemoryProblemStore,
}

impl ProblemStore for RacingStore {
    fn exists_by_reference_link(&self, _link: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn exists_by_source_and_id(&self, _source: &str, _id: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn recent_by_source_prefix(
        &self,
        _prefix: &str,
        _limit: usize,
    ) -> Result<Vec<RecentTitle>, StoreError> {
        Ok(Vec::new())
    }

    fn insert(&self, candidate: CandidateRecord) -> Result<ProblemId, StoreError> {
        self.inner.insert(candidate)
    }

    fn update(&self, problem: Problem) -> Result<(), StoreError> {
        self.inner.update(problem)
    }

    fn fetch(&self, id: ProblemId) -> Result<Option<Problem>, StoreError> {
        self.inner.fetch(id)
    }

    fn all(&self) -> Result<Vec<Problem>, StoreError> {
        self.inner.all()
    }
}

pub(super) struct UnavailableStore;

impl ProblemStore for UnavailableStore {
    fn exists_by_reference_link(&self, _link: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn exists_by_source_and_id(&self, _source: &str, _id: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn recent_by_source_prefix(
        &self,
        _prefix: &str,
        _limit: usize,
    ) -> Result<Vec<RecentTitle>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _candidate: CandidateRecord) -> Result<ProblemId, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _problem: Problem) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: ProblemId) -> Result<Option<Problem>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Problem>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}
