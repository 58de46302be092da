use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Problem, ProblemId};
use crate::clock::{Clock, SystemClock};
use crate::ingestion::CandidateRecord;
use crate::scoring::QualityAssessment;

/// Title row returned by the recent-records read used for fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentTitle {
    pub ps_id: ProblemId,
    pub source: String,
    pub title: String,
}

/// Persistence gateway consumed by the ingestion path and the score writeback.
pub trait ProblemStore: Send + Sync {
    fn exists_by_reference_link(&self, link: &str) -> Result<bool, StoreError>;
    fn exists_by_source_and_id(&self, source: &str, source_id: &str) -> Result<bool, StoreError>;
    /// Point-in-time snapshot of the newest records whose `source` starts with `prefix`,
    /// newest first.
    fn recent_by_source_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<RecentTitle>, StoreError>;
    /// Commits a single record. A unique-key collision surfaces as `DuplicateConflict`
    /// and leaves the store untouched.
    fn insert(&self, candidate: CandidateRecord) -> Result<ProblemId, StoreError>;
    fn update(&self, problem: Problem) -> Result<(), StoreError>;
    fn fetch(&self, id: ProblemId) -> Result<Option<Problem>, StoreError>;
    fn all(&self) -> Result<Vec<Problem>, StoreError>;

    /// Score writeback: copies the assessment onto the stored problem and bumps
    /// `score_updated_at`.
    fn apply_score(
        &self,
        id: ProblemId,
        assessment: &QualityAssessment,
        at: DateTime<Utc>,
    ) -> Result<Problem, StoreError> {
        let mut problem = self.fetch(id)?.ok_or(StoreError::NotFound(id))?;
        assessment.apply_to(&mut problem, at);
        self.update(problem.clone())?;
        Ok(problem)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record violates a unique constraint")]
    DuplicateConflict,
    #[error("problem {0} not found")]
    NotFound(ProblemId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Default)]
struct CatalogState {
    problems: Vec<Problem>,
    links: HashSet<String>,
    source_ids: HashSet<(String, String)>,
    next_id: u64,
}

/// Process-local catalog. Insertion order doubles as recency.
#[derive(Clone)]
pub struct InMemoryProblemStore {
    state: Arc<Mutex<CatalogState>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryProblemStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl InMemoryProblemStore {
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CatalogState {
                next_id: 1,
                ..CatalogState::default()
            })),
            clock,
        }
    }

    /// Seed the catalog with already persisted problems, e.g. from a JSON snapshot.
    pub fn from_problems(problems: Vec<Problem>, clock: Arc<dyn Clock>) -> Self {
        let store = Self::with_clock(clock);
        {
            let mut state = store.lock();
            for problem in problems {
                state.links.insert(problem.reference_link.clone());
                if let Some(source_id) = &problem.source_id {
                    state
                        .source_ids
                        .insert((problem.source.clone(), source_id.clone()));
                }
                state.next_id = state.next_id.max(problem.ps_id.0 + 1);
                state.problems.push(problem);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.lock().problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProblemStore for InMemoryProblemStore {
    fn exists_by_reference_link(&self, link: &str) -> Result<bool, StoreError> {
        Ok(self.lock().links.contains(link))
    }

    fn exists_by_source_and_id(&self, source: &str, source_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .source_ids
            .contains(&(source.to_string(), source_id.to_string())))
    }

    fn recent_by_source_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<RecentTitle>, StoreError> {
        let state = self.lock();
        Ok(state
            .problems
            .iter()
            .rev()
            .filter(|problem| problem.source.starts_with(prefix))
            .take(limit)
            .map(|problem| RecentTitle {
                ps_id: problem.ps_id,
                source: problem.source.clone(),
                title: problem.title.clone(),
            })
            .collect())
    }

    fn insert(&self, candidate: CandidateRecord) -> Result<ProblemId, StoreError> {
        let scraped_at = self.clock.now();
        let mut state = self.lock();

        if state.links.contains(&candidate.reference_link) {
            return Err(StoreError::DuplicateConflict);
        }
        let source_key = candidate
            .source_id
            .as_ref()
            .map(|source_id| (candidate.source.clone(), source_id.clone()));
        if let Some(key) = &source_key {
            if state.source_ids.contains(key) {
                return Err(StoreError::DuplicateConflict);
            }
        }

        let ps_id = ProblemId(state.next_id);
        state.next_id += 1;
        state.links.insert(candidate.reference_link.clone());
        if let Some(key) = source_key {
            state.source_ids.insert(key);
        }
        state
            .problems
            .push(Problem::from_candidate(ps_id, candidate, scraped_at));

        Ok(ps_id)
    }

    fn update(&self, problem: Problem) -> Result<(), StoreError> {
        let mut state = self.lock();
        let slot = state
            .problems
            .iter_mut()
            .find(|existing| existing.ps_id == problem.ps_id)
            .ok_or(StoreError::NotFound(problem.ps_id))?;
        *slot = problem;
        Ok(())
    }

    fn fetch(&self, id: ProblemId) -> Result<Option<Problem>, StoreError> {
        Ok(self
            .lock()
            .problems
            .iter()
            .find(|problem| problem.ps_id == id)
            .cloned())
    }

    fn all(&self) -> Result<Vec<Problem>, StoreError> {
        Ok(self.lock().problems.clone())
    }
}
