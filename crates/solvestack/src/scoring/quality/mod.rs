mod policy;
mod rules;

pub use policy::{classify_difficulty, estimate_effort};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::tables::{QualityRubric, QUALITY_RUBRIC_V1};
use super::{Breakdown, ScoreComponent};
use crate::catalog::{Difficulty, Problem, ProblemId, ProblemStore, StoreError};

/// Stateless evaluator that applies a quality rubric to one problem.
#[derive(Debug, Clone)]
pub struct QualityEngine {
    rubric: QualityRubric,
}

impl Default for QualityEngine {
    fn default() -> Self {
        Self::new(QUALITY_RUBRIC_V1)
    }
}

impl QualityEngine {
    pub fn new(rubric: QualityRubric) -> Self {
        Self { rubric }
    }

    pub fn rubric(&self) -> &QualityRubric {
        &self.rubric
    }

    /// Missing fields count as empty or zero; scoring never fails.
    pub fn score(&self, problem: &Problem) -> QualityAssessment {
        let (components, quality_score, signals) = rules::score_problem(problem, &self.rubric);
        let difficulty =
            classify_difficulty(quality_score, signals.technical_depth, signals.tech_count);

        QualityAssessment {
            problem_id: problem.ps_id,
            quality_score,
            difficulty,
            estimated_effort: estimate_effort(difficulty, signals.tech_count).to_string(),
            tech_count: signals.tech_count,
            rubric_version: self.rubric.version.to_string(),
            components,
        }
    }

    /// Score a persisted problem and write the result back through the store.
    pub fn rescore<S>(
        &self,
        store: &S,
        id: ProblemId,
        at: DateTime<Utc>,
    ) -> Result<QualityAssessment, StoreError>
    where
        S: ProblemStore + ?Sized,
    {
        let problem = store.fetch(id)?.ok_or(StoreError::NotFound(id))?;
        let assessment = self.score(&problem);
        store.apply_score(id, &assessment, at)?;
        info!(
            problem = %id,
            quality_score = assessment.quality_score,
            difficulty = %assessment.difficulty,
            "problem rescored"
        );
        Ok(assessment)
    }
}

/// Composite quality score with the classification derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub problem_id: ProblemId,
    pub quality_score: u8,
    pub difficulty: Difficulty,
    pub estimated_effort: String,
    pub tech_count: usize,
    pub rubric_version: String,
    pub components: Vec<ScoreComponent>,
}

impl QualityAssessment {
    pub fn apply_to(&self, problem: &mut Problem, at: DateTime<Utc>) {
        problem.quality_score = self.quality_score;
        problem.difficulty = self.difficulty;
        problem.estimated_effort = self.estimated_effort.clone();
        problem.score_updated_at = Some(at);
    }
}

impl Breakdown for QualityAssessment {
    fn components(&self) -> &[ScoreComponent] {
        &self.components
    }
}
