//! Deterministic, explainable scoring: problem quality, user to problem match, and user to
//! user compatibility. Every engine is pure and safe to share across threads.

pub mod compatibility;
pub mod matching;
pub mod quality;
pub mod ranking;
pub mod tables;

#[cfg(test)]
mod tests;

pub use compatibility::{CompatibilityEngine, CompatibilityOutcome};
pub use matching::{MatchEngine, MatchOutcome};
pub use quality::{classify_difficulty, estimate_effort, QualityAssessment, QualityEngine};
pub use ranking::{
    recommend, suggest_collaborators, CollaboratorSuggestion, RankingError, Recommendation,
    MIN_RECOMMENDATION_SCORE,
};
pub use tables::{
    CompatibilityRubric, MatchRubric, QualityRubric, COMPATIBILITY_RUBRIC_V1, MATCH_RUBRIC_V1,
    QUALITY_RUBRIC_V1,
};

use serde::{Deserialize, Serialize};

/// Named sub-score across all three engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    DescriptionQuality,
    TechnicalDepth,
    Engagement,
    Reproducibility,
    SkillMatch,
    DifficultyMatch,
    InterestMatch,
    Novelty,
    SkillComplementarity,
    ExperienceBalance,
    ActivityCompatibility,
    PastSuccess,
}

/// Discrete contribution to a score with the reasons that earned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub score: u8,
    pub max: u8,
    pub reasons: Vec<String>,
}

impl ScoreComponent {
    pub(crate) fn new(factor: ScoreFactor, score: u8, max: u8, reasons: Vec<String>) -> Self {
        Self {
            factor,
            score: score.min(max),
            max,
            reasons,
        }
    }
}

/// Lookup helpers shared by every outcome type.
pub trait Breakdown {
    fn components(&self) -> &[ScoreComponent];

    fn component(&self, factor: ScoreFactor) -> Option<&ScoreComponent> {
        self.components()
            .iter()
            .find(|component| component.factor == factor)
    }

    fn score_of(&self, factor: ScoreFactor) -> u8 {
        self.component(factor)
            .map(|component| component.score)
            .unwrap_or(0)
    }

    /// Reasons from every component in evaluation order.
    fn reasons(&self) -> Vec<String> {
        self.components()
            .iter()
            .flat_map(|component| component.reasons.iter().cloned())
            .collect()
    }
}

pub(crate) fn total(components: &[ScoreComponent]) -> u8 {
    let sum: u32 = components
        .iter()
        .map(|component| u32::from(component.score))
        .sum();
    sum.min(100) as u8
}
