use serde::{Deserialize, Serialize};
use tracing::debug;

use super::compatibility::{CompatibilityEngine, CompatibilityOutcome};
use super::matching::{MatchEngine, MatchOutcome};
use crate::catalog::{Difficulty, Problem, ProblemId, UserId, UserProfile};

/// Problems scoring at or below this are left out of recommendations.
pub const MIN_RECOMMENDATION_SCORE: u8 = 20;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("{user} has not flagged interest in problem {problem}")]
    NotInterested { user: UserId, problem: ProblemId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub problem_id: ProblemId,
    pub title: String,
    pub difficulty: Difficulty,
    pub estimated_effort: String,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorSuggestion {
    pub user_id: UserId,
    pub username: String,
    pub skills: Vec<String>,
    pub experience_level: Difficulty,
    pub outcome: CompatibilityOutcome,
}

/// Best-matching problems for `user`, highest score first. Ties keep catalog order.
pub fn recommend(
    engine: &MatchEngine,
    user: &UserProfile,
    problems: &[Problem],
    limit: usize,
) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = problems
        .iter()
        .map(|problem| Recommendation {
            problem_id: problem.ps_id,
            title: problem.title.clone(),
            difficulty: problem.difficulty,
            estimated_effort: problem.estimated_effort.clone(),
            outcome: engine.score(user, problem),
        })
        .filter(|recommendation| recommendation.outcome.match_score > MIN_RECOMMENDATION_SCORE)
        .collect();

    ranked.sort_by(|a, b| b.outcome.match_score.cmp(&a.outcome.match_score));
    ranked.truncate(limit);
    debug!(user = %user.id, returned = ranked.len(), "recommendations ranked");
    ranked
}

/// Other users tracking the same problem, ranked by how well they pair with the requester.
pub fn suggest_collaborators(
    engine: &CompatibilityEngine,
    requester: &UserProfile,
    candidates: &[UserProfile],
    problem: &Problem,
    limit: usize,
) -> Result<Vec<CollaboratorSuggestion>, RankingError> {
    if !requester.is_interested_in(problem.ps_id) {
        return Err(RankingError::NotInterested {
            user: requester.id,
            problem: problem.ps_id,
        });
    }

    let mut ranked: Vec<CollaboratorSuggestion> = candidates
        .iter()
        .filter(|candidate| {
            candidate.id != requester.id && candidate.is_interested_in(problem.ps_id)
        })
        .map(|candidate| CollaboratorSuggestion {
            user_id: candidate.id,
            username: candidate.username.clone(),
            skills: candidate.skills.clone(),
            experience_level: candidate.experience_level,
            outcome: engine.score(requester, candidate, problem),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.outcome
            .compatibility_score
            .cmp(&a.outcome.compatibility_score)
    });
    ranked.truncate(limit);
    Ok(ranked)
}
