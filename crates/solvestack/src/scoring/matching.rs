use serde::{Deserialize, Serialize};

use super::tables::{lowercase_terms, tokens_overlap, MatchRubric, MATCH_RUBRIC_V1};
use super::{total, Breakdown, ScoreComponent, ScoreFactor};
use crate::catalog::{Difficulty, Problem, ProblemId, UserId, UserProfile};

/// Scores how well one user fits one problem.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    rubric: MatchRubric,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(MATCH_RUBRIC_V1)
    }
}

impl MatchEngine {
    pub fn new(rubric: MatchRubric) -> Self {
        Self { rubric }
    }

    pub fn score(&self, user: &UserProfile, problem: &Problem) -> MatchOutcome {
        let components = vec![
            self.skill_match(&user.skills, &problem.suggested_tech),
            self.difficulty_match(user.preferred_difficulty, problem.difficulty),
            self.interest_match(&user.interests, &problem.tags, &problem.description),
            self.novelty(user.is_interested_in(problem.ps_id)),
        ];

        MatchOutcome {
            user_id: user.id,
            problem_id: problem.ps_id,
            match_score: total(&components),
            components,
        }
    }

    fn skill_match(&self, skills: &[String], suggested_tech: &str) -> ScoreComponent {
        let cap = self.rubric.skill_cap;
        let skills = lowercase_terms(skills);
        if skills.is_empty() {
            return ScoreComponent::new(
                ScoreFactor::SkillMatch,
                0,
                cap,
                vec!["No skills listed".to_string()],
            );
        }

        let techs: Vec<String> = crate::catalog::tech_tokens(suggested_tech)
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        if techs.is_empty() {
            return ScoreComponent::new(
                ScoreFactor::SkillMatch,
                self.rubric.general_problem_points,
                cap,
                vec!["General problem".to_string()],
            );
        }

        let total_techs = techs.len();
        let matched = techs
            .iter()
            .filter(|tech| skills.iter().any(|skill| tokens_overlap(tech, skill)))
            .count();
        let score = (usize::from(cap) * matched / total_techs) as u8;

        let reason = if matched == total_techs {
            "Perfect skill match".to_string()
        } else if matched * 2 >= total_techs {
            format!("Strong match ({matched}/{total_techs} techs)")
        } else if matched > 0 {
            format!("Partial match ({matched}/{total_techs} techs)")
        } else {
            "Learning opportunity".to_string()
        };

        ScoreComponent::new(ScoreFactor::SkillMatch, score, cap, vec![reason])
    }

    /// Compares the user's preferred difficulty, not their experience level.
    fn difficulty_match(&self, preferred: Difficulty, problem: Difficulty) -> ScoreComponent {
        let points = self.rubric.difficulty_points;
        let distance = usize::from(preferred.distance(problem));
        let score = points
            .get(distance)
            .or_else(|| points.last())
            .copied()
            .unwrap_or(0);
        let reason = match distance {
            0 => "Perfect difficulty match",
            1 => "Close difficulty match",
            _ => "Challenging difficulty",
        };

        ScoreComponent::new(
            ScoreFactor::DifficultyMatch,
            score,
            points.first().copied().unwrap_or(0),
            vec![reason.to_string()],
        )
    }

    fn interest_match(
        &self,
        interests: &[String],
        tags: &[String],
        description: &str,
    ) -> ScoreComponent {
        let cap = self.rubric.interest_cap;
        let wanted: Vec<(&String, String)> = interests
            .iter()
            .map(|interest| (interest, interest.trim().to_lowercase()))
            .filter(|(_, lower)| !lower.is_empty())
            .collect();
        if wanted.is_empty() {
            return ScoreComponent::new(
                ScoreFactor::InterestMatch,
                self.rubric.interest_neutral_points,
                cap,
                Vec::new(),
            );
        }

        let tags_lower = lowercase_terms(tags);
        let description_lower = description.to_lowercase();
        let mut score: u32 = 0;
        let mut matched: Vec<&str> = Vec::new();

        for (interest, lower) in &wanted {
            if tags_lower.iter().any(|tag| tag.contains(lower.as_str())) {
                score += u32::from(self.rubric.interest_tag_points);
                matched.push(interest.as_str());
            } else if description_lower.contains(lower.as_str()) {
                score += u32::from(self.rubric.interest_description_points);
                matched.push(interest.as_str());
            }
        }

        let mut reasons = Vec::new();
        if !matched.is_empty() {
            let shown: Vec<&str> = matched.iter().take(2).copied().collect();
            reasons.push(format!("Matches interests: {}", shown.join(", ")));
        }

        ScoreComponent::new(
            ScoreFactor::InterestMatch,
            score.min(u32::from(cap)) as u8,
            cap,
            reasons,
        )
    }

    fn novelty(&self, already_tracking: bool) -> ScoreComponent {
        let rubric = &self.rubric;
        let max = rubric.novelty_base + rubric.novelty_new_bonus;
        if already_tracking {
            ScoreComponent::new(
                ScoreFactor::Novelty,
                rubric.novelty_base.saturating_sub(rubric.novelty_tracked_penalty),
                max,
                vec!["Already tracking this problem".to_string()],
            )
        } else {
            ScoreComponent::new(
                ScoreFactor::Novelty,
                max,
                max,
                vec!["New discovery".to_string()],
            )
        }
    }
}

/// Match score for one user and one problem, with its breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub match_score: u8,
    pub components: Vec<ScoreComponent>,
}

impl Breakdown for MatchOutcome {
    fn components(&self) -> &[ScoreComponent] {
        &self.components
    }
}
