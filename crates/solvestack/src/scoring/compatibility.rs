use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tables::{lowercase_terms, tokens_overlap, CompatibilityRubric, COMPATIBILITY_RUBRIC_V1};
use super::{total, Breakdown, ScoreComponent, ScoreFactor};
use crate::catalog::{tech_tokens, Difficulty, Problem, ProblemId, UserId, UserProfile};

/// Scores a pairing of two users around one problem. The first user is the one asking; the
/// complementarity term rewards what the second user adds on top.
#[derive(Debug, Clone)]
pub struct CompatibilityEngine {
    rubric: CompatibilityRubric,
}

impl Default for CompatibilityEngine {
    fn default() -> Self {
        Self::new(COMPATIBILITY_RUBRIC_V1)
    }
}

impl CompatibilityEngine {
    pub fn new(rubric: CompatibilityRubric) -> Self {
        Self { rubric }
    }

    pub fn score(
        &self,
        requester: &UserProfile,
        candidate: &UserProfile,
        problem: &Problem,
    ) -> CompatibilityOutcome {
        let components = vec![
            self.skill_complementarity(
                &requester.skills,
                &candidate.skills,
                &problem.suggested_tech,
            ),
            self.experience_balance(
                requester.experience_level,
                candidate.experience_level,
                problem.difficulty,
            ),
            self.activity_compatibility(requester.activity(), candidate.activity()),
            self.past_success(requester, candidate),
        ];

        CompatibilityOutcome {
            requester_id: requester.id,
            candidate_id: candidate.id,
            problem_id: problem.ps_id,
            compatibility_score: total(&components),
            components,
        }
    }

    fn skill_complementarity(
        &self,
        requester_skills: &[String],
        candidate_skills: &[String],
        suggested_tech: &str,
    ) -> ScoreComponent {
        let cap = self.rubric.complementarity_cap;
        let requester_skills = lowercase_terms(requester_skills);
        let candidate_skills = lowercase_terms(candidate_skills);
        if requester_skills.is_empty() || candidate_skills.is_empty() {
            return ScoreComponent::new(
                ScoreFactor::SkillComplementarity,
                self.rubric.limited_skills_points,
                cap,
                vec!["Limited skill information".to_string()],
            );
        }

        let techs: BTreeSet<String> = tech_tokens(suggested_tech)
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        if techs.is_empty() {
            return ScoreComponent::new(
                ScoreFactor::SkillComplementarity,
                self.rubric.general_collaboration_points,
                cap,
                vec!["General collaboration".to_string()],
            );
        }

        let requester_covers = covered_techs(&techs, &requester_skills);
        let candidate_covers = covered_techs(&techs, &candidate_skills);

        let total_techs = techs.len() as u32;
        let combined = requester_covers.union(&candidate_covers).count() as u32;
        let unique = candidate_covers.difference(&requester_covers).count() as u32;
        let score = (self.rubric.coverage_weight * combined
            + self.rubric.unique_contribution_weight * unique)
            / total_techs;

        let mut reasons = Vec::new();
        if combined * 5 >= total_techs * 4 {
            reasons.push("Comprehensive skill coverage together".to_string());
        }
        if unique * 10 > total_techs * 3 {
            reasons.push("Brings complementary skills".to_string());
        }

        ScoreComponent::new(
            ScoreFactor::SkillComplementarity,
            score.min(u32::from(cap)) as u8,
            cap,
            reasons,
        )
    }

    fn experience_balance(
        &self,
        requester: Difficulty,
        candidate: Difficulty,
        problem: Difficulty,
    ) -> ScoreComponent {
        let rubric = &self.rubric;
        let (score, reason) = if requester == problem && candidate == problem {
            (rubric.both_match_points, Some("Both match problem difficulty"))
        } else if (requester == problem && candidate.distance(problem) <= 1)
            || (candidate == problem && requester.distance(problem) <= 1)
        {
            (rubric.balanced_points, Some("Good experience balance"))
        } else if requester != candidate {
            (rubric.mentorship_points, Some("Mentorship opportunity"))
        } else {
            (rubric.fallback_experience_points, None)
        };

        ScoreComponent::new(
            ScoreFactor::ExperienceBalance,
            score,
            rubric.both_match_points,
            reason.map(str::to_string).into_iter().collect(),
        )
    }

    /// Activity values are already defaulted to 50 when a user has none.
    fn activity_compatibility(&self, requester: u8, candidate: u8) -> ScoreComponent {
        let rubric = &self.rubric;
        let sum = i32::from(requester) + i32::from(candidate);
        let mut score = sum / 10;
        let mut reasons = Vec::new();

        if sum > 140 {
            reasons.push("Both highly active".to_string());
        } else if sum > 80 {
            reasons.push("Good activity levels".to_string());
        }

        if requester.abs_diff(candidate) > rubric.activity_gap_limit {
            score -= i32::from(rubric.activity_gap_penalty);
            reasons.push("Activity mismatch".to_string());
        }

        ScoreComponent::new(
            ScoreFactor::ActivityCompatibility,
            score.clamp(0, i32::from(rubric.activity_cap)) as u8,
            rubric.activity_cap,
            reasons,
        )
    }

    fn past_success(&self, requester: &UserProfile, candidate: &UserProfile) -> ScoreComponent {
        let rubric = &self.rubric;
        let shared = requester
            .collaboration_groups
            .intersection(&candidate.collaboration_groups)
            .count();

        if shared == 0 {
            return ScoreComponent::new(
                ScoreFactor::PastSuccess,
                rubric.new_pair_points,
                rubric.past_success_cap,
                Vec::new(),
            );
        }

        let earned = usize::from(rubric.new_pair_points)
            + usize::from(rubric.per_shared_group_points).saturating_mul(shared);
        ScoreComponent::new(
            ScoreFactor::PastSuccess,
            earned.min(usize::from(rubric.past_success_cap)) as u8,
            rubric.past_success_cap,
            vec![format!("Past collaborations ({shared})")],
        )
    }
}

fn covered_techs<'a>(techs: &'a BTreeSet<String>, skills: &[String]) -> BTreeSet<&'a str> {
    techs
        .iter()
        .filter(|tech| skills.iter().any(|skill| tokens_overlap(tech, skill)))
        .map(String::as_str)
        .collect()
}

/// Compatibility of a candidate collaborator with the requesting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityOutcome {
    pub requester_id: UserId,
    pub candidate_id: UserId,
    pub problem_id: ProblemId,
    pub compatibility_score: u8,
    pub components: Vec<ScoreComponent>,
}

impl Breakdown for CompatibilityOutcome {
    fn components(&self) -> &[ScoreComponent] {
        &self.components
    }
}
