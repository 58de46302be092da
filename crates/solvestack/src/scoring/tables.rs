//! Versioned keyword and weight tables. A new rubric gets a new constant rather than an edit,
//! so persisted scores can always be traced back to the table that produced them.

use serde::Serialize;

/// Keyword tables and caps for problem quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityRubric {
    pub version: &'static str,
    pub technical_keywords: &'static [&'static str],
    pub technical_keyword_cap: u8,
    pub complexity_keywords: &'static [&'static str],
    pub reproduction_keywords: &'static [&'static str],
    pub environment_keywords: &'static [&'static str],
    pub description_cap: u8,
    pub technical_depth_cap: u8,
    pub engagement_cap: u8,
    pub reproducibility_cap: u8,
}

pub const QUALITY_RUBRIC_V1: QualityRubric = QualityRubric {
    version: "quality-v1",
    technical_keywords: &[
        "error", "function", "api", "database", "bug", "crash", "issue",
    ],
    technical_keyword_cap: 5,
    complexity_keywords: &[
        "kubernetes",
        "microservices",
        "distributed",
        "ml",
        "ai",
        "docker",
        "cloud",
    ],
    reproduction_keywords: &["step", "setup", "install", "run", "reproduce", "how to"],
    environment_keywords: &[
        "version",
        "os",
        "environment",
        "python",
        "node",
        "npm",
        "using",
    ],
    description_cap: 30,
    technical_depth_cap: 25,
    engagement_cap: 25,
    reproducibility_cap: 20,
};

/// Point values for user to problem matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchRubric {
    pub version: &'static str,
    pub skill_cap: u8,
    pub general_problem_points: u8,
    /// Indexed by difficulty distance; anything further uses the last entry.
    pub difficulty_points: &'static [u8],
    pub interest_tag_points: u8,
    pub interest_description_points: u8,
    pub interest_neutral_points: u8,
    pub interest_cap: u8,
    pub novelty_base: u8,
    pub novelty_tracked_penalty: u8,
    pub novelty_new_bonus: u8,
}

pub const MATCH_RUBRIC_V1: MatchRubric = MatchRubric {
    version: "match-v1",
    skill_cap: 40,
    general_problem_points: 10,
    difficulty_points: &[20, 10, 5],
    interest_tag_points: 10,
    interest_description_points: 5,
    interest_neutral_points: 10,
    interest_cap: 20,
    novelty_base: 10,
    novelty_tracked_penalty: 5,
    novelty_new_bonus: 10,
};

/// Point values for pairing two users on one problem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompatibilityRubric {
    pub version: &'static str,
    pub limited_skills_points: u8,
    pub general_collaboration_points: u8,
    pub coverage_weight: u32,
    pub unique_contribution_weight: u32,
    pub complementarity_cap: u8,
    pub both_match_points: u8,
    pub balanced_points: u8,
    pub mentorship_points: u8,
    pub fallback_experience_points: u8,
    pub activity_gap_limit: u8,
    pub activity_gap_penalty: u8,
    pub activity_cap: u8,
    pub new_pair_points: u8,
    pub per_shared_group_points: u8,
    pub past_success_cap: u8,
}

pub const COMPATIBILITY_RUBRIC_V1: CompatibilityRubric = CompatibilityRubric {
    version: "compatibility-v1",
    limited_skills_points: 10,
    general_collaboration_points: 15,
    coverage_weight: 25,
    unique_contribution_weight: 10,
    complementarity_cap: 35,
    both_match_points: 20,
    balanced_points: 15,
    mentorship_points: 12,
    fallback_experience_points: 8,
    activity_gap_limit: 40,
    activity_gap_penalty: 10,
    activity_cap: 25,
    new_pair_points: 10,
    per_shared_group_points: 5,
    past_success_cap: 20,
};

/// Lowercased substring test against a keyword table.
pub(crate) fn contains_any(haystack_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack_lower.contains(keyword))
}

/// Two tokens match when either contains the other. Both must already be lowercased.
pub(crate) fn tokens_overlap(tech: &str, skill: &str) -> bool {
    skill.contains(tech) || tech.contains(skill)
}

/// Lowercased, trimmed, non-blank copies of free-form terms such as skills or interests.
pub(crate) fn lowercase_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}
