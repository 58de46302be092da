use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::{Difficulty, GroupId, Problem, ProblemId, UserId, UserProfile};
use crate::ingestion::CandidateRecord;

pub(super) const EXAMPLE_A: &str =
    "Error: NullPointerException when calling API. Steps: install, then run. Using python 3.9?";

pub(super) fn scraped_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 12, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn problem(id: u64, description: &str, suggested_tech: &str) -> Problem {
    Problem::from_candidate(
        ProblemId(id),
        CandidateRecord {
            title: format!("Problem {id}"),
            description: description.to_string(),
            source: "github/acme".to_string(),
            source_id: Some(id.to_string()),
            reference_link: format!("https://github.com/acme/app/issues/{id}"),
            suggested_tech: suggested_tech.to_string(),
            ..CandidateRecord::default()
        },
        scraped_at(),
    )
}

pub(super) fn problem_at(id: u64, suggested_tech: &str, difficulty: Difficulty) -> Problem {
    let mut problem = problem(id, "", suggested_tech);
    problem.difficulty = difficulty;
    problem
}

pub(super) fn user(id: u64, skills: &[&str]) -> UserProfile {
    UserProfile {
        id: UserId(id),
        username: format!("user{id}"),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        experience_level: Difficulty::Intermediate,
        interests: Vec::new(),
        activity_score: None,
        preferred_difficulty: Difficulty::Intermediate,
        preferred_effort: "1-3 days".to_string(),
        interested_problems: BTreeSet::new(),
        collaboration_groups: BTreeSet::new(),
    }
}

pub(super) fn tracking(mut user: UserProfile, problem: ProblemId) -> UserProfile {
    user.interested_problems.insert(problem);
    user
}

pub(super) fn in_groups(mut user: UserProfile, groups: &[u64]) -> UserProfile {
    user.collaboration_groups
        .extend(groups.iter().map(|group| GroupId(*group)));
    user
}
