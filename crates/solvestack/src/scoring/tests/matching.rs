use super::common::*;
use crate::catalog::{Difficulty, ProblemId};
use crate::scoring::{Breakdown, MatchEngine, ScoreFactor};

#[test]
fn partial_skill_coverage_is_floored() {
    let engine = MatchEngine::default();
    let outcome = engine.score(
        &user(1, &["Python", "Django"]),
        &problem(1, "", "Python, Django, PostgreSQL"),
    );

    let skill = outcome
        .component(ScoreFactor::SkillMatch)
        .expect("skill component");
    assert_eq!(skill.score, 26);
    assert_eq!(skill.reasons, vec!["Strong match (2/3 techs)"]);
}

#[test]
fn skills_and_techs_match_as_substrings_either_way() {
    let engine = MatchEngine::default();
    let outcome = engine.score(
        &user(2, &["react", "javascript"]),
        &problem(2, "", "React Native, Java"),
    );
    let skill = outcome
        .component(ScoreFactor::SkillMatch)
        .expect("skill component");
    assert_eq!(skill.score, 40);
    assert_eq!(skill.reasons, vec!["Perfect skill match"]);
}

#[test]
fn missing_skills_or_techs_use_fixed_scores() {
    let engine = MatchEngine::default();

    let no_skills = engine.score(&user(3, &[]), &problem(3, "", "Go"));
    let skill = no_skills
        .component(ScoreFactor::SkillMatch)
        .expect("skill component");
    assert_eq!(skill.score, 0);
    assert_eq!(skill.reasons, vec!["No skills listed"]);

    let general = engine.score(&user(3, &["go"]), &problem(4, "", " , "));
    let skill = general
        .component(ScoreFactor::SkillMatch)
        .expect("skill component");
    assert_eq!(skill.score, 10);
    assert_eq!(skill.reasons, vec!["General problem"]);

    let unmatched = engine.score(&user(3, &["haskell"]), &problem(5, "", "Go, Rust"));
    assert_eq!(unmatched.score_of(ScoreFactor::SkillMatch), 0);
    assert!(unmatched
        .reasons()
        .contains(&"Learning opportunity".to_string()));
}

#[test]
fn difficulty_match_follows_preference_distance() {
    let engine = MatchEngine::default();
    let mut learner = user(4, &["go"]);
    learner.preferred_difficulty = Difficulty::Beginner;
    learner.experience_level = Difficulty::Advanced;

    let cases = [
        (Difficulty::Beginner, 20, "Perfect difficulty match"),
        (Difficulty::Intermediate, 10, "Close difficulty match"),
        (Difficulty::Advanced, 5, "Challenging difficulty"),
    ];
    for (difficulty, expected, reason) in cases {
        let outcome = engine.score(&learner, &problem_at(6, "Go", difficulty));
        let component = outcome
            .component(ScoreFactor::DifficultyMatch)
            .expect("difficulty component");
        assert_eq!(component.score, expected);
        assert_eq!(component.reasons, vec![reason]);
    }
}

#[test]
fn interests_score_tags_above_description() {
    let engine = MatchEngine::default();
    let mut curious = user(5, &["go"]);
    curious.interests = vec!["Web".to_string(), "database".to_string(), "audio".to_string()];
    let mut subject = problem(7, "Slow database queries on every page load", "Go");
    subject.tags = vec!["web-dev".to_string(), "performance".to_string()];

    let interest = engine
        .score(&curious, &subject)
        .component(ScoreFactor::InterestMatch)
        .cloned()
        .expect("interest component");
    assert_eq!(interest.score, 15);
    assert_eq!(interest.reasons, vec!["Matches interests: Web, database"]);
}

#[test]
fn interest_score_is_capped_and_neutral_without_interests() {
    let engine = MatchEngine::default();
    let mut subject = problem(8, "", "Go");
    subject.tags = vec!["cli".to_string(), "networking".to_string(), "tls".to_string()];

    let mut keen = user(6, &["go"]);
    keen.interests = vec!["cli".to_string(), "networking".to_string(), "tls".to_string()];
    assert_eq!(
        engine
            .score(&keen, &subject)
            .score_of(ScoreFactor::InterestMatch),
        20
    );

    let neutral = engine.score(&user(7, &["go"]), &subject);
    let interest = neutral
        .component(ScoreFactor::InterestMatch)
        .expect("interest component");
    assert_eq!(interest.score, 10);
    assert!(interest.reasons.is_empty());
}

#[test]
fn novelty_prefers_problems_the_user_is_not_tracking() {
    let engine = MatchEngine::default();
    let subject = problem(9, "", "Go");

    let fresh = engine.score(&user(8, &["go"]), &subject);
    assert_eq!(fresh.score_of(ScoreFactor::Novelty), 20);
    assert!(fresh.reasons().contains(&"New discovery".to_string()));

    let tracked = engine.score(&tracking(user(8, &["go"]), ProblemId(9)), &subject);
    assert_eq!(tracked.score_of(ScoreFactor::Novelty), 5);
    assert!(tracked
        .reasons()
        .contains(&"Already tracking this problem".to_string()));
}

#[test]
fn ideal_pairing_reaches_one_hundred() {
    let engine = MatchEngine::default();
    let mut ideal = user(9, &["rust", "tokio"]);
    ideal.interests = vec!["async".to_string(), "networking".to_string()];
    let mut subject = problem_at(10, "Rust, Tokio", Difficulty::Intermediate);
    subject.tags = vec!["async-io".to_string(), "networking".to_string()];

    let outcome = engine.score(&ideal, &subject);
    assert_eq!(outcome.match_score, 100);
    assert_eq!(outcome.user_id, ideal.id);
    assert_eq!(outcome.problem_id, ProblemId(10));
}

#[test]
fn match_scores_stay_in_range_for_edge_inputs() {
    let engine = MatchEngine::default();
    let mut odd = user(10, &["", "  ", "C"]);
    odd.interests = vec![String::new(), "x".to_string()];
    let subjects = [
        problem(11, "", ""),
        problem(12, "xxxxxxxx", "c, C, c++, objective-c"),
        problem_at(13, ",,,", Difficulty::Advanced),
    ];

    for subject in &subjects {
        let outcome = engine.score(&odd, subject);
        assert!(outcome.match_score <= 100);
        for component in &outcome.components {
            assert!(component.score <= component.max);
        }
    }
}
