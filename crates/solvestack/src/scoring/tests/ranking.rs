use super::common::*;
use crate::catalog::{Difficulty, ProblemId, UserId};
use crate::scoring::{
    recommend, suggest_collaborators, CompatibilityEngine, MatchEngine, RankingError,
};

fn catalog() -> Vec<crate::catalog::Problem> {
    let mut with_tag = problem_at(2, "Go, Rust", Difficulty::Intermediate);
    with_tag.tags = vec!["embedded-systems".to_string()];
    vec![
        problem_at(1, "Rust", Difficulty::Beginner),
        with_tag,
        problem_at(3, "Go", Difficulty::Advanced),
        problem_at(4, "Rust, Go, Zig, C", Difficulty::Advanced),
    ]
}

fn reader() -> crate::catalog::UserProfile {
    let mut reader = tracking(user(1, &["rust"]), ProblemId(3));
    reader.preferred_difficulty = Difficulty::Beginner;
    reader.interests = vec!["embedded".to_string()];
    reader
}

#[test]
fn recommendations_drop_weak_matches_and_sort_descending() {
    let ranked = recommend(&MatchEngine::default(), &reader(), &catalog(), 10);

    let scores: Vec<(ProblemId, u8)> = ranked
        .iter()
        .map(|entry| (entry.problem_id, entry.outcome.match_score))
        .collect();
    assert_eq!(
        scores,
        vec![(ProblemId(1), 80), (ProblemId(2), 60), (ProblemId(4), 35)]
    );
    assert_eq!(ranked[0].title, "Problem 1");
}

#[test]
fn recommendations_respect_the_limit_and_keep_ties_in_order() {
    let engine = MatchEngine::default();
    assert_eq!(recommend(&engine, &reader(), &catalog(), 2).len(), 2);

    let twins = vec![
        problem_at(7, "Rust", Difficulty::Beginner),
        problem_at(5, "Rust", Difficulty::Beginner),
    ];
    let ranked = recommend(&engine, &reader(), &twins, 5);
    let order: Vec<ProblemId> = ranked.iter().map(|entry| entry.problem_id).collect();
    assert_eq!(order, vec![ProblemId(7), ProblemId(5)]);

    assert!(recommend(&engine, &reader(), &[], 5).is_empty());
}

#[test]
fn suggestions_require_interest_from_the_requester() {
    let subject = problem(20, "", "Python, React");
    let result = suggest_collaborators(
        &CompatibilityEngine::default(),
        &user(1, &["python"]),
        &[user(2, &["react"])],
        &subject,
        5,
    );
    assert_eq!(
        result,
        Err(RankingError::NotInterested {
            user: UserId(1),
            problem: ProblemId(20),
        })
    );
}

#[test]
fn suggestions_rank_other_interested_users() {
    let subject = problem(21, "", "Python, React");
    let requester = tracking(user(1, &["python"]), subject.ps_id);
    let candidates = vec![
        requester.clone(),
        tracking(user(2, &["python"]), subject.ps_id),
        tracking(user(3, &["react"]), subject.ps_id),
        user(4, &["react"]),
    ];

    let ranked = suggest_collaborators(
        &CompatibilityEngine::default(),
        &requester,
        &candidates,
        &subject,
        5,
    )
    .expect("requester is interested");

    let ids: Vec<UserId> = ranked.iter().map(|entry| entry.user_id).collect();
    assert_eq!(ids, vec![UserId(3), UserId(2)]);
    assert!(
        ranked[0].outcome.compatibility_score > ranked[1].outcome.compatibility_score
    );
    assert_eq!(ranked[0].username, "user3");

    let top = suggest_collaborators(
        &CompatibilityEngine::default(),
        &requester,
        &candidates,
        &subject,
        1,
    )
    .expect("requester is interested");
    assert_eq!(top.len(), 1);
}
