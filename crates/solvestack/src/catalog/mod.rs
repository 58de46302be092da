//! Persisted catalog: problems, user profiles, and the storage gateway.

pub mod domain;
pub mod repository;

pub use domain::{
    tech_tokens, Difficulty, GroupId, Problem, ProblemId, SolutionPossibility, UserId, UserProfile,
    DEFAULT_ACTIVITY_SCORE, DEFAULT_ESTIMATED_EFFORT,
};
pub use repository::{InMemoryProblemStore, ProblemStore, RecentTitle, StoreError};
