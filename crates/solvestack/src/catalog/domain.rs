use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingestion::CandidateRecord;

/// Surrogate key assigned to a persisted problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProblemId(pub u64);

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ps-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u64);

/// Difficulty classes shared by problems and user preferences.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const fn index(self) -> u8 {
        match self {
            Difficulty::Beginner => 0,
            Difficulty::Intermediate => 1,
            Difficulty::Advanced => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Lenient parse used for adapter hints such as `"beginner"` or `" Advanced "`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn distance(self, other: Difficulty) -> u8 {
        self.index().abs_diff(other.index())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a problem calls for software, hardware, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionPossibility {
    Software,
    Hardware,
    Hybrid,
}

impl SolutionPossibility {
    pub const fn label(self) -> &'static str {
        match self {
            SolutionPossibility::Software => "software",
            SolutionPossibility::Hardware => "hardware",
            SolutionPossibility::Hybrid => "hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "software" => Some(Self::Software),
            "hardware" => Some(Self::Hardware),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

pub const DEFAULT_ESTIMATED_EFFORT: &str = "1-3 days";

/// Persisted problem statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub ps_id: ProblemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub source_id: Option<String>,
    pub reference_link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub suggested_tech: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub humanized_explanation: Option<String>,
    #[serde(default)]
    pub solution_possibility: Option<SolutionPossibility>,
    pub scraped_at: DateTime<Utc>,
    #[serde(default)]
    pub quality_score: u8,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_effort")]
    pub estimated_effort: String,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub interested_count: u32,
    #[serde(default)]
    pub score_updated_at: Option<DateTime<Utc>>,
}

fn default_effort() -> String {
    DEFAULT_ESTIMATED_EFFORT.to_string()
}

impl Problem {
    /// Materialize a freshly accepted candidate. Only the store calls this, once per record.
    pub fn from_candidate(
        ps_id: ProblemId,
        candidate: CandidateRecord,
        scraped_at: DateTime<Utc>,
    ) -> Self {
        let difficulty = candidate
            .difficulty
            .as_deref()
            .and_then(Difficulty::parse)
            .unwrap_or_default();

        Self {
            ps_id,
            title: candidate.title,
            description: candidate.description,
            source: candidate.source,
            source_id: candidate.source_id,
            reference_link: candidate.reference_link,
            tags: candidate.tags,
            suggested_tech: candidate.suggested_tech,
            date: candidate.date,
            author_name: candidate.author_name,
            author_id: candidate.author_id,
            humanized_explanation: candidate.humanized_explanation,
            solution_possibility: candidate.solution_possibility,
            scraped_at,
            quality_score: 0,
            difficulty,
            estimated_effort: default_effort(),
            upvotes: 0,
            views: 0,
            interested_count: 0,
            score_updated_at: None,
        }
    }

    /// Comma-separated technology tokens, trimmed, empties dropped.
    pub fn tech_tokens(&self) -> Vec<&str> {
        tech_tokens(&self.suggested_tech)
    }
}

pub fn tech_tokens(suggested_tech: &str) -> Vec<&str> {
    suggested_tech
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

pub const DEFAULT_ACTIVITY_SCORE: u8 = 50;

/// Registered user as read by the matching engines. Never mutated by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Difficulty,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub activity_score: Option<u8>,
    #[serde(default)]
    pub preferred_difficulty: Difficulty,
    #[serde(default = "default_effort")]
    pub preferred_effort: String,
    #[serde(default)]
    pub interested_problems: BTreeSet<ProblemId>,
    #[serde(default)]
    pub collaboration_groups: BTreeSet<GroupId>,
}

impl UserProfile {
    pub fn activity(&self) -> u8 {
        self.activity_score
            .unwrap_or(DEFAULT_ACTIVITY_SCORE)
            .min(100)
    }

    pub fn is_interested_in(&self, problem: ProblemId) -> bool {
        self.interested_problems.contains(&problem)
    }
}
