//! Issue-tracker adapters: discover repositories (through a shared [`DiscoveryCache`]), sample
//! them by language, then turn qualifying open issues into candidates.

mod export;

pub use export::TrackerExport;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::candidate::CandidateRecord;
use super::discovery::{
    apply_language_diversity, DiscoveredRepository, DiscoveryCache, LANGUAGE_WEIGHTS_V1,
};
use super::normalizer::{clean_text, classify_solution, extract_keywords, humanize};
use super::source::{AdapterError, SourceAdapter};
use crate::catalog::Difficulty;

const MIN_REPOSITORIES: usize = 10;
const MIN_ISSUES_PER_REPOSITORY: usize = 2;
/// Issues are listed at this multiple of the wanted count to leave room for filtering.
const ISSUE_OVERFETCH: usize = 3;
const MIN_BODY_CHARS: usize = 80;
const MAX_DESCRIPTION_CHARS: usize = 1000;
const MAX_TOPICS_IN_TECH: usize = 3;
const LONG_BODY_WORDS: usize = 500;

const GOOD_LABELS: &[&str] = &[
    "bug",
    "enhancement",
    "feature",
    "good first issue",
    "good-first-issue",
    "help wanted",
    "help-wanted",
    "beginner-friendly",
    "performance",
    "optimization",
    "question",
    "documentation",
];

const BAD_LABELS: &[&str] = &["duplicate", "wontfix", "invalid", "spam", "closed"];

const BEGINNER_LABELS: &[&str] = &[
    "good first issue",
    "good-first-issue",
    "beginner-friendly",
    "beginner",
    "easy",
];

const ADVANCED_LABELS: &[&str] = &[
    "performance",
    "optimization",
    "complex",
    "advanced",
    "difficult",
];

const ADVANCED_KEYWORDS: &[&str] = &[
    "performance",
    "optimization",
    "memory leak",
    "race condition",
    "concurrency",
    "distributed",
    "architecture",
    "scalability",
    "kernel",
    "compiler",
    "threading",
    "async",
    "garbage collection",
    "memory management",
];

/// Open issue as listed by a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Backend of an issue tracker such as GitHub.
pub trait IssueTracker {
    /// Platform label, used as the `source` prefix of every candidate.
    fn name(&self) -> &str;

    fn discover(&mut self) -> Result<Vec<DiscoveredRepository>, AdapterError>;

    fn open_issues(
        &mut self,
        repository: &DiscoveredRepository,
        limit: usize,
    ) -> Result<Vec<TrackerIssue>, AdapterError>;
}

/// Source adapter over an [`IssueTracker`]. Discovery results live in the borrowed cache, so
/// repeated fetches within the TTL reuse them instead of rediscovering.
pub struct TrackerSource<'c, T> {
    tracker: T,
    cache: &'c mut DiscoveryCache<DiscoveredRepository>,
}

impl<'c, T: IssueTracker> TrackerSource<'c, T> {
    pub fn new(tracker: T, cache: &'c mut DiscoveryCache<DiscoveredRepository>) -> Self {
        Self { tracker, cache }
    }

    fn repositories(&mut self, limit: usize) -> Result<Vec<DiscoveredRepository>, AdapterError> {
        if let Some(cached) = self.cache.get() {
            debug!(
                tracker = self.tracker.name(),
                cached = cached.len(),
                "using cached repositories"
            );
            return Ok(apply_language_diversity(cached, limit, LANGUAGE_WEIGHTS_V1));
        }

        let discovered: Vec<DiscoveredRepository> = self
            .tracker
            .discover()?
            .into_iter()
            .filter(|repository| !repository.is_resource_list())
            .collect();
        if !discovered.is_empty() {
            self.cache.store(discovered.clone());
        }
        Ok(apply_language_diversity(
            &discovered,
            limit,
            LANGUAGE_WEIGHTS_V1,
        ))
    }
}

impl<T: IssueTracker> SourceAdapter for TrackerSource<'_, T> {
    fn name(&self) -> &str {
        self.tracker.name()
    }

    fn fetch(&mut self, limit: usize) -> Result<Vec<CandidateRecord>, AdapterError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let repositories = self.repositories((limit / 2).max(MIN_REPOSITORIES))?;
        if repositories.is_empty() {
            warn!(tracker = self.tracker.name(), "no repositories discovered");
            return Ok(Vec::new());
        }

        let per_repository = (limit * 2 / repositories.len()).max(MIN_ISSUES_PER_REPOSITORY);
        let tracker = self.tracker.name().to_string();
        let mut candidates = Vec::with_capacity(limit);

        for repository in &repositories {
            if candidates.len() >= limit {
                break;
            }
            let issues = match self
                .tracker
                .open_issues(repository, per_repository * ISSUE_OVERFETCH)
            {
                Ok(issues) => issues,
                Err(err) => {
                    warn!(
                        tracker = %tracker,
                        repository = %repository.full_name,
                        error = %err,
                        "issue listing failed, skipping repository"
                    );
                    continue;
                }
            };

            let room = per_repository.min(limit - candidates.len());
            candidates.extend(
                issues
                    .into_iter()
                    .filter(is_qualifying)
                    .take(room)
                    .map(|issue| issue_to_candidate(&tracker, repository, issue)),
            );
        }

        Ok(candidates)
    }
}

fn lowercase_labels(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|label| label.trim().to_lowercase())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Open issue with a real body, no disqualifying label, and some sign of attention.
fn is_qualifying(issue: &TrackerIssue) -> bool {
    let labels = lowercase_labels(&issue.labels);
    if labels.iter().any(|label| BAD_LABELS.contains(&label.as_str())) {
        return false;
    }
    if issue.body.trim().chars().count() < MIN_BODY_CHARS {
        return false;
    }
    labels.iter().any(|label| GOOD_LABELS.contains(&label.as_str())) || issue.comments >= 1
}

fn issue_difficulty(labels: &[String], body: &str) -> Difficulty {
    if labels.iter().any(|label| BEGINNER_LABELS.contains(&label.as_str())) {
        return Difficulty::Beginner;
    }

    let text = format!("{} {}", body, labels.join(" ")).to_lowercase();
    if ADVANCED_KEYWORDS.iter().any(|keyword| text.contains(keyword))
        || labels.iter().any(|label| ADVANCED_LABELS.contains(&label.as_str()))
        || body.split_whitespace().count() > LONG_BODY_WORDS
    {
        return Difficulty::Advanced;
    }

    Difficulty::Intermediate
}

/// Repository language followed by up to three topics.
fn suggested_tech(repository: &DiscoveredRepository) -> String {
    repository
        .language
        .iter()
        .filter(|language| !language.is_empty())
        .chain(repository.topics.iter().take(MAX_TOPICS_IN_TECH))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn issue_to_candidate(
    tracker: &str,
    repository: &DiscoveredRepository,
    issue: TrackerIssue,
) -> CandidateRecord {
    let labels = lowercase_labels(&issue.labels);
    let title = clean_text(&issue.title);
    let description: String = clean_text(&issue.body)
        .chars()
        .take(MAX_DESCRIPTION_CHARS)
        .collect();

    let tags = if labels.is_empty() {
        extract_keywords(&format!("{title} {description}"))
    } else {
        labels.iter().map(|label| label.replace(' ', "-")).collect()
    };
    let difficulty = issue_difficulty(&labels, &issue.body);
    let solution = classify_solution(&format!(
        "{} {}",
        issue.body,
        repository.topics.join(" ")
    ));
    let humanized = humanize(&title, &description);

    CandidateRecord {
        source: format!("{tracker}/{}", repository.full_name),
        source_id: Some(issue.number.to_string()),
        reference_link: issue.html_url,
        tags,
        suggested_tech: suggested_tech(repository),
        date: issue
            .created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        author_name: issue
            .author
            .filter(|author| !author.trim().is_empty())
            .unwrap_or_else(|| "Anonymous".to_string()),
        author_id: issue
            .author_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        humanized_explanation: Some(humanized),
        solution_possibility: Some(solution),
        difficulty: Some(difficulty.label().to_string()),
        title,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beginner_labels_win_over_advanced_keywords() {
        let labels = vec!["good first issue".to_string()];
        assert_eq!(
            issue_difficulty(&labels, "fix the race condition"),
            Difficulty::Beginner
        );
        assert_eq!(
            issue_difficulty(&[], "fix the race condition"),
            Difficulty::Advanced
        );
        assert_eq!(
            issue_difficulty(&["complex".to_string()], "short"),
            Difficulty::Advanced
        );
        assert_eq!(issue_difficulty(&[], &"word ".repeat(501)), Difficulty::Advanced);
        assert_eq!(issue_difficulty(&[], "typo in readme"), Difficulty::Intermediate);
    }

    #[test]
    fn suggested_tech_lists_language_then_three_topics() {
        let repository = DiscoveredRepository {
            full_name: "acme/tool".to_string(),
            language: Some("Rust".to_string()),
            description: String::new(),
            topics: vec!["cli".into(), "async".into(), "tokio".into(), "extra".into()],
        };
        assert_eq!(suggested_tech(&repository), "Rust, cli, async, tokio");

        let bare = DiscoveredRepository {
            language: None,
            topics: vec!["iot".into()],
            ..repository
        };
        assert_eq!(suggested_tech(&bare), "iot");
    }
}
