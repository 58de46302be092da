use serde::{Deserialize, Serialize};

use crate::catalog::SolutionPossibility;

/// Normalized posting produced by a source adapter and consumed once by the quota controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `<platform>[/<subunit>]`, e.g. `reddit/learnpython` or `hackernews`.
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
    /// Adapter-side difficulty guess, free text until the store parses it.
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl CandidateRecord {
    pub fn source_prefix(&self) -> &str {
        source_prefix(&self.source)
    }
}

/// Platform portion of a `source` value: everything before the first `/`.
pub fn source_prefix(source: &str) -> &str {
    source.split_once('/').map_or(source, |(prefix, _)| prefix)
}
