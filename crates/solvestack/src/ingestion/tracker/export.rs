use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{IssueTracker, TrackerIssue};
use crate::ingestion::discovery::DiscoveredRepository;
use crate::ingestion::feed::FeedError;
use crate::ingestion::source::AdapterError;

#[derive(Debug, Clone, Deserialize)]
struct ExportedRepository {
    #[serde(flatten)]
    repository: DiscoveredRepository,
    #[serde(default)]
    issues: Vec<TrackerIssue>,
}

/// Tracker backed by a JSON export: an array of repositories, each carrying its open issues
/// ordered as the tracker listed them.
#[derive(Debug, Clone)]
pub struct TrackerExport {
    name: String,
    repositories: Vec<ExportedRepository>,
}

impl TrackerExport {
    /// Named after the file stem, e.g. `github.json` → `github`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tracker".to_string());
        let file = std::fs::File::open(path)?;
        Self::from_reader(name, file)
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, FeedError> {
        let repositories: Vec<ExportedRepository> = serde_json::from_reader(reader)?;
        let name = name.into();
        debug!(
            tracker = %name,
            repositories = repositories.len(),
            "tracker export loaded"
        );
        Ok(Self { name, repositories })
    }
}

impl IssueTracker for TrackerExport {
    fn name(&self) -> &str {
        &self.name
    }

    fn discover(&mut self) -> Result<Vec<DiscoveredRepository>, AdapterError> {
        Ok(self
            .repositories
            .iter()
            .map(|exported| exported.repository.clone())
            .collect())
    }

    fn open_issues(
        &mut self,
        repository: &DiscoveredRepository,
        limit: usize,
    ) -> Result<Vec<TrackerIssue>, AdapterError> {
        Ok(self
            .repositories
            .iter()
            .find(|exported| exported.repository.full_name == repository.full_name)
            .map(|exported| exported.issues.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
