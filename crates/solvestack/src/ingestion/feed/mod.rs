mod parser;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::candidate::CandidateRecord;
use super::source::{AdapterError, SourceAdapter};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read feed export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid feed CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid tracker export: {0}")]
    Json(#[from] serde_json::Error),
}

/// Adapter over a CSV export of already-normalized postings. Each `fetch` pages forward, so a
/// shortfall re-query receives rows the previous call did not.
#[derive(Debug, Clone)]
pub struct CsvFeedSource {
    name: String,
    candidates: Vec<CandidateRecord>,
    cursor: usize,
}

impl CsvFeedSource {
    /// The adapter is named after the file stem, e.g. `reddit.csv` → `reddit`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "feed".to_string());
        let file = std::fs::File::open(path)?;
        Self::from_reader(name, file)
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, FeedError> {
        let candidates = parser::parse_candidates(reader)?;
        let name = name.into();
        debug!(feed = %name, rows = candidates.len(), "feed loaded");
        Ok(Self {
            name,
            candidates,
            cursor: 0,
        })
    }

    pub fn remaining(&self) -> usize {
        self.candidates.len() - self.cursor
    }

    /// Start paging from the first row again, as a fresh run against the same export would.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl SourceAdapter for CsvFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self, limit: usize) -> Result<Vec<CandidateRecord>, AdapterError> {
        let end = (self.cursor + limit).min(self.candidates.len());
        let page = self.candidates[self.cursor..end].to_vec();
        self.cursor = end;
        Ok(page)
    }
}
