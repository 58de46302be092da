//! Multi-source ingestion: adapters, normalization, deduplication, and quota control.

mod candidate;
pub mod dedup;
pub mod discovery;
pub mod feed;
pub mod normalizer;
pub mod quota;
mod source;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use candidate::{source_prefix, CandidateRecord};
pub use dedup::{DedupConfig, DedupVerdict, DeduplicationEngine, DuplicateStrategy};
pub use discovery::{apply_language_diversity, DiscoveredRepository, DiscoveryCache};
pub use feed::{CsvFeedSource, FeedError};
pub use quota::{IngestionSummary, QuotaController, QuotaLimits, SourceTally};
pub use source::{AdapterError, SourceAdapter};
pub use tracker::{IssueTracker, TrackerExport, TrackerIssue, TrackerSource};
