//! Repository discovery support for issue-tracker adapters: a TTL cache with an injected clock
//! and language-weighted sampling so one ecosystem does not crowd out the rest.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;

pub const DEFAULT_DISCOVERY_TTL_SECS: u64 = 3600;

/// Versioned language weights used when sampling discovered repositories.
pub const LANGUAGE_WEIGHTS_V1: &[(&str, f64)] = &[
    ("Python", 0.25),
    ("JavaScript", 0.20),
    ("TypeScript", 0.15),
    ("Go", 0.10),
    ("Rust", 0.08),
    ("Java", 0.07),
    ("C++", 0.05),
    ("C", 0.05),
    ("Other", 0.05),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredRepository {
    pub full_name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Name or description fragments of link collections, which carry no real issues.
const RESOURCE_LIST_PATTERNS: &[&str] = &[
    "awesome-",
    "-awesome",
    "resources",
    "curated",
    "collection",
    "list-of",
    "-list",
    "reading-list",
    "bookmarks",
    "links",
];

impl DiscoveredRepository {
    pub fn is_resource_list(&self) -> bool {
        let combined = format!("{} {}", self.full_name, self.description).to_lowercase();
        RESOURCE_LIST_PATTERNS
            .iter()
            .any(|pattern| combined.contains(pattern))
    }

    fn language_bucket(&self) -> &str {
        self.language
            .as_deref()
            .filter(|language| !language.is_empty())
            .unwrap_or("Other")
    }
}

/// Time-windowed cache shared by whoever discovers repositories during a run.
pub struct DiscoveryCache<T> {
    entries: Vec<T>,
    stored_at: Option<DateTime<Utc>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T> DiscoveryCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Vec::new(),
            stored_at: None,
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn age(&self) -> Option<Duration> {
        self.stored_at.map(|stored_at| self.clock.now() - stored_at)
    }

    pub fn is_fresh(&self) -> bool {
        self.age().is_some_and(|age| age < self.ttl)
    }

    /// Cached entries while fresh and non-empty.
    pub fn get(&self) -> Option<&[T]> {
        if self.is_fresh() && !self.entries.is_empty() {
            Some(&self.entries)
        } else {
            None
        }
    }

    pub fn store(&mut self, entries: Vec<T>) {
        debug!(
            entries = entries.len(),
            ttl_secs = self.ttl.num_seconds(),
            "discovery cache refreshed"
        );
        self.entries = entries;
        self.stored_at = Some(self.clock.now());
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.stored_at = None;
    }
}

/// Take `floor(target * weight)` repositories per language in weight order, then top up with
/// the remaining repositories in their original order.
pub fn apply_language_diversity(
    repositories: &[DiscoveredRepository],
    target: usize,
    weights: &[(&str, f64)],
) -> Vec<DiscoveredRepository> {
    if repositories.len() <= target {
        return repositories.to_vec();
    }

    let mut by_language: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, repository) in repositories.iter().enumerate() {
        by_language
            .entry(repository.language_bucket())
            .or_default()
            .push(index);
    }

    let mut selected: Vec<usize> = Vec::with_capacity(target);
    for (language, weight) in weights {
        let quota = (target as f64 * weight).floor() as usize;
        if let Some(available) = by_language.get(language) {
            selected.extend(available.iter().take(quota));
        }
    }

    if selected.len() < target {
        let needed = target - selected.len();
        let remaining: Vec<usize> = (0..repositories.len())
            .filter(|index| !selected.contains(index))
            .take(needed)
            .collect();
        selected.extend(remaining);
    }

    selected.truncate(target);
    selected
        .into_iter()
        .map(|index| repositories[index].clone())
        .collect()
}
