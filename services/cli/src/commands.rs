use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use solvestack::catalog::{InMemoryProblemStore, Problem, ProblemStore, UserProfile};
use solvestack::clock::{Clock, SystemClock};
use solvestack::error::AppError;
use solvestack::ingestion::{
    CsvFeedSource, DeduplicationEngine, DiscoveredRepository, DiscoveryCache, IngestionSummary,
    QuotaController, SourceAdapter, TrackerExport, TrackerSource,
};
use solvestack::scoring::{
    recommend, suggest_collaborators, CompatibilityEngine, MatchEngine, QualityEngine,
};
use tracing::info;

use crate::cli::{IngestArgs, RecommendArgs, ScoreArgs, SuggestArgs};
use crate::infra::{bootstrap, print_json, read_json, write_json};

#[derive(Serialize)]
struct IngestReport {
    summary: IngestionSummary,
    catalog_size: usize,
    rescored: usize,
}

pub(crate) fn run_ingest(args: IngestArgs, verbosity: u8) -> Result<(), AppError> {
    let config = bootstrap(verbosity)?;
    let IngestArgs {
        feeds,
        trackers,
        target,
        per_source,
        catalog,
        score,
        snapshot,
    } = args;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let trackers = trackers
        .iter()
        .map(TrackerExport::from_path)
        .collect::<Result<Vec<_>, _>>()?;
    let mut caches: Vec<DiscoveryCache<DiscoveredRepository>> = trackers
        .iter()
        .map(|_| DiscoveryCache::new(config.discovery.cache_ttl(), clock.clone()))
        .collect();

    let mut sources: Vec<Box<dyn SourceAdapter + '_>> = Vec::new();
    for path in &feeds {
        sources.push(Box::new(CsvFeedSource::from_path(path)?));
    }
    for (tracker, cache) in trackers.into_iter().zip(caches.iter_mut()) {
        sources.push(Box::new(TrackerSource::new(tracker, cache)));
    }

    let existing: Vec<Problem> = match &catalog {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let store = Arc::new(InMemoryProblemStore::from_problems(existing, clock));

    let controller = QuotaController::with_limits(
        store.clone(),
        DeduplicationEngine::new(config.dedup),
        config.ingestion.quota_limits(),
    );
    let summary = controller.run(
        target.unwrap_or(config.ingestion.target_total),
        per_source.unwrap_or(config.ingestion.per_source),
        &mut sources,
    );

    let mut rescored = 0;
    if score {
        let engine = QualityEngine::default();
        let now = Utc::now();
        for id in &summary.inserted_ids {
            engine.rescore(store.as_ref(), *id, now)?;
            rescored += 1;
        }
    }

    if let Some(path) = &snapshot {
        let problems = store.all()?;
        write_json(path, &problems)?;
        info!(path = %path.display(), problems = problems.len(), "catalog snapshot written");
    }

    print_json(&IngestReport {
        summary,
        catalog_size: store.len(),
        rescored,
    })
}

pub(crate) fn run_score(args: ScoreArgs, verbosity: u8) -> Result<(), AppError> {
    bootstrap(verbosity)?;
    let problem: Problem = read_json(&args.problem)?;
    let assessment = QualityEngine::default().score(&problem);
    print_json(&assessment)
}

pub(crate) fn run_recommend(args: RecommendArgs, verbosity: u8) -> Result<(), AppError> {
    bootstrap(verbosity)?;
    let user: UserProfile = read_json(&args.user)?;
    let problems: Vec<Problem> = read_json(&args.problems)?;
    let ranked = recommend(&MatchEngine::default(), &user, &problems, args.limit);
    print_json(&ranked)
}

pub(crate) fn run_suggest(args: SuggestArgs, verbosity: u8) -> Result<(), AppError> {
    bootstrap(verbosity)?;
    let requester: UserProfile = read_json(&args.user)?;
    let candidates: Vec<UserProfile> = read_json(&args.candidates)?;
    let problem: Problem = read_json(&args.problem)?;
    let ranked = suggest_collaborators(
        &CompatibilityEngine::default(),
        &requester,
        &candidates,
        &problem,
        args.limit,
    )?;
    print_json(&ranked)
}
