use std::sync::Arc;

use super::common::*;
use crate::catalog::{InMemoryProblemStore, ProblemStore};
use crate::ingestion::{
    DeduplicationEngine, DuplicateStrategy, IngestionSummary, QuotaController, QuotaLimits,
    SourceAdapter,
};

fn assert_balanced(summary: &IngestionSummary) {
    assert_eq!(
        summary.total_inserted + summary.duplicates_skipped,
        summary.total_fetched - summary.store_failures
    );
    for tally in &summary.per_source {
        assert_eq!(
            tally.inserted + tally.duplicates,
            tally.fetched - tally.store_failures,
            "tally for {} is unbalanced",
            tally.source
        );
    }
}

#[test]
fn full_initial_yield_skips_redistribution() {
    let store = store();
    let mut sources = vec![
        ScriptedSource::unique("reddit", 10),
        ScriptedSource::unique("stackoverflow", 10),
        ScriptedSource::unique("github", 10),
    ];

    let summary = controller(store.clone()).run(30, 10, &mut sources);

    assert_eq!(summary.total_inserted, 30);
    assert_eq!(summary.shortfall_attempts, 0);
    assert!(summary.target_met());
    assert!(sources.iter().all(|source| source.requests == vec![10]));
    assert_eq!(store.len(), 30);
    assert_balanced(&summary);
}

#[test]
fn shortfall_is_spread_across_sources() {
    let store = store();
    let mut sources = vec![
        ScriptedSource::unique("hackernews", 4),
        ScriptedSource::unique("reddit", 20),
        ScriptedSource::unique("github", 20),
    ];

    let summary = controller(store).run(30, 10, &mut sources);

    // 24 after phase 1, shortage 6, so each source is asked for max(5, 6 / 3 + 1) = 5 more.
    assert_eq!(summary.shortfall_attempts, 1);
    assert_eq!(sources[0].requests, vec![10, 5]);
    assert_eq!(sources[1].requests, vec![10, 5]);
    assert_eq!(sources[2].requests, vec![10, 5]);
    assert_eq!(summary.per_source[0].inserted, 4);
    assert_eq!(summary.total_inserted, 34);
    assert_balanced(&summary);
}

#[test]
fn redistribution_stops_once_target_is_met() {
    let store = store();
    let mut sources = vec![
        ScriptedSource::unique("reddit", 20),
        ScriptedSource::unique("github", 20),
    ];

    let summary = controller(store).run(12, 5, &mut sources);

    assert_eq!(summary.shortfall_attempts, 1);
    assert_eq!(sources[0].requests, vec![5, 5]);
    assert_eq!(sources[1].requests, vec![5]);
    assert_eq!(summary.total_inserted, 15);
}

#[test]
fn redistribution_is_bounded_by_max_attempts() {
    let store = store();
    let mut sources = vec![ScriptedSource::unique("hackernews", 2)];

    let summary = controller(store).run(30, 10, &mut sources);

    assert_eq!(summary.shortfall_attempts, 3);
    assert_eq!(sources[0].requests, vec![10, 29, 29, 29]);
    assert_eq!(summary.total_inserted, 2);
    assert!(!summary.target_met());
}

#[test]
fn custom_limits_change_the_additional_request() {
    let controller = QuotaController::with_limits(
        store(),
        DeduplicationEngine::default(),
        QuotaLimits {
            max_attempts: 1,
            min_additional_per_source: 8,
        },
    );
    assert_eq!(controller.additional_per_source(6, 3), 8);
    assert_eq!(controller.additional_per_source(30, 3), 11);
    assert_eq!(controller.additional_per_source(4, 0), 8);
}

#[test]
fn failing_and_panicking_sources_yield_nothing() {
    let store = store();
    let mut sources: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(FailingSource),
        Box::new(ScriptedSource::unique("reddit", 10)),
        Box::new(PanickingSource),
    ];

    let summary = controller(store).run(10, 10, &mut sources);

    assert_eq!(summary.total_inserted, 10);
    assert_eq!(summary.adapter_failures, 2);
    assert_eq!(summary.per_source[0].source, "failing");
    assert_eq!(summary.per_source[0].adapter_failures, 1);
    assert_eq!(summary.per_source[2].adapter_failures, 1);
    assert_eq!(summary.shortfall_attempts, 0);
    assert_balanced(&summary);
}

#[test]
fn rerun_over_the_same_feed_only_admits_new_records() {
    let store = store();
    let mut first = vec![ScriptedSource::unique("github", 10)];
    controller(store.clone()).run(10, 10, &mut first);

    let mut replay: Vec<_> = (0..10).map(|key| candidate("github", key)).collect();
    replay.extend((100..103).map(|key| candidate("github", key)));
    let mut second = vec![ScriptedSource::new("github", replay)];

    let summary = controller(store.clone()).run(10, 10, &mut second);

    assert!(summary.total_inserted <= 5);
    assert_eq!(summary.total_inserted, 3);
    assert_eq!(
        summary.duplicates_by_strategy.get(&DuplicateStrategy::ReferenceLink),
        Some(&10)
    );
    assert_eq!(store.len(), 13);
    assert_balanced(&summary);
}

#[test]
fn insert_conflicts_count_as_duplicates() {
    let racing = Arc::new(RacingStore {
        inner: InMemoryProblemStore::default(),
    });
    let twice = vec![candidate("reddit", 1), candidate("reddit", 1)];
    let mut sources = vec![ScriptedSource::new("reddit", twice)];

    let summary = QuotaController::new(racing.clone(), DeduplicationEngine::default())
        .run(2, 2, &mut sources);

    assert_eq!(summary.total_inserted, 1);
    assert_eq!(
        summary.duplicates_by_strategy.get(&DuplicateStrategy::InsertConflict),
        Some(&1)
    );
    assert_eq!(racing.all().expect("read back").len(), 1);
    assert_balanced(&summary);
}

#[test]
fn store_failures_are_tallied_separately() {
    let mut sources = vec![ScriptedSource::unique("reddit", 3)];

    let summary = QuotaController::new(Arc::new(UnavailableStore), DeduplicationEngine::default())
        .run(3, 3, &mut sources);

    assert_eq!(summary.total_inserted, 0);
    assert_eq!(summary.duplicates_skipped, 0);
    assert!(summary.store_failures >= 3);
    assert_balanced(&summary);
}

#[test]
fn no_sources_returns_an_empty_summary() {
    let mut sources: Vec<ScriptedSource> = Vec::new();
    let summary = controller(store()).run(30, 10, &mut sources);

    assert_eq!(summary.target_total, 30);
    assert_eq!(summary.total_inserted, 0);
    assert_eq!(summary.shortfall_attempts, 0);
    assert!(summary.per_source.is_empty());
}
