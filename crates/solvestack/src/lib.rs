//! Multi-source problem-statement ingestion with deduplication, plus deterministic quality,
//! match, and compatibility scoring.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod scoring;
pub mod telemetry;
