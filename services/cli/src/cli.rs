use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use solvestack::error::AppError;

use crate::commands::{run_ingest, run_recommend, run_score, run_suggest};

#[derive(Parser, Debug)]
#[command(
    name = "solvestack",
    about = "Ingest, deduplicate, and score problem statements from the command line",
    version
)]
struct Cli {
    /// Raise log verbosity for solvestack crates (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull candidates from CSV feeds and issue-tracker exports into the catalog
    Ingest(IngestArgs),
    /// Compute the quality score, difficulty, and effort for one problem
    Score(ScoreArgs),
    /// Rank catalog problems for one user
    Recommend(RecommendArgs),
    /// Rank potential collaborators for a problem the user is tracking
    Suggest(SuggestArgs),
}

#[derive(Args, Debug)]
pub(crate) struct IngestArgs {
    /// CSV feed export; repeat the flag once per source
    #[arg(long = "feed", required_unless_present = "trackers")]
    pub(crate) feeds: Vec<PathBuf>,
    /// Issue-tracker JSON export (repositories with open issues); repeatable
    #[arg(long = "tracker")]
    pub(crate) trackers: Vec<PathBuf>,
    /// Number of new problems to aim for (defaults to INGEST_TARGET_TOTAL)
    #[arg(long)]
    pub(crate) target: Option<usize>,
    /// Initial request size per source (defaults to INGEST_PER_SOURCE)
    #[arg(long)]
    pub(crate) per_source: Option<usize>,
    /// Existing catalog snapshot (JSON array of problems) to deduplicate against
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Score every newly inserted problem before writing the snapshot
    #[arg(long)]
    pub(crate) score: bool,
    /// Write the resulting catalog to this JSON file
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Problem JSON file
    #[arg(long)]
    pub(crate) problem: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// User profile JSON file
    #[arg(long)]
    pub(crate) user: PathBuf,
    /// Catalog JSON file (array of problems)
    #[arg(long)]
    pub(crate) problems: PathBuf,
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct SuggestArgs {
    /// Requesting user's profile JSON file
    #[arg(long)]
    pub(crate) user: PathBuf,
    /// Candidate profiles JSON file (array of users)
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Problem JSON file
    #[arg(long)]
    pub(crate) problem: PathBuf,
    #[arg(long, default_value_t = 5)]
    pub(crate) limit: usize,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let verbosity = cli.verbose;

    match cli.command {
        Command::Ingest(args) => run_ingest(args, verbosity),
        Command::Score(args) => run_score(args, verbosity),
        Command::Recommend(args) => run_recommend(args, verbosity),
        Command::Suggest(args) => run_suggest(args, verbosity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_accepts_repeated_feeds() {
        let cli = Cli::try_parse_from([
            "solvestack",
            "ingest",
            "--feed",
            "reddit.csv",
            "--feed",
            "github.csv",
            "--target",
            "12",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.feeds.len(), 2);
                assert_eq!(args.target, Some(12));
                assert!(args.per_source.is_none());
                assert!(!args.score);
            }
            other => panic!("expected ingest, got {other:?}"),
        }
    }

    #[test]
    fn ingest_requires_a_feed_or_a_tracker() {
        assert!(Cli::try_parse_from(["solvestack", "ingest"]).is_err());

        let cli = Cli::try_parse_from(["solvestack", "-vv", "ingest", "--tracker", "github.json"])
            .expect("arguments parse");
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Ingest(args) => {
                assert!(args.feeds.is_empty());
                assert_eq!(args.trackers.len(), 1);
            }
            other => panic!("expected ingest, got {other:?}"),
        }
    }

    #[test]
    fn verbose_flag_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "solvestack",
            "score",
            "--problem",
            "p.json",
            "-v",
        ])
        .expect("arguments parse");
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn recommend_defaults_the_limit() {
        let cli = Cli::try_parse_from([
            "solvestack",
            "recommend",
            "--user",
            "u.json",
            "--problems",
            "ps.json",
        ])
        .expect("arguments parse");
        match cli.command {
            Command::Recommend(args) => assert_eq!(args.limit, 10),
            other => panic!("expected recommend, got {other:?}"),
        }
    }
}
