//! Cadence CLI
//!
//! Command-line study sessions over a JSON deck file.

mod deck;

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cadence_core::{
    DeckStats, MemoryStore, ProgressPolicy, Rating, ReviewSignal, Scheduler, SessionStart,
    SessionSummary, StudyConfig, StudyItem, StudySession, TriageBuckets,
};

use crate::deck::{append_review_log, load_deck, resolve_deck_path, save_deck};

/// Cadence - spaced repetition study sessions
#[derive(Parser)]
#[command(name = "cadence")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLI for the Cadence spaced repetition engine")]
#[command(long_about = "Cadence schedules reviews with a Difficulty/Stability/Retrievability memory model.\n\nDecks are JSON files; the default lives in the platform data directory.")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a deck of new items
    Init {
        /// Deck file (defaults to the platform data directory)
        #[arg(long)]
        deck: Option<PathBuf>,
        /// Number of items to create
        #[arg(long, default_value = "10")]
        items: usize,
        /// Category for the new items
        #[arg(long)]
        category: Option<String>,
        /// Overwrite an existing deck
        #[arg(long)]
        force: bool,
    },

    /// Run a study session
    ///
    /// The updated deck is written back in place and each answer is appended
    /// to `<deck stem>.reviews.jsonl` next to it. `--dry-run` writes neither.
    Review {
        #[arg(long)]
        deck: Option<PathBuf>,
        /// JSON study config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Only take new items from this category
        #[arg(long)]
        category: Option<String>,
        /// Maximum new items this session
        #[arg(long)]
        new_limit: Option<usize>,
        /// Review time (RFC 3339) used for every answer; defaults to the wall clock at each answer
        #[arg(long, value_parser = parse_timestamp)]
        now: Option<DateTime<Utc>>,
        /// Comma-separated ratings (again,hard,good,easy or 1-4); read from stdin when omitted
        #[arg(long, value_delimiter = ',')]
        ratings: Option<Vec<Rating>>,
        /// Don't write the updated deck or the review log
        #[arg(long)]
        dry_run: bool,
    },

    /// Show deck statistics, category health, and triage buckets
    Stats {
        #[arg(long)]
        deck: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_parser = parse_timestamp)]
        now: Option<DateTime<Utc>>,
        /// Restrict category health to one category
        #[arg(long)]
        category: Option<String>,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what each rating would do to an item
    Preview {
        /// Item id
        #[arg(long)]
        id: String,
        #[arg(long)]
        deck: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_parser = parse_timestamp)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init {
            deck,
            items,
            category,
            force,
        } => run_init(deck, items, category, force),
        Commands::Review {
            deck,
            config,
            category,
            new_limit,
            now,
            ratings,
            dry_run,
        } => run_review(deck, config, category, new_limit, now, ratings, dry_run),
        Commands::Stats {
            deck,
            config,
            now,
            category,
            json,
        } => run_stats(deck, config, now, category, json),
        Commands::Preview {
            id,
            deck,
            config,
            now,
        } => run_preview(id, deck, config, now),
    }
}

/// Logging goes to stderr so stdout stays clean for `--json`
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<StudyConfig> {
    let config = match path {
        Some(p) => StudyConfig::load(&p)?,
        None => StudyConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Run init command
fn run_init(
    deck: Option<PathBuf>,
    count: usize,
    category: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let path = resolve_deck_path(deck)?;
    if path.exists() && !force {
        bail!("Deck already exists at {} (use --force to overwrite)", path.display());
    }

    let now = Utc::now();
    let items: Vec<StudyItem> = (0..count)
        .map(|_| StudyItem::new(category.clone(), now))
        .collect();
    save_deck(&path, &items)?;

    println!(
        "{} {} new items at {}",
        "Created".green().bold(),
        count,
        path.display()
    );
    Ok(())
}

// ============================================================================
// REVIEW
// ============================================================================

enum RatingSource {
    Listed(VecDeque<Rating>),
    Stdin,
}

impl RatingSource {
    /// `None` means stop the session (list exhausted, EOF, or `q`)
    fn next(&mut self) -> anyhow::Result<Option<Rating>> {
        match self {
            RatingSource::Listed(ratings) => Ok(ratings.pop_front()),
            RatingSource::Stdin => loop {
                print!("{} ", "rating [1-4 / again hard good easy / q]:".dimmed());
                io::stdout().flush()?;

                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if matches!(trimmed, "q" | "quit" | "exit") {
                    return Ok(None);
                }
                match trimmed.parse::<Rating>() {
                    Ok(rating) => return Ok(Some(rating)),
                    Err(e) => println!("{}", e.yellow()),
                }
            },
        }
    }
}

/// Run review command
#[allow(clippy::too_many_arguments)]
fn run_review(
    deck: Option<PathBuf>,
    config: Option<PathBuf>,
    category: Option<String>,
    new_limit: Option<usize>,
    now: Option<DateTime<Utc>>,
    ratings: Option<Vec<Rating>>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let path = resolve_deck_path(deck)?;
    let mut config = load_config(config)?;
    if let Some(limit) = new_limit {
        config.new_cards_limit = limit;
    }
    let started_at = answer_time(now);
    let store = MemoryStore::from_items(load_deck(&path)?);

    let mut source = match ratings {
        Some(list) => RatingSource::Listed(list.into()),
        None => RatingSource::Stdin,
    };

    let summary = match StudySession::start(&store, &config, category.as_deref(), started_at)? {
        SessionStart::EmptySession => {
            println!("{}", "Nothing to review.".dimmed());
            return Ok(());
        }
        SessionStart::Ready(mut session) => {
            println!(
                "{} {} items",
                "=== Study Session ===".cyan().bold(),
                session.queue().total()
            );

            while let Some(item) = session.current()? {
                println!();
                println!(
                    "[{:>5.1}%] {} ({}{})",
                    session.progress() * 100.0,
                    item.id.white().bold(),
                    item.memory.state,
                    item.category
                        .as_deref()
                        .map(|c| format!(", {}", c))
                        .unwrap_or_default()
                );

                let shown_at = Instant::now();
                let Some(rating) = source.next()? else {
                    println!("{}", "Session stopped.".yellow());
                    break;
                };
                let duration_ms = shown_at.elapsed().as_millis() as u64;

                let outcome = session.answer(rating, answer_time(now), duration_ms)?;
                println!(
                    "  {} -> {} | S {:.2}d | D {:.2} | next in {}d{}",
                    rating_label(rating),
                    outcome.state.state,
                    outcome.state.stability,
                    outcome.state.difficulty,
                    outcome.state.scheduled_days,
                    if outcome.requeued { " | back in queue" } else { "" }
                );
                for signal in &outcome.signals {
                    if let ReviewSignal::UnlockAdvancedMode { .. } = signal {
                        println!("  {}", "Advanced mode unlocked".magenta());
                    }
                }
                for err in &outcome.follow_up_errors {
                    println!("  {} {}", "warning:".yellow(), err);
                }
            }

            session.summary()
        }
    };

    print_summary(&summary);

    if dry_run {
        println!("{}", "Dry run: deck and review log not written.".dimmed());
    } else {
        let events = store.review_log()?;
        save_deck(&path, &store.into_items()?)?;
        let log_path = append_review_log(&path, &events)?;
        tracing::debug!(events = events.len(), log = %log_path.display(), "Review log appended");
    }
    Ok(())
}

/// A fixed `--now` pins every answer; otherwise each answer takes the wall clock
fn answer_time(fixed: Option<DateTime<Utc>>) -> DateTime<Utc> {
    fixed.unwrap_or_else(Utc::now)
}

fn rating_label(rating: Rating) -> colored::ColoredString {
    match rating {
        Rating::Again => "again".red(),
        Rating::Hard => "hard".yellow(),
        Rating::Good => "good".green(),
        Rating::Easy => "easy".cyan(),
    }
}

fn print_summary(summary: &SessionSummary) {
    println!();
    println!("{}", "=== Session Summary ===".cyan().bold());
    println!("{}: {}", "Answered".white().bold(), summary.answered);
    println!(
        "{}: again {} / hard {} / good {} / easy {}",
        "Ratings".white().bold(),
        summary.again,
        summary.hard,
        summary.good,
        summary.easy
    );
    println!("{}: {}", "Re-queued".white().bold(), summary.requeued);
    println!("{}: {}", "XP Earned".white().bold(), summary.xp_earned);
    println!("{}: {}", "Best Streak".white().bold(), summary.best_streak);
    println!("{}: {}", "Unlocked".white().bold(), summary.unlocked);
    println!("{}: {:.1}%", "Progress".white().bold(), summary.progress * 100.0);
}

// ============================================================================
// STATS
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    generated_at: DateTime<Utc>,
    stats: DeckStats,
    category: Option<String>,
    category_health: f64,
    triage: TriageBuckets,
}

/// Run stats command
fn run_stats(
    deck: Option<PathBuf>,
    config: Option<PathBuf>,
    now: Option<DateTime<Utc>>,
    category: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let path = resolve_deck_path(deck)?;
    let config = load_config(config)?;
    let now = now.unwrap_or_else(Utc::now);
    let items = load_deck(&path)?;

    let scheduler = Scheduler::new(config.scheduler_parameters());
    let policy = ProgressPolicy::new(config.progress_thresholds());
    let report = StatsReport {
        generated_at: now,
        stats: DeckStats::compute(&items, &scheduler, now),
        category_health: policy.category_health(&items, category.as_deref()),
        triage: policy.triage_due(&items, now),
        category,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = &report.stats;
    println!("{}", "=== Cadence Deck Statistics ===".cyan().bold());
    println!();
    println!("{}: {}", "Total Items".white().bold(), stats.total_items);
    println!("{}: {}", "Due Now".white().bold(), stats.due_now);
    println!(
        "{}: {:.1}%",
        "Average Retrievability".white().bold(),
        stats.average_retrievability * 100.0
    );
    println!("{}: {}", "Total Lapses".white().bold(), stats.total_lapses);
    if let Some(next) = stats.next_due {
        println!("{}: {}", "Next Due".white().bold(), next.format("%Y-%m-%d %H:%M:%S"));
    }

    println!();
    println!("{}", "=== Learning States ===".yellow().bold());
    let total = stats.total_items;
    print_distribution_bar("New", stats.new_items, total, "white");
    print_distribution_bar("Learning", stats.learning_items, total, "magenta");
    print_distribution_bar("Review", stats.review_items, total, "green");
    print_distribution_bar("Relearning", stats.relearning_items, total, "red");

    println!();
    let label = report.category.as_deref().unwrap_or("all items");
    println!(
        "{} ({}): {:.1}%",
        "Category Health".white().bold(),
        label,
        report.category_health * 100.0
    );

    println!();
    println!("{}", "=== Due Triage ===".yellow().bold());
    let due = stats.due_now;
    print_distribution_bar("Weak", report.triage.weak.len(), due, "red");
    print_distribution_bar("Medium", report.triage.medium.len(), due, "yellow");
    print_distribution_bar("Strong", report.triage.strong.len(), due, "green");
    Ok(())
}

fn print_distribution_bar(label: &str, count: usize, total: usize, color: &str) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let bar_width: usize = 30;
    let filled = (((percentage / 100.0) * bar_width as f64) as usize).min(bar_width);
    let empty = bar_width.saturating_sub(filled);

    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));
    let colored_bar = match color {
        "green" => bar.green(),
        "yellow" => bar.yellow(),
        "red" => bar.red(),
        "magenta" => bar.magenta(),
        _ => bar.white(),
    };

    println!(
        "  {:12} [{:30}] {:>4} ({:>5.1}%)",
        label, colored_bar, count, percentage
    );
}

// ============================================================================
// PREVIEW
// ============================================================================

/// Run preview command
fn run_preview(
    id: String,
    deck: Option<PathBuf>,
    config: Option<PathBuf>,
    now: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let path = resolve_deck_path(deck)?;
    let config = load_config(config)?;
    let now = now.unwrap_or_else(Utc::now);
    let items = load_deck(&path)?;

    let item = items
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| anyhow!("Item not found: {}", id))?;
    item.memory.validate()?;

    let scheduler = Scheduler::new(config.scheduler_parameters());
    let preview = scheduler.preview(&item.memory, now);

    println!("{} {}", "=== Preview ===".cyan().bold(), item.id.white().bold());
    println!(
        "{}: {} | S {:.2}d | D {:.2} | R {:.1}%",
        "Current".white().bold(),
        item.memory.state,
        item.memory.stability,
        item.memory.difficulty,
        scheduler.current_retrievability(&item.memory, now) * 100.0
    );
    println!();
    for rating in [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy] {
        let next = preview.for_rating(rating);
        println!(
            "  {:6} -> {:10} S {:>9.2}d  D {:>5.2}  next in {:>5}d  ({})",
            rating_label(rating),
            next.state.to_string(),
            next.stability,
            next.difficulty,
            next.scheduled_days,
            next.due.format("%Y-%m-%d")
        );
    }
    Ok(())
}
