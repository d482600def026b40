//! psychefit - attachment style quiz in the terminal
//!
//! **Usage:**
//! ```bash
//! psychefit [--config <file>] [--questions <file>] [--details <file>]
//!           [--seed <n>] [--html <file>] [--json] [--no-delay] [--log-level <level>]
//! ```
//!
//! Logs go to stderr; the quiz itself uses stdin/stdout.

use anyhow::{Context, Result};
use clap::Parser;
use psychefit_common::config::{ConfigResolver, TimingConfig, TomlConfig};
use psychefit_common::events::{EventBus, QuizEvent};
use psychefit_common::{DetailTable, QuestionBank, QuizSession, ScoringEngine};
use psychefit_cli::{App, AppOptions, Exit};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Find out how you attach in close relationships
#[derive(Parser, Debug)]
#[clap(name = "psychefit", version)]
#[clap(about = "Interactive attachment style quiz")]
struct Args {
    /// Config file (overrides PSYCHEFIT_CONFIG and the default location)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Question bank file (.toml or .json)
    #[clap(long, value_name = "FILE")]
    questions: Option<PathBuf>,

    /// Attachment detail file (.toml or .json)
    #[clap(long, value_name = "FILE")]
    details: Option<PathBuf>,

    /// Seed for the marker jitter, for reproducible output
    #[clap(long)]
    seed: Option<u64>,

    /// Also write the report as a standalone HTML page
    #[clap(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Print the result as JSON after the report
    #[clap(long)]
    json: bool,

    /// Skip all pauses and animations
    #[clap(long)]
    no_delay: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[clap(long, env = "PSYCHEFIT_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so its log level can apply
    let resolver = ConfigResolver::new(args.config.clone());
    let config = resolver.resolve().context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Build identification first, before any file loading
    info!(
        "Starting PsycheFit v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match resolver.locate() {
        Some((path, _)) if path.exists() => info!("Config: {}", path.display()),
        _ => info!("Config: compiled defaults"),
    }

    let bank = load_bank(args.questions.as_deref().or(config.questions.as_deref()))?;
    let details = load_details(args.details.as_deref().or(config.details.as_deref()))?;
    let missing = details.missing_types();
    if !missing.is_empty() {
        warn!("Detail table has no entry for {:?}", missing);
    }

    let rng = match args.seed {
        Some(seed) => {
            info!("Using jitter seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let bus = EventBus::default();
    let event_log = spawn_event_log(&bus);
    let session = QuizSession::new(Arc::new(bank))
        .with_engine(ScoringEngine::with_policy(config.scoring.missing_answers))
        .with_event_bus(bus);

    let options = app_options(&args, &config);
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut app = App::new(session, details, options, input, std::io::stdout(), rng);

    let exit = app.run().await.context("Quiz session failed")?;
    match exit {
        Exit::Quit => info!("Goodbye"),
        Exit::EndOfInput => debug!("Input closed"),
    }

    // Dropping the session closes the bus and ends the log task
    drop(app);
    let _ = event_log.await;
    Ok(())
}

fn load_bank(path: Option<&Path>) -> Result<QuestionBank> {
    match path {
        Some(path) => QuestionBank::load(path)
            .with_context(|| format!("Failed to load questions from {}", path.display())),
        None => QuestionBank::embedded().context("Embedded question bank is invalid"),
    }
}

fn load_details(path: Option<&Path>) -> Result<DetailTable> {
    match path {
        Some(path) => DetailTable::load(path)
            .with_context(|| format!("Failed to load details from {}", path.display())),
        None => DetailTable::embedded().context("Embedded detail table is invalid"),
    }
}

fn app_options(args: &Args, config: &TomlConfig) -> AppOptions {
    let timing = if args.no_delay {
        TimingConfig::immediate()
    } else {
        config.timing.clone()
    };

    AppOptions {
        timing,
        html_path: args.html.clone(),
        print_json: args.json,
        ..AppOptions::default()
    }
}

/// Log every quiz transition at debug level
fn spawn_event_log(bus: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event log lagged, {} events skipped", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &QuizEvent) {
    match event {
        QuizEvent::AnswerRecorded {
            question, option, ..
        } => debug!("Event {}: q{} -> option {}", event.name(), question + 1, option + 1),
        QuizEvent::ResultReady {
            attachment_type, ..
        } => debug!("Event {}: {}", event.name(), attachment_type),
        _ => debug!("Event {}", event.name()),
    }
}
