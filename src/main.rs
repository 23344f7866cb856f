//! Main entry point for the crosstable engine
//!
//! Runs a complete tournament in-process: seeds the configured roster, pairs
//! rounds, reports deterministic match outcomes through the engine and
//! prints the final standings.

use anyhow::Result;
use clap::Parser;
use crosstable::config::AppConfig;
use crosstable::engine::{
    MatchResultProcessor, RoundProgressionController, TournamentLifecycle,
};
use crosstable::pairing::StandingsPairingProvider;
use crosstable::rating::elo::EloRatingCalculator;
use crosstable::roster::RosterService;
use crosstable::store::{InMemoryStore, TournamentStore};
use crosstable::types::{Player, TournamentStatus};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Crosstable - tournament standings engine
#[derive(Parser)]
#[command(
    name = "crosstable",
    version,
    about = "Match-result processing and standings engine for round-based tournaments",
    long_about = "Crosstable scores reported match outcomes: Elo rating updates with \
                 per-player K-factors, deterministic per-round scoreboards with \
                 Buchholz tie-breaks, and automatic round/tournament progression."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Round count override for the simulated tournament
    #[arg(short, long, value_name = "N", help = "Override the number of rounds")]
    rounds: Option<u32>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without running")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
    }

    Ok(config)
}

/// Run one full tournament through the engine, reporting a deterministic
/// outcome for every pairing (higher starting rating wins, equal is a draw)
async fn run_tournament(config: &AppConfig) -> Result<()> {
    let store: Arc<InMemoryStore> = Arc::new(InMemoryStore::new());
    let pairing = Arc::new(StandingsPairingProvider::new(store.clone()));
    let lifecycle = Arc::new(TournamentLifecycle::new(store.clone(), pairing.clone()));
    let progression = Arc::new(RoundProgressionController::new(
        store.clone(),
        pairing,
        lifecycle.clone(),
    ));
    let processor = MatchResultProcessor::new(
        store.clone(),
        Arc::new(EloRatingCalculator::new(config.elo.clone())?),
        progression,
    );
    let roster = RosterService::new(store.clone());

    // Seed the roster
    for seed in &config.simulation.players {
        store.save_player(Player::new(seed.id.clone(), seed.rating))?;
    }

    let tournament = lifecycle.create_tournament(
        &config.simulation.tournament_name,
        config.simulation.players.len(),
        config.simulation.rounds,
    )?;
    for seed in &config.simulation.players {
        roster.register(tournament.id, &seed.id)?;
    }

    let mut current = lifecycle.start(tournament.id).await?;

    // Score rounds until progression completes the tournament
    while current.status == TournamentStatus::Ongoing {
        let round_id = *current
            .round_ids
            .last()
            .expect("ongoing tournament has a round");
        let round = store
            .load_round(&round_id)?
            .expect("round exists for ongoing tournament");

        info!("Scoring round {}...", round.number);
        for m in store.load_round_matches(&round)? {
            if m.is_complete() {
                continue;
            }
            let outcome_code = match m
                .player_one_start_rating()
                .partial_cmp(&m.player_two_start_rating())
            {
                Some(std::cmp::Ordering::Greater) => -1,
                Some(std::cmp::Ordering::Less) => 1,
                _ => 0,
            };
            processor.report_result(m.id(), outcome_code).await?;
        }

        current = store
            .load_tournament(&tournament.id)?
            .expect("tournament still stored");
    }

    // Final ranking is the last round's scoreboard order
    let standings = lifecycle.final_standings(tournament.id)?;
    println!("\nFinal standings - {}", current.name);
    println!("{:<4} {:<12} {:>6} {:>9}", "#", "player", "score", "rating");
    for (position, entry) in standings.entries().iter().enumerate() {
        let player = store
            .load_player(&entry.player_id)?
            .expect("ranked player exists");
        println!(
            "{:<4} {:<12} {:>6.1} {:>9.1}",
            position + 1,
            entry.player_id,
            entry.score,
            player.rating
        );
    }

    let stats = processor.stats();
    info!(
        "Tournament complete: {} matches scored, {} reports rejected",
        stats.matches_scored, stats.reports_rejected
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} - {} players, {} rounds",
        config.service.name,
        crosstable::VERSION,
        config.simulation.players.len(),
        config.simulation.rounds
    );

    if args.dry_run {
        info!("Configuration validation successful");
        return Ok(());
    }

    if let Err(e) = run_tournament(&config).await {
        error!("Tournament run failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
