//! Goban: a Go rules engine with a heuristic automated player.
//!
//! ## Usage
//!
//! - `goban` - Show a self-play demo
//! - `goban gtp` - Start GTP server for GUI integration
//! - `goban demo --max-moves 120` - Self-play with a move cap
//!
//! Log output goes to stderr and is controlled by `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use goban::board::Color;
use goban::config::Config;
use goban::gtp::{GtpEngine, format_vertex};
use goban::session::{EventKind, GameSession, GameState};

/// Goban: a Go rules engine with a heuristic automated player
#[derive(Parser)]
#[command(name = "goban")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file with session settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board size (overrides the config file)
    #[arg(long, global = true)]
    size: Option<usize>,

    /// Komi (overrides the config file)
    #[arg(long, global = true)]
    komi: Option<f32>,

    /// Seed for the move evaluator
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Let the engine play both sides and print the result
    Demo {
        /// Stop and pass out after this many moves
        #[arg(long, default_value_t = 300)]
        max_moves: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Gtp) => {
            let mut engine = GtpEngine::new(config)?;
            engine.run_stdio().context("GTP session failed")?;
        }
        Some(Commands::Demo { max_moves }) => run_demo(config, max_moves)?,
        None => run_demo(config, 300)?,
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(size) = cli.size {
        config.board_size = size;
    }
    if let Some(komi) = cli.komi {
        config.komi = komi;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn run_demo(config: Config, max_moves: usize) -> Result<()> {
    println!("Goban self-play demo\n");
    let size = config.board_size;
    let mut session = GameSession::new(config)?;

    while !session.is_finished() {
        let event = if session.move_count() >= max_moves {
            session.pass()?
        } else {
            session.request_evaluation()?;
            session.wait_evaluation()?
        };
        match event.kind {
            EventKind::Played(mv) => {
                let mut line = format!(
                    "{:>3}. {} {}",
                    session.move_count(),
                    mv.color,
                    format_vertex(mv.point, size)
                );
                if !event.captured.is_empty() {
                    line.push_str(&format!(" captures {}", event.captured.len()));
                }
                if event.atari {
                    line.push_str(" (atari)");
                }
                println!("{line}");
            }
            EventKind::Passed(color) => println!("     {color} passes"),
            EventKind::Undone | EventKind::Restarted => {}
        }
    }

    println!("\n{}", session.grid());
    if let GameState::Finished(result) = session.state() {
        let score = &result.score;
        println!(
            "Black: {} territory + {} prisoners = {}",
            score.black_area,
            session.prisoners().get(Color::Black),
            score.black_total
        );
        println!(
            "White: {} territory + {} prisoners + komi = {}",
            score.white_area,
            session.prisoners().get(Color::White),
            score.white_total
        );
        println!(
            "Stones on board: Black {}, White {}",
            session.grid().stone_count(Color::Black),
            session.grid().stone_count(Color::White)
        );
        println!("Result: {score}");
    }
    Ok(())
}
