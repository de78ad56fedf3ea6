//! Command line entry point: single runs, tournaments and the strategy list.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{error, info};

use mao_sim::core::{GameRng, RunConfig, SimError};
use mao_sim::run::{file_stem, log_summary, RunController, StatsStore, StopHandle};
use mao_sim::strategy::{lineup, registered};
use mao_sim::tournament::{run_tournament, TournamentConfig};

#[derive(Parser)]
#[command(name = "mao")]
#[command(about = "Benchmark Mao strategies by simulating many games")]
struct Cli {
    /// Log at debug level on the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play back-to-back games with one lineup, accumulating into a state file
    Simulate(SimulateArgs),

    /// Play every combination of strategies against each other
    Tournament {
        /// Decision steps per matchup
        #[arg(short, long, default_value_t = 10_000_000)]
        iterations: u64,

        #[arg(short, long, default_value_t = 2)]
        decks: usize,

        /// Strategies to include (default: all registered)
        #[arg(short, long = "strategy")]
        strategies: Vec<String>,

        /// Worker threads (default: one per core)
        #[arg(short, long)]
        threads: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// List registered strategies
    Strategies,
}

#[derive(Args)]
struct SimulateArgs {
    /// Number of seats
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// Decision steps for the whole run
    #[arg(short, long, default_value_t = 1_000_000)]
    iterations: u64,

    /// Physical decks shuffled together
    #[arg(short, long, default_value_t = 1)]
    decks: usize,

    /// Strategy per seat; a single name fills every seat
    #[arg(short, long = "seat", num_args = 1.., default_value = "first")]
    seats: Vec<String>,

    /// Log illegal plays at debug instead of error level
    #[arg(long)]
    tolerant: bool,

    /// Pick each game's first player at random
    #[arg(long)]
    random_first: bool,

    /// Move strategies between seats after every game
    #[arg(long)]
    shuffle_seats: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the state and log files
    #[arg(long, default_value = ".")]
    state_dir: PathBuf,
}

/// Forward Ctrl+C to the stop flag from a background thread.
fn install_ctrl_c(stop: StopHandle) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    std::thread::spawn(move || {
        runtime.block_on(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                stop.request_stop();
            }
        });
    });
    Ok(())
}

fn seat_names(players: usize, seats: Vec<String>) -> Result<Vec<String>, SimError> {
    match seats.len() {
        1 => Ok(vec![seats[0].clone(); players]),
        n if n == players => Ok(seats),
        n => Err(SimError::InvalidConfig(format!("{n} seat strategies for {players} players"))),
    }
}

fn simulate(args: SimulateArgs, verbose: bool) -> Result<bool, SimError> {
    let SimulateArgs {
        players,
        iterations,
        decks,
        seats,
        tolerant,
        random_first,
        shuffle_seats,
        seed,
        state_dir,
    } = args;
    let mut config = RunConfig::new(players)
        .with_iteration_budget(iterations)
        .with_decks(decks)
        .with_tolerate_illegal(tolerant)
        .with_random_first_player(random_first)
        .with_shuffle_seats(shuffle_seats);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    // Reject bad setups (one seat included) before touching any file
    config.validate()?;
    let names = seat_names(players, seats)?;

    let stem = file_stem("mao", players, decks, &names);
    mao_sim::logging::init(Some(&state_dir.join(format!("{stem}.log"))), verbose)?;

    let store = StatsStore::for_run(&state_dir, "mao", players, decks, &names);
    let stats = store.load(players)?;
    let mut rng = GameRng::from_seed_or_entropy(config.seed);
    let strategies = lineup(&names, &mut rng)?;

    let stop = StopHandle::new();
    install_ctrl_c(stop.clone())?;
    let mut controller =
        RunController::new(config, strategies)?.with_stats(stats)?.with_stop_handle(stop);

    let report = controller.run()?;
    info!(
        "Illegal plays {:?}, illegal jumps {:?}",
        report.illegal_plays, report.illegal_jumps
    );
    store.save(controller.stats())?;
    log_summary(controller.stats(), players);

    if let Some(err) = &report.error {
        error!("Run ended early: {err}");
    }
    Ok(report.is_ok())
}

fn tournament(
    iterations: u64,
    decks: usize,
    strategies: Vec<String>,
    threads: Option<usize>,
    seed: Option<u64>,
    verbose: bool,
) -> Result<bool, SimError> {
    mao_sim::logging::init(None, verbose)?;

    let mut config = TournamentConfig::default().with_iterations(iterations).with_decks(decks);
    if !strategies.is_empty() {
        config = config.with_strategies(&strategies);
    }
    if let Some(threads) = threads {
        config = config.with_threads(threads);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let stop = StopHandle::new();
    install_ctrl_c(stop.clone())?;
    let report = run_tournament(&config, &stop)?;
    Ok(report.skipped.is_empty())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Simulate(args) => simulate(args, cli.verbose),
        Command::Tournament { iterations, decks, strategies, threads, seed } => {
            tournament(iterations, decks, strategies, threads, seed, cli.verbose)
        }
        Command::Strategies => {
            for factory in registered() {
                println!("{:<12} {}", factory.name, factory.summary);
            }
            Ok(true)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
