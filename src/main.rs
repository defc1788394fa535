//! Gomoku-Solver: a five-in-a-row solver.
//!
//! ## Usage
//!
//! - `gomoku-solver` - Show a demo
//! - `gomoku-solver gtp` - Start the GTP command loop for GUI integration
//! - `gomoku-solver solve b e5 w d4 ...` - Solve the position after the given stones
//!
//! Logging goes to stderr; set `RUST_LOG` or pass `-v` for more detail.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gomoku_solver::board::{Board, Color};
use gomoku_solver::constants::{DEFAULT_SIZE, MAX_DEPTH, ROLLOUTS_PER_MOVE};
use gomoku_solver::gtp::GtpEngine;
use gomoku_solver::search::{SearchConfig, Solver};

/// Gomoku-Solver: a five-in-a-row alpha-beta engine
#[derive(Parser)]
#[command(name = "gomoku-solver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board size (side length)
    #[arg(long, global = true, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Maximum search depth
    #[arg(long, global = true, default_value_t = MAX_DEPTH)]
    depth: usize,

    /// Cap the candidates searched at positions without tactical moves
    /// (default: search all of them)
    #[arg(long, global = true)]
    breadth: Option<usize>,

    /// Rollouts per empty point in quiet positions
    #[arg(long, global = true, default_value_t = ROLLOUTS_PER_MOVE)]
    rollouts: usize,

    /// Seed for the rollout random number generator
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP command loop for use with GUI applications
    Gtp,
    /// Solve a position given as color/vertex pairs, e.g. `b d4 w e5`
    Solve {
        /// Alternating color and vertex tokens
        stones: Vec<String>,
    },
    /// Run a simple demo of the engine
    Demo,
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.depth,
            rollouts_per_move: self.rollouts,
            quiet_breadth: self.breadth,
            seed: self.seed,
            ..SearchConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Gtp) => {
            let mut engine = GtpEngine::new(cli.size, cli.search_config())?;
            engine.run()
        }
        Some(Commands::Solve { stones }) => run_solve(&cli, stones),
        Some(Commands::Demo) | None => run_demo(&cli),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_solve(cli: &Cli, stones: &[String]) -> Result<()> {
    if stones.len() % 2 != 0 {
        bail!("stones must be given as color/vertex pairs");
    }
    let mut board = Board::new(cli.size)?;
    for pair in stones.chunks(2) {
        let color = Color::parse(&pair[0]).with_context(|| format!("invalid color {}", pair[0]))?;
        let pt = board
            .parse_point(&pair[1])
            .with_context(|| format!("invalid point {}", pair[1]))?;
        board
            .play(pt, color)
            .with_context(|| format!("cannot play {} {}", pair[0], pair[1]))?;
    }

    println!("{board}");
    let solution = Solver::new(cli.search_config()).solve(&mut board);
    println!("{}", solution.display(&board));
    Ok(())
}

fn run_demo(cli: &Cli) -> Result<()> {
    println!("Gomoku-Solver: five-in-a-row alpha-beta engine\n");

    let mut board = Board::new(cli.size.max(5))?;
    let row = board.size() / 2 + 1;
    for col in 2..=4 {
        board.play(board.point(row, col), Color::Black)?;
        board.play(board.point(row + 1, col + 1), Color::White)?;
    }
    println!("{board}");
    println!("{} to move", board.current_player());

    let mut solver = Solver::new(cli.search_config());
    let solution = solver.solve(&mut board);
    println!("Result: {}", solution.display(&board));
    println!("Nodes searched: {}", solver.nodes());
    Ok(())
}
