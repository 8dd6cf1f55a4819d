mod error;
mod input;
mod puzzle;
mod render;
mod search;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use crossterm::tty::IsTty;
use rand::{rngs::StdRng, thread_rng, SeedableRng};
use tracing::{debug, error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use error::{PuzzleError, Result};
use puzzle::Board;

#[derive(Debug, Parser)]
#[command(name = "eight-puzzle", about = "Optimal 8-puzzle solver using A* search")]
struct Cli {
    #[arg(long, help = "Start board as nine tiles in row order, 0 for the blank (e.g. \"1 2 3/4 5 6/7 0 8\")")]
    start: Option<String>,

    #[arg(long, help = "Goal board; defaults to \"1 2 3/4 5 6/7 8 0\" unless boards are entered interactively")]
    goal: Option<String>,

    #[arg(long, conflicts_with = "start", help = "Generate the start board with this many random slides from the goal")]
    scramble: Option<usize>,

    #[arg(long, requires = "scramble", help = "Seed for --scramble")]
    seed: Option<u64>,

    #[arg(long, help = "Disable colored output")]
    no_color: bool,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .try_init();
}

/// Works out the start and goal boards from flags, falling back to the
/// interactive prompt when neither `--start` nor `--scramble` is given.
fn read_boards(cli: &Cli) -> Result<(Board, Board)> {
    if cli.start.is_none() && cli.scramble.is_none() {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        let start = input::prompt_board(&mut input, &mut output, "Enter initial state (use 0 for blank):")?;
        let goal = match &cli.goal {
            Some(text) => input::parse_board(text)?,
            None => input::prompt_board(&mut input, &mut output, "\nEnter goal state:")?,
        };
        return Ok((start, goal));
    }

    let goal = match &cli.goal {
        Some(text) => input::parse_board(text)?,
        None => Board::solved(),
    };
    let start = match (&cli.start, cli.scramble) {
        (Some(text), _) => input::parse_board(text)?,
        (None, Some(moves)) => {
            debug!(moves, seed = ?cli.seed, "scrambling goal board");
            match cli.seed {
                Some(seed) => goal.scramble(moves, &mut StdRng::seed_from_u64(seed)),
                None => goal.scramble(moves, &mut thread_rng()),
            }
        }
        (None, None) => Board::solved(),
    };
    Ok((start, goal))
}

fn run(cli: &Cli) -> Result<()> {
    let color = !cli.no_color && io::stdout().is_tty();
    let (start, goal) = read_boards(cli)?;

    println!("\nInitial state:\n{}", render::board_grid(&start, None, color));
    println!("Goal state:\n{}", render::board_grid(&goal, None, color));

    println!("Solving...");
    let solution = search::solve_checked(&start, &goal)?;
    info!(
        expanded = solution.stats.expanded,
        generated = solution.stats.generated,
        peak_frontier = solution.stats.peak_frontier,
        "search statistics"
    );
    print!("{}", render::narrate(&solution, color));
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(PuzzleError::Unsolvable) => {
            println!("\nThis puzzle is not solvable!");
            ExitCode::SUCCESS
        }
        Err(err @ PuzzleError::SearchExhausted) => {
            error!("{}", err);
            println!("No solution found.");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn goal_defaults_to_solved_board() {
        let cli = Cli::parse_from(["eight-puzzle", "--start", "1 2 3 4 5 6 7 0 8"]);
        let (start, goal) = read_boards(&cli).unwrap();
        assert_eq!(goal, Board::solved());
        assert_eq!(start, Board::new([[1, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap());
    }

    #[test]
    fn seeded_scramble_is_reproducible() {
        let args = ["eight-puzzle", "--scramble", "20", "--seed", "4"];
        let (a, goal) = read_boards(&Cli::parse_from(args)).unwrap();
        let (b, _) = read_boards(&Cli::parse_from(args)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.is_solvable(), goal.is_solvable());
    }

    #[test]
    fn start_and_scramble_conflict() {
        let parsed = Cli::try_parse_from(["eight-puzzle", "--start", "1 2 3 4 5 6 7 8 0", "--scramble", "5"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn bad_flag_board_is_rejected() {
        let cli = Cli::parse_from(["eight-puzzle", "--start", "1 2 3 4 5 6 7 8 8"]);
        assert!(matches!(read_boards(&cli), Err(PuzzleError::DuplicateTile(8))));
    }
}
