//! Command-line interface: argument parsing, dispatch, and the
//! interactive stage-count prompt.

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::batch::run_batch;
use crate::display::{equilibrium_line, print_error, print_success, solve_summary, tree_ascii};
use crate::dot::write_dot;
use crate::error::{SpeError, SpeResult};
use crate::game_tree::{GameTree, NodeId, Payoff};
use crate::solver::resolve_root;

/// Frontiers can double every stage; past this the worst-case tree no
/// longer fits in memory.
const MAX_STAGES: u32 = 20;

#[derive(Parser)]
#[command(
    name = "spe",
    version = "1.0.0",
    about = "Sequential-game toolkit — random extensive-form game trees solved by backward induction."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random game tree and solve it by backward induction
    Solve {
        /// Number of stages (prompted interactively if omitted)
        stages: Option<u32>,
        /// Seed for deterministic generation and tie-breaks
        #[arg(short, long)]
        seed: Option<u64>,
        /// Write the solved tree as Graphviz DOT to this path
        #[arg(short, long)]
        dot: Option<PathBuf>,
        /// Write the solved tree as JSON to this path
        #[arg(short, long)]
        json: Option<PathBuf>,
        /// Skip the ASCII tree rendering
        #[arg(long)]
        no_tree: bool,
    },
    /// Solve many random trees and summarize equilibrium outcomes
    Batch {
        /// Number of trees to solve
        #[arg(short = 'n', long, default_value = "1000")]
        trees: usize,
        /// Stages per tree
        #[arg(short = 'm', long, default_value = "3")]
        stages: u32,
        /// Base seed; tree i uses seed + i
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
}

/// JSON export bundle: the full tree plus the equilibrium identity.
#[derive(Serialize)]
struct SolvedGame<'a> {
    tree: &'a GameTree,
    equilibrium: NodeId,
    payoff: Payoff,
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    dispatch(cli);
}

fn dispatch(cli: Cli) {
    let result = match cli.command {
        Commands::Solve {
            stages,
            seed,
            dot,
            json,
            no_tree,
        } => cmd_solve(stages, seed, dot, json, no_tree),
        Commands::Batch {
            trees,
            stages,
            seed,
        } => cmd_batch(trees, stages, seed),
    };

    if let Err(err) = result {
        print_error(&err.to_string());
        std::process::exit(1);
    }
}

fn cmd_solve(
    stages: Option<u32>,
    seed: Option<u64>,
    dot: Option<PathBuf>,
    json: Option<PathBuf>,
    no_tree: bool,
) -> SpeResult<()> {
    let stages = match stages {
        Some(m) => m,
        None => {
            let stdin = io::stdin();
            let mut reader = stdin.lock();
            let mut writer = io::stdout();
            match prompt_stages(&mut reader, &mut writer) {
                Some(m) => m,
                None => return Ok(()), // quit at the prompt
            }
        }
    };

    if stages > MAX_STAGES {
        return Err(SpeError::InvalidStageCount(format!(
            "{} exceeds the maximum of {}",
            stages, MAX_STAGES
        )));
    }

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let tree = GameTree::random(stages, &mut rng);
    let equilibrium = resolve_root(&tree, &mut rng)?;

    println!();
    println!("{}", solve_summary(&tree, equilibrium)?);
    if !no_tree {
        println!();
        println!("{}", tree_ascii(&tree, equilibrium));
    }
    println!("{}", equilibrium_line(&tree, equilibrium));
    println!();

    if let Some(path) = dot {
        write_dot(&tree, equilibrium, &path)?;
        print_success(&format!("Wrote DOT to {}", path.display()));
    }

    if let Some(path) = json {
        let bundle = SolvedGame {
            tree: &tree,
            equilibrium,
            payoff: tree.node(equilibrium).payoff,
        };
        serde_json::to_writer_pretty(File::create(&path)?, &bundle)?;
        print_success(&format!("Wrote JSON to {}", path.display()));
    }

    Ok(())
}

fn cmd_batch(trees: usize, stages: u32, seed: u64) -> SpeResult<()> {
    if stages > MAX_STAGES {
        return Err(SpeError::InvalidStageCount(format!(
            "{} exceeds the maximum of {}",
            stages, MAX_STAGES
        )));
    }
    let summary = run_batch(trees, stages, seed)?;
    summary.display();
    Ok(())
}

// ---------------------------------------------------------------------------
// Interactive input
// ---------------------------------------------------------------------------

/// Prompt for a stage count, re-prompting on non-integer input. Returns
/// `None` when the user quits ('q' or EOF).
pub fn prompt_stages(reader: &mut dyn BufRead, writer: &mut dyn Write) -> Option<u32> {
    loop {
        write!(
            writer,
            "Enter the number of stages you wish to generate [{}]: ",
            "q to quit".dimmed()
        )
        .ok();
        writer.flush().ok();

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }

        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") {
            return None;
        }
        match trimmed.parse::<u32>() {
            Ok(m) if m <= MAX_STAGES => return Some(m),
            Ok(m) => {
                writeln!(writer, "  At most {} stages are supported, got {}.", MAX_STAGES, m).ok();
            }
            Err(_) => {
                writeln!(writer, "  Input a valid non-negative integer!").ok();
            }
        }
    }
}
