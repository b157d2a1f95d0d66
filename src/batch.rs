//! Batch simulation: solve many independently seeded random trees in
//! parallel and summarize the distribution of equilibrium outcomes.

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::error::{SpeError, SpeResult};
use crate::game_tree::{GameTree, Payoff};
use crate::solver::resolve_root;

/// Aggregate statistics over a batch of solved trees.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub trees: usize,
    pub stages: u32,
    pub mean_p1: f64,
    pub mean_p2: f64,
    pub min_p1: u32,
    pub max_p1: u32,
    pub min_p2: u32,
    pub max_p2: u32,
    pub mean_leaves: f64,
    /// Fraction of trees whose equilibrium leaf sits at full depth.
    pub full_depth_frac: f64,
    /// Fraction of trees where Player1's equilibrium payoff beats Player2's.
    pub p1_ahead_frac: f64,
}

struct Outcome {
    payoff: Payoff,
    depth: u32,
    leaves: usize,
}

/// Solve `trees` random games of `stages` stages, one deterministic rng
/// per tree derived from `base_seed`.
pub fn run_batch(trees: usize, stages: u32, base_seed: u64) -> SpeResult<BatchSummary> {
    if trees == 0 {
        return Err(SpeError::EmptyBatch);
    }

    let outcomes: Vec<Outcome> = (0..trees)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
            let tree = GameTree::random(stages, &mut rng);
            let eq = resolve_root(&tree, &mut rng)?;
            Ok(Outcome {
                payoff: tree.node(eq).payoff,
                depth: tree.node(eq).depth,
                leaves: tree.leaves().len(),
            })
        })
        .collect::<SpeResult<Vec<_>>>()?;

    let n = outcomes.len() as f64;
    let (min_p1, max_p1) = outcomes
        .iter()
        .map(|o| o.payoff.p1)
        .minmax()
        .into_option()
        .unwrap_or((0, 0));
    let (min_p2, max_p2) = outcomes
        .iter()
        .map(|o| o.payoff.p2)
        .minmax()
        .into_option()
        .unwrap_or((0, 0));

    Ok(BatchSummary {
        trees,
        stages,
        mean_p1: outcomes.iter().map(|o| o.payoff.p1 as f64).sum::<f64>() / n,
        mean_p2: outcomes.iter().map(|o| o.payoff.p2 as f64).sum::<f64>() / n,
        min_p1,
        max_p1,
        min_p2,
        max_p2,
        mean_leaves: outcomes.iter().map(|o| o.leaves as f64).sum::<f64>() / n,
        full_depth_frac: outcomes.iter().filter(|o| o.depth == stages).count() as f64 / n,
        p1_ahead_frac: outcomes
            .iter()
            .filter(|o| o.payoff.p1 > o.payoff.p2)
            .count() as f64
            / n,
    })
}

impl BatchSummary {
    /// Render the summary as a table plus a headline.
    pub fn display(&self) {
        println!();
        println!(
            "  {}  |  {} trees  |  {} stages",
            "Batch equilibrium statistics".bold(),
            self.trees,
            self.stages,
        );
        println!();

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Metric").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new("Mean P1 payoff".bold().to_string()),
            Cell::new(format!("{:.2}", self.mean_p1)),
        ]);
        table.add_row(vec![
            Cell::new("Mean P2 payoff".bold().to_string()),
            Cell::new(format!("{:.2}", self.mean_p2)),
        ]);
        table.add_row(vec![
            Cell::new("P1 payoff range".bold().to_string()),
            Cell::new(format!("{} - {}", self.min_p1, self.max_p1)),
        ]);
        table.add_row(vec![
            Cell::new("P2 payoff range".bold().to_string()),
            Cell::new(format!("{} - {}", self.min_p2, self.max_p2)),
        ]);
        table.add_row(vec![
            Cell::new("Mean leaves per tree".bold().to_string()),
            Cell::new(format!("{:.2}", self.mean_leaves)),
        ]);
        table.add_row(vec![
            Cell::new("Equilibrium at full depth".bold().to_string()),
            Cell::new(format!("{:.1}%", self.full_depth_frac * 100.0)),
        ]);
        table.add_row(vec![
            Cell::new("P1 ahead of P2".bold().to_string()),
            Cell::new(format!("{:.1}%", self.p1_ahead_frac * 100.0)),
        ]);

        println!("{}", table);
        println!();
    }
}
