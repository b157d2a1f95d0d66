//! Terminal output: colored ASCII tree, summary tables, status lines.

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::error::{SpeError, SpeResult};
use crate::game_tree::{GameTree, NodeId, ROOT};

/// Summary table for a solved tree. Fails with `MalformedTree` if the
/// equilibrium path runs through a childless node, which a validated
/// tree cannot produce.
pub fn solve_summary(tree: &GameTree, equilibrium: NodeId) -> SpeResult<String> {
    let eq = tree.node(equilibrium);
    let path = tree.path_from_root(equilibrium);
    let mut moves = Vec::with_capacity(path.len().saturating_sub(1));
    for pair in path.windows(2) {
        let (left, _) = tree.node(pair[0]).children.ok_or_else(|| {
            SpeError::MalformedTree(format!("path node {} has no children", pair[0]))
        })?;
        moves.push(if pair[1] == left { "L" } else { "R" });
    }
    let moves = moves.join(" ");

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").set_alignment(CellAlignment::Left),
        Cell::new("Value").set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Stages".bold().to_string()),
        Cell::new(format!("{}", tree.stages)),
    ]);
    table.add_row(vec![
        Cell::new("Nodes".bold().to_string()),
        Cell::new(format!("{}", tree.len())),
    ]);
    table.add_row(vec![
        Cell::new("Leaves".bold().to_string()),
        Cell::new(format!("{}", tree.leaves().len())),
    ]);
    table.add_row(vec![
        Cell::new("Equilibrium payoff".bold().to_string()),
        Cell::new(format!("{}", eq.payoff)),
    ]);
    table.add_row(vec![
        Cell::new("Equilibrium depth".bold().to_string()),
        Cell::new(format!("{}", eq.depth)),
    ]);
    table.add_row(vec![
        Cell::new("Equilibrium path".bold().to_string()),
        Cell::new(if moves.is_empty() { "(root)".to_string() } else { moves }),
    ]);

    Ok(table.to_string())
}

/// ASCII rendering of the whole tree with the equilibrium leaf
/// highlighted. Internal nodes show the deciding player; leaves show
/// their payoff pair.
pub fn tree_ascii(tree: &GameTree, equilibrium: NodeId) -> String {
    let mut out = String::new();
    out.push_str(&node_line(tree, ROOT, equilibrium));
    out.push('\n');
    if let Some((left, right)) = tree.node(ROOT).children {
        fmt_subtree(tree, left, equilibrium, "", false, &mut out);
        fmt_subtree(tree, right, equilibrium, "", true, &mut out);
    }
    out
}

fn fmt_subtree(
    tree: &GameTree,
    id: NodeId,
    equilibrium: NodeId,
    prefix: &str,
    is_last: bool,
    out: &mut String,
) {
    let connector = if is_last { "└── " } else { "├── " };
    out.push_str(prefix);
    out.push_str(connector);
    out.push_str(&node_line(tree, id, equilibrium));
    out.push('\n');

    if let Some((left, right)) = tree.node(id).children {
        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        fmt_subtree(tree, left, equilibrium, &child_prefix, false, out);
        fmt_subtree(tree, right, equilibrium, &child_prefix, true, out);
    }
}

fn node_line(tree: &GameTree, id: NodeId, equilibrium: NodeId) -> String {
    let node = tree.node(id);
    if node.is_leaf() {
        if id == equilibrium {
            format!("{}  {}", node.payoff.to_string().green().bold(), "< SPE".green())
        } else {
            format!("{}", node.payoff.to_string().dimmed())
        }
    } else {
        format!("{}", node.turn().to_string().cyan().bold())
    }
}

pub fn equilibrium_line(tree: &GameTree, equilibrium: NodeId) -> String {
    format!(
        "  {} {}",
        "Subgame-perfect equilibrium outcome:".bold(),
        tree.node(equilibrium).payoff.to_string().green().bold()
    )
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}
