//! Graphviz DOT rendering of a solved game tree.
//!
//! Purely presentational: consumes {tree, equilibrium leaf} and emits DOT
//! text. Internal nodes are unlabeled points, leaves show their payoff
//! pair, the equilibrium leaf is filled red, and every edge carries its
//! side plus the deciding player at the parent (e.g. `L1`, `R2`).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::SpeResult;
use crate::game_tree::{GameTree, NodeId};

/// Render the tree as a DOT digraph, highlighting `equilibrium`.
pub fn render(tree: &GameTree, equilibrium: NodeId) -> String {
    let mut out = String::from("digraph game_tree {\n");

    for (idx, node) in tree.nodes().iter().enumerate() {
        if node.is_leaf() {
            if idx == equilibrium {
                let _ = writeln!(
                    out,
                    "    n{} [label=\"{}\", style=filled, fillcolor=red];",
                    node.id, node.payoff
                );
            } else {
                let _ = writeln!(out, "    n{} [label=\"{}\"];", node.id, node.payoff);
            }
        } else {
            let _ = writeln!(out, "    n{} [label=\"\"];", node.id);
        }
    }

    for node in tree.nodes() {
        if let Some((left, right)) = node.children {
            let turn = node.turn().number();
            let _ = writeln!(
                out,
                "    n{} -> n{} [label=\"L{}\"];",
                node.id,
                tree.node(left).id,
                turn
            );
            let _ = writeln!(
                out,
                "    n{} -> n{} [label=\"R{}\"];",
                node.id,
                tree.node(right).id,
                turn
            );
        }
    }

    out.push_str("}\n");
    out
}

/// Render and write the DOT text to `path`.
pub fn write_dot(tree: &GameTree, equilibrium: NodeId, path: &Path) -> SpeResult<()> {
    fs::write(path, render(tree, equilibrium))?;
    Ok(())
}
