//! Backward-induction solver.
//!
//! Resolves a game tree bottom-up to the single leaf reached when every
//! player, at every decision point, maximizes their own payoff given how
//! all later decision points resolve — the subgame-perfect equilibrium
//! outcome. Exact ties are broken uniformly at random: indifference is
//! modeled as genuine randomness, never as a fixed side.

use rand::Rng;

use crate::error::{SpeError, SpeResult};
use crate::game_tree::{GameTree, NodeId, Player, ROOT};

/// Resolve the subtree rooted at `node` to its equilibrium leaf.
///
/// Children always carry larger arena indices than their parent, so a
/// single reverse sweep visits every node after both of its children —
/// an iterative post-order that cannot exhaust the stack on deep trees.
pub fn resolve<R: Rng>(tree: &GameTree, node: NodeId, rng: &mut R) -> SpeResult<NodeId> {
    if tree.get(node).is_none() {
        return Err(SpeError::UnknownNode(node));
    }

    // resolved[i] = the equilibrium leaf of the subtree rooted at i.
    let mut resolved: Vec<NodeId> = (0..tree.len()).collect();
    for i in (node..tree.len()).rev() {
        if let Some((left, right)) = tree.node(i).children {
            resolved[i] = better_of(tree, resolved[left], resolved[right], tree.node(i).turn(), rng);
        }
    }
    Ok(resolved[node])
}

/// Resolve the whole tree from its root.
pub fn resolve_root<R: Rng>(tree: &GameTree, rng: &mut R) -> SpeResult<NodeId> {
    resolve(tree, ROOT, rng)
}

/// The backward-induction step: pick whichever resolved leaf gives the
/// deciding player the higher payoff component, coin-flipping on a tie.
fn better_of<R: Rng>(
    tree: &GameTree,
    a: NodeId,
    b: NodeId,
    turn: Player,
    rng: &mut R,
) -> NodeId {
    let pa = tree.node(a).payoff.for_player(turn);
    let pb = tree.node(b).payoff.for_player(turn);
    if pa > pb {
        a
    } else if pb > pa {
        b
    } else if rng.gen_bool(0.5) {
        a
    } else {
        b
    }
}

/// One-shot-deviation check: along the root-to-`leaf` path, verify that
/// at every decision point the deciding player does at least as well on
/// the equilibrium branch as they would by switching to the other child
/// (with play continuing rationally below it).
pub fn no_profitable_deviation<R: Rng>(
    tree: &GameTree,
    leaf: NodeId,
    rng: &mut R,
) -> SpeResult<bool> {
    if tree.get(leaf).is_none() {
        return Err(SpeError::UnknownNode(leaf));
    }

    let path = tree.path_from_root(leaf);
    for pair in path.windows(2) {
        let (node, next) = (pair[0], pair[1]);
        let (left, right) = tree
            .node(node)
            .children
            .ok_or_else(|| SpeError::MalformedTree(format!("path node {} has no children", node)))?;
        let other = if next == left { right } else { left };

        let alternative = resolve(tree, other, rng)?;
        let turn = tree.node(node).turn();
        if tree.node(alternative).payoff.for_player(turn)
            > tree.node(leaf).payoff.for_player(turn)
        {
            return Ok(false);
        }
    }
    Ok(true)
}
