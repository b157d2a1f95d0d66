//! Random extensive-form game trees.
//!
//! Builds a strictly binary two-player game tree stage by stage. At each
//! stage a random non-empty subset of the current frontier branches into
//! two children; skipped frontier nodes stay terminal for the rest of the
//! tree, which is what produces irregular (non-full) trees.

use rand::Rng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SpeError, SpeResult};

/// Arena index of a node. The root is always index 0.
pub type NodeId = usize;

/// Arena index of the root node.
pub const ROOT: NodeId = 0;

// ---------------------------------------------------------------------------
// Players and payoffs
// ---------------------------------------------------------------------------

/// The two players of the sequential game, alternating by depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Whose turn it is at a node of the given depth: Player1 decides at
    /// even depths, Player2 at odd depths.
    pub fn at_depth(depth: u32) -> Player {
        if depth % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// 1-based player number, as shown in rendered output.
    pub fn number(&self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.number())
    }
}

/// A payoff pair. Both components are drawn uniformly from [1, 10] at node
/// creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payoff {
    pub p1: u32,
    pub p2: u32,
}

impl Payoff {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;

    pub fn random<R: Rng>(rng: &mut R) -> Payoff {
        Payoff {
            p1: rng.gen_range(Payoff::MIN..=Payoff::MAX),
            p2: rng.gen_range(Payoff::MIN..=Payoff::MAX),
        }
    }

    /// The component the given player cares about.
    pub fn for_player(&self, player: Player) -> u32 {
        match player {
            Player::One => self.p1,
            Player::Two => self.p2,
        }
    }
}

impl fmt::Display for Payoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.p1, self.p2)
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A node of the game tree.
///
/// Every node carries a payoff pair, but only leaf payoffs are read by the
/// solver; internal-node payoffs are dead weight from uniform construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameNode {
    /// 1-based, unique, assigned in construction order (root = 1). Used
    /// only for identity, never for ordering logic.
    pub id: u32,
    /// Stage index; the turn label is derived from it, not stored.
    pub depth: u32,
    pub payoff: Payoff,
    /// Non-owning back-reference, used for upward path traversal only.
    pub parent: Option<NodeId>,
    /// Both present or both absent; a node is a leaf iff this is `None`.
    pub children: Option<(NodeId, NodeId)>,
}

impl GameNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The player who decides at this node.
    pub fn turn(&self) -> Player {
        Player::at_depth(self.depth)
    }
}

// ---------------------------------------------------------------------------
// The tree
// ---------------------------------------------------------------------------

/// A strictly binary game tree held in an arena. Built once, read-only
/// afterward.
///
/// Children always sit at larger arena indices than their parent; the
/// solver's reverse sweep relies on it. The builder produces that order
/// naturally and [`GameTree::from_nodes`] enforces it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawGameTree")]
pub struct GameTree {
    /// The requested stage count. Equals the maximum leaf depth.
    pub stages: u32,
    nodes: Vec<GameNode>,
}

/// Unvalidated wire form. JSON import goes through [`GameTree::from_nodes`]
/// so a hand-edited file cannot smuggle in a malformed arena.
#[derive(Deserialize)]
struct RawGameTree {
    stages: u32,
    nodes: Vec<GameNode>,
}

impl TryFrom<RawGameTree> for GameTree {
    type Error = SpeError;

    fn try_from(raw: RawGameTree) -> SpeResult<GameTree> {
        let tree = GameTree::from_nodes(raw.nodes)?;
        if tree.stages != raw.stages {
            return Err(SpeError::MalformedTree(format!(
                "stored stage count {} does not match maximum depth {}",
                raw.stages, tree.stages
            )));
        }
        Ok(tree)
    }
}

impl GameTree {
    /// Generate a random tree with the given number of stages.
    ///
    /// Stage 0 yields a single root leaf. At each later stage, a uniform
    /// random sub-sample of the frontier (size itself uniform in [1, k])
    /// branches into a left and right child with fresh ids and payoffs;
    /// the new frontier is exactly the children created this stage.
    pub fn random<R: Rng>(stages: u32, rng: &mut R) -> GameTree {
        let mut nodes = vec![GameNode {
            id: 1,
            depth: 0,
            payoff: Payoff::random(rng),
            parent: None,
            children: None,
        }];
        let mut frontier: Vec<NodeId> = vec![ROOT];

        for stage in 1..=stages {
            let count = rng.gen_range(1..=frontier.len());
            let chosen = sample(rng, frontier.len(), count);
            let mut next = Vec::with_capacity(count * 2);

            for idx in chosen {
                let parent = frontier[idx];
                let left = push_node(&mut nodes, parent, stage, rng);
                let right = push_node(&mut nodes, parent, stage, rng);
                nodes[parent].children = Some((left, right));
                next.push(left);
                next.push(right);
            }
            frontier = next;
        }

        GameTree { stages, nodes }
    }

    /// Build a tree from explicit nodes, validating the structural
    /// invariants — including the parent-before-child arena order the
    /// solver's reverse sweep depends on, and that every non-root node
    /// is reachable as exactly one parent's child. Used for hand-built
    /// trees (tests) and JSON import.
    pub fn from_nodes(nodes: Vec<GameNode>) -> SpeResult<GameTree> {
        if nodes.is_empty() {
            return Err(SpeError::MalformedTree("tree has no nodes".into()));
        }
        if nodes[ROOT].parent.is_some() || nodes[ROOT].depth != 0 {
            return Err(SpeError::MalformedTree(
                "node 0 must be a depth-0 root with no parent".into(),
            ));
        }

        let mut seen = vec![false; nodes.len() + 1];
        let mut is_child = vec![false; nodes.len()];
        for (idx, node) in nodes.iter().enumerate() {
            let id = node.id as usize;
            if id == 0 || id > nodes.len() || seen[id] {
                return Err(SpeError::MalformedTree(format!(
                    "node {} has invalid or duplicate id {}",
                    idx, node.id
                )));
            }
            seen[id] = true;

            if let Some((left, right)) = node.children {
                for child in [left, right] {
                    if child <= idx {
                        return Err(SpeError::MalformedTree(format!(
                            "child {} is not ordered after its parent {}",
                            child, idx
                        )));
                    }
                    let child_node = nodes.get(child).ok_or_else(|| {
                        SpeError::MalformedTree(format!(
                            "node {} points at missing child {}",
                            idx, child
                        ))
                    })?;
                    if is_child[child] {
                        return Err(SpeError::MalformedTree(format!(
                            "node {} is listed as a child twice",
                            child
                        )));
                    }
                    is_child[child] = true;
                    if child_node.parent != Some(idx) {
                        return Err(SpeError::MalformedTree(format!(
                            "child {} does not point back at parent {}",
                            child, idx
                        )));
                    }
                    if child_node.depth != node.depth + 1 {
                        return Err(SpeError::MalformedTree(format!(
                            "child {} is not one level below parent {}",
                            child, idx
                        )));
                    }
                }
            }
        }

        if let Some(orphan) = (1..nodes.len()).find(|&idx| !is_child[idx]) {
            return Err(SpeError::MalformedTree(format!(
                "node {} is not reachable from the root",
                orphan
            )));
        }

        let stages = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        Ok(GameTree { stages, nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &GameNode {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&GameNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[GameNode] {
        &self.nodes
    }

    /// All terminal nodes, in construction order. A derived query, not
    /// persisted state.
    pub fn leaves(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].is_leaf())
            .collect()
    }

    /// Deepest leaf depth. Equals `stages` for randomly generated trees.
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// The node ids from the root down to `id`, inclusive, found by
    /// walking parent links upward.
    pub fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

fn push_node<R: Rng>(
    nodes: &mut Vec<GameNode>,
    parent: NodeId,
    depth: u32,
    rng: &mut R,
) -> NodeId {
    let idx = nodes.len();
    nodes.push(GameNode {
        id: idx as u32 + 1,
        depth,
        payoff: Payoff::random(rng),
        parent: Some(parent),
        children: None,
    });
    idx
}
