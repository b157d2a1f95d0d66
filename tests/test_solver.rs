//! Tests for the backward-induction solver.
//!
//! Validates totality and leaf-ness over random trees, the one-shot
//! deviation property of the returned outcome, the random tie-break, and
//! the fixed scenarios from the design.

use rand::SeedableRng;
use rand::rngs::StdRng;

use spe_cli::game_tree::{GameNode, GameTree, Payoff, ROOT};
use spe_cli::solver::{no_profitable_deviation, resolve, resolve_root};

// ---------------------------------------------------------------------------
// Helper: hand-built trees with fixed payoffs
// ---------------------------------------------------------------------------

fn leaf(id: u32, depth: u32, parent: usize, p1: u32, p2: u32) -> GameNode {
    GameNode {
        id,
        depth,
        payoff: Payoff { p1, p2 },
        parent: Some(parent),
        children: None,
    }
}

fn one_stage(left: (u32, u32), right: (u32, u32)) -> GameTree {
    GameTree::from_nodes(vec![
        GameNode {
            id: 1,
            depth: 0,
            payoff: Payoff { p1: 1, p2: 1 },
            parent: None,
            children: Some((1, 2)),
        },
        leaf(2, 1, 0, left.0, left.1),
        leaf(3, 1, 0, right.0, right.1),
    ])
    .unwrap()
}

// ---------------------------------------------------------------------------
// Fixed scenarios
// ---------------------------------------------------------------------------

#[test]
fn zero_stage_tree_resolves_to_root() {
    let mut rng = StdRng::seed_from_u64(0);
    let tree = GameTree::random(0, &mut rng);
    assert_eq!(resolve_root(&tree, &mut rng).unwrap(), ROOT);
}

#[test]
fn root_player_takes_own_best_component() {
    // Root turn is P1; it compares first components only, so (9,2)
    // beats (3,7) even though P2 strongly prefers the left leaf.
    let tree = one_stage((3, 7), (9, 2));
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_eq!(resolve_root(&tree, &mut rng).unwrap(), 2);
    }
}

#[test]
fn second_player_decides_at_odd_depth() {
    // Two stages down the left branch; the depth-1 decision belongs to
    // P2 and compares second components.
    let tree = GameTree::from_nodes(vec![
        GameNode {
            id: 1,
            depth: 0,
            payoff: Payoff { p1: 1, p2: 1 },
            parent: None,
            children: Some((1, 2)),
        },
        GameNode {
            id: 2,
            depth: 1,
            payoff: Payoff { p1: 1, p2: 1 },
            parent: Some(0),
            children: Some((3, 4)),
        },
        leaf(3, 1, 0, 4, 4),
        leaf(4, 2, 1, 10, 2),
        leaf(5, 2, 1, 1, 9),
    ])
    .unwrap();

    let mut rng = StdRng::seed_from_u64(5);
    // P2 at node 1 picks (1,9) over (10,2); P1 at the root then prefers
    // the shallow (4,4) leaf since 4 > 1.
    assert_eq!(resolve_root(&tree, &mut rng).unwrap(), 2);
}

// ---------------------------------------------------------------------------
// Properties over random trees
// ---------------------------------------------------------------------------

#[test]
fn resolution_is_total_and_returns_a_leaf() {
    for stages in 0..6 {
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let tree = GameTree::random(stages, &mut rng);
            let eq = resolve_root(&tree, &mut rng).unwrap();
            let node = tree.node(eq);
            assert!(node.is_leaf(), "stages {} seed {}: not a leaf", stages, seed);
            assert_eq!(tree.path_from_root(eq)[0], ROOT);
        }
    }
}

#[test]
fn no_single_step_deviation_improves_the_decider() {
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let tree = GameTree::random(5, &mut rng);
        let eq = resolve_root(&tree, &mut rng).unwrap();
        assert!(
            no_profitable_deviation(&tree, eq, &mut rng).unwrap(),
            "seed {}: one-shot deviation property violated",
            seed
        );
    }
}

#[test]
fn subtree_resolution_matches_local_choice() {
    // At the root, the returned leaf must be the better (for P1) of the
    // two resolved child subtrees. Cloning the rng replays the identical
    // tie-break sequence in each resolution.
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let tree = GameTree::random(4, &mut rng);
        let mut rng_root = rng.clone();
        let mut rng_left = rng.clone();
        let mut rng_right = rng.clone();
        let eq = resolve_root(&tree, &mut rng_root).unwrap();
        if let Some((left, right)) = tree.node(ROOT).children {
            let l = resolve(&tree, left, &mut rng_left).unwrap();
            let r = resolve(&tree, right, &mut rng_right).unwrap();
            let turn = tree.node(ROOT).turn();
            let best = tree
                .node(l)
                .payoff
                .for_player(turn)
                .max(tree.node(r).payoff.for_player(turn));
            assert_eq!(tree.node(eq).payoff.for_player(turn), best);
        }
    }
}

// ---------------------------------------------------------------------------
// Tie-break randomness
// ---------------------------------------------------------------------------

#[test]
fn indifferent_player_flips_a_fair_coin() {
    // Payoffs held fixed, randomness source varied: each side should be
    // chosen roughly half the time.
    let tree = one_stage((6, 2), (6, 9));
    let trials = 4000u64;
    let left_picks = (0..trials)
        .filter(|&seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            resolve_root(&tree, &mut rng).unwrap() == 1
        })
        .count();
    let frac = left_picks as f64 / trials as f64;
    assert!(
        (0.45..=0.55).contains(&frac),
        "left picked {:.1}% of the time over {} trials",
        frac * 100.0,
        trials
    );
}

#[test]
fn strict_preference_never_uses_the_coin() {
    let tree = one_stage((8, 1), (2, 10));
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_eq!(resolve_root(&tree, &mut rng).unwrap(), 1);
    }
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

#[test]
fn arena_order_violation_never_reaches_the_solver() {
    // The reverse sweep reads a child's resolution before computing it
    // if the child sits at a smaller index than its parent, which would
    // let an internal node leak out as the "equilibrium leaf". Such an
    // arena must be rejected at construction, before any resolution.
    let nodes = vec![
        GameNode {
            id: 1,
            depth: 0,
            payoff: Payoff { p1: 1, p2: 1 },
            parent: None,
            children: Some((3, 4)),
        },
        // Children of index 3, stored ahead of it. Payoffs steer every
        // decision toward this mis-ordered branch.
        leaf(2, 2, 3, 10, 10),
        leaf(3, 2, 3, 9, 9),
        GameNode {
            id: 4,
            depth: 1,
            payoff: Payoff { p1: 10, p2: 10 },
            parent: Some(0),
            children: Some((1, 2)),
        },
        leaf(5, 1, 0, 1, 1),
    ];
    assert!(GameTree::from_nodes(nodes).is_err());
}

#[test]
fn out_of_range_node_is_a_precondition_violation() {
    let mut rng = StdRng::seed_from_u64(2);
    let tree = GameTree::random(2, &mut rng);
    assert!(resolve(&tree, tree.len() + 10, &mut rng).is_err());
    assert!(no_profitable_deviation(&tree, tree.len(), &mut rng).is_err());
}
