//! Sequential-game toolkit: random extensive-form two-player game trees
//! solved by backward induction.
//!
//! The core is [`game_tree`] (randomized strictly-binary tree
//! construction) and [`solver`] (bottom-up resolution to the
//! subgame-perfect equilibrium leaf). Everything else — DOT rendering,
//! terminal display, batch statistics, the CLI — consumes those two.

pub mod batch;
pub mod cli;
pub mod display;
pub mod dot;
pub mod error;
pub mod game_tree;
pub mod solver;
