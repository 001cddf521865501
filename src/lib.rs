//! Monte-Carlo goldfish simulator for the Necrodominance storm deck
//!
//! The deck's plan is fixed: resolve Necrodominance in the first main
//! phase, draw a huge hand in the end step, cast Borne Upon a Wind, and
//! chain rituals into a lethal Tendrils of Agony. This crate simulates
//! that turn many times over to measure how often each part of the
//! line comes together.
//!
//! - [`core`] holds cards, mana costs, pools, and persistent sources
//! - [`game`] holds the game state, the backtracking mana search, and
//!   the main-phase and end-step sequencers
//! - [`sim`] runs trials (in parallel, deterministically seeded) and
//!   aggregates win rates and loss reasons

pub mod core;
pub mod deck;
pub mod error;
pub mod game;
pub mod sim;

pub use error::{Result, SimError};
