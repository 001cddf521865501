//! Game simulation: state, mana search, and the turn sequencers

pub mod search;
pub mod state;

mod end_step;
mod main_phase;
mod payment;

pub use search::{ManaPlan, ManaSearchState};
pub use state::{GameState, LossReason, PactStrategy, Verbosity, MAX_MULLIGANS};
