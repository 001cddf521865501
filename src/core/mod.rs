//! Core data types: cards, mana costs, pools, and sources

pub mod card;
pub mod mana;
pub mod sources;

pub use card::Card;
pub use mana::{Color, ManaCost, ManaPool, GENERIC_PAY_ORDER};
pub use sources::ManaSources;
