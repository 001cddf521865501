//! Error types for the simulator

use crate::core::{Card, Color};
use thiserror::Error;

/// Errors that can occur during deck loading or game simulation
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Unknown card name: {0}")]
    UnknownCard(String),

    #[error("Deck must contain exactly 60 cards, got {0}")]
    InvalidDeckSize(usize),

    #[error("{card} is not in {zone}")]
    CardNotInZone { card: Card, zone: &'static str },

    #[error("Not enough {color} mana in pool (need {required}, have {available})")]
    NotEnoughMana {
        color: Color,
        required: u8,
        available: u8,
    },

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenient Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;
