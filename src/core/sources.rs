//! Persistent mana sources
//!
//! Unlike the pool, which empties between phases, sources last for the
//! rest of the current phase: an untapped land or an imprinted Chrome
//! Mox can produce its mana at whatever point in the phase needs it.
//! The turn sequencer expires them at the phase boundary, carrying only
//! reserved floating blue across. Dedicated sources make one fixed color;
//! wildcard sources (Gemstone Mine, Lotus Petal on the battlefield)
//! make any color.

use crate::core::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaSources {
    colored: [u8; 5],
    any: u8,
}

impl ManaSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colored(&self, color: Color) -> u8 {
        self.colored[color.index()]
    }

    pub fn any(&self) -> u8 {
        self.any
    }

    pub fn total(&self) -> u8 {
        self.colored.iter().sum::<u8>() + self.any
    }

    pub fn add(&mut self, color: Color, amount: u8) {
        self.colored[color.index()] += amount;
    }

    pub fn add_any(&mut self, amount: u8) {
        self.any += amount;
    }

    /// Consume one dedicated source of `color`, if present
    pub fn take_colored(&mut self, color: Color) -> bool {
        if self.colored[color.index()] == 0 {
            return false;
        }
        self.colored[color.index()] -= 1;
        true
    }

    /// Consume one wildcard source, if present
    pub fn take_any(&mut self) -> bool {
        if self.any == 0 {
            return false;
        }
        self.any -= 1;
        true
    }

    /// True if dedicated plus wildcard sources cover `amount` of `color`
    pub fn can_generate(&self, color: Color, amount: u8) -> bool {
        amount <= self.colored(color) + self.any
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for ManaSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in Color::ALL {
            for _ in 0..self.colored(color) {
                write!(f, "{}", color.symbol())?;
            }
        }
        if self.any > 0 {
            write!(f, "+ANY{}", self.any)?;
        }
        Ok(())
    }
}
