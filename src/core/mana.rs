//! Mana costs and the mana pool
//!
//! Costs are written in the usual compact notation: `"UBBB"` is one blue
//! and three black, `"1G"` is one generic and one green, `"UR3"` is
//! blue, red, and three generic. All digits in a pattern accumulate into
//! a single generic number.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five colors of mana
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// All colors in WUBRG order
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Blue => 1,
            Color::Black => 2,
            Color::Red => 3,
            Color::Green => 4,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Color> {
        match symbol {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Order in which generic costs consume floating mana: least useful
/// colors first, blue last because it pays for Borne Upon a Wind.
pub const GENERIC_PAY_ORDER: [Color; 5] = [
    Color::White,
    Color::Green,
    Color::Red,
    Color::Black,
    Color::Blue,
];

/// A parsed mana cost: per-color requirements plus a generic component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaCost {
    colored: [u8; 5],
    pub generic: u8,
}

impl ManaCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a pattern like `"1UBBB"` or `"UR3"`. Unknown symbols are
    /// ignored; digits accumulate into one generic number.
    pub fn from_string(pattern: &str) -> Self {
        let mut cost = ManaCost::new();
        let mut generic_digits = String::new();
        for ch in pattern.chars() {
            if ch.is_ascii_digit() {
                generic_digits.push(ch);
            } else if let Some(color) = Color::from_symbol(ch) {
                cost.colored[color.index()] += 1;
            }
        }
        if !generic_digits.is_empty() {
            cost.generic = generic_digits.parse().unwrap_or(0);
        }
        cost
    }

    pub fn colored(&self, color: Color) -> u8 {
        self.colored[color.index()]
    }

    pub fn set_colored(&mut self, color: Color, amount: u8) {
        self.colored[color.index()] = amount;
    }

    /// Converted mana cost: total number of mana required
    pub fn cmc(&self) -> u8 {
        self.colored.iter().sum::<u8>() + self.generic
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic > 0 {
            write!(f, "{}", self.generic)?;
        }
        for color in Color::ALL {
            for _ in 0..self.colored(color) {
                write!(f, "{}", color.symbol())?;
            }
        }
        Ok(())
    }
}

/// Floating mana available to pay costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaPool {
    counts: [u8; 5],
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self, color: Color) -> u8 {
        self.counts[color.index()]
    }

    pub fn add(&mut self, color: Color, amount: u8) {
        self.counts[color.index()] += amount;
    }

    pub fn remove(&mut self, color: Color, amount: u8) -> Result<()> {
        let available = self.counts[color.index()];
        if available < amount {
            return Err(SimError::NotEnoughMana {
                color,
                required: amount,
                available,
            });
        }
        self.counts[color.index()] = available - amount;
        Ok(())
    }

    pub fn total(&self) -> u8 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn clear(&mut self) {
        self.counts = [0; 5];
    }

    /// True if the pool covers every colored requirement and has enough
    /// total mana for the generic part as well
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        for color in Color::ALL {
            if self.amount(color) < cost.colored(color) {
                return false;
            }
        }
        self.total() >= cost.cmc()
    }

    /// Pay a cost, spending generic mana in [`GENERIC_PAY_ORDER`].
    /// Fails without mutating the pool when it cannot be paid in full.
    pub fn pay(&mut self, cost: &ManaCost) -> Result<()> {
        if !self.can_pay(cost) {
            return Err(SimError::InvalidAction(format!(
                "cannot pay {} from pool {}",
                cost, self
            )));
        }
        for color in Color::ALL {
            self.counts[color.index()] -= cost.colored(color);
        }
        let mut generic = cost.generic;
        for color in GENERIC_PAY_ORDER {
            let take = generic.min(self.counts[color.index()]);
            self.counts[color.index()] -= take;
            generic -= take;
            if generic == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Move all mana from `other` into this pool
    pub fn transfer_from(&mut self, other: &mut ManaPool) {
        for color in Color::ALL {
            self.counts[color.index()] += other.counts[color.index()];
        }
        other.clear();
    }
}

impl fmt::Display for ManaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        for color in Color::ALL {
            for _ in 0..self.amount(color) {
                write!(f, "{}", color.symbol())?;
            }
        }
        Ok(())
    }
}
