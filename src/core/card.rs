//! The fixed card set used by the Necrodominance storm deck
//!
//! The simulator only understands the twenty cards that appear in the
//! deck's various builds, so cards are a closed enum rather than a
//! database lookup.

use crate::core::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every card the simulator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    GemstoneMine,
    UndiscoveredParadise,
    VaultOfWhispers,
    ChromeMox,
    LotusPetal,
    SummonersPact,
    ElvishSpiritGuide,
    SimianSpiritGuide,
    WildCantor,
    Manamorphose,
    ValakutAwakening,
    BorneUponAWind,
    DarkRitual,
    CabalRitual,
    Necrodominance,
    BeseechTheMirror,
    TendrilsOfAgony,
    PactOfNegation,
    Duress,
    ChancellorOfTheAnnex,
}

impl Card {
    /// All cards, in deck-list order
    pub const ALL: [Card; 20] = [
        Card::GemstoneMine,
        Card::UndiscoveredParadise,
        Card::VaultOfWhispers,
        Card::ChromeMox,
        Card::LotusPetal,
        Card::SummonersPact,
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::WildCantor,
        Card::Manamorphose,
        Card::ValakutAwakening,
        Card::BorneUponAWind,
        Card::DarkRitual,
        Card::CabalRitual,
        Card::Necrodominance,
        Card::BeseechTheMirror,
        Card::TendrilsOfAgony,
        Card::PactOfNegation,
        Card::Duress,
        Card::ChancellorOfTheAnnex,
    ];

    /// Printed English card name
    pub fn name(self) -> &'static str {
        match self {
            Card::GemstoneMine => "Gemstone Mine",
            Card::UndiscoveredParadise => "Undiscovered Paradise",
            Card::VaultOfWhispers => "Vault of Whispers",
            Card::ChromeMox => "Chrome Mox",
            Card::LotusPetal => "Lotus Petal",
            Card::SummonersPact => "Summoner's Pact",
            Card::ElvishSpiritGuide => "Elvish Spirit Guide",
            Card::SimianSpiritGuide => "Simian Spirit Guide",
            Card::WildCantor => "Wild Cantor",
            Card::Manamorphose => "Manamorphose",
            Card::ValakutAwakening => "Valakut Awakening",
            Card::BorneUponAWind => "Borne Upon a Wind",
            Card::DarkRitual => "Dark Ritual",
            Card::CabalRitual => "Cabal Ritual",
            Card::Necrodominance => "Necrodominance",
            Card::BeseechTheMirror => "Beseech the Mirror",
            Card::TendrilsOfAgony => "Tendrils of Agony",
            Card::PactOfNegation => "Pact of Negation",
            Card::Duress => "Duress",
            Card::ChancellorOfTheAnnex => "Chancellor of the Annex",
        }
    }

    /// Look up a card by its printed name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Card> {
        let name = name.trim();
        Card::ALL
            .iter()
            .copied()
            .find(|card| card.name().eq_ignore_ascii_case(name))
    }

    /// Color identity used for Chrome Mox imprints. Lands and other
    /// colorless cards have no color.
    pub fn color(self) -> Option<Color> {
        match self {
            Card::SummonersPact | Card::ElvishSpiritGuide => Some(Color::Green),
            Card::SimianSpiritGuide
            | Card::WildCantor
            | Card::Manamorphose
            | Card::ValakutAwakening => Some(Color::Red),
            Card::BorneUponAWind | Card::PactOfNegation => Some(Color::Blue),
            Card::DarkRitual
            | Card::CabalRitual
            | Card::Necrodominance
            | Card::BeseechTheMirror
            | Card::TendrilsOfAgony
            | Card::Duress => Some(Color::Black),
            Card::ChancellorOfTheAnnex => Some(Color::White),
            Card::GemstoneMine
            | Card::UndiscoveredParadise
            | Card::VaultOfWhispers
            | Card::ChromeMox
            | Card::LotusPetal => None,
        }
    }

    pub fn is_land(self) -> bool {
        matches!(
            self,
            Card::GemstoneMine | Card::UndiscoveredParadise | Card::VaultOfWhispers
        )
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for card in Card::ALL {
            assert_eq!(Card::from_name(card.name()), Some(card));
        }
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(Card::from_name("dark ritual"), Some(Card::DarkRitual));
        assert_eq!(Card::from_name("  Lotus Petal "), Some(Card::LotusPetal));
        assert_eq!(Card::from_name("Black Lotus"), None);
    }

    #[test]
    fn test_colors() {
        assert_eq!(Card::DarkRitual.color(), Some(Color::Black));
        assert_eq!(Card::WildCantor.color(), Some(Color::Red));
        assert_eq!(Card::SummonersPact.color(), Some(Color::Green));
        assert_eq!(Card::BorneUponAWind.color(), Some(Color::Blue));
        assert_eq!(Card::ChancellorOfTheAnnex.color(), Some(Color::White));
        assert_eq!(Card::GemstoneMine.color(), None);
        assert_eq!(Card::ChromeMox.color(), None);
    }

    #[test]
    fn test_lands() {
        assert!(Card::GemstoneMine.is_land());
        assert!(Card::VaultOfWhispers.is_land());
        assert!(!Card::LotusPetal.is_land());
    }
}
