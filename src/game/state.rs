//! Game state: zones, flags, and the spell-resolution mutators
//!
//! The simulator plays a single goldfish turn, so the state tracks one
//! player's zones plus the handful of flags the combo cares about
//! (storm count, whether Necrodominance and Borne Upon a Wind have
//! resolved, and the timing restriction on sorceries).

use crate::core::{Card, Color, ManaPool, ManaSources};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Maximum number of mulligans before the run is recorded as a failure
pub const MAX_MULLIGANS: u8 = 4;

/// Battlefield wildcard sources are consumed in this order, spending
/// the most fragile sources last
pub(crate) const ANY_SOURCE_PRIORITY: [Card; 4] = [
    Card::GemstoneMine,
    Card::UndiscoveredParadise,
    Card::WildCantor,
    Card::LotusPetal,
];

/// Why a trial did not end with a lethal Tendrils of Agony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    /// Never resolved Necrodominance in the main phase
    FailedNecro,
    /// Necrodominance was cast but countered by the opponent
    NecroCountered,
    /// The end step stalled before casting Borne Upon a Wind or
    /// Valakut Awakening
    FailedWindAndValakut {
        wind_in_hand: bool,
        valakut_in_hand: bool,
    },
    /// Valakut Awakening resolved but never found Borne Upon a Wind
    FailedWindAfterValakut,
    /// Borne Upon a Wind resolved but the storm kill fell short
    FailedTendrilsAfterWind { valakut_in_hand: bool },
}

impl std::fmt::Display for LossReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LossReason::FailedNecro => write!(f, "failed to cast Necrodominance"),
            LossReason::NecroCountered => write!(f, "Necrodominance countered"),
            LossReason::FailedWindAndValakut {
                wind_in_hand,
                valakut_in_hand,
            } => write!(
                f,
                "failed Wind and Valakut (wind in hand: {wind_in_hand}, valakut in hand: {valakut_in_hand})"
            ),
            LossReason::FailedWindAfterValakut => write!(f, "failed Wind after Valakut"),
            LossReason::FailedTendrilsAfterWind { valakut_in_hand } => write!(
                f,
                "failed Tendrils after Wind (valakut in hand: {valakut_in_hand})"
            ),
        }
    }
}

/// When to dump Summoner's Pacts for storm in the end step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PactStrategy {
    /// Never cast a Pact just for storm
    NeverCast,
    /// Always chain Pacts into the remaining deck targets
    AlwaysCast,
    /// Cast them once the deck holds no more targets than the hand
    /// holds Pacts
    #[default]
    Auto,
}

/// Output verbosity for single-game runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    #[default]
    Silent,
    Verbose,
}

/// Full state of one goldfish trial
#[derive(Debug, Clone)]
pub struct GameState {
    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub battlefield: Vec<Card>,
    pub graveyard: Vec<Card>,
    pub exile: Vec<Card>,
    /// Permanents that can be sacrificed to pay Beseech the Mirror's
    /// bargain cost
    pub bargain: Vec<Card>,
    pub mana_pool: ManaPool,
    pub mana_sources: ManaSources,
    /// Battlefield permanents backing wildcard source counters
    pub(crate) any_source_perms: Vec<Card>,
    /// Battlefield permanents backing dedicated source counters
    pub(crate) colored_source_perms: Vec<(Card, Color)>,
    pub storm_count: u32,
    pub mulligan_count: u8,
    pub can_cast_sorcery: bool,
    pub did_cast_necro: bool,
    pub did_cast_valakut: bool,
    pub did_cast_wind: bool,
    pub did_cast_tendrils: bool,
    pub loss_reason: Option<LossReason>,
    pub pact_strategy: PactStrategy,
    /// Whether the opponent may hold counterspells; shifts mulligan
    /// bottoming to protect Chancellors and Pacts of Negation
    pub opponent_disruption: bool,
    pub verbosity: Verbosity,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of copies of `card` in `zone`
pub(crate) fn count(zone: &[Card], card: Card) -> usize {
    zone.iter().filter(|&&c| c == card).count()
}

/// Remove one copy of `card` from `zone`, erroring when absent
pub(crate) fn remove_card(zone: &mut Vec<Card>, card: Card, zone_name: &'static str) -> Result<()> {
    match zone.iter().position(|&c| c == card) {
        Some(idx) => {
            zone.remove(idx);
            Ok(())
        }
        None => Err(SimError::CardNotInZone {
            card,
            zone: zone_name,
        }),
    }
}

/// Remove one copy of `card` from `zone` if present
pub(crate) fn take_card(zone: &mut Vec<Card>, card: Card) -> bool {
    if let Some(idx) = zone.iter().position(|&c| c == card) {
        zone.remove(idx);
        true
    } else {
        false
    }
}

pub(crate) fn card_list(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            deck: Vec::new(),
            hand: Vec::new(),
            battlefield: Vec::new(),
            graveyard: Vec::new(),
            exile: Vec::new(),
            bargain: Vec::new(),
            mana_pool: ManaPool::new(),
            mana_sources: ManaSources::new(),
            any_source_perms: Vec::new(),
            colored_source_perms: Vec::new(),
            storm_count: 0,
            mulligan_count: 0,
            can_cast_sorcery: false,
            did_cast_necro: false,
            did_cast_valakut: false,
            did_cast_wind: false,
            did_cast_tendrils: false,
            loss_reason: None,
            pact_strategy: PactStrategy::default(),
            opponent_disruption: false,
            verbosity: Verbosity::default(),
        }
    }

    pub(crate) fn debug<F: FnOnce() -> String>(&self, message: F) {
        if self.verbosity == Verbosity::Verbose {
            println!("{}", message());
        }
    }

    pub fn count_in_hand(&self, card: Card) -> usize {
        count(&self.hand, card)
    }

    pub fn count_in_deck(&self, card: Card) -> usize {
        count(&self.deck, card)
    }

    /// Move up to `amount` cards from the top of the deck to the hand
    pub fn draw_cards(&mut self, amount: usize) {
        let n = amount.min(self.deck.len());
        let drawn: Vec<Card> = self.deck.drain(..n).collect();
        self.debug(|| format!("Draw {}: {}", n, card_list(&drawn)));
        self.hand.extend(drawn);
    }

    /// Play a land from hand, registering its mana source
    pub fn set_land(&mut self, land: Card) -> Result<()> {
        remove_card(&mut self.hand, land, "hand")?;
        self.battlefield.push(land);
        match land {
            Card::GemstoneMine | Card::UndiscoveredParadise => {
                self.any_source_perms.push(land);
                self.mana_sources.add_any(1);
            }
            Card::VaultOfWhispers => {
                self.colored_source_perms.push((land, Color::Black));
                self.mana_sources.add(Color::Black, 1);
                self.bargain.push(land);
            }
            _ => {
                return Err(SimError::InvalidAction(format!("{land} is not a land")));
            }
        }
        self.debug(|| format!("Play land: {land}"));
        Ok(())
    }

    /// Register a wildcard mana source backed by `card`. Tests use this
    /// to stage battlefield permanents directly.
    pub fn add_any_mana_source(&mut self, card: Card) {
        self.any_source_perms.push(card);
        self.mana_sources.add_any(1);
    }

    /// Spend a spirit guide from hand for its mana
    pub fn use_spirit_guide(&mut self, guide: Card) -> Result<()> {
        let color = match guide {
            Card::ElvishSpiritGuide => Color::Green,
            Card::SimianSpiritGuide => Color::Red,
            _ => {
                return Err(SimError::InvalidAction(format!(
                    "{guide} is not a spirit guide"
                )));
            }
        };
        remove_card(&mut self.hand, guide, "hand")?;
        self.graveyard.push(guide);
        self.mana_pool.add(color, 1);
        self.debug(|| format!("Spend {guide} for {color}"));
        Ok(())
    }

    /// Cast Summoner's Pact fetching `target` from the deck into hand
    pub fn cast_summoners_pact(&mut self, target: Card) -> Result<()> {
        remove_card(&mut self.hand, Card::SummonersPact, "hand")?;
        remove_card(&mut self.deck, target, "deck")?;
        self.graveyard.push(Card::SummonersPact);
        self.hand.push(target);
        self.storm_count += 1;
        self.debug(|| format!("Cast Summoner's Pact fetching {target}"));
        Ok(())
    }

    /// Cast Lotus Petal; it sits on the battlefield as a wildcard
    /// source and a bargain permanent
    pub fn cast_lotus_petal(&mut self) -> Result<()> {
        remove_card(&mut self.hand, Card::LotusPetal, "hand")?;
        self.battlefield.push(Card::LotusPetal);
        self.add_any_mana_source(Card::LotusPetal);
        self.bargain.push(Card::LotusPetal);
        self.storm_count += 1;
        self.debug(|| "Cast Lotus Petal".to_string());
        Ok(())
    }

    /// Cast Wild Cantor; like a Petal it waits as a wildcard source
    pub fn cast_wild_cantor(&mut self) -> Result<()> {
        remove_card(&mut self.hand, Card::WildCantor, "hand")?;
        self.battlefield.push(Card::WildCantor);
        self.add_any_mana_source(Card::WildCantor);
        self.storm_count += 1;
        self.debug(|| "Cast Wild Cantor".to_string());
        Ok(())
    }

    /// Cast Chrome Mox. With an imprint it becomes a dedicated source
    /// of the imprinted card's color; without one it goes straight to
    /// the graveyard. Either way it can be bargained away later.
    pub fn cast_chrome_mox(&mut self, imprint: Option<Card>) -> Result<()> {
        remove_card(&mut self.hand, Card::ChromeMox, "hand")?;
        match imprint {
            Some(card) => {
                remove_card(&mut self.hand, card, "hand")?;
                let color = card.color().ok_or_else(|| {
                    SimError::InvalidAction(format!("{card} has no color to imprint"))
                })?;
                self.exile.push(card);
                self.battlefield.push(Card::ChromeMox);
                self.colored_source_perms.push((Card::ChromeMox, color));
                self.mana_sources.add(color, 1);
                self.debug(|| format!("Cast Chrome Mox imprinting {card}"));
            }
            None => {
                self.graveyard.push(Card::ChromeMox);
                self.debug(|| "Cast Chrome Mox with no imprint".to_string());
            }
        }
        self.bargain.push(Card::ChromeMox);
        self.storm_count += 1;
        Ok(())
    }

    /// Cast Dark Ritual, adding BBB to the pool (its own cost is paid
    /// by the caller)
    pub fn cast_dark_ritual(&mut self) -> Result<()> {
        remove_card(&mut self.hand, Card::DarkRitual, "hand")?;
        self.graveyard.push(Card::DarkRitual);
        self.mana_pool.add(Color::Black, 3);
        self.storm_count += 1;
        self.debug(|| "Cast Dark Ritual".to_string());
        Ok(())
    }

    /// Cast Cabal Ritual, adding BBB (threshold is never active this
    /// early in the game)
    pub fn cast_cabal_ritual(&mut self) -> Result<()> {
        remove_card(&mut self.hand, Card::CabalRitual, "hand")?;
        self.graveyard.push(Card::CabalRitual);
        self.mana_pool.add(Color::Black, 3);
        self.storm_count += 1;
        self.debug(|| "Cast Cabal Ritual".to_string());
        Ok(())
    }

    /// Cast Manamorphose, adding two mana of the chosen colors and
    /// drawing a card
    pub fn cast_manamorphose(&mut self, output: [Color; 2]) -> Result<()> {
        remove_card(&mut self.hand, Card::Manamorphose, "hand")?;
        self.graveyard.push(Card::Manamorphose);
        for color in output {
            self.mana_pool.add(color, 1);
        }
        self.storm_count += 1;
        self.debug(|| format!("Cast Manamorphose for {}{}", output[0], output[1]));
        self.draw_cards(1);
        Ok(())
    }

    /// Cast Necrodominance, from hand or off Beseech the Mirror
    pub fn cast_necro(&mut self, from_hand: bool) -> Result<()> {
        if from_hand {
            remove_card(&mut self.hand, Card::Necrodominance, "hand")?;
        } else {
            remove_card(&mut self.deck, Card::Necrodominance, "deck")?;
        }
        self.battlefield.push(Card::Necrodominance);
        self.bargain.push(Card::Necrodominance);
        self.storm_count += 1;
        self.did_cast_necro = true;
        self.debug(|| "Cast Necrodominance".to_string());
        Ok(())
    }

    /// Cast Beseech the Mirror (the bargain sacrifice and the found
    /// spell are handled by the caller)
    pub fn cast_beseech(&mut self) -> Result<()> {
        remove_card(&mut self.hand, Card::BeseechTheMirror, "hand")?;
        self.graveyard.push(Card::BeseechTheMirror);
        self.storm_count += 1;
        self.debug(|| "Cast Beseech the Mirror".to_string());
        Ok(())
    }

    /// Cast Borne Upon a Wind; sorceries become castable for the rest
    /// of the turn
    pub fn cast_borne_upon_a_wind(&mut self) -> Result<()> {
        remove_card(&mut self.hand, Card::BorneUponAWind, "hand")?;
        self.graveyard.push(Card::BorneUponAWind);
        self.storm_count += 1;
        self.did_cast_wind = true;
        self.can_cast_sorcery = true;
        self.debug(|| "Cast Borne Upon a Wind".to_string());
        self.draw_cards(1);
        Ok(())
    }

    /// Cast Valakut Awakening, putting `bottomed` on the bottom of the
    /// deck and drawing that many cards plus one
    pub fn cast_valakut(&mut self, bottomed: &[Card]) -> Result<()> {
        remove_card(&mut self.hand, Card::ValakutAwakening, "hand")?;
        self.graveyard.push(Card::ValakutAwakening);
        for &card in bottomed {
            remove_card(&mut self.hand, card, "hand")?;
        }
        self.deck.extend_from_slice(bottomed);
        self.storm_count += 1;
        self.did_cast_valakut = true;
        self.debug(|| format!("Cast Valakut Awakening bottoming {}", card_list(bottomed)));
        self.draw_cards(bottomed.len() + 1);
        Ok(())
    }

    /// Cast Pact of Negation to grow storm (its delayed cost never
    /// comes due, the game ends this turn)
    pub fn cast_pact_of_negation(&mut self) -> Result<()> {
        remove_card(&mut self.hand, Card::PactOfNegation, "hand")?;
        self.graveyard.push(Card::PactOfNegation);
        self.storm_count += 1;
        self.debug(|| "Cast Pact of Negation".to_string());
        Ok(())
    }

    /// Cast Tendrils of Agony, from hand or off Beseech the Mirror
    pub fn cast_tendrils(&mut self, from_hand: bool) -> Result<()> {
        if from_hand {
            remove_card(&mut self.hand, Card::TendrilsOfAgony, "hand")?;
        } else {
            remove_card(&mut self.deck, Card::TendrilsOfAgony, "deck")?;
        }
        self.graveyard.push(Card::TendrilsOfAgony);
        self.storm_count += 1;
        self.did_cast_tendrils = true;
        self.debug(|| format!("Cast Tendrils of Agony with storm {}", self.storm_count));
        Ok(())
    }

    /// Drop the dedicated-source counter backed by a battlefield `card`
    fn retire_colored_source_for(&mut self, card: Card) {
        if let Some(idx) = self
            .colored_source_perms
            .iter()
            .position(|&(c, _)| c == card)
        {
            let (_, color) = self.colored_source_perms.remove(idx);
            self.mana_sources.take_colored(color);
        }
    }

    /// Sacrifice a permanent to pay Beseech the Mirror's bargain cost.
    /// Prefers Necrodominance (its drawback is already banked), then
    /// spent artifacts in the graveyard, then live battlefield mana.
    pub fn try_sacrifice_bargain(&mut self) -> bool {
        if self.bargain.is_empty() {
            return false;
        }
        if self.bargain.contains(&Card::Necrodominance)
            && self.battlefield.contains(&Card::Necrodominance)
        {
            take_card(&mut self.bargain, Card::Necrodominance);
            take_card(&mut self.battlefield, Card::Necrodominance);
            self.graveyard.push(Card::Necrodominance);
            self.debug(|| "Bargain: sacrifice Necrodominance".to_string());
            return true;
        }
        for artifact in [Card::VaultOfWhispers, Card::ChromeMox] {
            if !self.bargain.contains(&artifact) {
                continue;
            }
            if take_card(&mut self.graveyard, artifact) {
                take_card(&mut self.bargain, artifact);
                self.exile.push(artifact);
                self.debug(|| format!("Bargain: sacrifice {artifact} from graveyard"));
                return true;
            }
            if take_card(&mut self.battlefield, artifact) {
                take_card(&mut self.bargain, artifact);
                self.retire_colored_source_for(artifact);
                self.graveyard.push(artifact);
                self.debug(|| format!("Bargain: sacrifice {artifact}"));
                return true;
            }
        }
        if self.bargain.contains(&Card::LotusPetal)
            && self.battlefield.contains(&Card::LotusPetal)
        {
            take_card(&mut self.bargain, Card::LotusPetal);
            take_card(&mut self.battlefield, Card::LotusPetal);
            if take_card(&mut self.any_source_perms, Card::LotusPetal) {
                self.mana_sources.take_any();
            }
            self.graveyard.push(Card::LotusPetal);
            self.debug(|| "Bargain: sacrifice Lotus Petal".to_string());
            return true;
        }
        false
    }

    /// Cards that may be exiled under a Chrome Mox right now. One copy
    /// of each combo-critical card is held back while the line still
    /// needs it; `casting` lists cards reserved because they are about
    /// to be cast.
    pub fn imprint_candidates(&self, casting: &[Card]) -> Vec<Card> {
        let necro_accessible = self.did_cast_necro || self.hand.contains(&Card::Necrodominance);
        let mut candidates = Vec::new();

        let mut push = |card: Card, copies: usize| {
            for _ in 0..copies {
                candidates.push(card);
            }
        };

        push(Card::ChancellorOfTheAnnex, self.count_in_hand(Card::ChancellorOfTheAnnex));
        push(Card::Duress, self.count_in_hand(Card::Duress));

        let necro = self.count_in_hand(Card::Necrodominance);
        push(
            Card::Necrodominance,
            if self.did_cast_necro { necro } else { necro.saturating_sub(1) },
        );

        // Beseech backs up whichever spell the current phase still
        // needs to find
        let beseech = self.count_in_hand(Card::BeseechTheMirror);
        let beseech_spare = if self.did_cast_necro {
            self.hand.contains(&Card::TendrilsOfAgony)
        } else {
            self.hand.contains(&Card::Necrodominance)
        };
        push(
            Card::BeseechTheMirror,
            if beseech_spare { beseech } else { beseech.saturating_sub(1) },
        );

        push(Card::CabalRitual, self.count_in_hand(Card::CabalRitual));
        push(Card::DarkRitual, self.count_in_hand(Card::DarkRitual));
        push(Card::WildCantor, self.count_in_hand(Card::WildCantor));

        if self.did_cast_necro {
            push(Card::PactOfNegation, self.count_in_hand(Card::PactOfNegation));
        }

        let wind = self.count_in_hand(Card::BorneUponAWind);
        push(
            Card::BorneUponAWind,
            if self.did_cast_wind {
                wind
            } else if necro_accessible {
                wind.saturating_sub(1)
            } else {
                wind
            },
        );
        for utility in [Card::ValakutAwakening, Card::Manamorphose] {
            let copies = self.count_in_hand(utility);
            push(
                utility,
                if necro_accessible { copies.saturating_sub(1) } else { copies },
            );
        }

        // A Pact is only expendable once the deck holds no more
        // creatures for it to fetch
        let targets = self.count_in_deck(Card::ElvishSpiritGuide)
            + self.count_in_deck(Card::WildCantor);
        push(
            Card::SummonersPact,
            self.count_in_hand(Card::SummonersPact).saturating_sub(targets),
        );

        for &card in casting {
            take_card(&mut candidates, card);
        }
        candidates
    }
}
