//! The first main phase: land drop, rituals, and Necrodominance
//!
//! The main phase tries each legal land drop in turn (colored land
//! first, then Vault of Whispers, then no land at all) and on each
//! branch loops the cast sequencer until Necrodominance resolves or
//! nothing more can be done. A branch only counts if enough spare cards
//! remain in hand to pay off the mulligans taken earlier.

use crate::core::{Card, Color, ManaCost};
use crate::error::{Result, SimError};
use crate::game::state::{GameState, LossReason, MAX_MULLIGANS};
use smallvec::SmallVec;

/// Cards are put under during mulligan bottoming in this order, least
/// useful to the combo first
const BOTTOM_PRIORITY: [Card; 20] = [
    Card::Duress,
    Card::ChancellorOfTheAnnex,
    Card::PactOfNegation,
    Card::Necrodominance,
    Card::BeseechTheMirror,
    Card::GemstoneMine,
    Card::UndiscoveredParadise,
    Card::VaultOfWhispers,
    Card::ChromeMox,
    Card::CabalRitual,
    Card::DarkRitual,
    Card::SummonersPact,
    Card::ElvishSpiritGuide,
    Card::SimianSpiritGuide,
    Card::WildCantor,
    Card::LotusPetal,
    Card::ValakutAwakening,
    Card::BorneUponAWind,
    Card::Manamorphose,
    Card::TendrilsOfAgony,
];

impl GameState {
    /// Play out the first main phase. Returns true once Necrodominance
    /// has resolved and mulligan bottoming is settled.
    pub fn main_phase(&mut self) -> Result<bool> {
        self.can_cast_sorcery = true;

        if self.mulligan_count > MAX_MULLIGANS {
            self.debug(|| format!("Mulligan {} is past the limit", self.mulligan_count));
            self.loss_reason = Some(LossReason::FailedNecro);
            return Ok(false);
        }
        if !self.hand.contains(&Card::Necrodominance)
            && !self.hand.contains(&Card::BeseechTheMirror)
        {
            self.loss_reason = Some(LossReason::FailedNecro);
            return Ok(false);
        }

        // Cards still owed to the bottom of the deck from mulligans
        let bottom_owed = (self.mulligan_count as usize)
            .saturating_sub(7usize.saturating_sub(self.hand.len().min(7)));

        let mut lands: SmallVec<[Option<Card>; 3]> = SmallVec::new();
        if self.hand.contains(&Card::GemstoneMine) {
            lands.push(Some(Card::GemstoneMine));
        } else if self.hand.contains(&Card::UndiscoveredParadise) {
            lands.push(Some(Card::UndiscoveredParadise));
        }
        if self.hand.contains(&Card::VaultOfWhispers) {
            lands.push(Some(Card::VaultOfWhispers));
        }
        if lands.is_empty() {
            lands.push(None);
        }

        let start = self.clone();
        let mut succeeded = false;
        for land in lands {
            *self = start.clone();
            if let Some(land) = land {
                self.set_land(land)?;
            }
            while !self.main_phase_step()? {}
            if self.did_cast_necro && self.hand.len() >= bottom_owed {
                succeeded = true;
                break;
            }
        }

        if !succeeded {
            self.mana_pool.clear();
            self.clear_sources();
            self.loss_reason = Some(LossReason::FailedNecro);
            return Ok(false);
        }

        self.bottom_cards(bottom_owed)?;

        // The phase is over: unspent sources expire, but floating blue
        // is held back as a source for Borne Upon a Wind in the end
        // step
        let floating_blue = self.mana_pool.amount(Color::Blue);
        self.mana_pool.clear();
        self.clear_sources();
        if floating_blue > 0 {
            self.debug(|| format!("Reserving {floating_blue} blue for the end step"));
            self.mana_sources.add(Color::Blue, floating_blue);
        }

        // Spare Petals hit the battlefield now so the end step can tap
        // them
        while self.hand.contains(&Card::LotusPetal) {
            self.cast_lotus_petal()?;
        }
        Ok(true)
    }

    fn clear_sources(&mut self) {
        self.mana_sources.clear();
        self.any_source_perms.clear();
        self.colored_source_perms.clear();
    }

    /// One pass of the main-phase sequencer. Returns true when the
    /// phase is settled (Necrodominance resolved, or no line is left).
    fn main_phase_step(&mut self) -> Result<bool> {
        if self.hand.contains(&Card::Necrodominance) {
            for pattern in ["UBBB", "BBB"] {
                if self.try_generate_mana(pattern, &[Card::Necrodominance])? {
                    self.mana_pool.pay(&ManaCost::from_string("BBB"))?;
                    self.cast_necro(true)?;
                    return Ok(true);
                }
            }
        } else if self.hand.contains(&Card::BeseechTheMirror) {
            let snapshot = self.clone();
            for pattern in ["1UBBB", "1BBB"] {
                if self.try_generate_mana(pattern, &[Card::BeseechTheMirror])? {
                    if self.try_sacrifice_bargain() {
                        self.mana_pool.pay(&ManaCost::from_string("1BBB"))?;
                        self.cast_beseech()?;
                        self.cast_necro(false)?;
                        return Ok(true);
                    }
                    // Mana is there but nothing to bargain: drop an
                    // artifact and retry the loop
                    if self.hand.contains(&Card::ChromeMox) {
                        self.cast_chrome_mox(None)?;
                        return Ok(false);
                    }
                    if self.hand.contains(&Card::LotusPetal) {
                        self.cast_lotus_petal()?;
                        return Ok(false);
                    }
                    *self = snapshot.clone();
                }
            }
            // Pay Beseech's bargain half in mana instead, fetching
            // Necrodominance out of the deck
            if self.deck.contains(&Card::Necrodominance) {
                for pattern in ["1UBBBBBB", "1BBBBBB"] {
                    if self.try_generate_mana(pattern, &[Card::BeseechTheMirror])? {
                        self.mana_pool.pay(&ManaCost::from_string("1BBBBBB"))?;
                        self.cast_beseech()?;
                        remove_to_hand(self, Card::Necrodominance)?;
                        self.cast_necro(true)?;
                        return Ok(true);
                    }
                }
            }
        }

        // A Manamorphose can fix colors for another lap
        if self.hand.contains(&Card::Manamorphose)
            && (self.try_pay_mana("1G", &[Card::Manamorphose])?
                || self.try_pay_mana("1R", &[Card::Manamorphose])?)
        {
            self.cast_manamorphose([Color::Black, Color::Black])?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Put mulligan debts on the bottom of the deck. When disruption is
    /// modeled, protection spells are kept in hand as long as anything
    /// else can go under.
    fn bottom_cards(&mut self, owed: usize) -> Result<()> {
        let mut remaining = owed;
        let protect = self.opponent_disruption;
        for pass in 0..2 {
            for card in BOTTOM_PRIORITY {
                if pass == 0
                    && protect
                    && matches!(card, Card::ChancellorOfTheAnnex | Card::PactOfNegation)
                {
                    continue;
                }
                while remaining > 0 && crate::game::state::take_card(&mut self.hand, card) {
                    self.debug(|| format!("Bottoming {card}"));
                    self.deck.push(card);
                    remaining -= 1;
                }
            }
            if remaining == 0 {
                return Ok(());
            }
        }
        if remaining > 0 {
            return Err(SimError::InvalidAction(format!(
                "cannot bottom {remaining} more cards from an empty hand"
            )));
        }
        Ok(())
    }

    /// Resolve opposing counterspells after Necrodominance is cast.
    /// Each Chancellor of the Annex revealed at the start of the game
    /// taxes away one counter; Pacts of Negation answer the rest.
    /// Returns false when Necrodominance is countered.
    pub fn resolve_disruption(&mut self, counterspells: u8) -> Result<bool> {
        let chancellors = self.count_in_hand(Card::ChancellorOfTheAnnex) as u8;
        let mut remaining = counterspells.saturating_sub(chancellors);
        while remaining > 0 && self.hand.contains(&Card::PactOfNegation) {
            self.cast_pact_of_negation()?;
            remaining -= 1;
        }
        if remaining == 0 {
            return Ok(true);
        }
        self.debug(|| "Necrodominance is countered".to_string());
        crate::game::state::take_card(&mut self.bargain, Card::Necrodominance);
        if crate::game::state::take_card(&mut self.battlefield, Card::Necrodominance) {
            self.graveyard.push(Card::Necrodominance);
        }
        self.loss_reason = Some(LossReason::NecroCountered);
        Ok(false)
    }
}

fn remove_to_hand(game: &mut GameState, card: Card) -> Result<()> {
    crate::game::state::remove_card(&mut game.deck, card, "deck")?;
    game.hand.push(card);
    Ok(())
}
