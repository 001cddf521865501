//! The end step: the big Necrodominance draw and the storm kill
//!
//! With Necrodominance on the battlefield the turn is ceded and the end
//! step draws the hand up to (nearly) twenty cards. The sequencer then
//! loops: dump dead Summoner's Pacts for storm, fix colors with
//! Manamorphose, find and cast Borne Upon a Wind, dig with Valakut
//! Awakening, and finally chain rituals into a lethal Tendrils of
//! Agony.

use crate::core::{Card, Color, ManaCost};
use crate::error::Result;
use crate::game::state::{GameState, LossReason, PactStrategy};

/// Storm needed so the copies of a hard-cast Tendrils are lethal
const TENDRILS_STORM: u32 = 9;
/// One less when Beseech the Mirror supplies the Tendrils, since
/// Beseech itself grows the count
const BESEECH_TENDRILS_STORM: u32 = 8;

impl GameState {
    /// Draw `draw_count` cards and play out the end step. Returns true
    /// on a lethal Tendrils of Agony.
    pub fn end_step(&mut self, draw_count: u8) -> Result<bool> {
        self.can_cast_sorcery = false;
        self.mana_pool.clear();
        self.draw_cards(draw_count as usize);
        if !self.validate_hand() {
            return Ok(false);
        }
        while !self.end_step_step()? {}
        Ok(self.did_cast_tendrils)
    }

    /// Quick pre-check: a hand that cannot possibly reach Borne Upon a
    /// Wind is a loss without playing it out
    fn validate_hand(&mut self) -> bool {
        let spirit_total = self.count_in_hand(Card::ElvishSpiritGuide)
            + self.count_in_hand(Card::SimianSpiritGuide)
            + self.count_in_hand(Card::SummonersPact);
        let mut feasible = spirit_total >= 2;
        if feasible && !self.hand.contains(&Card::Manamorphose) {
            feasible = self.hand.contains(&Card::ValakutAwakening)
                && spirit_total >= 3
                && self.hand.contains(&Card::SimianSpiritGuide);
        }
        if !feasible {
            self.debug(|| "Hand cannot assemble the kill".to_string());
            self.loss_reason = Some(LossReason::FailedWindAndValakut {
                wind_in_hand: self.hand.contains(&Card::BorneUponAWind),
                valakut_in_hand: self.hand.contains(&Card::ValakutAwakening),
            });
        }
        feasible
    }

    /// One pass of the end-step sequencer. Returns true when the turn
    /// is settled, having recorded a loss reason unless Tendrils won.
    fn end_step_step(&mut self) -> Result<bool> {
        if self.try_dump_pacts()? {
            return Ok(false);
        }

        // Manamorphose trades a spare guide for the colors the next
        // spell actually needs
        if self.hand.contains(&Card::Manamorphose)
            && (self.try_pay_mana("1G", &[Card::Manamorphose])?
                || self.try_pay_mana("1R", &[Card::Manamorphose])?)
        {
            let output = self.pick_manamorphose_output();
            self.cast_manamorphose(output)?;
            return Ok(false);
        }

        if self.did_cast_wind {
            if self.try_storm_kill()? {
                return Ok(true);
            }
            // Not lethal yet: dig deeper
            if self.hand.contains(&Card::ValakutAwakening) {
                let generated = self
                    .try_generate_first(&["2RBBB", "2RBB", "2RB", "2R"], Card::ValakutAwakening)?;
                if generated {
                    self.mana_pool.pay(&ManaCost::from_string("2R"))?;
                    let keep_extra = self.kill_spell_to_keep();
                    let bottomed = self.valakut_bottom_list(&[], keep_extra);
                    self.cast_valakut(&bottomed)?;
                    return Ok(false);
                }
            }
            if self.hand.contains(&Card::BorneUponAWind)
                && self.try_pay_mana("1U", &[Card::BorneUponAWind])?
            {
                self.cast_borne_upon_a_wind()?;
                return Ok(false);
            }
        } else {
            if self.hand.contains(&Card::BorneUponAWind) {
                // With no kill spell in hand but a Valakut available,
                // keep red open for it
                let dig_line = !self.hand.contains(&Card::TendrilsOfAgony)
                    && !self.hand.contains(&Card::BeseechTheMirror)
                    && self.hand.contains(&Card::ValakutAwakening);
                let patterns: &[&str] = if dig_line {
                    &["3URB", "2URB", "1URB", "3UR", "2UR", "1UR", "1UB", "1U"]
                } else {
                    &["1UBBB", "1UBB", "1UB", "1U"]
                };
                let generated = self.try_generate_first(patterns, Card::BorneUponAWind)?;
                if generated {
                    self.mana_pool.pay(&ManaCost::from_string("1U"))?;
                    self.cast_borne_upon_a_wind()?;
                    return Ok(false);
                }
            }
            if self.hand.contains(&Card::ValakutAwakening) {
                let generated = self.try_generate_first(
                    &["3UR", "2UR", "3RR", "3RG", "2RR", "2RG", "2R"],
                    Card::ValakutAwakening,
                )?;
                if generated {
                    self.mana_pool.pay(&ManaCost::from_string("2R"))?;
                    let keep_extra = self.kill_spell_to_keep();
                    let bottomed =
                        self.valakut_bottom_list(&[Card::BorneUponAWind], keep_extra);
                    self.cast_valakut(&bottomed)?;
                    return Ok(false);
                }
            }
        }

        if !self.did_cast_tendrils {
            self.loss_reason = Some(if !self.did_cast_wind {
                if self.did_cast_valakut {
                    LossReason::FailedWindAfterValakut
                } else {
                    LossReason::FailedWindAndValakut {
                        wind_in_hand: self.hand.contains(&Card::BorneUponAWind),
                        valakut_in_hand: self.hand.contains(&Card::ValakutAwakening),
                    }
                }
            } else {
                LossReason::FailedTendrilsAfterWind {
                    valakut_in_hand: self.hand.contains(&Card::ValakutAwakening),
                }
            });
        }
        Ok(true)
    }

    /// Try cost patterns from most to least generous, generating the
    /// first one that is reachable
    fn try_generate_first(&mut self, patterns: &[&str], casting: Card) -> Result<bool> {
        for pattern in patterns {
            if self.try_generate_mana(pattern, &[casting])? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Summoner's Pacts whose targets are exhausted (or that the
    /// strategy says to dump) become free storm
    fn try_dump_pacts(&mut self) -> Result<bool> {
        let pacts = self.count_in_hand(Card::SummonersPact);
        if pacts == 0 {
            return Ok(false);
        }
        let targets = self.count_in_deck(Card::ElvishSpiritGuide)
            + self.count_in_deck(Card::WildCantor);
        let dump = match self.pact_strategy {
            PactStrategy::NeverCast => false,
            PactStrategy::AlwaysCast => true,
            PactStrategy::Auto => targets <= pacts,
        };
        if !dump {
            return Ok(false);
        }
        let mut cast_any = false;
        while self.hand.contains(&Card::SummonersPact) {
            if self.deck.contains(&Card::ElvishSpiritGuide) {
                self.cast_summoners_pact(Card::ElvishSpiritGuide)?;
            } else if self.deck.contains(&Card::WildCantor) {
                self.cast_summoners_pact(Card::WildCantor)?;
            } else {
                break;
            }
            cast_any = true;
        }
        Ok(cast_any)
    }

    /// Choose Manamorphose output for the next spell in the line
    fn pick_manamorphose_output(&self) -> [Color; 2] {
        if self.did_cast_wind {
            if !self.can_generate_mana("R") {
                [Color::Black, Color::Red]
            } else {
                [Color::Black, Color::Black]
            }
        } else if self.hand.contains(&Card::BorneUponAWind) {
            if !self.can_generate_mana("U") {
                [Color::Blue, Color::Black]
            } else {
                [Color::Black, Color::Red]
            }
        } else if self.hand.contains(&Card::ValakutAwakening) {
            if !self.can_generate_mana("R") {
                [Color::Black, Color::Red]
            } else {
                [Color::Blue, Color::Black]
            }
        } else if !self.can_generate_mana("U") {
            [Color::Blue, Color::Black]
        } else {
            [Color::Black, Color::Red]
        }
    }

    /// After Borne Upon a Wind: generate kill mana, cast every free
    /// spell for storm, and fire Tendrils once the count is lethal
    fn try_storm_kill(&mut self) -> Result<bool> {
        let from_hand = self.hand.contains(&Card::TendrilsOfAgony);
        if !from_hand && !self.hand.contains(&Card::BeseechTheMirror) {
            return Ok(false);
        }
        let (pattern, required_storm, casting) = if from_hand {
            ("2BB", TENDRILS_STORM, Card::TendrilsOfAgony)
        } else {
            ("1BBB", BESEECH_TENDRILS_STORM, Card::BeseechTheMirror)
        };
        if !self.try_generate_mana(pattern, &[casting])? {
            return Ok(false);
        }

        let one_b = ManaCost::from_string("1B");
        let mut cast_free_artifact = false;
        while self.hand.contains(&Card::LotusPetal) {
            self.cast_lotus_petal()?;
            cast_free_artifact = true;
        }
        while self.hand.contains(&Card::ChromeMox) {
            self.cast_chrome_mox(None)?;
            cast_free_artifact = true;
        }
        while self.hand.contains(&Card::DarkRitual) && self.mana_pool.amount(Color::Black) >= 1 {
            self.mana_pool.remove(Color::Black, 1)?;
            self.cast_dark_ritual()?;
        }
        while self.hand.contains(&Card::CabalRitual) && self.mana_pool.can_pay(&one_b) {
            self.mana_pool.pay(&one_b)?;
            self.cast_cabal_ritual()?;
        }
        // Pacts of Negation are free only while something else already
        // proved the hand can overextend; a pair is always worth it
        if cast_free_artifact || self.count_in_hand(Card::PactOfNegation) >= 2 {
            while self.hand.contains(&Card::PactOfNegation) {
                self.cast_pact_of_negation()?;
            }
        }

        if self.storm_count < required_storm {
            return Ok(false);
        }
        if from_hand {
            self.mana_pool.pay(&ManaCost::from_string("2BB"))?;
            self.cast_tendrils(true)?;
            return Ok(true);
        }
        if self.try_sacrifice_bargain() {
            self.mana_pool.pay(&ManaCost::from_string("1BBB"))?;
            self.cast_beseech()?;
            self.cast_tendrils(false)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// The single kill spell worth holding through a Valakut discard
    fn kill_spell_to_keep(&self) -> Option<Card> {
        if self.hand.contains(&Card::TendrilsOfAgony) {
            Some(Card::TendrilsOfAgony)
        } else if self.hand.contains(&Card::BeseechTheMirror) {
            Some(Card::BeseechTheMirror)
        } else {
            None
        }
    }

    /// Everything in hand except one Valakut, the kept kill spell, and
    /// one copy of each card in `also_keep`
    fn valakut_bottom_list(&self, also_keep: &[Card], keep_extra: Option<Card>) -> Vec<Card> {
        let mut keep = vec![Card::ValakutAwakening];
        keep.extend_from_slice(also_keep);
        keep.extend(keep_extra);
        let mut bottomed = self.hand.clone();
        for card in keep {
            crate::game::state::take_card(&mut bottomed, card);
        }
        bottomed
    }
}
