//! Executing mana plans against the live game
//!
//! [`ManaSearchState`](crate::game::search::ManaSearchState) proves a
//! cost is reachable and returns the resources it committed; this
//! module spends those resources for real. Execution is budgeted by the
//! plan (it never cracks more rituals or Moxen than the search did) but
//! stops early once the pool covers the cost.

use crate::core::{Card, Color, ManaCost, ManaPool};
use crate::error::Result;
use crate::game::search::ManaSearchState;
use crate::game::state::{count, take_card, GameState, ANY_SOURCE_PRIORITY};

/// Colored requirements are produced in this order during execution;
/// black runs last so rituals can chain off the other payments
const EXECUTE_COLOR_ORDER: [Color; 4] = [Color::Green, Color::Red, Color::White, Color::Blue];

/// Remaining per-resource budget from a search plan
#[derive(Debug)]
struct PlanBudget {
    elvish: usize,
    simian: usize,
    petal: usize,
    cantor: usize,
    dark: usize,
    cabal: usize,
    chrome: usize,
    imprints: Vec<Card>,
}

impl PlanBudget {
    fn new(used_from_hand: &[Card], imprints: Vec<Card>) -> Self {
        PlanBudget {
            elvish: count(used_from_hand, Card::ElvishSpiritGuide),
            simian: count(used_from_hand, Card::SimianSpiritGuide),
            petal: count(used_from_hand, Card::LotusPetal),
            cantor: count(used_from_hand, Card::WildCantor),
            dark: count(used_from_hand, Card::DarkRitual),
            cabal: count(used_from_hand, Card::CabalRitual),
            chrome: count(used_from_hand, Card::ChromeMox),
            imprints,
        }
    }
}

impl GameState {
    /// Search for a way to produce `pattern` and, if found, generate
    /// the mana into the pool. `casting` names the cards about to be
    /// cast with it, which keeps them off the imprint list.
    pub fn try_generate_mana(&mut self, pattern: &str, casting: &[Card]) -> Result<bool> {
        let cost = ManaCost::from_string(pattern);
        if self.mana_pool.can_pay(&cost) {
            return Ok(true);
        }
        let plan = match ManaSearchState::from_game(self, casting).solve(&cost) {
            Some(plan) => plan,
            None => return Ok(false),
        };
        self.debug(|| format!("Generating {pattern}"));
        let budget = PlanBudget::new(&plan.used_from_hand, plan.imprinted);
        self.execute_plan(&cost, budget)
    }

    /// Generate `pattern` and pay it, leaving any surplus floating
    pub fn try_pay_mana(&mut self, pattern: &str, casting: &[Card]) -> Result<bool> {
        if !self.try_generate_mana(pattern, casting)? {
            return Ok(false);
        }
        self.mana_pool.pay(&ManaCost::from_string(pattern))?;
        Ok(true)
    }

    /// Feasibility check without touching the game
    pub fn can_generate_mana(&self, pattern: &str) -> bool {
        let cost = ManaCost::from_string(pattern);
        self.mana_pool.can_pay(&cost)
            || ManaSearchState::from_game(self, &[]).solve(&cost).is_some()
    }

    fn execute_plan(&mut self, cost: &ManaCost, mut budget: PlanBudget) -> Result<bool> {
        // Fetch the creatures the plan committed to before spending
        // anything
        while self.count_in_hand(Card::ElvishSpiritGuide) < budget.elvish
            && self.hand.contains(&Card::SummonersPact)
            && self.deck.contains(&Card::ElvishSpiritGuide)
        {
            self.cast_summoners_pact(Card::ElvishSpiritGuide)?;
        }
        while budget.elvish > 0 && self.hand.contains(&Card::ElvishSpiritGuide) {
            self.use_spirit_guide(Card::ElvishSpiritGuide)?;
            budget.elvish -= 1;
        }
        while budget.simian > 0 && self.hand.contains(&Card::SimianSpiritGuide) {
            self.use_spirit_guide(Card::SimianSpiritGuide)?;
            budget.simian -= 1;
        }
        if self.can_cast_sorcery {
            while budget.petal > 0 && self.hand.contains(&Card::LotusPetal) {
                self.cast_lotus_petal()?;
                budget.petal -= 1;
            }
            while budget.chrome > 0 && self.hand.contains(&Card::ChromeMox) {
                match budget.imprints.pop() {
                    Some(imprint) => self.cast_chrome_mox(Some(imprint))?,
                    None => break,
                }
                budget.chrome -= 1;
            }
            while self.count_in_hand(Card::WildCantor) < budget.cantor
                && self.hand.contains(&Card::SummonersPact)
                && self.deck.contains(&Card::WildCantor)
            {
                self.cast_summoners_pact(Card::WildCantor)?;
            }
        }

        // Colored requirements first, banking each payment in a scratch
        // pool so later steps cannot raid it
        let one_b = ManaCost::from_string("1B");
        let mut paid = ManaPool::new();
        for color in EXECUTE_COLOR_ORDER {
            let need = cost.colored(color);
            if need == 0 {
                continue;
            }
            while self.mana_pool.amount(color) < need {
                if self.tap_colored_source(color) {
                    continue;
                }
                if self.tap_any_source(color) {
                    continue;
                }
                if self.can_cast_sorcery && self.cast_planned_cantor(&mut budget)? {
                    continue;
                }
                return Ok(false);
            }
            self.mana_pool.remove(color, need)?;
            paid.add(color, need);
        }

        // Black plus the generic tail
        let need_b = cost.colored(Color::Black);
        let target = need_b + cost.generic;
        while self.mana_pool.amount(Color::Black) < need_b || self.mana_pool.total() < target {
            if self.tap_colored_source(Color::Black) {
                continue;
            }
            if budget.dark > 0
                && self.hand.contains(&Card::DarkRitual)
                && self.mana_pool.amount(Color::Black) >= 1
            {
                self.mana_pool.remove(Color::Black, 1)?;
                self.cast_dark_ritual()?;
                budget.dark -= 1;
                continue;
            }
            if budget.cabal > 0
                && self.hand.contains(&Card::CabalRitual)
                && self.mana_pool.can_pay(&one_b)
            {
                self.mana_pool.pay(&one_b)?;
                self.cast_cabal_ritual()?;
                budget.cabal -= 1;
                continue;
            }
            if self.tap_any_source(Color::Black) {
                continue;
            }
            if self.can_cast_sorcery && self.cast_planned_cantor(&mut budget)? {
                continue;
            }
            // Dedicated sources of other colors can still fill the
            // generic part
            if self.tap_any_colored_source() {
                continue;
            }
            return Ok(false);
        }

        self.mana_pool.transfer_from(&mut paid);
        Ok(true)
    }

    /// Cast a Wild Cantor the plan budgeted for, paying G or R from the
    /// pool
    fn cast_planned_cantor(&mut self, budget: &mut PlanBudget) -> Result<bool> {
        if budget.cantor == 0 || !self.hand.contains(&Card::WildCantor) {
            return Ok(false);
        }
        for pay in [Color::Green, Color::Red] {
            if self.mana_pool.amount(pay) > 0 {
                self.mana_pool.remove(pay, 1)?;
                self.cast_wild_cantor()?;
                budget.cantor -= 1;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Tap one dedicated source of `color`, retiring the permanent
    /// behind it. Counters staged without a backing permanent (floating
    /// blue reserved at the end of the main phase) just produce mana.
    pub(crate) fn tap_colored_source(&mut self, color: Color) -> bool {
        if !self.mana_sources.take_colored(color) {
            return false;
        }
        if let Some(idx) = self
            .colored_source_perms
            .iter()
            .position(|&(_, c)| c == color)
        {
            let (card, _) = self.colored_source_perms.remove(idx);
            if take_card(&mut self.battlefield, card) {
                self.graveyard.push(card);
            }
        }
        self.mana_pool.add(color, 1);
        true
    }

    /// Tap one wildcard source for `color`, spending lands before
    /// creatures before Petals
    pub(crate) fn tap_any_source(&mut self, color: Color) -> bool {
        if !self.mana_sources.take_any() {
            return false;
        }
        let pick = ANY_SOURCE_PRIORITY
            .iter()
            .copied()
            .find(|card| self.any_source_perms.contains(card));
        if let Some(card) = pick {
            take_card(&mut self.any_source_perms, card);
            if card == Card::LotusPetal {
                take_card(&mut self.bargain, Card::LotusPetal);
            }
            if take_card(&mut self.battlefield, card) {
                self.graveyard.push(card);
            }
        }
        self.mana_pool.add(color, 1);
        true
    }

    /// Tap whatever dedicated source remains, regardless of color
    fn tap_any_colored_source(&mut self) -> bool {
        for color in Color::ALL {
            if self.mana_sources.colored(color) > 0 && self.tap_colored_source(color) {
                return true;
            }
        }
        false
    }
}
