//! Mana feasibility search
//!
//! Before any spell is cast for real, the simulator proves the cost is
//! payable by exploring mana lines on a scratch copy of the relevant
//! state: spirit guides, Lotus Petals, Chrome Mox imprints, Wild
//! Cantor conversions, rituals, and Summoner's Pact fetches. The search
//! backtracks with clone-and-restore snapshots and records everything
//! it committed to as a [`ManaPlan`], which the payment layer then
//! replays against the live game.
//!
//! Branch orders are fixed and deliberate: colored requirements resolve
//! red, green, white, blue, then black (rituals make black cheap to
//! defer), then generic. At each shortfall the search spends wildcard
//! sources before Chrome Mox, Mox before Wild Cantor, and Cantor before
//! fetching one with a Pact.

use crate::core::{Card, Color, ManaCost, ManaPool};
use crate::game::state::{count, GameState};
use smallvec::SmallVec;

/// Colored requirements are resolved in this order; black is handled
/// afterwards so rituals can pay for it
const COLOR_SEARCH_ORDER: [Color; 4] = [Color::Red, Color::Green, Color::White, Color::Blue];

/// Chrome Mox imprint preference while hunting one mana of a color
const MOX_GENERIC_ORDER: [Color; 5] = [
    Color::White,
    Color::Green,
    Color::Black,
    Color::Red,
    Color::Blue,
];

type CardList = SmallVec<[Card; 8]>;

/// The commitments a successful search made, replayed by the payment
/// layer
#[derive(Debug, Clone, Default)]
pub struct ManaPlan {
    /// Cards consumed from hand: guides, Petals, Moxen, Cantors,
    /// rituals, Pacts
    pub used_from_hand: Vec<Card>,
    /// Cards exiled under Chrome Moxen
    pub imprinted: Vec<Card>,
    /// Cards fetched out of the deck by Summoner's Pact
    pub searched: Vec<Card>,
}

/// Scratch state for the feasibility search
#[derive(Debug, Clone)]
pub struct ManaSearchState {
    pool: ManaPool,
    any_sources: u8,
    hand: Vec<Card>,
    deck: Vec<Card>,
    imprint_candidates: Vec<Card>,
    can_cast_sorcery: bool,
    used_from_hand: CardList,
    imprinted: CardList,
    searched: CardList,
}

impl ManaSearchState {
    /// Capture the parts of the game the search may spend. Dedicated
    /// sources are converted up front into floating mana; wildcard
    /// sources stay flexible.
    pub fn from_game(game: &GameState, casting: &[Card]) -> Self {
        let mut pool = game.mana_pool;
        for color in Color::ALL {
            pool.add(color, game.mana_sources.colored(color));
        }
        ManaSearchState {
            pool,
            any_sources: game.mana_sources.any(),
            hand: game.hand.clone(),
            deck: game.deck.clone(),
            imprint_candidates: game.imprint_candidates(casting),
            can_cast_sorcery: game.can_cast_sorcery,
            used_from_hand: CardList::new(),
            imprinted: CardList::new(),
            searched: CardList::new(),
        }
    }

    /// Search for a way to produce `cost`. Returns the plan on success.
    pub fn solve(mut self, cost: &ManaCost) -> Option<ManaPlan> {
        if self.pool.can_pay(cost) {
            return Some(self.into_plan());
        }

        let initial_elvish = count(&self.hand, Card::ElvishSpiritGuide);

        // Free mana first: fetch every Elvish the deck offers, then
        // exile all guides in hand
        while self.hand.contains(&Card::SummonersPact)
            && self.deck.contains(&Card::ElvishSpiritGuide)
        {
            self.use_from_hand(Card::SummonersPact);
            take(&mut self.deck, Card::ElvishSpiritGuide);
            self.hand.push(Card::ElvishSpiritGuide);
            self.searched.push(Card::ElvishSpiritGuide);
        }
        while self.hand.contains(&Card::ElvishSpiritGuide) {
            self.use_from_hand(Card::ElvishSpiritGuide);
            self.pool.add(Color::Green, 1);
        }
        while self.hand.contains(&Card::SimianSpiritGuide) {
            self.use_from_hand(Card::SimianSpiritGuide);
            self.pool.add(Color::Red, 1);
        }

        if self.pool.can_pay(cost) {
            if self.pool.pay(cost).is_err() {
                return None;
            }
            self.revert_unused_guides(initial_elvish);
            return Some(self.into_plan());
        }

        if self.can_cast_sorcery {
            while self.hand.contains(&Card::LotusPetal) {
                self.use_from_hand(Card::LotusPetal);
                self.any_sources += 1;
            }
        }

        // Upper bound: even cracking every ritual and Mox cannot reach
        // the cost
        let ceiling = self.pool.total() as u32
            + self.any_sources as u32
            + count(&self.hand, Card::ChromeMox) as u32
            + 2 * count(&self.hand, Card::DarkRitual) as u32
            + count(&self.hand, Card::CabalRitual) as u32;
        if ceiling < cost.cmc() as u32 {
            return None;
        }

        if self.try_colored(0, cost) {
            self.revert_unused_guides(initial_elvish);
            Some(self.into_plan())
        } else {
            None
        }
    }

    fn into_plan(self) -> ManaPlan {
        ManaPlan {
            used_from_hand: self.used_from_hand.into_vec(),
            imprinted: self.imprinted.into_vec(),
            searched: self.searched.into_vec(),
        }
    }

    /// Consume a card from the scratch hand, recording the use and
    /// withdrawing it from the imprintable set
    fn use_from_hand(&mut self, card: Card) -> bool {
        if !take(&mut self.hand, card) {
            return false;
        }
        take(&mut self.imprint_candidates, card);
        self.used_from_hand.push(card);
        true
    }

    /// After the cost is paid, hand back guides whose mana was never
    /// consumed so the real game does not burn them
    fn revert_unused_guides(&mut self, mut initial_elvish: usize) {
        while self.pool.amount(Color::Green) > 0
            && self.used_from_hand.contains(&Card::ElvishSpiritGuide)
        {
            if self.pool.remove(Color::Green, 1).is_err() {
                break;
            }
            take_small(&mut self.used_from_hand, Card::ElvishSpiritGuide);
            if initial_elvish > 0 {
                initial_elvish -= 1;
                self.hand.push(Card::ElvishSpiritGuide);
            } else if take_small(&mut self.searched, Card::ElvishSpiritGuide) {
                // Undo the Pact fetch entirely
                take_small(&mut self.used_from_hand, Card::SummonersPact);
                self.hand.push(Card::SummonersPact);
                self.deck.push(Card::ElvishSpiritGuide);
            }
        }
        while self.pool.amount(Color::Red) > 0
            && self.used_from_hand.contains(&Card::SimianSpiritGuide)
        {
            if self.pool.remove(Color::Red, 1).is_err() {
                break;
            }
            take_small(&mut self.used_from_hand, Card::SimianSpiritGuide);
            self.hand.push(Card::SimianSpiritGuide);
        }
        while self.any_sources > 0 && self.used_from_hand.contains(&Card::LotusPetal) {
            self.any_sources -= 1;
            take_small(&mut self.used_from_hand, Card::LotusPetal);
            self.hand.push(Card::LotusPetal);
        }
    }

    /// Resolve the colored requirement at `idx` in the search order,
    /// recursing into black and generic once all four are satisfied
    fn try_colored(&mut self, idx: usize, cost: &ManaCost) -> bool {
        if idx == COLOR_SEARCH_ORDER.len() {
            return self.try_black(cost);
        }
        let color = COLOR_SEARCH_ORDER[idx];
        let required = cost.colored(color);
        if self.pool.amount(color) >= required {
            if self.pool.remove(color, required).is_err() {
                return false;
            }
            return self.try_colored(idx + 1, cost);
        }

        let snapshot = self.clone();
        if self.any_sources > 0 {
            self.any_sources -= 1;
            self.pool.add(color, 1);
            if self.try_colored(idx, cost) {
                return true;
            }
            *self = snapshot.clone();
        }
        if self.can_cast_sorcery {
            if self.hand.contains(&Card::ChromeMox) && self.try_cast_chrome_mox(color) {
                self.pool.add(color, 1);
                if self.try_colored(idx, cost) {
                    return true;
                }
                *self = snapshot.clone();
            }
            if self.hand.contains(&Card::WildCantor) {
                for pay in [Color::Green, Color::Red] {
                    if color != pay && self.pool.amount(pay) > 0 {
                        if self.pool.remove(pay, 1).is_err() {
                            return false;
                        }
                        self.use_from_hand(Card::WildCantor);
                        self.any_sources += 1;
                        if self.try_colored(idx, cost) {
                            return true;
                        }
                        *self = snapshot.clone();
                    }
                }
            } else if color != Color::Green
                && (self.pool.amount(Color::Green) > 0 || self.pool.amount(Color::Red) > 0)
                && self.hand.contains(&Card::SummonersPact)
                && self.deck.contains(&Card::WildCantor)
                && self.try_search_cantor()
            {
                if self.try_colored(idx, cost) {
                    return true;
                }
                *self = snapshot;
            }
        }
        false
    }

    /// Black is resolved after the other colors so rituals can chain.
    /// The requirement itself stays in the pool for the generic step.
    fn try_black(&mut self, cost: &ManaCost) -> bool {
        let required = cost.colored(Color::Black);
        if self.pool.amount(Color::Black) >= required {
            return self.try_generic(cost);
        }
        let one_b = ManaCost::from_string("1B");

        let snapshot = self.clone();
        if self.hand.contains(&Card::DarkRitual) && self.pool.amount(Color::Black) > 0 {
            self.use_from_hand(Card::DarkRitual);
            // Pays B, makes BBB
            self.pool.add(Color::Black, 2);
            if self.try_black(cost) {
                return true;
            }
            *self = snapshot.clone();
        }
        if self.hand.contains(&Card::CabalRitual) && self.pool.can_pay(&one_b) {
            self.use_from_hand(Card::CabalRitual);
            if self.pool.pay(&one_b).is_err() {
                return false;
            }
            self.pool.add(Color::Black, 3);
            if self.try_black(cost) {
                return true;
            }
            *self = snapshot.clone();
        }
        if self.any_sources > 0 {
            self.any_sources -= 1;
            self.pool.add(Color::Black, 1);
            if self.try_black(cost) {
                return true;
            }
            *self = snapshot.clone();
        }
        if self.can_cast_sorcery {
            if self.hand.contains(&Card::ChromeMox) && self.try_cast_chrome_mox(Color::Black) {
                self.pool.add(Color::Black, 1);
                if self.try_black(cost) {
                    return true;
                }
                *self = snapshot.clone();
            }
            if self.hand.contains(&Card::WildCantor) {
                for pay in [Color::Green, Color::Red] {
                    if self.pool.amount(pay) > 0 {
                        if self.pool.remove(pay, 1).is_err() {
                            return false;
                        }
                        self.use_from_hand(Card::WildCantor);
                        self.any_sources += 1;
                        if self.try_black(cost) {
                            return true;
                        }
                        *self = snapshot.clone();
                    }
                }
            } else if (self.pool.amount(Color::Green) > 0 || self.pool.amount(Color::Red) > 0)
                && self.hand.contains(&Card::SummonersPact)
                && self.deck.contains(&Card::WildCantor)
                && self.try_search_cantor()
            {
                if self.try_black(cost) {
                    return true;
                }
                *self = snapshot;
            }
        }
        false
    }

    /// Cover the generic component (and pay everything still owed)
    fn try_generic(&mut self, cost: &ManaCost) -> bool {
        let required_b = cost.colored(Color::Black);
        if (required_b + cost.generic) as u32 <= self.pool.total() as u32 {
            let mut tail = ManaCost::new();
            tail.set_colored(Color::Black, required_b);
            tail.generic = cost.generic;
            return self.pool.pay(&tail).is_ok();
        }
        let one_b = ManaCost::from_string("1B");

        let snapshot = self.clone();
        if self.hand.contains(&Card::DarkRitual) && self.pool.amount(Color::Black) > 0 {
            self.use_from_hand(Card::DarkRitual);
            self.pool.add(Color::Black, 2);
            if self.try_generic(cost) {
                return true;
            }
            *self = snapshot.clone();
        }
        if self.hand.contains(&Card::CabalRitual) && self.pool.can_pay(&one_b) {
            self.use_from_hand(Card::CabalRitual);
            if self.pool.pay(&one_b).is_err() {
                return false;
            }
            self.pool.add(Color::Black, 3);
            if self.try_generic(cost) {
                return true;
            }
            *self = snapshot.clone();
        }
        if self.any_sources > 0 {
            self.any_sources -= 1;
            self.pool.add(Color::Black, 1);
            if self.try_generic(cost) {
                return true;
            }
            *self = snapshot.clone();
        }
        if self.can_cast_sorcery && self.hand.contains(&Card::ChromeMox) {
            for color in MOX_GENERIC_ORDER {
                if self.try_cast_chrome_mox(color) {
                    self.pool.add(color, 1);
                    if self.try_generic(cost) {
                        return true;
                    }
                    *self = snapshot.clone();
                }
            }
        }
        false
    }

    /// Imprint preference per color: surplus combo pieces before cards
    /// the line still wants
    fn try_cast_chrome_mox(&mut self, color: Color) -> bool {
        let options: &[Card] = match color {
            Color::White => &[Card::ChancellorOfTheAnnex],
            Color::Blue => &[Card::PactOfNegation, Card::BorneUponAWind],
            Color::Red => &[Card::ValakutAwakening, Card::WildCantor, Card::Manamorphose],
            Color::Green => &[Card::SummonersPact],
            Color::Black => &[
                Card::Duress,
                Card::Necrodominance,
                Card::BeseechTheMirror,
                Card::CabalRitual,
                Card::DarkRitual,
            ],
        };
        for &imprint in options {
            if self.try_imprint(imprint) {
                self.use_from_hand(Card::ChromeMox);
                return true;
            }
        }
        false
    }

    fn try_imprint(&mut self, card: Card) -> bool {
        if !self.imprint_candidates.contains(&card) || !self.hand.contains(&card) {
            return false;
        }
        take(&mut self.imprint_candidates, card);
        take(&mut self.hand, card);
        self.imprinted.push(card);
        true
    }

    /// Get a Wild Cantor into hand via Summoner's Pact, or trade back a
    /// Pact-fetched Elvish for it
    fn try_search_cantor(&mut self) -> bool {
        if !self.deck.contains(&Card::WildCantor) {
            return false;
        }
        if self.hand.contains(&Card::SummonersPact) {
            self.use_from_hand(Card::SummonersPact);
            take(&mut self.deck, Card::WildCantor);
            self.hand.push(Card::WildCantor);
            self.searched.push(Card::WildCantor);
            return true;
        }
        if self.searched.contains(&Card::ElvishSpiritGuide) && self.pool.amount(Color::Green) > 0
        {
            if self.pool.remove(Color::Green, 1).is_err() {
                return false;
            }
            take_small(&mut self.used_from_hand, Card::ElvishSpiritGuide);
            take_small(&mut self.searched, Card::ElvishSpiritGuide);
            self.deck.push(Card::ElvishSpiritGuide);
            take(&mut self.deck, Card::WildCantor);
            self.hand.push(Card::WildCantor);
            self.searched.push(Card::WildCantor);
            return true;
        }
        false
    }
}

fn take(zone: &mut Vec<Card>, card: Card) -> bool {
    if let Some(idx) = zone.iter().position(|&c| c == card) {
        zone.remove(idx);
        true
    } else {
        false
    }
}

fn take_small(zone: &mut CardList, card: Card) -> bool {
    if let Some(idx) = zone.iter().position(|&c| c == card) {
        zone.remove(idx);
        true
    } else {
        false
    }
}
