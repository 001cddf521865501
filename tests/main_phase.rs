//! Scenario tests for the first main phase.
//!
//! Each test stages an opening hand and checks whether the sequencer
//! lands Necrodominance, plus the state the phase leaves behind: the
//! pool must be empty, and only floating blue survives as a source for
//! the end step.

use mtg_necro_sim::core::{Card, Color};
use mtg_necro_sim::game::GameState;

fn staged(hand: &[Card], deck: &[Card]) -> GameState {
    let mut game = GameState::new();
    game.hand = hand.to_vec();
    game.deck = deck.to_vec();
    game
}

#[test]
fn vault_dark_necro_at_fourth_mulligan() {
    let mut game = staged(
        &[Card::VaultOfWhispers, Card::DarkRitual, Card::Necrodominance],
        &[],
    );
    game.mulligan_count = 4;

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
    assert!(game.battlefield.contains(&Card::Necrodominance));
}

#[test]
fn fifth_mulligan_is_past_the_limit() {
    let mut game = staged(
        &[Card::VaultOfWhispers, Card::DarkRitual, Card::Necrodominance],
        &[],
    );
    game.mulligan_count = 5;

    assert!(!game.main_phase().unwrap());
}

#[test]
fn vault_dark_cabal_beseech() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::VaultOfWhispers,
            Card::DarkRitual,
            Card::CabalRitual,
            Card::BeseechTheMirror,
        ],
        &[Card::Necrodominance],
    );

    // The Vault branch works: it pays for Beseech and gets sacrificed
    // to the bargain
    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn gemstone_dark_cabal_beseech_has_no_bargain() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::CabalRitual,
            Card::BeseechTheMirror,
        ],
        &[Card::Necrodominance],
    );

    assert!(!game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn seven_mana_beseech_pays_the_bargain_in_mana() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::DarkRitual,
            Card::CabalRitual,
            Card::BeseechTheMirror,
            Card::SummonersPact,
        ],
        &[Card::ElvishSpiritGuide, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn petals_pay_beseech_and_a_spare_mox_is_bargained() {
    let mut game = staged(
        &[
            Card::LotusPetal,
            Card::LotusPetal,
            Card::LotusPetal,
            Card::ChromeMox,
            Card::SummonersPact,
            Card::BeseechTheMirror,
        ],
        &[Card::ElvishSpiritGuide, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn vault_pact_cabal_necro() {
    let mut game = staged(
        &[
            Card::VaultOfWhispers,
            Card::SummonersPact,
            Card::CabalRitual,
            Card::Necrodominance,
        ],
        &[Card::ElvishSpiritGuide],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn double_pact_fetches_elvish_then_cantor() {
    let mut game = staged(
        &[
            Card::SummonersPact,
            Card::SummonersPact,
            Card::DarkRitual,
            Card::Necrodominance,
        ],
        &[Card::ElvishSpiritGuide, Card::WildCantor],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn manamorphose_fixes_into_cabal_necro() {
    let mut game = staged(
        &[
            Card::SummonersPact,
            Card::SummonersPact,
            Card::Manamorphose,
            Card::CabalRitual,
            Card::Necrodominance,
        ],
        &[Card::Duress, Card::ElvishSpiritGuide, Card::ElvishSpiritGuide],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn manamorphose_line_fails_with_one_deck_elvish() {
    let mut game = staged(
        &[
            Card::SummonersPact,
            Card::SummonersPact,
            Card::Manamorphose,
            Card::CabalRitual,
            Card::Necrodominance,
        ],
        &[Card::Duress, Card::ElvishSpiritGuide, Card::WildCantor],
    );

    assert!(!game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn no_necro_or_beseech_fails_immediately() {
    let mut game = staged(
        &[
            Card::ElvishSpiritGuide,
            Card::SimianSpiritGuide,
            Card::Manamorphose,
            Card::DarkRitual,
            Card::DarkRitual,
            Card::CabalRitual,
        ],
        &[Card::Duress],
    );

    assert!(!game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn beseech_short_on_mana_fails() {
    let mut game = staged(
        &[
            Card::ElvishSpiritGuide,
            Card::VaultOfWhispers,
            Card::CabalRitual,
            Card::BeseechTheMirror,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(!game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn beseech_with_mana_but_no_bargain_fails() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::ElvishSpiritGuide,
            Card::ElvishSpiritGuide,
            Card::CabalRitual,
            Card::BeseechTheMirror,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(!game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn spare_mox_is_dropped_without_imprint_for_the_bargain() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::CabalRitual,
            Card::BeseechTheMirror,
            Card::ChromeMox,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn spare_petal_is_cast_for_the_bargain() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::CabalRitual,
            Card::BeseechTheMirror,
            Card::LotusPetal,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn mox_imprints_manamorphose_to_cover_the_generic() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::ChromeMox,
            Card::Manamorphose,
            Card::BeseechTheMirror,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn mox_imprints_valakut_to_cover_the_generic() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::ChromeMox,
            Card::ValakutAwakening,
            Card::BeseechTheMirror,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn mox_imprints_wind_to_cover_the_generic() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::ChromeMox,
            Card::BorneUponAWind,
            Card::BeseechTheMirror,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.total(), 0);
}

#[test]
fn floating_blue_is_reserved_for_the_end_step() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::ChromeMox,
            Card::BorneUponAWind,
            Card::BeseechTheMirror,
            Card::Necrodominance,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    // UBBB line: the Mox imprints the spare Beseech for black while the
    // Gemstone's blue floats through to the end step
    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.colored(Color::Blue), 1);
}

#[test]
fn last_wind_is_held_so_no_blue_floats() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::ChromeMox,
            Card::BorneUponAWind,
            Card::Necrodominance,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.colored(Color::Blue), 0);
    assert_eq!(game.count_in_hand(Card::BorneUponAWind), 1);
}

#[test]
fn second_wind_is_imprinted_for_blue() {
    let mut game = staged(
        &[
            Card::GemstoneMine,
            Card::DarkRitual,
            Card::ChromeMox,
            Card::BorneUponAWind,
            Card::BorneUponAWind,
            Card::Necrodominance,
        ],
        &[Card::Duress, Card::Necrodominance],
    );

    assert!(game.main_phase().unwrap());
    assert_eq!(game.mana_pool.total(), 0);
    assert_eq!(game.mana_sources.colored(Color::Blue), 1);
}

#[test]
fn mulligan_debts_bottom_the_duresses() {
    let mut game = staged(
        &[
            Card::VaultOfWhispers,
            Card::DarkRitual,
            Card::Necrodominance,
            Card::Duress,
            Card::Duress,
            Card::ElvishSpiritGuide,
            Card::SimianSpiritGuide,
        ],
        &[],
    );
    game.mulligan_count = 2;

    assert!(game.main_phase().unwrap());
    assert_eq!(game.deck, vec![Card::Duress, Card::Duress]);
    assert_eq!(game.count_in_hand(Card::Duress), 0);
    assert_eq!(game.mana_sources.total(), 0);
}
