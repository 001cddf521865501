//! Scenario tests for the end step, from the big Necrodominance draw
//! through the storm kill.
//!
//! Each test stages the state a main phase leaves behind (Necrodominance
//! resolved, a stacked deck) and plays the end step with a fixed draw
//! count, checking the outcome and the recorded loss reason.

use mtg_necro_sim::core::Card;
use mtg_necro_sim::game::{GameState, LossReason, PactStrategy};

/// State after a main phase that resolved Necrodominance from hand
fn after_necro(deck: &[Card]) -> GameState {
    let mut game = GameState::new();
    game.deck = deck.to_vec();
    game.battlefield = vec![Card::Necrodominance];
    game.bargain = vec![Card::Necrodominance];
    game.did_cast_necro = true;
    game.storm_count = 1;
    game
}

#[test]
fn ritual_chain_into_lethal_tendrils() {
    let mut game = after_necro(&[
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::Manamorphose,
        Card::BorneUponAWind,
        Card::DarkRitual,
        Card::DarkRitual,
        Card::CabalRitual,
        Card::LotusPetal,
        Card::LotusPetal,
        Card::LotusPetal,
        Card::TendrilsOfAgony,
        Card::Duress,
        Card::Duress,
    ]);

    assert!(game.end_step(11).unwrap());
    assert!(game.did_cast_wind);
    assert!(game.did_cast_tendrils);
    assert_eq!(game.storm_count, 10);
    assert_eq!(game.loss_reason, None);
}

#[test]
fn beseech_kill_needs_one_less_storm() {
    let mut game = after_necro(&[
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::Manamorphose,
        Card::BorneUponAWind,
        Card::DarkRitual,
        Card::DarkRitual,
        Card::CabalRitual,
        Card::LotusPetal,
        Card::LotusPetal,
        Card::LotusPetal,
        Card::BeseechTheMirror,
        Card::Duress,
        Card::Duress,
        Card::Duress,
        Card::TendrilsOfAgony,
    ]);

    assert!(game.end_step(11).unwrap());
    assert!(game.did_cast_tendrils);
    // Necrodominance is sacrificed to Beseech's bargain
    assert!(game.graveyard.contains(&Card::Necrodominance));
    assert_eq!(game.storm_count, 11);
}

#[test]
fn valakut_digs_into_the_kill_after_wind() {
    let mut game = after_necro(&[
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::Manamorphose,
        Card::ValakutAwakening,
        Card::DarkRitual,
        Card::DarkRitual,
        Card::DarkRitual,
        Card::CabalRitual,
        Card::LotusPetal,
        Card::LotusPetal,
        Card::SimianSpiritGuide,
        Card::BorneUponAWind,
        Card::Duress,
        Card::TendrilsOfAgony,
        Card::LotusPetal,
        Card::Duress,
        Card::Duress,
        Card::Duress,
    ]);
    // Extra storm carried over from the main phase
    game.storm_count = 2;

    assert!(game.end_step(11).unwrap());
    assert!(game.did_cast_valakut);
    assert!(game.did_cast_tendrils);
    assert_eq!(game.storm_count, 10);
}

#[test]
fn no_spirit_guides_is_an_immediate_loss() {
    let mut game = after_necro(&[
        Card::BorneUponAWind,
        Card::DarkRitual,
        Card::CabalRitual,
        Card::TendrilsOfAgony,
        Card::Duress,
    ]);

    assert!(!game.end_step(5).unwrap());
    assert_eq!(
        game.loss_reason,
        Some(LossReason::FailedWindAndValakut {
            wind_in_hand: true,
            valakut_in_hand: false,
        })
    );
}

#[test]
fn wind_without_a_kill_spell_fizzles() {
    let mut game = after_necro(&[
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::Manamorphose,
        Card::BorneUponAWind,
        Card::Duress,
        Card::Duress,
        Card::Duress,
    ]);

    assert!(!game.end_step(4).unwrap());
    assert!(game.did_cast_wind);
    assert_eq!(
        game.loss_reason,
        Some(LossReason::FailedTendrilsAfterWind {
            valakut_in_hand: false,
        })
    );
}

#[test]
fn valakut_that_whiffs_on_wind_is_recorded() {
    let mut game = after_necro(&[
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::SimianSpiritGuide,
        Card::ValakutAwakening,
        Card::Duress,
        Card::Duress,
        Card::Duress,
        Card::Duress,
        Card::Duress,
        Card::Duress,
    ]);

    assert!(!game.end_step(4).unwrap());
    assert!(game.did_cast_valakut);
    assert!(!game.did_cast_wind);
    assert_eq!(game.loss_reason, Some(LossReason::FailedWindAfterValakut));
}

#[test]
fn auto_strategy_dumps_pacts_into_spare_targets() {
    let deck = [
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::Manamorphose,
        Card::SummonersPact,
        Card::ElvishSpiritGuide,
        Card::Duress,
        Card::Duress,
    ];

    let mut game = after_necro(&deck);
    game.pact_strategy = PactStrategy::Auto;
    assert!(!game.end_step(4).unwrap());
    // The Pact fetched the last deck Elvish purely for storm
    assert!(game.graveyard.contains(&Card::SummonersPact));
    assert_eq!(game.storm_count, 3);

    // With an Elvish still in the deck the mana search would fetch it
    // to pay Manamorphose, so the hold-the-Pact leg is staged on
    // Cantors, which only a shortfall branch can fetch
    let deck = [
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::Manamorphose,
        Card::SummonersPact,
        Card::WildCantor,
        Card::WildCantor,
        Card::WildCantor,
    ];
    let mut game = after_necro(&deck);
    game.pact_strategy = PactStrategy::NeverCast;
    assert!(!game.end_step(4).unwrap());
    assert!(game.hand.contains(&Card::SummonersPact));
    assert_eq!(game.storm_count, 2);
}

#[test]
fn always_strategy_dumps_pacts_past_spare_targets() {
    // Three fetchable Cantors outnumber the single Pact
    let deck = [
        Card::ElvishSpiritGuide,
        Card::SimianSpiritGuide,
        Card::Manamorphose,
        Card::SummonersPact,
        Card::WildCantor,
        Card::WildCantor,
        Card::WildCantor,
    ];

    let mut game = after_necro(&deck);
    game.pact_strategy = PactStrategy::AlwaysCast;
    assert!(!game.end_step(4).unwrap());
    assert!(game.graveyard.contains(&Card::SummonersPact));
    assert!(game.hand.contains(&Card::WildCantor));
    assert_eq!(game.storm_count, 3);

    // Auto holds the Pact while the deck offers more targets than
    // Pacts in hand
    let mut game = after_necro(&deck);
    game.pact_strategy = PactStrategy::Auto;
    assert!(!game.end_step(4).unwrap());
    assert!(game.hand.contains(&Card::SummonersPact));
    assert_eq!(game.storm_count, 2);
}
