//! Trial runners and Monte-Carlo batch statistics

use crate::core::Card;
use crate::error::{Result, SimError};
use crate::game::state::remove_card;
use crate::game::{GameState, LossReason, PactStrategy, Verbosity, MAX_MULLIGANS};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Necrodominance draws to a 19-card hand at the end of the turn
pub const DEFAULT_DRAW_COUNT: u8 = 19;

/// Per-trial seeds are spread across the batch with this odd constant
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// How many counterspells the opponent holds, as a weighted
/// distribution sampled once per trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionModel {
    weights: Vec<(u8, u32)>,
}

impl DisruptionModel {
    pub fn new(weights: Vec<(u8, u32)>) -> Result<Self> {
        if weights.is_empty() || weights.iter().all(|&(_, w)| w == 0) {
            return Err(SimError::InvalidAction(
                "disruption model needs at least one weighted outcome".to_string(),
            ));
        }
        Ok(DisruptionModel { weights })
    }

    /// Always exactly `count` counterspells
    pub fn fixed(count: u8) -> Self {
        DisruptionModel {
            weights: vec![(count, 1)],
        }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u8 {
        let total: u64 = self.weights.iter().map(|&(_, w)| w as u64).sum();
        let mut roll = rng.gen_range(0..total);
        for &(count, weight) in &self.weights {
            let weight = weight as u64;
            if roll < weight {
                return count;
            }
            roll -= weight;
        }
        self.weights[self.weights.len() - 1].0
    }
}

/// Knobs for a batch of trials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub draw_count: u8,
    pub pact_strategy: PactStrategy,
    pub disruption: Option<DisruptionModel>,
    /// Keep mulliganing (up to the limit) until a hand casts
    /// Necrodominance
    pub mulligan_until_necro: bool,
    pub verbosity: Verbosity,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            draw_count: DEFAULT_DRAW_COUNT,
            pact_strategy: PactStrategy::default(),
            disruption: None,
            mulligan_until_necro: true,
            verbosity: Verbosity::Silent,
        }
    }
}

/// Outcome of a single goldfish trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResult {
    pub won: bool,
    pub cast_necro: bool,
    pub necro_resolved: bool,
    pub mulligan_count: u8,
    pub loss_reason: Option<LossReason>,
}

fn new_game(config: &SimConfig) -> GameState {
    let mut game = GameState::new();
    game.pact_strategy = config.pact_strategy;
    game.opponent_disruption = config.disruption.is_some();
    game.verbosity = config.verbosity;
    game
}

fn failed_necro(mulligan_count: u8) -> TrialResult {
    TrialResult {
        won: false,
        cast_necro: false,
        necro_resolved: false,
        mulligan_count,
        loss_reason: Some(LossReason::FailedNecro),
    }
}

/// Play the turn out after a successful main phase
fn finish(mut game: GameState, config: &SimConfig, counterspells: Option<u8>) -> Result<TrialResult> {
    if let Some(count) = counterspells {
        if count > 0 && !game.resolve_disruption(count)? {
            return Ok(TrialResult {
                won: false,
                cast_necro: true,
                necro_resolved: false,
                mulligan_count: game.mulligan_count,
                loss_reason: Some(LossReason::NecroCountered),
            });
        }
    }
    let won = game.end_step(config.draw_count)?;
    Ok(TrialResult {
        won,
        cast_necro: true,
        necro_resolved: true,
        mulligan_count: game.mulligan_count,
        loss_reason: if won { None } else { game.loss_reason },
    })
}

/// Run one trial with a fixed opening hand. `bottoms` are treated as
/// cards already owed to the bottom from mulligans.
pub fn run_with_initial_hand(
    deck: &[Card],
    initial_hand: &[Card],
    bottoms: &[Card],
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Result<TrialResult> {
    if deck.len() != 60 {
        return Err(SimError::InvalidDeckSize(deck.len()));
    }
    let mut game = new_game(config);
    game.deck = deck.to_vec();
    for &card in initial_hand {
        remove_card(&mut game.deck, card, "deck")?;
    }
    game.deck.shuffle(rng);
    game.hand = initial_hand.to_vec();
    for &card in bottoms {
        remove_card(&mut game.hand, card, "hand")?;
        game.deck.push(card);
    }
    game.mulligan_count = bottoms.len() as u8;

    let counterspells = config.disruption.as_ref().map(|d| d.sample(rng));
    if !game.main_phase()? {
        return Ok(failed_necro(game.mulligan_count));
    }
    finish(game, config, counterspells)
}

/// Run one trial from a shuffled deck, mulliganing per the config
pub fn run_trial(deck: &[Card], config: &SimConfig, rng: &mut impl Rng) -> Result<TrialResult> {
    if deck.len() != 60 {
        return Err(SimError::InvalidDeckSize(deck.len()));
    }
    let counterspells = config.disruption.as_ref().map(|d| d.sample(rng));
    let max_mulligans = if config.mulligan_until_necro {
        MAX_MULLIGANS
    } else {
        0
    };
    for mulligan in 0..=max_mulligans {
        let mut game = new_game(config);
        game.mulligan_count = mulligan;
        game.deck = deck.to_vec();
        game.deck.shuffle(rng);
        game.draw_cards(7);
        if game.main_phase()? {
            return finish(game, config, counterspells);
        }
    }
    Ok(failed_necro(max_mulligans))
}

/// Aggregated results of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub total_games: u64,
    pub total_wins: u64,
    /// Trials that resolved Necrodominance but lost the end step
    pub total_losses: u64,
    /// Trials that never cast Necrodominance
    pub failed_necro: u64,
    pub cast_necro: u64,
    pub necro_resolved: u64,
    pub necro_countered: u64,
    pub wins_by_mulligan: [u64; 5],
    pub losses_by_mulligan: [u64; 5],
    pub cast_necro_by_mulligan: [u64; 5],
    pub loss_reasons: FxHashMap<String, u64>,
}

impl SimStats {
    pub fn record(&mut self, result: &TrialResult) {
        self.total_games += 1;
        let mull = (result.mulligan_count as usize).min(4);
        if result.cast_necro {
            self.cast_necro += 1;
            self.cast_necro_by_mulligan[mull] += 1;
        } else {
            self.failed_necro += 1;
        }
        if result.necro_resolved {
            self.necro_resolved += 1;
        } else if result.cast_necro {
            self.necro_countered += 1;
        }
        if result.won {
            self.total_wins += 1;
            self.wins_by_mulligan[mull] += 1;
        } else {
            if result.cast_necro {
                self.total_losses += 1;
                self.losses_by_mulligan[mull] += 1;
            }
            if let Some(reason) = result.loss_reason {
                *self.loss_reasons.entry(reason.to_string()).or_insert(0) += 1;
            }
        }
    }

    pub fn win_rate(&self) -> f64 {
        ratio(self.total_wins, self.total_games)
    }

    pub fn cast_necro_rate(&self) -> f64 {
        ratio(self.cast_necro, self.total_games)
    }

    pub fn necro_resolve_rate(&self) -> f64 {
        ratio(self.necro_resolved, self.cast_necro)
    }

    pub fn win_after_necro_resolve_rate(&self) -> f64 {
        ratio(self.total_wins, self.necro_resolved)
    }

    /// Win rate among trials that cast Necrodominance after exactly
    /// `mulligan` mulligans
    pub fn win_rate_by_mulligan(&self, mulligan: usize) -> f64 {
        ratio(
            self.wins_by_mulligan[mulligan],
            self.cast_necro_by_mulligan[mulligan],
        )
    }

    pub fn print_summary(&self) {
        println!("Games:               {}", self.total_games);
        println!(
            "Wins:                {} ({:.1}%)",
            self.total_wins,
            100.0 * self.win_rate()
        );
        println!(
            "Cast Necrodominance: {} ({:.1}%)",
            self.cast_necro,
            100.0 * self.cast_necro_rate()
        );
        if self.necro_countered > 0 {
            println!(
                "Necro resolved:      {} ({:.1}% of casts)",
                self.necro_resolved,
                100.0 * self.necro_resolve_rate()
            );
        }
        println!(
            "Win after resolve:   {:.1}%",
            100.0 * self.win_after_necro_resolve_rate()
        );
        println!("Never cast Necro:    {}", self.failed_necro);
        println!("\nBy mulligans taken (wins/casts):");
        for mull in 0..=4 {
            if self.cast_necro_by_mulligan[mull] == 0 {
                continue;
            }
            println!(
                "  mull {}: {}/{} ({:.1}%)",
                mull,
                self.wins_by_mulligan[mull],
                self.cast_necro_by_mulligan[mull],
                100.0 * self.win_rate_by_mulligan(mull)
            );
        }
        if !self.loss_reasons.is_empty() {
            println!("\nLoss reasons:");
            let mut reasons: Vec<_> = self.loss_reasons.iter().collect();
            reasons.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            for (reason, count) in reasons {
                println!("  {count:>8}  {reason}");
            }
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Run `iterations` trials in parallel. Each trial gets its own
/// deterministic RNG derived from the master seed, so a batch is
/// reproducible regardless of thread scheduling.
pub fn run_batch(
    deck: &[Card],
    config: &SimConfig,
    iterations: u64,
    seed: u64,
) -> Result<SimStats> {
    if deck.len() != 60 {
        return Err(SimError::InvalidDeckSize(deck.len()));
    }
    let stats = Arc::new(Mutex::new(SimStats::default()));
    let failure: Arc<Mutex<Option<SimError>>> = Arc::new(Mutex::new(None));

    (0..iterations).into_par_iter().for_each(|idx| {
        if failure.lock().unwrap().is_some() {
            return;
        }
        let trial_seed = seed.wrapping_add(idx.wrapping_mul(SEED_STRIDE));
        let mut rng = ChaCha8Rng::seed_from_u64(trial_seed);
        match run_trial(deck, config, &mut rng) {
            Ok(result) => stats.lock().unwrap().record(&result),
            Err(err) => {
                *failure.lock().unwrap() = Some(err);
            }
        }
    });

    if let Some(err) = failure.lock().unwrap().take() {
        return Err(err);
    }
    let stats = stats.lock().unwrap().clone();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_disruption_model() {
        let model = DisruptionModel::fixed(2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(model.sample(&mut rng), 2);
        }
    }

    #[test]
    fn test_weighted_disruption_model_hits_all_outcomes() {
        let model = DisruptionModel::new(vec![(0, 1), (1, 1)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let samples: Vec<u8> = (0..100).map(|_| model.sample(&mut rng)).collect();
        assert!(samples.contains(&0));
        assert!(samples.contains(&1));
    }

    #[test]
    fn test_empty_disruption_model_rejected() {
        assert!(DisruptionModel::new(vec![]).is_err());
        assert!(DisruptionModel::new(vec![(1, 0)]).is_err());
    }

    #[test]
    fn test_stats_record() {
        let mut stats = SimStats::default();
        stats.record(&TrialResult {
            won: true,
            cast_necro: true,
            necro_resolved: true,
            mulligan_count: 1,
            loss_reason: None,
        });
        stats.record(&failed_necro(4));
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.total_wins, 1);
        assert_eq!(stats.failed_necro, 1);
        assert_eq!(stats.wins_by_mulligan[1], 1);
        assert_eq!(stats.loss_reasons.len(), 1);
    }
}
