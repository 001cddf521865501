//! necrosim - goldfish simulator for the Necrodominance storm deck

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use mtg_necro_sim::core::Card;
use mtg_necro_sim::deck::DeckList;
use mtg_necro_sim::game::{PactStrategy, Verbosity};
use mtg_necro_sim::sim::{
    run_batch, run_trial, run_with_initial_hand, DisruptionModel, SimConfig, DEFAULT_DRAW_COUNT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "necrosim",
    about = "Monte-Carlo goldfish simulator for the Necrodominance storm deck",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PactStrategyArg {
    /// Never cast Summoner's Pact just for storm
    Never,
    /// Always dump Pacts into remaining deck targets
    Always,
    /// Dump once the deck holds no more targets than Pacts in hand
    Auto,
}

impl From<PactStrategyArg> for PactStrategy {
    fn from(arg: PactStrategyArg) -> Self {
        match arg {
            PactStrategyArg::Never => PactStrategy::NeverCast,
            PactStrategyArg::Always => PactStrategy::AlwaysCast,
            PactStrategyArg::Auto => PactStrategy::Auto,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single trial with verbose output
    Run {
        /// Deck list file (one "4 Dark Ritual" entry per line)
        deck: PathBuf,

        /// Fixed opening hand as comma-separated card names
        #[arg(long)]
        hand: Option<String>,

        /// Cards bottomed from the fixed hand (counts as mulligans)
        #[arg(long)]
        bottom: Option<String>,

        /// Cards drawn in the end step
        #[arg(long, default_value_t = DEFAULT_DRAW_COUNT)]
        draw_count: u8,

        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value_t = PactStrategyArg::Auto)]
        pact_strategy: PactStrategyArg,

        /// Opponent holds exactly this many counterspells
        #[arg(long)]
        disruption: Option<u8>,
    },
    /// Run a batch of trials and report statistics
    Sim {
        /// Deck list file (one "4 Dark Ritual" entry per line)
        deck: PathBuf,

        /// Number of trials
        #[arg(long, short = 'n', default_value_t = 10_000)]
        iterations: u64,

        /// Cards drawn in the end step
        #[arg(long, default_value_t = DEFAULT_DRAW_COUNT)]
        draw_count: u8,

        /// Master RNG seed for the batch (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value_t = PactStrategyArg::Auto)]
        pact_strategy: PactStrategyArg,

        /// Opponent holds exactly this many counterspells
        #[arg(long)]
        disruption: Option<u8>,

        /// Keep the first seven cards instead of mulliganing for
        /// Necrodominance
        #[arg(long)]
        no_mulligan: bool,

        /// Emit statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_cards(list: &str) -> anyhow::Result<Vec<Card>> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Card::from_name(name).ok_or_else(|| anyhow!("unknown card: {name}")))
        .collect()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            deck,
            hand,
            bottom,
            draw_count,
            seed,
            pact_strategy,
            disruption,
        } => {
            let cards = DeckList::load_from_file(&deck)
                .with_context(|| format!("loading deck {}", deck.display()))?
                .expand()?;
            let config = SimConfig {
                draw_count,
                pact_strategy: pact_strategy.into(),
                disruption: disruption.map(DisruptionModel::fixed),
                mulligan_until_necro: true,
                verbosity: Verbosity::Verbose,
            };
            let seed = seed.unwrap_or_else(rand::random);
            println!("Seed: {seed}");
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let result = match hand {
                Some(hand) => {
                    let hand = parse_cards(&hand)?;
                    let bottoms = bottom.as_deref().map(parse_cards).transpose()?.unwrap_or_default();
                    run_with_initial_hand(&cards, &hand, &bottoms, &config, &mut rng)?
                }
                None => run_trial(&cards, &config, &mut rng)?,
            };

            println!();
            if result.won {
                println!(
                    "WIN after {} mulligan(s): lethal Tendrils of Agony",
                    result.mulligan_count
                );
            } else {
                let reason = result
                    .loss_reason
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!("LOSS after {} mulligan(s): {reason}", result.mulligan_count);
            }
        }
        Commands::Sim {
            deck,
            iterations,
            draw_count,
            seed,
            pact_strategy,
            disruption,
            no_mulligan,
            json,
        } => {
            let cards = DeckList::load_from_file(&deck)
                .with_context(|| format!("loading deck {}", deck.display()))?
                .expand()?;
            let config = SimConfig {
                draw_count,
                pact_strategy: pact_strategy.into(),
                disruption: disruption.map(DisruptionModel::fixed),
                mulligan_until_necro: !no_mulligan,
                verbosity: Verbosity::Silent,
            };
            let seed = seed.unwrap_or_else(rand::random);
            let stats = run_batch(&cards, &config, iterations, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Deck: {} ({iterations} trials, seed {seed})\n", deck.display());
                stats.print_summary();
            }
        }
    }
    Ok(())
}
