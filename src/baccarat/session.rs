use std::sync::Mutex;
use std::time::Instant;

use rand::Rng;
use tracing::{Level, event};

use super::monte_carlo::{BatchReport, CancelToken, MonteCarloBaccarat, SimulationResult};
use super::recommendation::{Advisory, Recommendation, recommend};
use crate::config::SimulationConfig;
use crate::core::{BaccaratError, DEFAULT_NUM_DECKS, Rank, Shoe, parse_ranks};

/// Remaining copies of one rank.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankCount {
    pub rank: Rank,
    pub name: String,
    pub remaining: u16,
}

/// Per rank breakdown of a shoe, ace first.
pub fn distribution(shoe: &Shoe) -> Vec<RankCount> {
    shoe.iter()
        .map(|(rank, remaining)| RankCount {
            rank,
            name: rank.name().to_string(),
            remaining,
        })
        .collect()
}

/// What a simulation run produced.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BaccaratReport {
    /// Which round of the current shoe this is, when run through a session.
    pub round: Option<u32>,
    /// Size of the shoe that was simulated.
    pub remaining_cards: usize,
    pub result: SimulationResult,
    /// Counts of each batch, in batch order.
    pub batches: Vec<SimulationResult>,
    pub recommendation: Recommendation,
    pub elapsed_ms: u64,
}

/// Estimate outcomes for `shoe` and derive a recommendation.
///
/// Fails with `ShoeDepleted` when the shoe is under the configured
/// minimum. Every finished batch is passed to `on_batch` as it completes.
pub fn analyze<R: Rng>(
    shoe: &Shoe,
    config: &SimulationConfig,
    rng: R,
    cancel: &CancelToken,
    on_batch: &(dyn Fn(&BatchReport) + Sync),
) -> Result<BaccaratReport, BaccaratError> {
    let start = Instant::now();
    let mut sim = MonteCarloBaccarat::from_config(shoe.clone(), rng, config)?;

    let reports = Mutex::new(Vec::new());
    let record = |report: &BatchReport| {
        if let Ok(mut reports) = reports.lock() {
            reports.push(*report);
        }
        on_batch(report);
    };

    let result = run(&mut sim, config, cancel, &record)?;

    let batches = collect_batches(reports)?;

    let mut recommendation = recommend(&result.rates());
    if shoe.len().saturating_sub(config.burn_cards) < config.low_shoe_cards {
        recommendation.advise(Advisory::NearlyDepleted);
    }
    if !result.is_complete() {
        recommendation.advise(Advisory::Incomplete);
    }

    Ok(BaccaratReport {
        round: None,
        remaining_cards: shoe.len(),
        result,
        batches,
        recommendation,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

/// Batch counts in batch order. Batches may finish out of order when run
/// in parallel.
fn collect_batches(
    reports: Mutex<Vec<BatchReport>>,
) -> Result<Vec<SimulationResult>, BaccaratError> {
    let mut reports = reports
        .into_inner()
        .map_err(|e| BaccaratError::Internal(format!("batch reports lost: {e}")))?;
    reports.sort_by_key(|r| r.batch);
    Ok(reports.into_iter().map(|r| r.result).collect())
}

#[cfg(feature = "parallel")]
fn run<R: Rng>(
    sim: &mut MonteCarloBaccarat<R>,
    config: &SimulationConfig,
    cancel: &CancelToken,
    record: &(dyn Fn(&BatchReport) + Sync),
) -> Result<SimulationResult, BaccaratError> {
    if config.parallel {
        sim.estimate_parallel(config.simulations_per_round, config.rounds, cancel, record)
    } else {
        sim.estimate_with(config.simulations_per_round, config.rounds, cancel, record)
    }
}

#[cfg(not(feature = "parallel"))]
fn run<R: Rng>(
    sim: &mut MonteCarloBaccarat<R>,
    config: &SimulationConfig,
    cancel: &CancelToken,
    record: &(dyn Fn(&BatchReport) + Sync),
) -> Result<SimulationResult, BaccaratError> {
    sim.estimate_with(config.simulations_per_round, config.rounds, cancel, record)
}

/// The state of one physical shoe as seen by one player.
///
/// Cards are appended to the ledger as they are reported and stay there
/// until the shoe is reset. The remaining shoe is always rebuilt from the
/// full shoe minus the ledger.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoeSession {
    num_decks: u8,
    ledger: Vec<Rank>,
    round_count: u32,
}

impl Default for ShoeSession {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_DECKS)
    }
}

impl ShoeSession {
    pub fn new(num_decks: u8) -> Self {
        Self {
            num_decks,
            ledger: vec![],
            round_count: 0,
        }
    }

    /// Append newly seen cards. Nothing is appended if any value is bad.
    pub fn record(&mut self, cards: &[u8]) -> Result<(), BaccaratError> {
        let ranks = parse_ranks(cards)?;
        self.ledger.extend(ranks);
        Ok(())
    }

    /// Record the cards of one finished round and advance the round
    /// counter. Returns the number of the round about to be played.
    pub fn deal(&mut self, cards: &[u8]) -> Result<u32, BaccaratError> {
        self.record(cards)?;
        self.round_count += 1;
        Ok(self.round_count)
    }

    /// Start a new shoe.
    pub fn reset(&mut self) {
        self.ledger.clear();
        self.round_count = 0;
    }

    pub fn used_cards(&self) -> &[Rank] {
        &self.ledger
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn num_decks(&self) -> u8 {
        self.num_decks
    }

    pub fn remaining_shoe(&self) -> Shoe {
        Shoe::new(self.num_decks).remove_ranks(&self.ledger)
    }

    /// Record the cards dealt in the last round and simulate the next one.
    ///
    /// Bad card values are rejected before anything changes. Otherwise the
    /// cards are kept and the round counter advances even if the remaining
    /// shoe turns out to be too small to simulate, since those cards really
    /// were dealt.
    pub fn simulate_next<R: Rng>(
        &mut self,
        cards: &[u8],
        config: &SimulationConfig,
        rng: R,
        cancel: &CancelToken,
        on_batch: &(dyn Fn(&BatchReport) + Sync),
    ) -> Result<BaccaratReport, BaccaratError> {
        self.deal(cards)?;
        let shoe = self.remaining_shoe();
        event!(
            Level::DEBUG,
            round = self.round_count,
            used = self.ledger.len(),
            remaining = shoe.len(),
            "Simulating next round"
        );
        let mut report = analyze(&shoe, config, rng, cancel, on_batch)?;
        report.round = Some(self.round_count);
        Ok(report)
    }
}
