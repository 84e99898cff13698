use std::ops::{Add, AddAssign};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::{Level, debug_span, event};

use super::round::{RoundOutcome, RoundResult, ShoeDealer, play_round};
use crate::config::SimulationConfig;
use crate::core::{BaccaratError, MAX_CARDS_PER_ROUND, Shoe};

/// How many rounds are simulated between checks of the cancel token.
const CANCEL_CHECK_INTERVAL: usize = 1_024;

/// Shared flag that lets a caller abandon a running estimate.
///
/// Clones share the same flag. An optional deadline cancels the run once
/// it has passed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that cancels itself `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Outcome counts over a number of simulated rounds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SimulationResult {
    pub player_wins: u64,
    pub banker_wins: u64,
    pub ties: u64,
    /// Times the working shoe ran low and was replaced by a fresh copy.
    pub refreshes: u64,
    /// Rounds that were asked for. Equal to `total()` unless cancelled.
    pub requested: u64,
}

impl SimulationResult {
    pub fn total(&self) -> u64 {
        self.player_wins + self.banker_wins + self.ties
    }

    /// Did every requested round run?
    pub fn is_complete(&self) -> bool {
        self.total() == self.requested
    }

    pub fn record(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::PlayerWin => self.player_wins += 1,
            RoundOutcome::BankerWin => self.banker_wins += 1,
            RoundOutcome::Tie => self.ties += 1,
        }
    }

    pub fn rates(&self) -> WinRates {
        WinRates::from(self)
    }
}

impl AddAssign for SimulationResult {
    fn add_assign(&mut self, rhs: Self) {
        self.player_wins += rhs.player_wins;
        self.banker_wins += rhs.banker_wins;
        self.ties += rhs.ties;
        self.refreshes += rhs.refreshes;
        self.requested += rhs.requested;
    }
}

impl Add for SimulationResult {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

/// Outcome frequencies. They sum to one whenever at least one round ran.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WinRates {
    pub player: f64,
    pub banker: f64,
    pub tie: f64,
}

impl From<&SimulationResult> for WinRates {
    fn from(result: &SimulationResult) -> Self {
        let total = result.total();
        if total == 0 {
            return WinRates::default();
        }
        let total = total as f64;
        WinRates {
            player: result.player_wins as f64 / total,
            banker: result.banker_wins as f64 / total,
            tie: result.ties as f64 / total,
        }
    }
}

/// Sent to the progress callback after every batch.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Zero based batch index.
    pub batch: usize,
    pub num_batches: usize,
    pub result: SimulationResult,
}

/// Monte carlo estimator of round outcomes for a partially dealt shoe.
///
/// Every batch starts from its own copy of the base shoe and plays rounds
/// off it until the copy runs low, at which point the copy is replaced by
/// a fresh one. The base shoe itself is never modified.
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use rs_baccarat::baccarat::MonteCarloBaccarat;
/// use rs_baccarat::core::Shoe;
///
/// let rng = StdRng::seed_from_u64(420);
/// let mut sim = MonteCarloBaccarat::new_with_rng(Shoe::default(), rng).unwrap();
/// let result = sim.estimate(1_000, 3).unwrap();
/// assert_eq!(3_000, result.total());
/// ```
#[derive(Debug)]
pub struct MonteCarloBaccarat<R: Rng> {
    base: Shoe,
    rng: R,
    min_cards: usize,
    burn_cards: usize,
}

impl MonteCarloBaccarat<ThreadRng> {
    pub fn new(base: Shoe) -> Result<Self, BaccaratError> {
        Self::new_with_rng(base, rand::rng())
    }
}

impl<R: Rng> MonteCarloBaccarat<R> {
    pub fn new_with_rng(base: Shoe, rng: R) -> Result<Self, BaccaratError> {
        Self::new_with_limits(base, rng, MAX_CARDS_PER_ROUND, 0)
    }

    /// Build using the depletion threshold and burn from `config`.
    pub fn from_config(base: Shoe, rng: R, config: &SimulationConfig) -> Result<Self, BaccaratError> {
        config.validate()?;
        Self::new_with_limits(base, rng, config.min_cards, config.burn_cards)
    }

    /// Fails with `ShoeDepleted` if a fresh copy of `base` would already be
    /// under `min_cards` after the burn.
    pub fn new_with_limits(
        base: Shoe,
        rng: R,
        min_cards: usize,
        burn_cards: usize,
    ) -> Result<Self, BaccaratError> {
        let playable = base.len().saturating_sub(burn_cards);
        if playable < min_cards.max(1) {
            return Err(BaccaratError::ShoeDepleted {
                remaining: playable,
                required: min_cards,
            });
        }
        Ok(Self {
            base,
            rng,
            min_cards,
            burn_cards,
        })
    }

    pub fn base_shoe(&self) -> &Shoe {
        &self.base
    }

    fn fresh_copy(&mut self) -> Result<Shoe, BaccaratError> {
        let mut shoe = self.base.clone();
        shoe.burn(self.burn_cards, &mut self.rng)
            .map_err(|_| BaccaratError::ShoeDepleted {
                remaining: self.base.len(),
                required: self.burn_cards + self.min_cards,
            })?;
        Ok(shoe)
    }

    /// Play one round off `working`, refreshing it first if it is too small.
    ///
    /// A round that runs dry part way through is replayed in full on a
    /// fresh copy, so no trial is ever cut short.
    pub fn simulate(
        &mut self,
        working: &mut Shoe,
        tally: &mut SimulationResult,
    ) -> Result<RoundResult, BaccaratError> {
        if working.len() < self.min_cards {
            *working = self.fresh_copy()?;
            tally.refreshes += 1;
        }
        let first = play_round(&mut ShoeDealer::new(working, &mut self.rng));
        match first {
            Err(BaccaratError::EmptyShoe) => {
                *working = self.fresh_copy()?;
                tally.refreshes += 1;
                let remaining = working.len();
                play_round(&mut ShoeDealer::new(working, &mut self.rng)).map_err(|_| {
                    BaccaratError::ShoeDepleted {
                        remaining,
                        required: MAX_CARDS_PER_ROUND,
                    }
                })
            }
            other => other,
        }
    }

    /// Run a single batch on a fresh working copy.
    pub fn run_batch(
        &mut self,
        simulations: usize,
        cancel: &CancelToken,
    ) -> Result<SimulationResult, BaccaratError> {
        let mut working = self.fresh_copy()?;
        let mut tally = SimulationResult {
            requested: simulations as u64,
            ..Default::default()
        };
        for i in 0..simulations {
            if i % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                break;
            }
            let round = self.simulate(&mut working, &mut tally)?;
            tally.record(round.outcome);
        }
        Ok(tally)
    }

    /// Simulate `num_batches` batches of `simulations_per_batch` rounds.
    pub fn estimate(
        &mut self,
        simulations_per_batch: usize,
        num_batches: usize,
    ) -> Result<SimulationResult, BaccaratError> {
        self.estimate_with(simulations_per_batch, num_batches, &CancelToken::new(), |_| {})
    }

    /// Like `estimate` but reports every finished batch to `on_batch` and
    /// stops early once `cancel` fires. A cancelled run returns the counts
    /// gathered so far with `is_complete()` false.
    pub fn estimate_with<F: FnMut(&BatchReport)>(
        &mut self,
        simulations_per_batch: usize,
        num_batches: usize,
        cancel: &CancelToken,
        mut on_batch: F,
    ) -> Result<SimulationResult, BaccaratError> {
        let span = debug_span!(
            "estimate",
            simulations_per_batch,
            num_batches,
            base_len = self.base.len()
        );
        let _enter = span.enter();

        let mut total = SimulationResult::default();
        for batch in 0..num_batches {
            if cancel.is_cancelled() {
                break;
            }
            let result = self.run_batch(simulations_per_batch, cancel)?;
            event!(
                Level::DEBUG,
                batch,
                player = result.player_wins,
                banker = result.banker_wins,
                ties = result.ties,
                refreshes = result.refreshes,
                "Batch finished"
            );
            total += result;
            on_batch(&BatchReport {
                batch,
                num_batches,
                result,
            });
        }
        total.requested = (simulations_per_batch as u64).saturating_mul(num_batches as u64);

        if !total.is_complete() {
            event!(
                Level::WARN,
                completed = total.total(),
                requested = total.requested,
                "Estimate cancelled before finishing"
            );
        }
        Ok(total)
    }

    /// Run the batches across the rayon thread pool.
    ///
    /// Each batch gets its own rng seeded from this estimator's rng, so a
    /// seeded estimator gives the same totals no matter how the batches are
    /// scheduled.
    #[cfg(feature = "parallel")]
    pub fn estimate_parallel<F>(
        &mut self,
        simulations_per_batch: usize,
        num_batches: usize,
        cancel: &CancelToken,
        on_batch: F,
    ) -> Result<SimulationResult, BaccaratError>
    where
        F: Fn(&BatchReport) + Sync,
    {
        use rand::SeedableRng;
        use rand::rngs::StdRng;
        use rayon::prelude::*;

        let span = debug_span!(
            "estimate_parallel",
            simulations_per_batch,
            num_batches,
            base_len = self.base.len()
        );
        let _enter = span.enter();

        let seeds: Vec<u64> = (0..num_batches).map(|_| self.rng.random()).collect();
        let base = &self.base;
        let (min_cards, burn_cards) = (self.min_cards, self.burn_cards);

        let mut total = seeds
            .into_par_iter()
            .enumerate()
            .map(|(batch, seed)| -> Result<SimulationResult, BaccaratError> {
                if cancel.is_cancelled() {
                    return Ok(SimulationResult::default());
                }
                let mut worker = MonteCarloBaccarat::new_with_limits(
                    base.clone(),
                    StdRng::seed_from_u64(seed),
                    min_cards,
                    burn_cards,
                )?;
                let result = worker.run_batch(simulations_per_batch, cancel)?;
                on_batch(&BatchReport {
                    batch,
                    num_batches,
                    result,
                });
                Ok(result)
            })
            .try_reduce(SimulationResult::default, |a, b| Ok(a + b))?;
        total.requested = (simulations_per_batch as u64).saturating_mul(num_batches as u64);

        if !total.is_complete() {
            event!(
                Level::WARN,
                completed = total.total(),
                requested = total.requested,
                "Parallel estimate cancelled before finishing"
            );
        }
        Ok(total)
    }
}
