use crate::core::{BaccaratError, DEFAULT_NUM_DECKS, MAX_CARDS_PER_ROUND, NUM_RANKS, SUITS_PER_DECK};

/// Upper bound on `simulations_per_round * rounds` unless configured.
pub const DEFAULT_MAX_TRIALS: usize = 10_000_000;
/// One deck. A shoe with fewer playable cards than this is flagged.
pub const DEFAULT_LOW_SHOE_CARDS: usize = SUITS_PER_DECK as usize * NUM_RANKS;

/// Knobs for a simulation run.
///
/// Every field has a default so a partial config (or none at all) is
/// usable. The defaults reproduce ten batches of ten thousand rounds on an
/// eight deck shoe.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Decks in a fresh shoe.
    pub num_decks: u8,
    /// Rounds played per batch.
    pub simulations_per_round: usize,
    /// Number of batches.
    pub rounds: usize,
    /// A working shoe smaller than this is refreshed before the next round.
    pub min_cards: usize,
    /// Cards discarded unseen from every fresh working copy.
    pub burn_cards: usize,
    /// Most rounds a single run may ask for.
    pub max_trials: usize,
    /// A shoe with fewer playable cards than this gets the
    /// `NearlyDepleted` advisory.
    pub low_shoe_cards: usize,
    /// Give up on a run after this many milliseconds.
    pub timeout_ms: Option<u64>,
    /// Spread batches over the rayon thread pool.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_decks: DEFAULT_NUM_DECKS,
            simulations_per_round: 10_000,
            rounds: 10,
            min_cards: MAX_CARDS_PER_ROUND,
            burn_cards: 0,
            max_trials: DEFAULT_MAX_TRIALS,
            low_shoe_cards: DEFAULT_LOW_SHOE_CARDS,
            timeout_ms: None,
            parallel: false,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), BaccaratError> {
        if self.num_decks == 0 {
            return Err(BaccaratError::InvalidConfig(
                "num_decks must be at least 1".to_string(),
            ));
        }
        if self.simulations_per_round == 0 || self.rounds == 0 {
            return Err(BaccaratError::InvalidConfig(
                "simulations_per_round and rounds must be at least 1".to_string(),
            ));
        }
        match self.simulations_per_round.checked_mul(self.rounds) {
            Some(trials) if trials <= self.max_trials => {}
            _ => {
                return Err(BaccaratError::InvalidConfig(format!(
                    "{} rounds of {} simulations exceeds the limit of {} trials",
                    self.rounds, self.simulations_per_round, self.max_trials
                )));
            }
        }
        if self.min_cards == 0 {
            return Err(BaccaratError::InvalidConfig(
                "min_cards must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON config, filling missing fields with defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(s: &str) -> Result<Self, BaccaratError> {
        let config: SimulationConfig = serde_json::from_str(s)
            .map_err(|e| BaccaratError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Total number of simulated rounds, saturating on overflow.
    pub fn total_trials(&self) -> usize {
        self.simulations_per_round.saturating_mul(self.rounds)
    }
}
