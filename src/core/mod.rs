//! This is the core module. It exports the card and shoe
//! code that every other module builds on.

/// card.rs has the rank and its baccarat point value.
mod card;
/// Re-export Rank and the hand helpers
pub use self::card::{NUM_RANKS, Rank, card_values, hand_total, parse_ranks};

/// Shoe is a multi deck set of rank counts.
mod shoe;
/// Export `Shoe` and its constants
pub use self::shoe::{DEFAULT_NUM_DECKS, MAX_CARDS_PER_ROUND, SUITS_PER_DECK, Shoe};

/// The library wide error type.
mod error;
/// Export `BaccaratError`
pub use self::error::BaccaratError;
