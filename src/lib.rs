//! rs_baccarat estimates punto banco outcomes for a partially dealt shoe.
//!
//! Give it the cards that have already come out of the shoe and it will
//! simulate the next round many times, then turn the win rates into
//! commission adjusted expected values and a suggested bet.

/// Allow all the card and shoe functionality to be used
/// externally.
pub mod core;
/// The round engine, estimator and recommendations.
pub mod baccarat;
/// Tunable simulation settings.
pub mod config;
