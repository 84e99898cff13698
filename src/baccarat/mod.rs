/// Module for the drawing rules and a single round of play.
mod round;
/// Export the round engine
pub use self::round::{
    BaccaratHand, CardSource, RoundOutcome, RoundResult, ShoeDealer, StackedCards, banker_draws,
    play_round, player_draws,
};

/// Monte carlo estimation over a partially dealt shoe.
mod monte_carlo;
/// Export `MonteCarloBaccarat` and its results
pub use self::monte_carlo::{BatchReport, CancelToken, MonteCarloBaccarat, SimulationResult, WinRates};

/// Expected values and the suggested bet.
mod recommendation;
/// Export everything needed to read a recommendation.
pub use self::recommendation::{
    Advisory, BANKER_COMMISSION, Bet, BetChoice, Confidence, ExpectedValues, HIGH_CONFIDENCE_GAP,
    ImpliedOdds, MEDIUM_CONFIDENCE_GAP, Recommendation, TIE_PAYOUT, adjusted_banker_rate,
    choose_bet, recommend,
};

/// Used card tracking for one shoe and the analysis entry point.
mod session;
/// Export `ShoeSession` and `analyze`
pub use self::session::{BaccaratReport, RankCount, ShoeSession, analyze, distribution};
