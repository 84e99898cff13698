//! Turns estimated outcome rates into expected values and a suggested bet.
//!
//! Banker wins pay even money less a five percent commission, player wins
//! pay even money, and a tie pays eight to one. A tie is a push for the
//! banker and player bets: it contributes nothing to either expectation.
use std::fmt;

use super::monte_carlo::WinRates;

/// Commission taken from banker winnings.
pub const BANKER_COMMISSION: f64 = 0.05;
/// Tie bets pay 8 to 1.
pub const TIE_PAYOUT: f64 = 8.0;
/// Gaps below this are low confidence.
pub const MEDIUM_CONFIDENCE_GAP: f64 = 0.002;
/// Gaps at or above this are high confidence.
pub const HIGH_CONFIDENCE_GAP: f64 = 0.005;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bet {
    Banker,
    Player,
    Tie,
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bet::Banker => "Banker",
            Bet::Player => "Player",
            Bet::Tie => "Tie",
        };
        f.write_str(name)
    }
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Label the gap between the best and worst of the compared bets.
    pub fn from_gap(gap: f64) -> Self {
        if gap < MEDIUM_CONFIDENCE_GAP {
            Confidence::Low
        } else if gap < HIGH_CONFIDENCE_GAP {
            Confidence::Medium
        } else {
            Confidence::High
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(name)
    }
}

/// Things the caller should be told alongside the suggestion.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisory {
    /// Even the suggested bet loses money on average.
    NegativeExpectation,
    /// So few cards are left that the estimate says little about the next
    /// round: the same handful of cards is replayed over and over.
    NearlyDepleted,
    /// The run was cancelled or timed out before every round was played.
    Incomplete,
}

/// Expected return per unit staked.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpectedValues {
    pub banker: f64,
    pub player: f64,
    pub tie: f64,
}

impl ExpectedValues {
    pub fn from_rates(rates: &WinRates) -> Self {
        Self {
            banker: adjusted_banker_rate(rates) - rates.player,
            player: rates.player - rates.banker,
            tie: rates.tie * TIE_PAYOUT - (1.0 - rates.tie),
        }
    }

    pub fn get(&self, bet: Bet) -> f64 {
        match bet {
            Bet::Banker => self.banker,
            Bet::Player => self.player,
            Bet::Tie => self.tie,
        }
    }
}

/// Banker win rate after commission.
pub fn adjusted_banker_rate(rates: &WinRates) -> f64 {
    rates.banker * (1.0 - BANKER_COMMISSION)
}

/// Decimal odds implied by each rate, `1 / rate`. Absent for a zero rate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpliedOdds {
    pub banker: Option<f64>,
    pub player: Option<f64>,
    pub tie: Option<f64>,
}

impl ImpliedOdds {
    pub fn from_rates(rates: &WinRates) -> Self {
        let odds = |rate: f64| if rate > 0.0 { Some(1.0 / rate) } else { None };
        Self {
            banker: odds(rates.banker),
            player: odds(rates.player),
            tie: odds(rates.tie),
        }
    }
}

/// The better of banker and player and how clearly it is better.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetChoice {
    pub bet: Bet,
    pub expected_value: f64,
    pub gap: f64,
    pub confidence: Confidence,
}

/// Pick between banker and player. Ties in expectation go to the banker.
/// The tie bet is never suggested.
pub fn choose_bet(expected: &ExpectedValues) -> BetChoice {
    let (bet, best, worst) = if expected.banker >= expected.player {
        (Bet::Banker, expected.banker, expected.player)
    } else {
        (Bet::Player, expected.player, expected.banker)
    };
    let gap = best - worst;
    BetChoice {
        bet,
        expected_value: best,
        gap,
        confidence: Confidence::from_gap(gap),
    }
}

/// Everything derived from one set of rates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub rates: WinRates,
    pub adjusted_banker_rate: f64,
    pub expected: ExpectedValues,
    pub odds: ImpliedOdds,
    pub choice: BetChoice,
    pub advisories: Vec<Advisory>,
}

impl Recommendation {
    pub fn bet(&self) -> Bet {
        self.choice.bet
    }

    pub fn confidence(&self) -> Confidence {
        self.choice.confidence
    }

    pub fn has_advisory(&self, advisory: Advisory) -> bool {
        self.advisories.contains(&advisory)
    }

    pub(crate) fn advise(&mut self, advisory: Advisory) {
        if !self.has_advisory(advisory) {
            self.advisories.push(advisory);
        }
    }
}

/// Build the full recommendation for a set of rates.
///
/// ```
/// use rs_baccarat::baccarat::{Bet, WinRates, recommend};
///
/// let rates = WinRates { player: 0.4462, banker: 0.4586, tie: 0.0952 };
/// let rec = recommend(&rates);
/// assert_eq!(Bet::Banker, rec.bet());
/// ```
pub fn recommend(rates: &WinRates) -> Recommendation {
    let expected = ExpectedValues::from_rates(rates);
    let choice = choose_bet(&expected);
    let mut rec = Recommendation {
        rates: *rates,
        adjusted_banker_rate: adjusted_banker_rate(rates),
        expected,
        odds: ImpliedOdds::from_rates(rates),
        choice,
        advisories: vec![],
    };
    if choice.expected_value < 0.0 {
        rec.advise(Advisory::NegativeExpectation);
    }
    rec
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn full_shoe_rates() -> WinRates {
        WinRates {
            player: 0.4462,
            banker: 0.4586,
            tie: 0.0952,
        }
    }

    #[test]
    fn test_expected_values() {
        let rates = full_shoe_rates();
        let ev = ExpectedValues::from_rates(&rates);
        assert_relative_eq!(0.4586 * 0.95 - 0.4462, ev.banker, epsilon = 1e-12);
        assert_relative_eq!(0.4462 - 0.4586, ev.player, epsilon = 1e-12);
        assert_relative_eq!(0.0952 * 8.0 - 0.9048, ev.tie, epsilon = 1e-12);
    }

    #[test]
    fn test_ties_are_a_push() {
        // Only ties: neither banker nor player gains or loses.
        let rates = WinRates {
            player: 0.0,
            banker: 0.0,
            tie: 1.0,
        };
        let ev = ExpectedValues::from_rates(&rates);
        assert_relative_eq!(0.0, ev.banker);
        assert_relative_eq!(0.0, ev.player);
        assert_relative_eq!(8.0, ev.tie);
    }

    #[test]
    fn test_choose_banker_with_high_confidence() {
        let ev = ExpectedValues {
            banker: 0.01,
            player: -0.02,
            tie: -0.1,
        };
        let choice = choose_bet(&ev);
        assert_eq!(Bet::Banker, choice.bet);
        assert_relative_eq!(0.03, choice.gap, epsilon = 1e-12);
        assert_eq!(Confidence::High, choice.confidence);
    }

    #[test]
    fn test_tie_never_chosen() {
        let ev = ExpectedValues {
            banker: -0.5,
            player: -0.4,
            tie: 3.0,
        };
        assert_eq!(Bet::Player, choose_bet(&ev).bet);
    }

    #[test]
    fn test_equal_expectation_prefers_banker() {
        let ev = ExpectedValues {
            banker: -0.01,
            player: -0.01,
            tie: -0.1,
        };
        let choice = choose_bet(&ev);
        assert_eq!(Bet::Banker, choice.bet);
        assert_eq!(Confidence::Low, choice.confidence);
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(Confidence::Low, Confidence::from_gap(0.0));
        assert_eq!(Confidence::Low, Confidence::from_gap(0.0019));
        assert_eq!(Confidence::Medium, Confidence::from_gap(0.002));
        assert_eq!(Confidence::Medium, Confidence::from_gap(0.0049));
        assert_eq!(Confidence::High, Confidence::from_gap(0.005));
        assert_eq!(Confidence::High, Confidence::from_gap(0.3));
    }

    #[test]
    fn test_full_shoe_recommendation() {
        let rec = recommend(&full_shoe_rates());
        assert_eq!(Bet::Banker, rec.bet());
        assert_relative_eq!(0.4586 * 0.95, rec.adjusted_banker_rate, epsilon = 1e-12);
        // Both bets lose on a full shoe.
        assert!(rec.has_advisory(Advisory::NegativeExpectation));
        // Banker -0.0105 vs player -0.0124.
        assert_eq!(Confidence::Low, rec.confidence());
    }

    #[test]
    fn test_positive_expectation_has_no_advisory() {
        let rates = WinRates {
            player: 0.40,
            banker: 0.50,
            tie: 0.10,
        };
        let rec = recommend(&rates);
        assert_eq!(Bet::Banker, rec.bet());
        assert!(rec.advisories.is_empty());
        assert_eq!(Confidence::High, rec.confidence());
    }

    #[test]
    fn test_implied_odds() {
        let odds = ImpliedOdds::from_rates(&WinRates {
            player: 0.5,
            banker: 0.5,
            tie: 0.0,
        });
        assert_eq!(Some(2.0), odds.player);
        assert_eq!(Some(2.0), odds.banker);
        assert_eq!(None, odds.tie);
    }

    #[test]
    fn test_advise_is_idempotent() {
        let mut rec = recommend(&full_shoe_rates());
        rec.advise(Advisory::NegativeExpectation);
        rec.advise(Advisory::Incomplete);
        rec.advise(Advisory::Incomplete);
        assert_eq!(
            vec![Advisory::NegativeExpectation, Advisory::Incomplete],
            rec.advisories
        );
    }
}
