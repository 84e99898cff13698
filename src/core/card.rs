use std::fmt;

use super::BaccaratError;

/// Number of distinct ranks in a deck. Suits are irrelevant in baccarat.
pub const NUM_RANKS: usize = 13;

/// Card rank, `1` (ace) through `13` (king).
///
/// Only the point value matters for the drawing rules: aces count one,
/// two through nine count their face value, tens and picture cards count
/// zero.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
pub struct Rank(u8);

/// Names used when displaying a rank, indexed by `rank - 1`.
const RANK_NAMES: [&str; NUM_RANKS] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const KING: Rank = Rank(13);

    /// Create a rank from its face number.
    ///
    /// ```
    /// use rs_baccarat::core::Rank;
    ///
    /// assert_eq!(9, Rank::new(9).unwrap().points());
    /// assert_eq!(0, Rank::new(12).unwrap().points());
    /// assert!(Rank::new(14).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self, BaccaratError> {
        if (1..=NUM_RANKS as u8).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(BaccaratError::InvalidCard(value.into()))
        }
    }

    /// The face number, 1 through 13.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Baccarat point value.
    pub fn points(self) -> u8 {
        if self.0 >= 10 { 0 } else { self.0 }
    }

    /// Zero based index used for per rank tables.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        if idx < NUM_RANKS {
            Some(Rank(idx as u8 + 1))
        } else {
            None
        }
    }

    /// Get all of the ranks that are possible, ace first.
    pub fn ranks() -> impl Iterator<Item = Rank> {
        (1..=NUM_RANKS as u8).map(Rank)
    }

    pub fn name(self) -> &'static str {
        RANK_NAMES[self.index()]
    }
}

impl TryFrom<u8> for Rank {
    type Error = BaccaratError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::new(value)
    }
}

impl TryFrom<i64> for Rank {
    type Error = BaccaratError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| BaccaratError::InvalidCard(value))
            .and_then(Rank::new)
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.0
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Rank {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Rank(u.int_in_range(1..=NUM_RANKS as u8)?))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Baccarat hand total: the sum of point values, modulo ten.
pub fn hand_total(cards: &[Rank]) -> u8 {
    cards.iter().map(|c| c.points()).sum::<u8>() % 10
}

/// Validate a list of raw card numbers all at once.
///
/// Either every value is a valid rank or nothing is returned, so callers
/// never act on a half validated list.
pub fn parse_ranks(values: &[u8]) -> Result<Vec<Rank>, BaccaratError> {
    values.iter().map(|v| Rank::new(*v)).collect()
}

/// Narrow untrusted card numbers, such as those decoded from a request
/// body, to rank values. Anything outside 1..=13 is an `InvalidCard`.
pub fn card_values(values: &[i64]) -> Result<Vec<u8>, BaccaratError> {
    values
        .iter()
        .map(|v| Rank::try_from(*v).map(u8::from))
        .collect()
}
