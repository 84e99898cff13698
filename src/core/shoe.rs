use rand::Rng;

use super::{BaccaratError, NUM_RANKS, Rank};

/// Standard punto banco shoe size in decks.
pub const DEFAULT_NUM_DECKS: u8 = 8;
/// Every rank appears once per suit.
pub const SUITS_PER_DECK: u16 = 4;
/// The most cards a single round can consume: two each plus two third cards.
pub const MAX_CARDS_PER_ROUND: usize = 6;

/// `Shoe` holds the undealt cards of one or more decks.
///
/// Since suits never matter the shoe is stored as a count per rank rather
/// than a vector of cards. Drawing picks a uniformly random card without
/// replacement, which is the same distribution as shuffling the remaining
/// cards and dealing off the top.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shoe {
    counts: [u16; NUM_RANKS],
    len: usize,
}

impl Shoe {
    /// Create a full shoe of `num_decks` decks.
    ///
    /// ```
    /// use rs_baccarat::core::Shoe;
    ///
    /// assert_eq!(416, Shoe::new(8).len());
    /// ```
    pub fn new(num_decks: u8) -> Self {
        Self::from_counts([num_decks as u16 * SUITS_PER_DECK; NUM_RANKS])
    }

    /// Create a shoe with explicit per rank counts, ace first.
    pub fn from_counts(counts: [u16; NUM_RANKS]) -> Self {
        let len = counts.iter().map(|c| *c as usize).sum();
        Self { counts, len }
    }

    /// Copy this shoe with the given raw card numbers removed.
    ///
    /// Reporting more copies of a rank than the shoe holds leaves that rank
    /// at zero. Fails without removing anything if any value is not a rank.
    ///
    /// ```
    /// use rs_baccarat::core::{Rank, Shoe};
    ///
    /// let shoe = Shoe::default().remove_known(&[1, 1, 13]).unwrap();
    /// assert_eq!(413, shoe.len());
    /// assert_eq!(30, shoe.count(Rank::ACE));
    /// assert!(Shoe::default().remove_known(&[0]).is_err());
    /// ```
    pub fn remove_known(&self, used_cards: &[u8]) -> Result<Shoe, BaccaratError> {
        let ranks = super::parse_ranks(used_cards)?;
        Ok(self.remove_ranks(&ranks))
    }

    /// Copy this shoe with the given ranks removed, flooring each rank at zero.
    pub fn remove_ranks(&self, used: &[Rank]) -> Shoe {
        let mut counts = self.counts;
        for rank in used {
            let c = &mut counts[rank.index()];
            *c = c.saturating_sub(1);
        }
        Shoe::from_counts(counts)
    }

    /// How many copies of `rank` are left.
    pub fn count(&self, rank: Rank) -> u16 {
        self.counts[rank.index()]
    }

    /// How many cards are left in the shoe.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Have all of the cards been dealt?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove and return a uniformly random card.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Result<Rank, BaccaratError> {
        if self.is_empty() {
            return Err(BaccaratError::EmptyShoe);
        }
        let mut idx = rng.random_range(0..self.len);
        for (i, count) in self.counts.iter_mut().enumerate() {
            let c = *count as usize;
            if idx < c {
                *count -= 1;
                self.len -= 1;
                return Rank::from_index(i).ok_or(BaccaratError::EmptyShoe);
            }
            idx -= c;
        }
        // len is always the sum of counts so the walk above always returns.
        debug_assert!(false, "shoe length out of sync with rank counts");
        Err(BaccaratError::EmptyShoe)
    }

    /// Remove one specific card, as when replaying a known deal.
    pub fn take(&mut self, rank: Rank) -> Result<(), BaccaratError> {
        let count = &mut self.counts[rank.index()];
        if *count == 0 {
            return Err(BaccaratError::EmptyShoe);
        }
        *count -= 1;
        self.len -= 1;
        Ok(())
    }

    /// Discard `num_cards` random cards unseen.
    pub fn burn<R: Rng>(&mut self, num_cards: usize, rng: &mut R) -> Result<(), BaccaratError> {
        for _ in 0..num_cards {
            self.draw(rng)?;
        }
        Ok(())
    }

    /// Iterate the remaining count of every rank, ace first.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, u16)> + '_ {
        Rank::ranks().map(|r| (r, self.count(r)))
    }

    /// Raw per rank counts, ace first.
    pub fn counts(&self) -> [u16; NUM_RANKS] {
        self.counts
    }
}

impl Default for Shoe {
    /// The standard eight deck shoe.
    fn default() -> Self {
        Self::new(DEFAULT_NUM_DECKS)
    }
}
