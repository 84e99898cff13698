use std::cmp::Ordering;

use rand::Rng;

use crate::core::{BaccaratError, Rank, Shoe};

/// Anything that can hand out cards in order.
///
/// The round engine only ever asks for the next card, so the same rules
/// run against a random shoe during simulation and against a stacked deal
/// when replaying known cards.
pub trait CardSource {
    fn next_card(&mut self) -> Result<Rank, BaccaratError>;
}

/// Deals random cards out of a shoe, removing them as it goes.
#[derive(Debug)]
pub struct ShoeDealer<'a, R: Rng> {
    shoe: &'a mut Shoe,
    rng: &'a mut R,
}

impl<'a, R: Rng> ShoeDealer<'a, R> {
    pub fn new(shoe: &'a mut Shoe, rng: &'a mut R) -> Self {
        Self { shoe, rng }
    }
}

impl<R: Rng> CardSource for ShoeDealer<'_, R> {
    fn next_card(&mut self) -> Result<Rank, BaccaratError> {
        self.shoe.draw(&mut *self.rng)
    }
}

/// A prearranged deal order. Useful for replaying a recorded round.
#[derive(Debug, Clone, Default)]
pub struct StackedCards {
    cards: Vec<Rank>,
    next: usize,
}

impl StackedCards {
    pub fn new(cards: Vec<Rank>) -> Self {
        Self { cards, next: 0 }
    }

    /// Build from raw card numbers.
    ///
    /// ```
    /// use rs_baccarat::baccarat::{RoundOutcome, StackedCards, play_round};
    ///
    /// // Player 1 + K = 1, Banker 9 + 10 = 9, a banker natural.
    /// let mut deal = StackedCards::from_values(&[1, 13, 9, 10]).unwrap();
    /// let result = play_round(&mut deal).unwrap();
    /// assert_eq!(RoundOutcome::BankerWin, result.outcome);
    /// ```
    pub fn from_values(values: &[u8]) -> Result<Self, BaccaratError> {
        Ok(Self::new(crate::core::parse_ranks(values)?))
    }

    /// How many cards have been dealt so far.
    pub fn dealt(&self) -> usize {
        self.next
    }
}

impl CardSource for StackedCards {
    fn next_card(&mut self) -> Result<Rank, BaccaratError> {
        let card = self
            .cards
            .get(self.next)
            .copied()
            .ok_or(BaccaratError::EmptyShoe)?;
        self.next += 1;
        Ok(card)
    }
}

/// One side's cards. Never more than three.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaccaratHand {
    cards: [Rank; 3],
    len: u8,
}

impl BaccaratHand {
    pub fn new(first: Rank, second: Rank) -> Self {
        Self {
            cards: [first, second, Rank::ACE],
            len: 2,
        }
    }

    fn push(&mut self, card: Rank) {
        debug_assert_eq!(2, self.len, "a hand only ever takes one third card");
        self.cards[2] = card;
        self.len = 3;
    }

    pub fn cards(&self) -> &[Rank] {
        &self.cards[..self.len as usize]
    }

    pub fn total(&self) -> u8 {
        crate::core::hand_total(self.cards())
    }

    pub fn third_card(&self) -> Option<Rank> {
        if self.len == 3 {
            Some(self.cards[2])
        } else {
            None
        }
    }

    /// Two card total of eight or nine.
    pub fn is_natural(&self) -> bool {
        self.len == 2 && self.total() >= 8
    }
}

/// Who won a round.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundOutcome {
    PlayerWin,
    BankerWin,
    Tie,
}

/// The finished round, with the hands that decided it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundResult {
    pub outcome: RoundOutcome,
    pub player: BaccaratHand,
    pub banker: BaccaratHand,
    /// Either side was dealt a natural so nobody drew.
    pub natural: bool,
}

impl RoundResult {
    pub fn player_total(&self) -> u8 {
        self.player.total()
    }

    pub fn banker_total(&self) -> u8 {
        self.banker.total()
    }

    pub fn player_drew(&self) -> bool {
        self.player.third_card().is_some()
    }

    pub fn banker_drew(&self) -> bool {
        self.banker.third_card().is_some()
    }

    /// Total number of cards the round consumed.
    pub fn cards_used(&self) -> usize {
        self.player.cards().len() + self.banker.cards().len()
    }
}

/// Player stands on six and seven, draws on zero through five.
pub fn player_draws(player_total: u8) -> bool {
    player_total <= 5
}

/// The banker's side of the tableau.
///
/// `player_third` is the point value of the player's third card, or `None`
/// when the player stood.
pub fn banker_draws(banker_total: u8, player_third: Option<u8>) -> bool {
    let Some(p) = player_third else {
        return banker_total <= 5;
    };
    match banker_total {
        0..=2 => true,
        3 => p != 8,
        4 => (2..=7).contains(&p),
        5 => (4..=7).contains(&p),
        6 => (6..=7).contains(&p),
        _ => false,
    }
}

/// Play one round of punto banco from `source`.
///
/// Cards are dealt player, player, banker, banker. A natural on either
/// side ends the round. Otherwise the player acts first and the banker
/// decides using the value of the player's third card.
pub fn play_round<S: CardSource + ?Sized>(source: &mut S) -> Result<RoundResult, BaccaratError> {
    let p1 = source.next_card()?;
    let p2 = source.next_card()?;
    let b1 = source.next_card()?;
    let b2 = source.next_card()?;
    let mut player = BaccaratHand::new(p1, p2);
    let mut banker = BaccaratHand::new(b1, b2);

    let natural = player.is_natural() || banker.is_natural();
    if !natural {
        if player_draws(player.total()) {
            player.push(source.next_card()?);
        }
        let player_third = player.third_card().map(Rank::points);
        if banker_draws(banker.total(), player_third) {
            banker.push(source.next_card()?);
        }
    }

    let outcome = match player.total().cmp(&banker.total()) {
        Ordering::Greater => RoundOutcome::PlayerWin,
        Ordering::Less => RoundOutcome::BankerWin,
        Ordering::Equal => RoundOutcome::Tie,
    };

    Ok(RoundResult {
        outcome,
        player,
        banker,
        natural,
    })
}
