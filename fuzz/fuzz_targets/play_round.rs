#![no_main]

extern crate arbitrary;
extern crate libfuzzer_sys;
extern crate rs_baccarat;

use libfuzzer_sys::fuzz_target;
use rs_baccarat::baccarat::{RoundOutcome, StackedCards, play_round};
use rs_baccarat::core::Rank;

#[derive(Debug, Clone, arbitrary::Arbitrary)]
struct Input {
    pub cards: Vec<Rank>,
}

fuzz_target!(|input: Input| {
    let mut deal = StackedCards::new(input.cards.clone());
    let Ok(result) = play_round(&mut deal) else {
        assert!(input.cards.len() < 6);
        return;
    };

    assert!(deal.dealt() >= 4 && deal.dealt() <= 6);
    assert_eq!(deal.dealt(), result.cards_used());
    if result.natural {
        assert_eq!(4, deal.dealt());
    }

    let expected = match result.player_total().cmp(&result.banker_total()) {
        std::cmp::Ordering::Greater => RoundOutcome::PlayerWin,
        std::cmp::Ordering::Less => RoundOutcome::BankerWin,
        std::cmp::Ordering::Equal => RoundOutcome::Tie,
    };
    assert_eq!(expected, result.outcome);

    // Replaying the same cards gives the same round.
    let replay = play_round(&mut StackedCards::new(input.cards)).unwrap();
    assert_eq!(result, replay);
});
