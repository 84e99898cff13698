use std::time::Instant;

use rs_baccarat::baccarat::{CancelToken, MonteCarloBaccarat, recommend};
use rs_baccarat::core::Shoe;

const ROUNDS_PER_BATCH: usize = 100_000;
const NUM_BATCHES: usize = 10;

fn main() {
    let start = Instant::now();
    let mut sim = match MonteCarloBaccarat::new(Shoe::default()) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let result = sim.estimate_with(ROUNDS_PER_BATCH, NUM_BATCHES, &CancelToken::new(), |r| {
        println!(
            "Batch {}: banker {} player {} tie {}",
            r.batch + 1,
            r.result.banker_wins,
            r.result.player_wins,
            r.result.ties
        );
    });
    let result = match result {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let rates = result.rates();
    let rec = recommend(&rates);
    println!("Total over {} rounds", result.total());
    println!("Player wins: {} ({:.2}%)", result.player_wins, rates.player * 100.0);
    println!("Banker wins: {} ({:.2}%)", result.banker_wins, rates.banker * 100.0);
    println!("Ties:        {} ({:.2}%)", result.ties, rates.tie * 100.0);
    println!(
        "EV banker {:.2}% player {:.2}% tie {:.2}%",
        rec.expected.banker * 100.0,
        rec.expected.player * 100.0,
        rec.expected.tie * 100.0
    );
    println!("Elapsed: {:.2?}", start.elapsed());
}
