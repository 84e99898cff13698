#![no_main]

extern crate libfuzzer_sys;
extern crate rs_baccarat;

use libfuzzer_sys::fuzz_target;
use rs_baccarat::core::{BaccaratError, Shoe};

fuzz_target!(|used: Vec<u8>| {
    let full = Shoe::default();
    match full.remove_known(&used) {
        Ok(shoe) => {
            assert!(full.len() - shoe.len() <= used.len());
            for (rank, count) in shoe.iter() {
                assert!(count <= full.count(rank));
            }
        }
        Err(BaccaratError::InvalidCard(v)) => {
            assert!(v == 0 || v > 13);
            assert!(used.iter().any(|u| i64::from(*u) == v));
        }
        Err(e) => panic!("unexpected error {e}"),
    }
});
