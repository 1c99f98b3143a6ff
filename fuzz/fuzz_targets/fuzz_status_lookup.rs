#![no_main]

use breedline::phase::{Phase, next_phase, phase_index};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let owned = String::from_utf8_lossy(data);
    let status: &str = &owned;
    let index = phase_index(Some(status));
    assert!(index < 8);
    assert_eq!(
        next_phase(Some(status)),
        Phase::from_index(index).and_then(Phase::next)
    );
    let _ = status.parse::<Phase>();
});
