#![no_main]

use libfuzzer_sys::fuzz_target;
use resumable_deflate_rs::{InflateStatus, Inflater, SliceSource, VecSink};

// Feeds arbitrary bytes straight to the raw DEFLATE decoder. There is no
// "expected" output here — the only contract under test is that the state
// machine never panics, never loops forever, and always reaches a terminal
// status (NeedMoreInput, since the fixed-size corpus input never grows).
fuzz_target!(|data: &[u8]| {
    let mut inflater = Inflater::new();
    let mut src = SliceSource::new(data);
    let mut sink = VecSink::new();
    for _ in 0..10_000 {
        match inflater.inflate(&mut src, &mut sink) {
            Ok(InflateStatus::Done) | Ok(InflateStatus::NeedMoreInput) | Err(_) => return,
            Ok(InflateStatus::NeedMoreOutput) => continue,
        }
    }
    panic!("inflate() made no terminal progress after 10000 steps");
});
