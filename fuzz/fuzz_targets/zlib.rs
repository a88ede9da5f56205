#![no_main]

use libfuzzer_sys::fuzz_target;
use resumable_deflate_rs::{InflateStatus, SliceSource, VecSink, ZlibDecoder};

// Same shape as `inflate.rs`, but through the zlib-framed entry point —
// grounded in zune-inflate's fuzz/fuzz_targets/decode_zlib.rs, which fuzzes
// the framing layer separately from the raw inflate path since a corrupt
// header can fail before a single DEFLATE bit is ever read.
fuzz_target!(|data: &[u8]| {
    let mut decoder = ZlibDecoder::new();
    let mut src = SliceSource::new(data);
    let mut sink = VecSink::new();
    for _ in 0..10_000 {
        match decoder.inflate(&mut src, &mut sink) {
            Ok(InflateStatus::Done) | Ok(InflateStatus::NeedMoreInput) | Err(_) => return,
            Ok(InflateStatus::NeedMoreOutput) => continue,
        }
    }
    panic!("inflate() made no terminal progress after 10000 steps");
});
