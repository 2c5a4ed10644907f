//! Fuzz target for the CTCP codec.
//!
//! Decoding must be total, never emit empty segments, and survive
//! re-encoding whatever it produced.

#![no_main]

use libfuzzer_sys::fuzz_target;

use clirc_proto::ctcp::{decode, Segment};

fuzz_target!(|data: &[u8]| {
    let segments = decode(data);
    for segment in &segments {
        assert!(!segment.value().is_empty());
        if let Segment::Ctcp(value) = segment {
            // re-encoding only fails on the whitespace-leading rule
            let first = value[0];
            let encodable = first != b' ' && first != 0x01;
            assert_eq!(segment.encode().is_ok(), encodable);
        } else {
            assert!(segment.encode().is_ok());
        }
    }
});
