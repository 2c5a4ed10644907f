//! Fuzz target for the incremental message parser.
//!
//! Feeds arbitrary bytes through the state machine, split into two chunks
//! to exercise suspension, and checks the emitted-command invariant.

#![no_main]

use libfuzzer_sys::fuzz_target;

use clirc_proto::{Machine, Step};

fuzz_target!(|data: &[u8]| {
    let mut machine = Machine::new();
    let split = data.len() / 2;
    machine.feed(&data[..split]);
    loop {
        match machine.step() {
            Step::Message(msg) => {
                // every emitted command is letters-only or exactly 3 digits
                assert!(!msg.command.is_empty());
                assert!(
                    msg.command.iter().all(|b| b.is_ascii_alphabetic())
                        || (msg.command.len() == 3
                            && msg.command.iter().all(|b| b.is_ascii_digit()))
                );
            }
            Step::Error(err) => {
                let _ = err.to_string();
            }
            Step::NeedInput => break,
        }
    }
    machine.feed(&data[split..]);
    while !matches!(machine.step(), Step::NeedInput) {}
});
