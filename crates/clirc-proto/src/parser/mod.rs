//! Incremental IRC message parsing.
//!
//! [`Machine`] is the pure state machine: feed it byte chunks, drain
//! [`Step`] outcomes. [`Parser`] (behind the `tokio` feature) runs the
//! machine as a cancellable task between bounded queues.

mod cursor;
mod machine;
#[cfg(feature = "tokio")]
mod task;

pub use self::machine::{Machine, Step};
#[cfg(feature = "tokio")]
pub use self::task::Parser;
