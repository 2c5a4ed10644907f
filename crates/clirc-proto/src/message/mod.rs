//! The parsed IRC message data model.
//!
//! [`Message`], [`Tag`], and [`Prefix`] hold raw byte strings straight off
//! the wire; absence of an optional piece is represented by emptiness.

mod serialize;
mod types;

pub use self::types::{Message, Prefix, Tag};
