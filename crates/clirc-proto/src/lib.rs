//! # clirc-proto
//!
//! A client-side IRC protocol toolkit: an incremental, cancellable message
//! parser for RFC 1459 messages with IRCv3 message tags, and a two-level
//! CTCP quoting codec.
//!
//! ## Features
//!
//! - Incremental byte-stream parsing: chunk boundaries anywhere, one
//!   outcome per CRLF-terminated line, automatic resynchronisation after
//!   malformed lines
//! - Raw byte message model ([`Message`], [`Tag`], [`Prefix`]) with
//!   wire-format serialization
//! - Malformed lines reported as data ([`ParseError`]) alongside the
//!   partially assembled message, never as a stream failure
//! - CTCP low-level and X-level quoting with multi-segment decomposition
//!   ([`ctcp`])
//! - Optional Tokio integration: the parser as a task between bounded
//!   queues with a cancellation signal (`tokio` feature, on by default)
//! - Optional serde support for the message model (`serde` feature)
//!
//! ## Parsing a stream
//!
//! ```
//! use clirc_proto::{Machine, Step};
//!
//! let mut machine = Machine::new();
//! machine.feed(b":dan!d@localhost PRIVMSG #chan :Hey!\r\n12\r\n");
//!
//! match machine.step() {
//!     Step::Message(msg) => {
//!         assert_eq!(msg.prefix.name, "dan");
//!         assert_eq!(msg.command, "PRIVMSG");
//!         assert_eq!(msg.params[1], "Hey!");
//!     }
//!     other => panic!("expected a message, got {other:?}"),
//! }
//! // the second line fails on its own, without poisoning the stream
//! assert!(matches!(machine.step(), Step::Error(_)));
//! assert_eq!(machine.step(), Step::NeedInput);
//! ```
//!
//! ## CTCP
//!
//! ```
//! use bytes::Bytes;
//! use clirc_proto::ctcp::{self, Segment};
//!
//! let wire = ctcp::encode_all(&[
//!     Segment::Plain(Bytes::from_static(b"Say hi to Ron\n\t/actor")),
//!     Segment::Ctcp(Bytes::from_static(b"USERINFO")),
//! ])
//! .unwrap();
//! assert_eq!(wire, Bytes::from_static(b"Say hi to Ron\x10n\t/actor\x01USERINFO\x01"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod ctcp;
pub mod error;
pub mod message;
pub mod parser;

pub use self::ctcp::Segment;
pub use self::error::{CtcpError, ParseError, ParseReason, StreamError};
pub use self::message::{Message, Prefix, Tag};
#[cfg(feature = "tokio")]
pub use self::parser::Parser;
pub use self::parser::{Machine, Step};
