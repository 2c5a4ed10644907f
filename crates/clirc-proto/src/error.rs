//! Error types for the protocol toolkit.
//!
//! Parse failures are *reported*, not thrown: the parser publishes a
//! [`ParseError`] on its error queue and resynchronises at the next line
//! boundary. Only [`StreamError`] terminates the parser task.

use thiserror::Error;

use crate::message::Message;

/// A malformed line, reported on the parser's error queue.
///
/// Carries the message as far as it had been assembled when the failure was
/// detected, so consumers can log or inspect the salvageable pieces.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ParseError {
    /// The partially assembled message.
    pub partial: Message,
    /// Why the line was rejected.
    pub reason: ParseReason,
}

/// The reason a line failed to parse.
///
/// Each line of input yields at most one of these; the parser then discards
/// the remainder of the line and resumes with the next one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseReason {
    /// The first byte of a line was not `@`, `:`, or alphanumeric.
    #[error("invalid first character {0:?}")]
    InvalidFirstCharacter(char),

    /// The line ended where the grammar required more input.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// A tag had no key.
    #[error("missing valid character after tag symbol '@'")]
    MissingTagKey,

    /// A vendor prefix was not followed by a key.
    #[error("missing key after vendor separator '/'")]
    MissingKeyAfterVendor,

    /// A tag key contained a dot outside the vendor position.
    #[error("unexpected '.' in tag key")]
    DotInTagKey,

    /// A tag vendor began with a byte a hostname cannot start with.
    #[error("unexpected {0:?} at beginning of vendor")]
    VendorLeadingCharacter(char),

    /// A tag vendor exceeded the hostname length limit.
    #[error("vendor hostname exceeds length limit of 253")]
    VendorTooLong,

    /// A tag vendor contained an empty or oversized hostname label.
    #[error("vendor hostname label must be between 1 and 63 characters long")]
    VendorLabelLength,

    /// The tag section was not terminated by a space.
    #[error("expected ' ' at end of tags")]
    ExpectedSpaceAfterTags,

    /// A prefix username was not followed by `@`.
    #[error("expected '@' but got {0:?}")]
    ExpectedHostSeparator(char),

    /// A prefix username began with a digit or `-`.
    #[error("invalid first character {0:?} in username")]
    UsernameFirstCharacter(char),

    /// The prefix was not terminated by a space.
    #[error("expected ' ' but got {0:?}")]
    ExpectedSpaceAfterPrefix(char),

    /// The command was missing entirely.
    #[error("empty command")]
    EmptyCommand,

    /// A numeric command was not exactly three digits long.
    #[error("expected numeric command of length 3")]
    NumericCommandLength,

    /// A numeric command contained a non-digit byte.
    #[error("expected numeric command to only contain numbers")]
    NumericCommandDigits,

    /// An alphabetic command contained a non-letter byte.
    #[error("expected command to only contain letters")]
    CommandLetters,

    /// The command was followed by something other than a space or CRLF.
    #[error("expected ' ' or LF after command, got {0:?}")]
    ExpectedSpaceOrEol(char),

    /// A parameter began with a byte parameters cannot contain.
    #[error("invalid parameter character {0:?}")]
    InvalidParamCharacter(char),

    /// A trailing parameter did not begin with `:`.
    #[error("expected ':' but got {0:?}")]
    ExpectedTrailingColon(char),

    /// A line terminator was missing its CR.
    #[error("expected CR but got {0:?}")]
    ExpectedCr(char),

    /// A CR was not followed by LF.
    #[error("expected LF but got {0:?}")]
    ExpectedLf(char),
}

/// Rejection raised when encoding a CTCP segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CtcpError {
    /// CTCP content must not begin with a space or the framing delimiter.
    #[error("CTCP content must not begin with whitespace (byte {0:#04x})")]
    LeadingWhitespace(u8),
}

/// Fatal faults that terminate the parser task.
///
/// Unlike [`ParseError`], these are not attributable to a single line and
/// are returned from [`Parser::run`](crate::parser::Parser::run) instead of
/// being published on the error queue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StreamError {
    /// The input channel closed while a line was still incomplete.
    #[error("input stream closed in the middle of a message")]
    TruncatedInput,

    /// The message queue's receiver was dropped.
    #[error("message sink closed")]
    MessageSinkClosed,

    /// The error queue's receiver was dropped.
    #[error("error sink closed")]
    ErrorSinkClosed,
}
