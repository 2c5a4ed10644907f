//! The message state machine.
//!
//! States are a tagged variant driven by a single dispatch loop; each call
//! to [`Machine::step`] runs the machine over at most one line of input.
//! A message is only begun once its terminating LF is buffered, so a chunk
//! boundary in the middle of a line suspends the machine (`NeedInput`)
//! instead of producing a spurious error, and no lexing run ever crosses a
//! line boundary. After a failure the machine discards the remainder of the
//! offending line and resumes at `Begin` with the next one.

use std::mem;

use bytes::Bytes;

use crate::error::{ParseError, ParseReason};
use crate::message::{Message, Tag};

use super::cursor::Cursor;

/// Hostname limits applied to tag vendors.
const MAX_VENDOR_LEN: usize = 253;
const MAX_VENDOR_LABEL_LEN: usize = 63;

/// Parser states.
#[derive(Default)]
enum State {
    #[default]
    Begin,
    Tag,
    Prefix,
    Command,
    Param,
    Trail,
    End,
    Error(ParseReason),
}

/// The outcome of advancing the machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// A line parsed successfully.
    Message(Message),
    /// A line was malformed; the machine has already resynchronised.
    Error(ParseError),
    /// No full line is buffered; feed more input.
    NeedInput,
}

/// Incremental IRC message parser.
///
/// Feed byte chunks with [`feed`](Machine::feed) and drain outcomes with
/// [`step`](Machine::step). Every LF-terminated line yields exactly one
/// [`Step::Message`] or one [`Step::Error`]; partial input yields nothing.
///
/// # Example
///
/// ```
/// use clirc_proto::{Machine, Step};
///
/// let mut machine = Machine::new();
/// machine.feed(b"@id=123AB CAP * LS :multi");
/// assert_eq!(machine.step(), Step::NeedInput);
/// machine.feed(b"-prefix\r\n");
/// match machine.step() {
///     Step::Message(msg) => {
///         assert_eq!(msg.command, "CAP");
///         assert_eq!(msg.params[2], "multi-prefix");
///     }
///     other => panic!("expected a message, got {other:?}"),
/// }
/// ```
#[derive(Default)]
pub struct Machine {
    cursor: Cursor,
    state: State,
    msg: Message,
}

impl Machine {
    /// Create a machine in the start state with an empty buffer.
    pub fn new() -> Self {
        Machine::default()
    }

    /// Append a chunk of input to the buffer.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.cursor.extend(chunk);
    }

    /// Whether bytes of an unterminated line are still buffered.
    ///
    /// When the input source closes while this is true, the stream was cut
    /// mid-message.
    pub fn has_partial_input(&self) -> bool {
        !self.cursor.is_empty()
    }

    /// Advance until the next message, error, or need for input.
    pub fn step(&mut self) -> Step {
        loop {
            let next = match mem::take(&mut self.state) {
                State::Begin => {
                    // Drop the delimiter bytes of the previous line before
                    // deciding whether a new one is available.
                    self.cursor.consume();
                    if !self.cursor.has_line() {
                        return Step::NeedInput;
                    }
                    self.msg = Message::default();
                    self.begin()
                }
                State::Tag => self.tag(),
                State::Prefix => self.prefix(),
                State::Command => self.command(),
                State::Param => self.param(),
                State::Trail => self.trail(),
                State::End => {
                    return Step::Message(mem::take(&mut self.msg));
                }
                State::Error(reason) => {
                    let partial = mem::take(&mut self.msg);
                    self.resync();
                    return Step::Error(ParseError { partial, reason });
                }
            };
            self.state = next;
        }
    }

    /// Discard the rest of the offending line, up to and including its LF.
    ///
    /// When the failure was detected after the LF had already been read
    /// (command validation runs after the terminator), there is nothing
    /// left of the line to discard.
    fn resync(&mut self) {
        if self.cursor.last_byte() != Some(b'\n') {
            self.cursor.parse_until(|b| b != b'\n');
            let _ = self.cursor.next();
        }
        self.cursor.consume();
    }

    fn begin(&mut self) -> State {
        match self.cursor.next() {
            Some(b'@') => State::Tag,
            Some(b':') => State::Prefix,
            Some(b) if b.is_ascii_alphanumeric() => {
                self.cursor.rewind();
                State::Command
            }
            Some(b) => State::Error(ParseReason::InvalidFirstCharacter(char::from(b))),
            None => State::Error(ParseReason::UnexpectedEndOfInput),
        }
    }

    fn tag(&mut self) -> State {
        self.cursor.consume(); // the '@' or ';' that got us here
        let mut key = self.cursor.parse_until(is_hostname_byte);
        let mut vendor = Bytes::new();

        let Some(mut b) = self.cursor.next() else {
            return State::Error(ParseReason::UnexpectedEndOfInput);
        };

        if b == b'/' {
            vendor = key;
            self.cursor.consume(); // the '/'
            key = self.cursor.parse_until(is_hostname_byte);
            if key.is_empty() {
                return State::Error(ParseReason::MissingKeyAfterVendor);
            }
            match self.cursor.next() {
                Some(n) => b = n,
                None => return State::Error(ParseReason::UnexpectedEndOfInput),
            }
        }
        if key.contains(&b'.') {
            return State::Error(ParseReason::DotInTagKey);
        }
        if !vendor.is_empty() {
            let first = vendor[0];
            if first == b'.' || first == b'-' {
                return State::Error(ParseReason::VendorLeadingCharacter(char::from(first)));
            }
            if vendor.last() == Some(&b'.') {
                vendor = vendor.slice(..vendor.len() - 1);
            }
            if vendor.len() > MAX_VENDOR_LEN {
                return State::Error(ParseReason::VendorTooLong);
            }
            for label in vendor.split(|&l| l == b'.') {
                if label.is_empty() || label.len() > MAX_VENDOR_LABEL_LEN {
                    return State::Error(ParseReason::VendorLabelLength);
                }
            }
        }
        if key.is_empty() {
            return State::Error(ParseReason::MissingTagKey);
        }

        let mut value = Bytes::new();
        if b == b'=' {
            self.cursor.consume(); // the '='
            value = self.cursor.parse_until(is_value_byte);
            match self.cursor.next() {
                Some(n) => b = n,
                None => return State::Error(ParseReason::UnexpectedEndOfInput),
            }
        }

        let tag = Tag { vendor, key, value };

        // another tag follows
        if b == b';' {
            self.msg.tags.push(tag);
            return State::Tag;
        }

        if b != b' ' {
            return State::Error(ParseReason::ExpectedSpaceAfterTags);
        }
        self.cursor.skip_spaces();
        self.msg.tags.push(tag);
        match self.cursor.next() {
            Some(b':') => State::Prefix,
            Some(_) => {
                self.cursor.rewind();
                State::Command
            }
            None => State::Error(ParseReason::UnexpectedEndOfInput),
        }
    }

    fn prefix(&mut self) -> State {
        self.cursor.consume(); // the ':'
        self.msg.prefix.name = self.cursor.parse_until(is_prefix_name_byte);

        let Some(mut b) = self.cursor.next() else {
            return State::Error(ParseReason::UnexpectedEndOfInput);
        };

        if b == b'!' || b == b'@' {
            if b == b'!' {
                self.cursor.consume(); // the '!'
                let username = self.cursor.parse_until(is_username_byte);
                if let Some(&first) = username.first() {
                    if first.is_ascii_digit() || first == b'-' {
                        return State::Error(ParseReason::UsernameFirstCharacter(char::from(
                            first,
                        )));
                    }
                }
                self.msg.prefix.username = username;
                match self.cursor.next() {
                    Some(n) => b = n,
                    None => return State::Error(ParseReason::UnexpectedEndOfInput),
                }
            }

            if b == b'\r' || b == b'\n' {
                // the line ended where '@host' was required
                return State::Error(ParseReason::UnexpectedEndOfInput);
            }
            if b != b'@' {
                return State::Error(ParseReason::ExpectedHostSeparator(char::from(b)));
            }
            self.cursor.consume(); // the '@'
            self.msg.prefix.host = self.cursor.parse_until(is_host_byte);
            match self.cursor.next() {
                Some(n) => b = n,
                None => return State::Error(ParseReason::UnexpectedEndOfInput),
            }
        }

        if b == b'\r' || b == b'\n' {
            return State::Error(ParseReason::UnexpectedEndOfInput);
        }
        if b != b' ' {
            return State::Error(ParseReason::ExpectedSpaceAfterPrefix(char::from(b)));
        }
        self.cursor.skip_spaces();
        State::Command
    }

    fn command(&mut self) -> State {
        self.cursor.consume();
        // CR is admitted into the run so the terminator can be recognised
        // and stripped once the LF is seen.
        let mut cmd = self.cursor.parse_until(|b| b == b'\r' || b.is_ascii_alphanumeric());

        let Some(b) = self.cursor.next() else {
            return State::Error(ParseReason::UnexpectedEndOfInput);
        };

        if b == b'\n' {
            if cmd.last() == Some(&b'\r') {
                cmd = cmd.slice(..cmd.len() - 1);
            } else {
                return State::Error(ParseReason::ExpectedCr(char::from(b)));
            }
        }

        if cmd.is_empty() {
            return State::Error(ParseReason::EmptyCommand);
        }
        if cmd[0].is_ascii_digit() {
            if cmd.len() != 3 {
                return State::Error(ParseReason::NumericCommandLength);
            }
            if !cmd.iter().all(|c| c.is_ascii_digit()) {
                return State::Error(ParseReason::NumericCommandDigits);
            }
        } else if !cmd.iter().all(|c| c.is_ascii_alphabetic()) {
            return State::Error(ParseReason::CommandLetters);
        }

        self.msg.command = cmd;
        match b {
            b' ' => {
                self.cursor.skip_spaces();
                State::Param
            }
            b'\n' => State::End,
            other => State::Error(ParseReason::ExpectedSpaceOrEol(char::from(other))),
        }
    }

    fn param(&mut self) -> State {
        self.cursor.consume(); // delimiting spaces
        let Some(b) = self.cursor.next() else {
            return State::Error(ParseReason::UnexpectedEndOfInput);
        };
        if b == b':' {
            self.cursor.rewind();
            return State::Trail;
        }
        if !is_param_byte(b) {
            return State::Error(ParseReason::InvalidParamCharacter(char::from(b)));
        }

        let param = self.cursor.parse_until(is_param_middle_byte);
        self.msg.params.push(param);

        match self.cursor.next() {
            Some(b' ') => {
                self.cursor.skip_spaces();
                State::Param
            }
            Some(b'\r') => match self.cursor.next() {
                Some(b'\n') => State::End,
                Some(c) => State::Error(ParseReason::ExpectedLf(char::from(c))),
                None => State::Error(ParseReason::UnexpectedEndOfInput),
            },
            Some(b'\n') => State::Error(ParseReason::ExpectedCr('\n')),
            // a NUL stopped the run; Trail will report the mismatch
            Some(_) => State::Trail,
            None => State::Error(ParseReason::UnexpectedEndOfInput),
        }
    }

    fn trail(&mut self) -> State {
        match self.cursor.next() {
            Some(b':') => {}
            Some(c) => return State::Error(ParseReason::ExpectedTrailingColon(char::from(c))),
            None => return State::Error(ParseReason::UnexpectedEndOfInput),
        }
        self.cursor.consume(); // the ':'
        let trailing = self.cursor.parse_until(is_trailing_byte);
        self.msg.params.push(trailing);

        match self.cursor.next() {
            Some(b'\r') => {}
            Some(c) => return State::Error(ParseReason::ExpectedCr(char::from(c))),
            None => return State::Error(ParseReason::UnexpectedEndOfInput),
        }
        match self.cursor.next() {
            Some(b'\n') => State::End,
            Some(c) => State::Error(ParseReason::ExpectedLf(char::from(c))),
            None => State::Error(ParseReason::UnexpectedEndOfInput),
        }
    }
}

fn is_hostname_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'-'
}

fn is_value_byte(b: u8) -> bool {
    !matches!(b, 0x00 | 0x07 | b'\r' | b'\n' | b';' | b' ')
}

fn is_prefix_name_byte(b: u8) -> bool {
    !matches!(b, b'!' | b'@' | b' ' | b'\r' | b'\n')
}

fn is_username_byte(b: u8) -> bool {
    !matches!(b, b'@' | b'\r' | b'\n')
}

/// Printable ASCII except space.
fn is_host_byte(b: u8) -> bool {
    (0x21..=0x7e).contains(&b)
}

fn is_param_byte(b: u8) -> bool {
    !matches!(b, 0x00 | b'\r' | b'\n' | b':' | b' ')
}

fn is_param_middle_byte(b: u8) -> bool {
    !matches!(b, 0x00 | b'\r' | b'\n' | b' ')
}

fn is_trailing_byte(b: u8) -> bool {
    !matches!(b, 0x00 | b'\r' | b'\n')
}
