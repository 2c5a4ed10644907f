//! CTCP (Client-to-Client Protocol) quoting and framing.
//!
//! CTCP payloads ride inside `PRIVMSG`/`NOTICE` trailing parameters, framed
//! by `\x01` delimiters and protected by two levels of escaping:
//!
//! - **X-level quoting** protects the framing alphabet: `\x01` becomes
//!   `\a` and `\` becomes `\\`.
//! - **Low-level quoting** protects the bytes IRC itself cannot carry:
//!   `\x10` doubles itself and NUL, LF, CR become `\x10 0`, `\x10 n`,
//!   `\x10 r`.
//!
//! Encoding applies the X-level pass first and the low-level pass second;
//! decoding reverses both and splits the result into an ordered sequence of
//! [`Segment`]s. Decoding is total: malformed escapes are dropped rather
//! than rejected.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use clirc_proto::ctcp::{self, Segment};
//!
//! let seg = Segment::Ctcp(Bytes::from_static(b"VERSION"));
//! let wire = seg.encode().unwrap();
//! assert_eq!(wire, Bytes::from_static(b"\x01VERSION\x01"));
//! assert_eq!(ctcp::decode(&wire), vec![Segment::Ctcp(Bytes::from_static(b"VERSION"))]);
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::CtcpError;

/// Low-level quote prefix.
pub const M_QUOTE: u8 = 0x10;
/// X-level quote prefix.
pub const X_QUOTE: u8 = b'\\';
/// CTCP framing delimiter.
pub const X_DELIM: u8 = 0x01;

const NUL: u8 = 0x00;
const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// One span of a message body: literal text or a CTCP payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// Literal text outside any CTCP framing.
    Plain(Bytes),
    /// A CTCP request or response, without its delimiters.
    Ctcp(Bytes),
}

impl Segment {
    /// The unescaped content of the segment.
    pub fn value(&self) -> &Bytes {
        match self {
            Segment::Plain(value) | Segment::Ctcp(value) => value,
        }
    }

    /// Encode to the escaped wire form.
    ///
    /// A `Ctcp` segment is framed by [`X_DELIM`] on both sides. Encoding
    /// fails only when CTCP content begins with whitespace, which the
    /// framing could not represent unambiguously.
    pub fn encode(&self) -> Result<Bytes, CtcpError> {
        let mut out = BytesMut::with_capacity(self.value().len() + 2);
        match self {
            Segment::Plain(value) => quote_into(value, &mut out),
            Segment::Ctcp(value) => {
                if let Some(&first) = value.first() {
                    if first == b' ' || first == X_DELIM {
                        return Err(CtcpError::LeadingWhitespace(first));
                    }
                }
                out.put_u8(X_DELIM);
                quote_into(value, &mut out);
                out.put_u8(X_DELIM);
            }
        }
        Ok(out.freeze())
    }
}

/// Apply both quoting passes.
///
/// The X-level pass runs first; its output bytes (`\` and `a`) are not in
/// the low-level alphabet, so the passes fuse into a single scan.
fn quote_into(value: &[u8], out: &mut BytesMut) {
    for &b in value {
        match b {
            X_DELIM => out.put_slice(&[X_QUOTE, b'a']),
            X_QUOTE => out.put_slice(&[X_QUOTE, X_QUOTE]),
            M_QUOTE => out.put_slice(&[M_QUOTE, M_QUOTE]),
            NUL => out.put_slice(&[M_QUOTE, b'0']),
            LF => out.put_slice(&[M_QUOTE, b'n']),
            CR => out.put_slice(&[M_QUOTE, b'r']),
            other => out.put_u8(other),
        }
    }
}

/// Encode a sequence of segments into one concatenated byte string.
pub fn encode_all(segments: &[Segment]) -> Result<Bytes, CtcpError> {
    let mut out = BytesMut::new();
    for segment in segments {
        out.put_slice(&segment.encode()?);
    }
    Ok(out.freeze())
}

/// Decode an escaped byte string into its ordered segments.
///
/// Low-level dequoting runs over the whole input first; the result is then
/// split at [`X_DELIM`] markers while X-level dequoting is undone. Unknown
/// escape sequences drop both bytes, a trailing lone quote byte is dropped,
/// and zero-length segments are never emitted.
pub fn decode(input: &[u8]) -> Vec<Segment> {
    // low-level pass
    let mut dequoted = BytesMut::with_capacity(input.len());
    let mut bytes = input.iter();
    while let Some(&b) = bytes.next() {
        if b == M_QUOTE {
            match bytes.next() {
                Some(&M_QUOTE) => dequoted.put_u8(M_QUOTE),
                Some(&b'0') => dequoted.put_u8(NUL),
                Some(&b'n') => dequoted.put_u8(LF),
                Some(&b'r') => dequoted.put_u8(CR),
                Some(_) | None => {}
            }
        } else {
            dequoted.put_u8(b);
        }
    }

    // framing and X-level pass
    let mut segments = Vec::new();
    let mut part = BytesMut::new();
    let mut inside = false;
    let mut bytes = dequoted.iter();
    while let Some(&b) = bytes.next() {
        if b == X_DELIM {
            if !part.is_empty() {
                let value = part.split().freeze();
                segments.push(if inside {
                    Segment::Ctcp(value)
                } else {
                    Segment::Plain(value)
                });
            }
            inside = !inside;
        } else if b == X_QUOTE {
            match bytes.next() {
                Some(&b'a') => part.put_u8(X_DELIM),
                Some(&X_QUOTE) => part.put_u8(X_QUOTE),
                Some(_) | None => {}
            }
        } else {
            part.put_u8(b);
        }
    }
    // input that stops inside an unterminated framing is surfaced as text
    if !part.is_empty() {
        segments.push(Segment::Plain(part.freeze()));
    }
    segments
}
