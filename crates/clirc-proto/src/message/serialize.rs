//! Wire-format serialization for [`Message`].

use std::fmt::{self, Display, Formatter};

use bytes::{BufMut, Bytes, BytesMut};

use super::types::Message;

/// The last parameter needs a `:` sentinel when it could not be read back
/// as a middle parameter.
fn needs_trailing_sentinel(param: &[u8]) -> bool {
    param.is_empty() || param.first() == Some(&b':') || param.contains(&b' ')
}

impl Message {
    /// Serialize to the wire form, terminated by CRLF.
    ///
    /// Sections are emitted in wire order: tags, prefix, command, middle
    /// parameters, trailing parameter. The trailing parameter is prefixed
    /// with `:` whenever it is empty, contains a space, or begins with `:`.
    ///
    /// # Example
    ///
    /// ```
    /// use clirc_proto::{Message, Prefix};
    ///
    /// let msg = Message::new("PRIVMSG")
    ///     .with_prefix(Prefix::new("dan").with_username("d").with_host("localhost"))
    ///     .with_param("#chan")
    ///     .with_param("Hey!");
    /// assert_eq!(&msg.to_bytes()[..], b":dan!d@localhost PRIVMSG #chan Hey!\r\n");
    /// ```
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(64);

        if !self.tags.is_empty() {
            out.put_u8(b'@');
            for (i, tag) in self.tags.iter().enumerate() {
                if i > 0 {
                    out.put_u8(b';');
                }
                if !tag.vendor.is_empty() {
                    out.put_slice(&tag.vendor);
                    out.put_u8(b'/');
                }
                out.put_slice(&tag.key);
                if !tag.value.is_empty() {
                    out.put_u8(b'=');
                    out.put_slice(&tag.value);
                }
            }
            out.put_u8(b' ');
        }

        if !self.prefix.is_empty() {
            out.put_u8(b':');
            out.put_slice(&self.prefix.name);
            if !self.prefix.username.is_empty() {
                out.put_u8(b'!');
                out.put_slice(&self.prefix.username);
            }
            if !self.prefix.host.is_empty() {
                out.put_u8(b'@');
                out.put_slice(&self.prefix.host);
            }
            out.put_u8(b' ');
        }

        out.put_slice(&self.command);

        if let Some((trailing, middles)) = self.params.split_last() {
            for param in middles {
                out.put_u8(b' ');
                out.put_slice(param);
            }
            out.put_u8(b' ');
            if needs_trailing_sentinel(trailing) {
                out.put_u8(b':');
            }
            out.put_slice(trailing);
        }

        out.put_slice(b"\r\n");
        out.freeze()
    }
}

impl Display for Message {
    /// Lossy human-readable rendering of the wire form, without the CRLF.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let wire = self.to_bytes();
        let text = String::from_utf8_lossy(&wire);
        f.write_str(text.trim_end_matches("\r\n"))
    }
}

#[cfg(test)]
mod tests {
    use crate::message::{Message, Prefix, Tag};

    #[test]
    fn test_command_only() {
        assert_eq!(&Message::new("TESTING").to_bytes()[..], b"TESTING\r\n");
    }

    #[test]
    fn test_tags_and_prefix() {
        let msg = Message::new("CAP")
            .with_tag(Tag::new("id").with_value("123AB"))
            .with_tag(Tag::new("rose"))
            .with_prefix(Prefix::new("irc.example.com"));
        assert_eq!(
            &msg.to_bytes()[..],
            b"@id=123AB;rose :irc.example.com CAP\r\n"
        );
    }

    #[test]
    fn test_vendored_tag() {
        let msg = Message::new("CAP").with_tag(
            Tag::new("id")
                .with_vendor("localhost")
                .with_value("123AB"),
        );
        assert_eq!(&msg.to_bytes()[..], b"@localhost/id=123AB CAP\r\n");
    }

    #[test]
    fn test_empty_trailing_keeps_sentinel() {
        let msg = Message::new("CAP")
            .with_prefix(Prefix::new("irc.example.com"))
            .with_param("*")
            .with_param("LIST")
            .with_param("");
        assert_eq!(&msg.to_bytes()[..], b":irc.example.com CAP * LIST :\r\n");
    }

    #[test]
    fn test_spaced_trailing_gets_sentinel() {
        let msg = Message::new("PRIVMSG")
            .with_param("#chan")
            .with_param("Hey there!");
        assert_eq!(&msg.to_bytes()[..], b"PRIVMSG #chan :Hey there!\r\n");
    }

    #[test]
    fn test_display_is_lossy_and_unterminated() {
        let msg = Message::new("PING").with_param("server");
        assert_eq!(msg.to_string(), "PING server");
    }
}
