//! Message, tag, and prefix types.
//!
//! All fields are [`Bytes`]: IRC is a byte protocol and trailing parameters
//! may legally carry non-UTF-8 content, so nothing here forces a text
//! encoding on the payload. `Bytes` values compare directly against string
//! and byte-slice literals, which keeps call sites readable.

use bytes::Bytes;

/// A parsed IRC message.
///
/// Every message carries a command; tags, prefix, and parameters are
/// optional sections of the wire form. The parser guarantees that an
/// emitted message has a non-empty command consisting either of letters
/// only or of exactly three decimal digits.
///
/// # Example
///
/// ```
/// use clirc_proto::{Message, Tag};
///
/// let msg = Message::new("PRIVMSG")
///     .with_tag(Tag::new("msgid").with_value("abc123"))
///     .with_param("#chan")
///     .with_param("Hello!");
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.tag_value(b"msgid"), Some(&bytes::Bytes::from_static(b"abc123")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Message tags, in wire order. Empty when the `@` section is absent.
    pub tags: Vec<Tag>,
    /// Message prefix. All fields empty when the `:` section is absent.
    pub prefix: Prefix,
    /// The command: letters only, or exactly three digits.
    pub command: Bytes,
    /// Parameters in wire order, including the trailing parameter.
    pub params: Vec<Bytes>,
}

impl Message {
    /// Create a message with the given command and no other sections.
    pub fn new(command: impl Into<Bytes>) -> Self {
        Message {
            command: command.into(),
            ..Message::default()
        }
    }

    /// Attach a prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// Append a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Append a parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<Bytes>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Look up the value of a tag by key, ignoring vendors.
    pub fn tag_value(&self, key: &[u8]) -> Option<&Bytes> {
        self.tags
            .iter()
            .find(|tag| tag.key == *key)
            .map(|tag| &tag.value)
    }

    /// Whether the command is a three-digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.iter().all(|b| b.is_ascii_digit())
    }
}

/// A single IRCv3 message tag.
///
/// The key is mandatory; the vendor is an optional DNS-style namespace, and
/// an absent value is indistinguishable from an empty one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    /// Optional vendor hostname. Empty when the tag is unvendored.
    pub vendor: Bytes,
    /// The tag key. Never empty on parsed tags.
    pub key: Bytes,
    /// The tag value. May be empty.
    pub value: Bytes,
}

impl Tag {
    /// Create an unvendored tag with an empty value.
    pub fn new(key: impl Into<Bytes>) -> Self {
        Tag {
            key: key.into(),
            ..Tag::default()
        }
    }

    /// Set the vendor hostname.
    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<Bytes>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Set the value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Bytes>) -> Self {
        self.value = value.into();
        self
    }
}

/// The origin of a message: a server name or a `nick!user@host` mask.
///
/// The username is present only when the wire form carried `!`, the host
/// only when it carried `@`; both are empty otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prefix {
    /// Server name or nickname.
    pub name: Bytes,
    /// Username, when given with `!`.
    pub username: Bytes,
    /// Hostname, when given with `@`.
    pub host: Bytes,
}

impl Prefix {
    /// Create a prefix with only a name.
    pub fn new(name: impl Into<Bytes>) -> Self {
        Prefix {
            name: name.into(),
            ..Prefix::default()
        }
    }

    /// Set the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<Bytes>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<Bytes>) -> Self {
        self.host = host.into();
        self
    }

    /// Whether the message carried no prefix at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.username.is_empty() && self.host.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let msg = Message::new("CAP")
            .with_prefix(Prefix::new("irc.example.com"))
            .with_param("*")
            .with_param("LIST");
        assert_eq!(msg.command, "CAP");
        assert_eq!(msg.prefix.name, "irc.example.com");
        assert_eq!(msg.params.len(), 2);
    }

    #[test]
    fn test_tag_value_lookup() {
        let msg = Message::new("PRIVMSG")
            .with_tag(Tag::new("id").with_value("123AB"))
            .with_tag(Tag::new("rose"));
        assert_eq!(msg.tag_value(b"id"), Some(&Bytes::from_static(b"123AB")));
        assert_eq!(msg.tag_value(b"rose"), Some(&Bytes::new()));
        assert_eq!(msg.tag_value(b"absent"), None);
    }

    #[test]
    fn test_is_numeric() {
        assert!(Message::new("132").is_numeric());
        assert!(!Message::new("CAP").is_numeric());
        assert!(!Message::new("13").is_numeric());
    }

    #[test]
    fn test_empty_prefix() {
        assert!(Prefix::default().is_empty());
        assert!(!Prefix::new("dan").is_empty());
    }
}
