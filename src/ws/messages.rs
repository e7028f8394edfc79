//! Live-protocol message classification and reply payloads.
//!
//! The protocol is plain text: `exchange <days>` asks for a private rate
//! table, anything else is chat and is relayed to every client.

use serde::Serialize;

/// Prefix that marks a text frame as a lookup command.
pub const EXCHANGE_PREFIX: &str = "exchange";

/// Reply sent for lookup commands without a usable day count.
pub const USAGE: &str = "Usage: exchange <days>";

/// Classification of one inbound text frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `exchange <days>` with an integer argument (not yet range-checked).
    Exchange(i64),
    /// Starts with `exchange` but the argument is missing or not an integer.
    Malformed,
    /// Anything else, relayed verbatim.
    Chat(&'a str),
}

impl<'a> Command<'a> {
    /// Classifies `text`.
    ///
    /// Matching is on the literal prefix, so `exchange` must be the first
    /// characters of the frame; the day count is the second
    /// whitespace-separated token.
    #[must_use]
    pub fn parse(text: &'a str) -> Self {
        if !text.starts_with(EXCHANGE_PREFIX) {
            return Self::Chat(text);
        }
        match text.split_whitespace().nth(1).map(str::parse::<i64>) {
            Some(Ok(days)) => Self::Exchange(days),
            _ => Self::Malformed,
        }
    }
}

/// Flat `{"error": "..."}` payload sent privately to the originating client.
#[derive(Debug, Serialize)]
pub struct ErrorReply<'a> {
    /// Human-readable reason.
    pub error: &'a str,
}

impl<'a> ErrorReply<'a> {
    /// The usage reply for malformed lookup commands.
    #[must_use]
    pub const fn usage() -> Self {
        Self { error: USAGE }
    }

    /// An error reply carrying `message`.
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { error: message }
    }

    /// Encodes the reply as JSON text.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot occur for this shape in
    /// practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(Command::parse("hello all"), Command::Chat("hello all"));
        assert_eq!(Command::parse(""), Command::Chat(""));
        assert_eq!(Command::parse("  exchange 3"), Command::Chat("  exchange 3"));
        assert_eq!(Command::parse("{\"json\": 1}"), Command::Chat("{\"json\": 1}"));
    }

    #[test]
    fn exchange_with_integer_argument() {
        assert_eq!(Command::parse("exchange 3"), Command::Exchange(3));
        assert_eq!(Command::parse("exchange   7  extra"), Command::Exchange(7));
        assert_eq!(Command::parse("exchange -2"), Command::Exchange(-2));
    }

    #[test]
    fn exchange_without_usable_argument_is_malformed() {
        assert_eq!(Command::parse("exchange"), Command::Malformed);
        assert_eq!(Command::parse("exchange abc"), Command::Malformed);
        assert_eq!(Command::parse("exchange 2.5"), Command::Malformed);
        assert_eq!(
            Command::parse("exchange 99999999999999999999999"),
            Command::Malformed
        );
    }

    #[test]
    fn usage_reply_is_literal_payload() {
        assert_eq!(
            ErrorReply::usage().to_json().ok().as_deref(),
            Some(r#"{"error":"Usage: exchange <days>"}"#)
        );
    }
}
