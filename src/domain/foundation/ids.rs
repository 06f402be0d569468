//! Strongly-typed identifier value objects.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a uuid-backed identifier newtype.
///
/// Every entity id has the same shape: random v4 on creation, parsed from the
/// hyphenated string form on the way in, serialized transparently.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(
    /// Unique identifier for a live session.
    SessionId
);
define_id!(
    /// Unique identifier for an audience question.
    QuestionId
);
define_id!(
    /// Unique identifier for a poll.
    PollId
);
define_id!(
    /// Unique identifier for a single poll option.
    OptionId
);
define_id!(
    /// Unique identifier for a word cloud.
    WordCloudId
);
define_id!(
    /// Unique identifier for a word inside a word cloud.
    WordId
);
define_id!(
    /// Unique identifier for a Q&A prompt.
    QnaPromptId
);

/// Maximum accepted length of a client-supplied voter identity.
pub const CLIENT_ID_MAX_LEN: usize = 64;

/// Voter identity supplied by an audience client.
///
/// Used only for vote deduplication; it is not authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a ClientId, rejecting empty or oversized values.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("client_id"));
        }
        if id.chars().count() > CLIENT_ID_MAX_LEN {
            return Err(ValidationError::too_long("client_id", CLIENT_ID_MAX_LEN));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alphabet used for join codes. Omits I, O, 0 and 1.
pub const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of characters in a join code.
pub const JOIN_CODE_LEN: usize = 6;

/// Short human-enterable code audience members use to find a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    /// Draws a random code from [`JOIN_CODE_ALPHABET`].
    pub fn random(rng: &mut impl Rng) -> Self {
        let code = (0..JOIN_CODE_LEN)
            .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Parses user input, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let code = input.trim().to_ascii_uppercase();
        if code.len() != JOIN_CODE_LEN {
            return Err(ValidationError::invalid_format(
                "code",
                format!("expected {} characters", JOIN_CODE_LEN),
            ));
        }
        if !code.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b)) {
            return Err(ValidationError::invalid_format(
                "code",
                "contains characters outside the join-code alphabet",
            ));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_roundtrips_through_string() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn ids_of_same_kind_are_unique() {
        assert_ne!(PollId::new(), PollId::new());
    }

    #[test]
    fn id_rejects_garbage() {
        assert!("not-a-uuid".parse::<QuestionId>().is_err());
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = WordCloudId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn client_id_rejects_empty() {
        assert!(ClientId::new("").is_err());
        assert!(ClientId::new("   ").is_err());
    }

    #[test]
    fn client_id_rejects_oversized() {
        assert!(ClientId::new("x".repeat(CLIENT_ID_MAX_LEN)).is_ok());
        assert!(ClientId::new("x".repeat(CLIENT_ID_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn random_join_code_uses_alphabet_and_length() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let code = JoinCode::random(&mut rng);
            assert_eq!(code.as_str().len(), JOIN_CODE_LEN);
            assert!(code.as_str().bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn join_code_parse_is_case_insensitive() {
        let code = JoinCode::parse(" abc234 ").unwrap();
        assert_eq!(code.as_str(), "ABC234");
    }

    #[test]
    fn join_code_parse_rejects_ambiguous_characters() {
        // O and 0 are excluded from the alphabet
        assert!(JoinCode::parse("ABCDO0").is_err());
    }

    #[test]
    fn join_code_parse_rejects_wrong_length() {
        assert!(JoinCode::parse("ABC").is_err());
        assert!(JoinCode::parse("ABCDEFG").is_err());
    }
}
