//! Ownership challenges.
//!
//! A challenge is the message a wallet holder signs to prove control of an
//! address: `"{address}:{unix_seconds}:{protocol_tag}"`. It is stateless;
//! the issue time travels inside the message itself.

use std::fmt;

use crate::crypto::Address;
use crate::error::{CoreError, Result};

/// Default protocol tag embedded in every challenge.
pub const DEFAULT_PROTOCOL_TAG: &str = "starRegistry";

/// A parsed challenge message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// The address the challenge was issued for.
    pub address: Address,
    /// Issue time, Unix seconds (truncated).
    pub issued_at: i64,
    /// Protocol tag.
    pub tag: String,
}

impl Challenge {
    /// Create a challenge.
    pub fn new(address: Address, issued_at: i64, tag: impl Into<String>) -> Self {
        Self {
            address,
            issued_at,
            tag: tag.into(),
        }
    }

    /// Render the message to be signed.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Parse a challenge message.
    pub fn parse(message: &str) -> Result<Self> {
        let mut parts = message.split(':');
        let (Some(address), Some(issued_at), Some(tag), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CoreError::MalformedChallenge(
                "expected address:timestamp:tag".into(),
            ));
        };

        let address = Address::from_hex(address)
            .map_err(|e| CoreError::MalformedChallenge(e.to_string()))?;
        let issued_at = issued_at
            .parse::<i64>()
            .map_err(|e| CoreError::MalformedChallenge(format!("bad timestamp: {e}")))?;
        if tag.is_empty() {
            return Err(CoreError::MalformedChallenge("empty protocol tag".into()));
        }

        Ok(Self::new(address, issued_at, tag))
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.address, self.issued_at, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    #[test]
    fn test_message_format() {
        let address = Keypair::from_seed(&[3; 32]).address();
        let challenge = Challenge::new(address, 1_700_000_000, DEFAULT_PROTOCOL_TAG);

        assert_eq!(
            challenge.message(),
            format!("{}:1700000000:starRegistry", address.to_hex())
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        let address = Keypair::generate().address();
        let challenge = Challenge::new(address, 1_736_870_400, "starRegistry");
        let parsed = Challenge::parse(&challenge.message()).unwrap();
        assert_eq!(parsed, challenge);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let address = Keypair::generate().address().to_hex();

        for message in [
            String::new(),
            "just-text".to_string(),
            format!("{address}:123"),
            format!("{address}:123:tag:extra"),
            format!("{address}:soon:starRegistry"),
            format!("{address}:123:"),
            "zz:123:starRegistry".to_string(),
        ] {
            assert!(
                matches!(Challenge::parse(&message), Err(CoreError::MalformedChallenge(_))),
                "accepted {message:?}"
            );
        }
    }
}
