//! Block payloads: the genesis marker and star registrations.
//!
//! Payloads are encoded as CBOR via serde. The chain engine treats the
//! encoded bytes as opaque; only queries decode them.

use serde::{Deserialize, Serialize};

use crate::crypto::Address;
use crate::error::{CoreError, Result};

/// Fixed marker carried by the genesis block.
pub const GENESIS_MARKER: &str = "First block in the chain - Genesis block";

/// Maximum story length in bytes.
pub const MAX_STORY_BYTES: usize = 500;

/// A star registration: celestial coordinates and a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    /// Right ascension, e.g. `16h 29m 1.0s`.
    pub ra: String,

    /// Declination, e.g. `-26° 29' 24.9`.
    pub dec: String,

    /// Magnitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<String>,

    /// Constellation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cen: Option<String>,

    /// Free-text story. Stored hex-encoded.
    #[serde(with = "story_hex")]
    pub story: String,
}

impl Star {
    /// Create a star with the required fields.
    pub fn new(ra: impl Into<String>, dec: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            ra: ra.into(),
            dec: dec.into(),
            mag: None,
            cen: None,
            story: story.into(),
        }
    }

    /// Set the magnitude.
    pub fn with_mag(mut self, mag: impl Into<String>) -> Self {
        self.mag = Some(mag.into());
        self
    }

    /// Set the constellation.
    pub fn with_cen(mut self, cen: impl Into<String>) -> Self {
        self.cen = Some(cen.into());
        self
    }

    /// Check the star is registrable.
    ///
    /// Coordinates must be present; the story must be ASCII and at most
    /// `max_story_bytes` long.
    pub fn validate(&self, max_story_bytes: usize) -> Result<()> {
        if self.ra.trim().is_empty() {
            return Err(CoreError::InvalidStar("missing right ascension".into()));
        }
        if self.dec.trim().is_empty() {
            return Err(CoreError::InvalidStar("missing declination".into()));
        }
        if !self.story.is_ascii() {
            return Err(CoreError::InvalidStar("story must be ASCII".into()));
        }
        if self.story.len() > max_story_bytes {
            return Err(CoreError::InvalidStar(format!(
                "story is {} bytes, limit is {}",
                self.story.len(),
                max_story_bytes
            )));
        }
        Ok(())
    }
}

/// A star together with the wallet that registered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    /// The registering wallet.
    pub owner: Address,
    /// The registered star.
    pub star: Star,
}

/// The decoded payload of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockPayload {
    /// The genesis block: a fixed marker, no owner.
    Genesis { marker: String },
    /// A star registration.
    Star(StarRecord),
}

impl BlockPayload {
    /// The genesis payload.
    pub fn genesis() -> Self {
        BlockPayload::Genesis {
            marker: GENESIS_MARKER.to_string(),
        }
    }

    /// A star registration payload.
    pub fn star(owner: Address, star: Star) -> Self {
        BlockPayload::Star(StarRecord { owner, star })
    }

    /// The registering wallet, if any.
    pub fn owner(&self) -> Option<&Address> {
        match self {
            BlockPayload::Genesis { .. } => None,
            BlockPayload::Star(record) => Some(&record.owner),
        }
    }

    /// The star record, if any.
    pub fn into_star_record(self) -> Option<StarRecord> {
        match self {
            BlockPayload::Genesis { .. } => None,
            BlockPayload::Star(record) => Some(record),
        }
    }

    /// Encode to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Decode from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

/// Stories travel hex-encoded and are decoded for display.
mod story_hex {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(story: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(story.as_bytes()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(&encoded).map_err(D::Error::custom)?;
        String::from_utf8(bytes).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    fn sample_star() -> Star {
        Star::new("16h 29m 1.0s", "-26° 29' 24.9", "Found star using https://www.google.com/sky/")
    }

    #[test]
    fn test_star_payload_roundtrip() {
        let owner = Keypair::from_seed(&[7; 32]).address();
        let payload = BlockPayload::star(owner, sample_star().with_mag("4.2"));

        let bytes = payload.to_bytes().unwrap();
        let decoded = BlockPayload::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, payload);
        assert_eq!(decoded.owner(), Some(&owner));
    }

    #[test]
    fn test_genesis_has_no_owner() {
        let payload = BlockPayload::genesis();
        assert!(payload.owner().is_none());
        assert!(payload.into_star_record().is_none());
    }

    #[test]
    fn test_story_is_hex_encoded_on_the_wire() {
        let star = Star::new("1h", "2d", "hi");
        let json = serde_json::to_value(&star).unwrap();
        assert_eq!(json["story"], "6869");
        assert!(json.get("mag").is_none());

        let back: Star = serde_json::from_value(json).unwrap();
        assert_eq!(back.story, "hi");
    }

    #[test]
    fn test_star_validation() {
        assert!(sample_star().validate(MAX_STORY_BYTES).is_ok());

        let missing_ra = Star::new("  ", "2d", "s");
        assert!(matches!(
            missing_ra.validate(MAX_STORY_BYTES),
            Err(CoreError::InvalidStar(_))
        ));

        let missing_dec = Star::new("1h", "", "s");
        assert!(missing_dec.validate(MAX_STORY_BYTES).is_err());

        let non_ascii = Star::new("1h", "2d", "étoile");
        assert!(non_ascii.validate(MAX_STORY_BYTES).is_err());

        let long = Star::new("1h", "2d", "x".repeat(MAX_STORY_BYTES + 1));
        assert!(long.validate(MAX_STORY_BYTES).is_err());

        let at_limit = Star::new("1h", "2d", "x".repeat(MAX_STORY_BYTES));
        assert!(at_limit.validate(MAX_STORY_BYTES).is_ok());
    }

    #[test]
    fn test_garbage_payload_fails_to_decode() {
        let result = BlockPayload::from_bytes(b"\xff\x00not cbor");
        assert!(matches!(result, Err(CoreError::DecodingError(_))));
    }
}
