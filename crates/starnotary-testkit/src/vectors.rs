//! Golden test vectors for block sealing.
//!
//! Each vector fixes the inputs to a block seal and records every derived
//! output in hex. Any implementation reading a Star Notary chain must
//! produce identical:
//! - canonical_bytes
//! - hash (Blake3 over the domain prefix and canonical_bytes)
//!
//! Vectors serialize to JSON so they can be shipped alongside other
//! implementations.

use serde::{Deserialize, Serialize};

use starnotary_core::canonical::BLOCK_HASH_DOMAIN;
use starnotary_core::{
    canonical_header_bytes, compute_block_hash, BlockHash, BlockPayload, Keypair, Star,
};

/// A single golden test vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,

    // Inputs
    pub height: u64,
    pub timestamp: i64,
    pub previous_hash: Option<String>, // 32 bytes hex
    pub payload: String,               // hex

    // Derived outputs
    pub canonical_bytes: String, // hex
    pub hash: String,            // 32 bytes hex
}

/// Build a vector from inputs, deriving the outputs.
pub fn generate_vector(
    name: &str,
    height: u64,
    timestamp: i64,
    previous_hash: Option<BlockHash>,
    payload: &[u8],
) -> GoldenVector {
    let canonical = canonical_header_bytes(height, timestamp, previous_hash.as_ref(), payload);
    let hash = compute_block_hash(height, timestamp, previous_hash.as_ref(), payload);

    GoldenVector {
        name: name.to_string(),
        height,
        timestamp,
        previous_hash: previous_hash.map(|h| h.to_hex()),
        payload: hex::encode(payload),
        canonical_bytes: hex::encode(canonical),
        hash: hash.to_hex(),
    }
}

/// Get all golden test vectors.
///
/// The set is a small chain: genesis, a star registration linked to it,
/// and edge cases for the integer encodings.
pub fn all_vectors() -> Vec<GoldenVector> {
    let genesis_payload = BlockPayload::genesis()
        .to_bytes()
        .expect("genesis payload encodes");
    let genesis = generate_vector("genesis", 0, 1_736_870_400_000, None, &genesis_payload);

    let owner = Keypair::from_seed(&[0x42; 32]).address();
    let star_payload = BlockPayload::star(
        owner,
        Star::new("16h 29m 1.0s", "-26° 29' 24.9", "Found star using https://www.google.com/sky/"),
    )
    .to_bytes()
    .expect("star payload encodes");
    let star = generate_vector(
        "first star registration",
        1,
        1_736_870_401_000,
        BlockHash::from_hex(&genesis.hash).ok(),
        &star_payload,
    );

    vec![
        genesis,
        star,
        generate_vector("empty payload", 2, 0, Some(BlockHash::from_bytes([0xaa; 32])), b""),
        generate_vector("pre-epoch timestamp", 3, -1, Some(BlockHash::from_bytes([0x01; 32])), b"x"),
        generate_vector(
            "large integers",
            u64::MAX,
            i64::MIN,
            Some(BlockHash::from_bytes([0xff; 32])),
            &[0u8; 300],
        ),
    ]
}

/// Recompute a vector's outputs from its inputs.
///
/// Returns `false` if any derived field disagrees or an input fails to parse.
pub fn verify_vector(vector: &GoldenVector) -> bool {
    let Ok(payload) = hex::decode(&vector.payload) else {
        return false;
    };
    let previous_hash = match vector.previous_hash.as_deref().map(BlockHash::from_hex) {
        None => None,
        Some(Ok(hash)) => Some(hash),
        Some(Err(_)) => return false,
    };

    let regenerated = generate_vector(
        &vector.name,
        vector.height,
        vector.timestamp,
        previous_hash,
        &payload,
    );
    regenerated == *vector
}

/// Verify every golden vector, reporting `(name, ok, hash)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| (v.name.clone(), verify_vector(v), v.hash.clone()))
        .collect()
}

/// Serialize vectors to pretty JSON.
pub fn vectors_to_json(vectors: &[GoldenVector]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(vectors)
}

/// Parse vectors from JSON.
pub fn vectors_from_json(json: &str) -> serde_json::Result<Vec<GoldenVector>> {
    serde_json::from_str(json)
}
