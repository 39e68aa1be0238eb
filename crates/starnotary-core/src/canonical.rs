//! Canonical CBOR encoding of a block's sealed fields.
//!
//! The block hash is computed over these bytes, so the encoding follows
//! RFC 8949 Core Deterministic Encoding:
//! - Map keys are small integers, written in ascending order
//! - Integers use the smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 milliseconds)
//!
//! **This encoding is frozen.** Changing it changes every block hash and
//! invalidates every stored chain.

use crate::crypto::Blake3Hash;
use crate::types::BlockHash;

/// Domain separation prefix for block hashes.
pub const BLOCK_HASH_DOMAIN: &[u8] = b"starnotary/block-hash/v1";

/// Header field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const HEIGHT: u64 = 0;
    pub const TIMESTAMP: u64 = 1;
    pub const PREVIOUS_HASH: u64 = 2;
    pub const PAYLOAD: u64 = 3;
}

/// Number of entries in the header map.
const HEADER_FIELDS: u64 = 4;

/// Encode the hashed fields of a block to canonical CBOR bytes.
///
/// Format: `{0: height, 1: timestamp, 2: previous_hash | null, 3: payload}`
pub fn canonical_header_bytes(
    height: u64,
    timestamp: i64,
    previous_hash: Option<&BlockHash>,
    payload: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + 64);

    encode_uint(&mut buf, 5, HEADER_FIELDS);

    // 0: height
    encode_uint(&mut buf, 0, keys::HEIGHT);
    encode_uint(&mut buf, 0, height);

    // 1: timestamp
    encode_uint(&mut buf, 0, keys::TIMESTAMP);
    encode_int(&mut buf, timestamp);

    // 2: previous_hash (null or bytes)
    encode_uint(&mut buf, 0, keys::PREVIOUS_HASH);
    match previous_hash {
        Some(hash) => encode_bytes(&mut buf, hash.as_bytes()),
        None => buf.push(0xf6),
    }

    // 3: payload
    encode_uint(&mut buf, 0, keys::PAYLOAD);
    encode_bytes(&mut buf, payload);

    buf
}

/// Compute the seal for a block's fields.
///
/// `hash = blake3(BLOCK_HASH_DOMAIN || canonical_header_bytes(..))`
pub fn compute_block_hash(
    height: u64,
    timestamp: i64,
    previous_hash: Option<&BlockHash>,
    payload: &[u8],
) -> BlockHash {
    let bytes = canonical_header_bytes(height, timestamp, previous_hash, payload);
    BlockHash(Blake3Hash::hash_with_domain(BLOCK_HASH_DOMAIN, &bytes).0)
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciborium::value::Value;

    #[test]
    fn test_header_encoding_deterministic() {
        let prev = BlockHash::from_bytes([0xab; 32]);
        let a = canonical_header_bytes(3, 1736870400000, Some(&prev), b"payload");
        let b = canonical_header_bytes(3, 1736870400000, Some(&prev), b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn test_header_is_valid_cbor_map() {
        let prev = BlockHash::from_bytes([0x11; 32]);
        let bytes = canonical_header_bytes(7, -5, Some(&prev), b"xyz");

        let value: Value = ciborium::from_reader(&bytes[..]).unwrap();
        let entries = match value {
            Value::Map(entries) => entries,
            other => panic!("expected map, got {:?}", other),
        };
        assert_eq!(entries.len(), 4);

        let keys: Vec<i128> = entries
            .iter()
            .map(|(k, _)| match k {
                Value::Integer(i) => (*i).into(),
                other => panic!("expected integer key, got {:?}", other),
            })
            .collect();
        assert_eq!(keys, vec![0, 1, 2, 3]);

        assert_eq!(entries[1].1, Value::Integer((-5i64).into()));
        assert_eq!(entries[2].1, Value::Bytes(vec![0x11; 32]));
        assert_eq!(entries[3].1, Value::Bytes(b"xyz".to_vec()));
    }

    #[test]
    fn test_genesis_previous_is_null() {
        let bytes = canonical_header_bytes(0, 0, None, b"");
        let value: Value = ciborium::from_reader(&bytes[..]).unwrap();
        match value {
            Value::Map(entries) => assert_eq!(entries[2].1, Value::Null),
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();

        // 0-23: single byte
        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        // 24-255: two bytes
        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        // 256-65535: three bytes
        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);

        // negative
        buf.clear();
        encode_int(&mut buf, -1);
        assert_eq!(buf, vec![0x20]);

        buf.clear();
        encode_int(&mut buf, -25);
        assert_eq!(buf, vec![0x38, 24]);
    }

    #[test]
    fn test_hash_depends_on_every_field() {
        let prev = BlockHash::from_bytes([1; 32]);
        let base = compute_block_hash(1, 1000, Some(&prev), b"p");

        assert_ne!(base, compute_block_hash(2, 1000, Some(&prev), b"p"));
        assert_ne!(base, compute_block_hash(1, 1001, Some(&prev), b"p"));
        assert_ne!(base, compute_block_hash(1, 1000, None, b"p"));
        assert_ne!(
            base,
            compute_block_hash(1, 1000, Some(&BlockHash::from_bytes([2; 32])), b"p")
        );
        assert_ne!(base, compute_block_hash(1, 1000, Some(&prev), b"q"));
    }
}
