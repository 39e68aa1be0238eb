//! # Star Notary Core
//!
//! Pure primitives for Star Notary: sealed blocks, canonical encoding,
//! wallet signatures, ownership challenges and star payloads.
//!
//! This crate contains no I/O, no storage, no clock. It is pure computation
//! over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - A sealed, immutable chain entry
//! - [`BlockHash`] - Content-addressed seal (Blake3 hash)
//! - [`Address`] / [`WalletSignature`] - Wallet identity and proof
//! - [`OwnershipVerifier`] - Seam for signature verification
//! - [`Challenge`] - The message a wallet signs
//! - [`BlockPayload`] - Genesis marker or star registration
//!
//! ## Canonicalization
//!
//! Block hashes are computed over deterministic CBOR. See [`canonical`].

pub mod block;
pub mod canonical;
pub mod challenge;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod types;
pub mod validation;

pub use block::{Block, Candidate};
pub use canonical::{canonical_header_bytes, compute_block_hash};
pub use challenge::{Challenge, DEFAULT_PROTOCOL_TAG};
pub use crypto::{Address, Blake3Hash, Ed25519Verifier, Keypair, OwnershipVerifier, WalletSignature};
pub use error::{CoreError, FaultKind, IntegrityFault};
pub use payload::{BlockPayload, Star, StarRecord, GENESIS_MARKER, MAX_STORY_BYTES};
pub use types::BlockHash;
pub use validation::{fault_report, validate_block};
