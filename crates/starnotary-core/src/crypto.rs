//! Cryptographic primitives for Star Notary.
//!
//! Wraps Blake3 hashing and Ed25519 wallet signatures with strong types.
//! A wallet address is the Ed25519 public key of its holder; proving
//! ownership means signing a challenge with the matching secret key.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Domain separation prefix for challenge signatures.
///
/// The wallet signs `CHALLENGE_SIGN_DOMAIN || message`, never the bare
/// message, so a challenge signature cannot be replayed in another protocol.
pub const CHALLENGE_SIGN_DOMAIN: &[u8] = b"starnotary/challenge-sig/v1";

/// A 32-byte Blake3 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blake3Hash(pub [u8; 32]);

impl Blake3Hash {
    /// Compute the Blake3 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Compute the Blake3 hash of `domain || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(data);
        Self(*hasher.finalize().as_bytes())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake3({})", &self.to_hex()[..16])
    }
}

impl From<[u8; 32]> for Blake3Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A wallet address: the 32-byte Ed25519 public key of the holder.
///
/// Rendered and parsed as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidAddress(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidAddress(format!("expected 32 bytes in {s:?}")))?;
        Ok(Self(arr))
    }

    /// Verify a challenge signature made by the holder of this address.
    pub fn verify_challenge(
        &self,
        message: &str,
        signature: &WalletSignature,
    ) -> Result<(), CoreError> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|_| CoreError::InvalidAddress(self.to_hex()))?;

        let sig = Signature::from_bytes(&signature.0);

        verifying_key
            .verify(&challenge_signing_bytes(message), &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..16])
    }
}

/// Full hex, since addresses are embedded in challenge messages.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte Ed25519 signature produced by a wallet over a challenge.
///
/// Travels as hex; see [`WalletSignature::to_hex`] and [`FromStr`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature(pub [u8; 64]);

impl WalletSignature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|_| CoreError::InvalidSignature)?;
        let arr: [u8; 64] = bytes.try_into().map_err(|_| CoreError::InvalidSignature)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletSig({}...)", &self.to_hex()[..16])
    }
}

impl FromStr for WalletSignature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 64]> for WalletSignature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

/// Build the bytes a wallet signs for a challenge message.
pub fn challenge_signing_bytes(message: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(CHALLENGE_SIGN_DOMAIN.len() + message.len());
    buf.extend_from_slice(CHALLENGE_SIGN_DOMAIN);
    buf.extend_from_slice(message.as_bytes());
    buf
}

/// Validates that a signature over a challenge message was produced by
/// the holder of a claimed address.
///
/// Implementations must be pure: the same inputs always give the same answer.
pub trait OwnershipVerifier: Send + Sync {
    /// Return `true` if `signature` over `message` was made by `address`.
    fn verify(&self, message: &str, address: &Address, signature: &WalletSignature) -> bool;
}

/// The default verifier: Ed25519 over the domain-separated challenge.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl OwnershipVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, address: &Address, signature: &WalletSignature) -> bool {
        address.verify_challenge(message, signature).is_ok()
    }
}

impl<V: OwnershipVerifier + ?Sized> OwnershipVerifier for std::sync::Arc<V> {
    fn verify(&self, message: &str, address: &Address, signature: &WalletSignature) -> bool {
        (**self).verify(message, address, signature)
    }
}

/// A wallet keypair: the signing side of the ownership proof.
///
/// The registry never holds one; wallets live with callers. It is here so
/// clients and tests can produce signatures the verifier accepts.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The wallet address controlled by this keypair.
    pub fn address(&self) -> Address {
        Address(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a challenge message.
    pub fn sign_challenge(&self, message: &str) -> WalletSignature {
        let sig = self.signing_key.sign(&challenge_signing_bytes(message));
        WalletSignature(sig.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.address())
    }
}
