//! The Registry: wallet-gated star registration.
//!
//! Registration is a two-step protocol. The registry issues a challenge
//! message naming the wallet and the current time; the wallet holder signs
//! it and sends it back with the star. The registry checks the challenge is
//! for this wallet and still fresh, verifies the signature, and only then
//! appends a block. Challenges are stateless: everything needed to check
//! one travels inside the message.

use std::sync::Arc;
use std::time::Duration;

use starnotary_core::{
    Address, Block, BlockPayload, Candidate, Challenge, CoreError, Ed25519Verifier,
    OwnershipVerifier, Star, StarRecord, WalletSignature,
};
use starnotary_store::BlockStore;
use tracing::{debug, info, warn};

use crate::chain::Chain;
use crate::config::NotaryConfig;
use crate::error::{NotaryError, Result};

/// Admits star registrations into a chain.
pub struct Registry<S: BlockStore, V: OwnershipVerifier = Ed25519Verifier> {
    chain: Arc<Chain<S>>,
    verifier: V,
    config: NotaryConfig,
}

impl<S: BlockStore> Registry<S> {
    /// Create a registry with the default configuration and Ed25519 wallets.
    pub fn new(chain: Arc<Chain<S>>) -> Self {
        Self {
            chain,
            verifier: Ed25519Verifier,
            config: NotaryConfig::default(),
        }
    }
}

impl<S: BlockStore, V: OwnershipVerifier> Registry<S, V> {
    /// Create a registry with a custom verifier and configuration.
    pub fn with_verifier(chain: Arc<Chain<S>>, verifier: V, config: NotaryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chain,
            verifier,
            config,
        })
    }

    /// The chain registrations are appended to.
    pub fn chain(&self) -> &Arc<Chain<S>> {
        &self.chain
    }

    /// The active configuration.
    pub fn config(&self) -> &NotaryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Challenge
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a challenge for `address` to sign.
    pub fn issue_challenge(&self, address: &Address) -> Challenge {
        let challenge = Challenge::new(
            *address,
            self.chain.clock().now_secs(),
            self.config.protocol_tag.as_str(),
        );
        debug!(%address, issued_at = challenge.issued_at, "challenge issued");
        challenge
    }

    /// Time left before a challenge expires, counted in whole seconds.
    ///
    /// Fails with `ExpiredChallenge` once the window has passed.
    pub fn challenge_window_remaining(&self, message: &str) -> Result<Duration> {
        let challenge = parse_challenge(message)?;
        let elapsed = self.check_age(&challenge)?;
        Ok(self
            .config
            .challenge_window
            .saturating_sub(Duration::from_secs(elapsed)))
    }

    /// Seconds since the challenge was issued, if still inside the window.
    fn check_age(&self, challenge: &Challenge) -> Result<u64> {
        let elapsed = self
            .chain
            .clock()
            .now_secs()
            .checked_sub(challenge.issued_at)
            .and_then(|secs| u64::try_from(secs).ok());
        let Some(elapsed) = elapsed else {
            return Err(NotaryError::MalformedChallenge(
                "challenge timestamp is in the future or out of range".into(),
            ));
        };

        let window_secs = self.config.challenge_window.as_secs();
        if elapsed > window_secs {
            return Err(NotaryError::ExpiredChallenge {
                elapsed_secs: elapsed,
                window_secs,
            });
        }
        Ok(elapsed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a star for `address`.
    ///
    /// `message` is a challenge previously issued for `address`, and
    /// `signature` the wallet's signature over it. Nothing is written unless
    /// every check passes; the sealed block is returned.
    pub fn register_star(
        &self,
        address: &Address,
        message: &str,
        signature: &WalletSignature,
        star: Star,
    ) -> Result<Block> {
        let result = self.try_register(address, message, signature, star);
        match &result {
            Ok(block) => {
                info!(%address, height = block.height(), hash = %block.hash(), "star registered");
            }
            Err(err) if err.is_rejection() => {
                warn!(%address, error = %err, "registration rejected");
            }
            Err(err) => {
                warn!(%address, error = %err, "registration failed");
            }
        }
        result
    }

    fn try_register(
        &self,
        address: &Address,
        message: &str,
        signature: &WalletSignature,
        star: Star,
    ) -> Result<Block> {
        let challenge = parse_challenge(message)?;
        if challenge.address != *address || challenge.tag != self.config.protocol_tag {
            return Err(NotaryError::ChallengeMismatch);
        }

        self.check_age(&challenge)?;

        if !self.verifier.verify(message, address, signature) {
            return Err(NotaryError::InvalidSignature);
        }

        star.validate(self.config.max_story_bytes)
            .map_err(|err| match err {
                CoreError::InvalidStar(reason) => NotaryError::InvalidStar(reason),
                other => NotaryError::Codec(other),
            })?;

        let candidate = Candidate::from_payload(&BlockPayload::star(*address, star))?;
        self.chain.append(candidate)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Every block registered by `owner`.
    pub fn blocks_owned_by(&self, owner: &Address) -> Result<Vec<Block>> {
        self.chain.blocks_owned_by(owner)
    }

    /// Every star registered by `owner`.
    pub fn stars_owned_by(&self, owner: &Address) -> Result<Vec<StarRecord>> {
        self.chain.stars_owned_by(owner)
    }
}

fn parse_challenge(message: &str) -> Result<Challenge> {
    Challenge::parse(message).map_err(|err| match err {
        CoreError::MalformedChallenge(reason) => NotaryError::MalformedChallenge(reason),
        other => NotaryError::MalformedChallenge(other.to_string()),
    })
}
