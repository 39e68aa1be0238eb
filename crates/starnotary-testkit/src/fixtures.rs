//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a registry over an in-memory
//! chain, a wallet, and a clock the test controls.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use starnotary::{Chain, ManualClock, Registry};
use starnotary_core::{Address, Block, Keypair, Star, WalletSignature};
use starnotary_store::{MemoryStore, SqliteStore};

/// Unix seconds every fixture clock starts at (2025-01-14T16:00:00Z).
pub const FIXTURE_EPOCH_SECS: i64 = 1_736_870_400;

/// A registry over a fresh in-memory chain, with one wallet and a manual
/// clock.
pub struct TestFixture {
    pub wallet: Keypair,
    pub clock: ManualClock,
    pub store: Arc<MemoryStore>,
    pub registry: Registry<Arc<MemoryStore>>,
}

impl TestFixture {
    /// Create a fixture with a random wallet.
    pub fn new() -> Result<Self> {
        Self::with_seed(rand::random())
    }

    /// Create a fixture with a deterministic wallet.
    pub fn with_seed(seed: [u8; 32]) -> Result<Self> {
        let clock = ManualClock::at_secs(FIXTURE_EPOCH_SECS);
        let store = Arc::new(MemoryStore::new());
        let chain = Chain::open(Arc::clone(&store), clock.clone())?;

        Ok(Self {
            wallet: Keypair::from_seed(&seed),
            clock,
            store,
            registry: Registry::new(Arc::new(chain)),
        })
    }

    /// The fixture wallet's address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// The chain behind the registry.
    pub fn chain(&self) -> &Chain<Arc<MemoryStore>> {
        self.registry.chain()
    }

    /// Issue a challenge for `wallet` and sign it.
    pub fn signed_challenge(&self, wallet: &Keypair) -> (String, WalletSignature) {
        let message = self.registry.issue_challenge(&wallet.address()).message();
        let signature = wallet.sign_challenge(&message);
        (message, signature)
    }

    /// Register a star with the fixture wallet.
    pub fn register(&self, star: Star) -> starnotary::Result<Block> {
        self.register_as(&self.wallet, star)
    }

    /// Register a star with any wallet.
    pub fn register_as(&self, wallet: &Keypair, star: Star) -> starnotary::Result<Block> {
        let (message, signature) = self.signed_challenge(wallet);
        self.registry
            .register_star(&wallet.address(), &message, &signature, star)
    }

    /// Move the fixture clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

/// A registry over a SQLite chain at `path`, opened or resumed.
pub fn sqlite_registry(path: impl AsRef<Path>, clock: ManualClock) -> Result<Registry<SqliteStore>> {
    let chain = Chain::open(SqliteStore::open(path)?, clock)?;
    Ok(Registry::new(Arc::new(chain)))
}

/// A star with a numbered story.
pub fn sample_star(n: usize) -> Star {
    Star::new("16h 29m 1.0s", "-26° 29' 24.9", format!("Sample star #{n}"))
}

/// Create deterministic wallets for multi-party tests.
pub fn multi_party_wallets(count: usize) -> Vec<Keypair> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
            Keypair::from_seed(&seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_starts_at_genesis() {
        let fixture = TestFixture::with_seed([1; 32]).unwrap();
        assert_eq!(fixture.chain().height().unwrap(), Some(0));
        assert_eq!(fixture.address(), Keypair::from_seed(&[1; 32]).address());
    }

    #[test]
    fn test_fixture_register() {
        let fixture = TestFixture::new().unwrap();
        let block = fixture.register(sample_star(1)).unwrap();

        assert_eq!(block.height(), 1);
        assert_eq!(
            fixture.registry.stars_owned_by(&fixture.address()).unwrap()[0].star,
            sample_star(1)
        );
    }

    #[test]
    fn test_multi_party() {
        let wallets = multi_party_wallets(3);

        // Each party has a unique address
        let addresses: Vec<_> = wallets.iter().map(|w| w.address()).collect();
        assert_ne!(addresses[0], addresses[1]);
        assert_ne!(addresses[1], addresses[2]);
        assert_ne!(addresses[0], addresses[2]);
    }

    #[test]
    fn test_sqlite_registry_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.db");
        let clock = ManualClock::at_secs(FIXTURE_EPOCH_SECS);
        let wallet = Keypair::from_seed(&[5; 32]);

        {
            let registry = sqlite_registry(&path, clock.clone()).unwrap();
            let message = registry.issue_challenge(&wallet.address()).message();
            let signature = wallet.sign_challenge(&message);
            registry
                .register_star(&wallet.address(), &message, &signature, sample_star(0))
                .unwrap();
        }

        let registry = sqlite_registry(&path, clock).unwrap();
        assert_eq!(registry.chain().height().unwrap(), Some(1));
        assert_eq!(registry.blocks_owned_by(&wallet.address()).unwrap().len(), 1);
    }
}
