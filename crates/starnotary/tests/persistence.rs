//! Chains persisted to SQLite survive a reopen.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use starnotary::store::SqliteStore;
use starnotary::{
    BlockPayload, Chain, FaultKind, Keypair, ManualClock, NotaryError, Registry, Star,
};

const T0_SECS: i64 = 1_736_870_400;

fn register(registry: &Registry<SqliteStore>, wallet: &Keypair, story: &str) -> Result<u64> {
    let message = registry.issue_challenge(&wallet.address()).message();
    let signature = wallet.sign_challenge(&message);
    let block = registry.register_star(
        &wallet.address(),
        &message,
        &signature,
        Star::new("5h 55m 10.3s", "7° 24' 25", story),
    )?;
    Ok(block.height())
}

#[test]
fn resume_from_sqlite() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stars.db");
    let wallet = Keypair::from_seed(&[21; 32]);
    let clock = ManualClock::at_secs(T0_SECS);

    let (genesis, tip) = {
        let chain = Chain::open(SqliteStore::open(&path)?, clock.clone())?;
        let registry = Registry::new(Arc::new(chain));
        assert_eq!(register(&registry, &wallet, "Betelgeuse")?, 1);
        clock.advance(Duration::from_secs(30));
        assert_eq!(register(&registry, &wallet, "Rigel")?, 2);

        let chain = registry.chain();
        (chain.get_by_height(0)?, chain.tip()?)
    };

    clock.advance(Duration::from_secs(3600));
    let chain = Chain::resume(SqliteStore::open(&path)?, clock.clone())?;

    assert_eq!(chain.height()?, Some(2));
    assert_eq!(chain.get_by_height(0)?, genesis);
    assert_eq!(chain.tip()?, tip);
    assert!(chain.validate()?.is_empty());

    // New registrations continue the sequence
    let registry = Registry::new(Arc::new(chain));
    assert_eq!(register(&registry, &wallet, "Sirius")?, 3);

    let stories: Vec<String> = registry
        .stars_owned_by(&wallet.address())?
        .into_iter()
        .map(|record| record.star.story)
        .collect();
    assert_eq!(stories, ["Betelgeuse", "Rigel", "Sirius"]);
    Ok(())
}

#[test]
fn resume_rejects_empty_database() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = SqliteStore::open(dir.path().join("empty.db"))?;

    let result = Chain::resume(store, ManualClock::at_secs(T0_SECS));
    assert!(matches!(result, Err(NotaryError::ChainNotInitialized)));
    Ok(())
}

#[test]
fn rewritten_row_is_flagged_after_resume() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stars.db");
    let wallet = Keypair::from_seed(&[22; 32]);
    let intruder = Keypair::from_seed(&[23; 32]);
    let clock = ManualClock::at_secs(T0_SECS);

    let original_hash = {
        let registry = Registry::new(Arc::new(Chain::open(SqliteStore::open(&path)?, clock.clone())?));
        register(&registry, &wallet, "Vega")?;
        register(&registry, &wallet, "Deneb")?;
        *registry.chain().get_by_height(1)?.expect("block 1").hash()
    };

    // Swap the owner of block 1, leaving its stored hash alone
    let forged = BlockPayload::star(
        intruder.address(),
        Star::new("5h 55m 10.3s", "7° 24' 25", "Vega"),
    )
    .to_bytes()?;
    let conn = rusqlite::Connection::open(&path)?;
    let updated = conn.execute(
        "UPDATE blocks SET payload = ?1 WHERE height = 1",
        rusqlite::params![forged],
    )?;
    assert_eq!(updated, 1);
    drop(conn);

    let chain = Chain::resume(SqliteStore::open(&path)?, clock)?;
    let block = chain.get_by_height(1)?.expect("block 1");
    assert_eq!(*block.hash(), original_hash);
    assert!(!block.is_seal_intact());

    let faults = chain.validate()?;
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].height, 1);
    assert_eq!(faults[0].hash, original_hash);
    assert_eq!(faults[0].kinds, vec![FaultKind::HashMismatch]);
    Ok(())
}
