//! SQLite implementation of the BlockStore trait.
//!
//! Persistent storage for a chain. Uses rusqlite with bundled SQLite; the
//! connection sits behind a mutex so the store can be shared across threads.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use starnotary_core::{Block, BlockHash};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::BlockStore;

const SELECT_BLOCK: &str = "SELECT height, timestamp, previous_hash, payload, hash FROM blocks";

/// SQLite-based store implementation.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn hash_from_blob(bytes: Vec<u8>, column: usize) -> rusqlite::Result<BlockHash> {
    let arr: [u8; 32] = bytes.try_into().map_err(|_| {
        rusqlite::Error::InvalidColumnType(column, "hash".into(), rusqlite::types::Type::Blob)
    })?;
    Ok(BlockHash::from_bytes(arr))
}

// Helper to convert a row to Block
fn row_to_block(row: &rusqlite::Row<'_>) -> rusqlite::Result<Block> {
    let height: i64 = row.get(0)?;
    let timestamp: i64 = row.get(1)?;
    let previous: Option<Vec<u8>> = row.get(2)?;
    let payload: Vec<u8> = row.get(3)?;
    let hash: Vec<u8> = row.get(4)?;

    let previous_hash = previous.map(|b| hash_from_blob(b, 2)).transpose()?;

    Ok(Block::from_parts(
        height as u64,
        timestamp,
        previous_hash,
        payload,
        hash_from_blob(hash, 4)?,
    ))
}

impl BlockStore for SqliteStore {
    fn push(&self, block: &Block) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let expected: i64 = tx.query_row("SELECT COUNT(*) FROM blocks", [], |row| row.get(0))?;
        if block.height() != expected as u64 {
            return Err(StoreError::HeightConflict {
                expected: expected as u64,
                got: block.height(),
            });
        }

        tx.execute(
            "INSERT INTO blocks (height, hash, previous_hash, timestamp, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                block.height() as i64,
                block.hash().as_bytes().as_slice(),
                block.previous_hash().map(|h| h.as_bytes().as_slice()),
                block.timestamp(),
                &block.payload()[..],
            ],
        )?;

        tx.commit()?;
        tracing::trace!(height = block.height(), hash = %block.hash(), "block written");
        Ok(())
    }

    fn len(&self) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM blocks", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn get_by_height(&self, height: u64) -> Result<Option<Block>> {
        let Ok(height) = i64::try_from(height) else {
            return Ok(None);
        };
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                &format!("{SELECT_BLOCK} WHERE height = ?1"),
                params![height],
                row_to_block,
            )
            .optional()?)
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>> {
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                &format!("{SELECT_BLOCK} WHERE hash = ?1 ORDER BY height ASC LIMIT 1"),
                params![hash.as_bytes().as_slice()],
                row_to_block,
            )
            .optional()?)
    }

    fn range(&self, start: u64, end: u64) -> Result<Vec<Block>> {
        if start >= end {
            return Ok(Vec::new());
        }
        let start = i64::try_from(start).unwrap_or(i64::MAX);
        let end = i64::try_from(end).unwrap_or(i64::MAX);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_BLOCK} WHERE height >= ?1 AND height < ?2 ORDER BY height ASC"
        ))?;
        let blocks = stmt
            .query_map(params![start, end], row_to_block)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(blocks)
    }
}
