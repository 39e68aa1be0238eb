//! # Star Notary Store
//!
//! Storage abstraction for Star Notary. Provides a trait-based interface
//! for block persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The chain engine never touches a database directly; it talks to the
//! [`BlockStore`] trait. [`SqliteStore`] persists a chain to disk,
//! [`MemoryStore`] keeps it in process memory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starnotary_store::{BlockStore, SqliteStore};
//!
//! // Open a SQLite database
//! let store = SqliteStore::open("chain.db").unwrap();
//!
//! // Or use an in-memory database for testing
//! let store = SqliteStore::open_memory().unwrap();
//! assert_eq!(store.len().unwrap(), 0);
//! ```
//!
//! ## Design Notes
//!
//! - **Append-only**: blocks are pushed, never updated or removed
//! - **Dense heights**: a push at any height but the next free one fails
//!   with `HeightConflict`
//! - **Raw rehydration**: stored hashes are loaded as-is, never recomputed,
//!   so tampering stays detectable

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{BlockStore, BlockStoreExt};
