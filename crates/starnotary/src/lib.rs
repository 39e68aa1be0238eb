//! # Star Notary
//!
//! A hash-linked registry of stars. Every registration is a sealed block
//! bound to its predecessor, and only a wallet that proves control of its
//! address gets to append one.
//!
//! ## Overview
//!
//! - **Chain**: an append-only sequence of blocks. Each block's hash covers
//!   its height, timestamp, predecessor hash and payload.
//! - **Registry**: the only way in. It issues a time-boxed challenge, checks
//!   the wallet's signature over it, then appends the star.
//! - **Validation**: a full scan reporting every block whose seal or link
//!   no longer holds.
//!
//! ## Key Concepts
//!
//! - **Genesis**: the first block, created once when a chain is opened on an
//!   empty store.
//! - **Challenge**: `"{address}:{unix_seconds}:starRegistry"`, valid for five
//!   minutes after issue.
//! - **Seal**: a block's hash. Blocks never change after sealing.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use starnotary::{Chain, Registry};
//! use starnotary::core::{Keypair, Star};
//! use starnotary::store::MemoryStore;
//!
//! let chain = Arc::new(Chain::open_with_system_clock(MemoryStore::new()).unwrap());
//! let registry = Registry::new(Arc::clone(&chain));
//!
//! // The wallet signs the challenge outside the registry
//! let wallet = Keypair::generate();
//! let message = registry.issue_challenge(&wallet.address()).message();
//! let signature = wallet.sign_challenge(&message);
//!
//! let star = Star::new("16h 29m 1.0s", "-26° 29' 24.9", "Found it");
//! let block = registry
//!     .register_star(&wallet.address(), &message, &signature, star)
//!     .unwrap();
//!
//! assert_eq!(block.height(), 1);
//! assert!(chain.validate().unwrap().is_empty());
//! ```
//!
//! ## Re-exports
//!
//! - `starnotary::core` - Core primitives (Block, Address, Star, etc.)
//! - `starnotary::store` - Storage abstraction, in-memory and SQLite

pub mod chain;
pub mod clock;
pub mod config;
pub mod error;
mod query;
pub mod registry;

// Re-export component crates
pub use starnotary_core as core;
pub use starnotary_store as store;

// Re-export main types for convenience
pub use chain::Chain;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{NotaryConfig, DEFAULT_CHALLENGE_WINDOW};
pub use error::{NotaryError, Result};
pub use registry::Registry;

// Re-export commonly used core types
pub use starnotary_core::{
    Address, Block, BlockHash, BlockPayload, Challenge, FaultKind, IntegrityFault, Keypair, Star,
    StarRecord, WalletSignature,
};
