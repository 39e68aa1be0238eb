//! # Star Notary Testkit
//!
//! Testing utilities for Star Notary.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known block seals with expected outputs for cross-platform verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A registry over an in-memory chain with a controllable clock
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the canonical encoding and the block hash:
//!
//! ```rust
//! use starnotary_testkit::vectors::{all_vectors, verify_vector};
//!
//! for vector in all_vectors() {
//!     assert!(verify_vector(&vector));
//!     println!("{}: {}", vector.name, vector.hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use starnotary_testkit::generators::{block_from_params, BlockParams};
//!
//! proptest! {
//!     #[test]
//!     fn block_hash_is_deterministic(params: BlockParams) {
//!         let b1 = block_from_params(&params);
//!         let b2 = block_from_params(&params);
//!         prop_assert_eq!(b1.hash(), b2.hash());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use starnotary_testkit::fixtures::{sample_star, TestFixture};
//!
//! let fixture = TestFixture::new().unwrap();
//! let block = fixture.register(sample_star(1)).unwrap();
//! assert_eq!(block.height(), 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_wallets, sample_star, TestFixture, FIXTURE_EPOCH_SECS};
pub use generators::{block_from_params, BlockParams};
pub use vectors::{all_vectors, generate_vector, verify_all_vectors, verify_vector, GoldenVector};
