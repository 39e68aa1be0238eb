//! Proptest generators for property-based testing.

use proptest::prelude::*;

use starnotary_core::{Address, Block, BlockHash, Candidate, Keypair, Star};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a wallet address backed by a real keypair.
pub fn address() -> impl Strategy<Value = Address> {
    keypair().prop_map(|kp| kp.address())
}

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash::from_bytes)
}

/// Generate a timestamp, including pre-epoch values.
pub fn timestamp() -> impl Strategy<Value = i64> {
    -1_000_000_000_000i64..=4_000_000_000_000i64
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a star that passes validation with the default limits.
pub fn star() -> impl Strategy<Value = Star> {
    (
        "[0-9]{1,2}h [0-9]{1,2}m [0-9]{1,2}\\.[0-9]s",
        "-?[0-9]{1,2}° [0-9]{1,2}' [0-9]{1,2}\\.[0-9]",
        proptest::option::of("[0-9]\\.[0-9]{1,2}"),
        proptest::option::of("[A-Z][a-z]{2,12}"),
        "[ -~]{0,500}",
    )
        .prop_map(|(ra, dec, mag, cen, story)| Star {
            ra,
            dec,
            mag,
            cen,
            story,
        })
}

/// Parameters for sealing a block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub height: u64,
    pub timestamp: i64,
    pub previous_hash: Option<BlockHash>,
    pub payload: Vec<u8>,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<u64>(),
            timestamp(),
            proptest::option::of(block_hash()),
            payload(1000),
        )
            .prop_map(|(height, timestamp, previous_hash, payload)| BlockParams {
                height,
                timestamp,
                previous_hash,
                payload,
            })
            .boxed()
    }
}

/// Seal a block from parameters.
pub fn block_from_params(params: &BlockParams) -> Block {
    Block::seal(
        params.height,
        params.timestamp,
        params.previous_hash,
        Candidate::new(params.payload.clone()),
    )
}

/// Generate a sound chain of `1..=max_len` blocks with arbitrary payloads.
pub fn chain(max_len: usize) -> impl Strategy<Value = Vec<Block>> {
    (
        timestamp(),
        prop::collection::vec(payload(64), 1..=max_len),
    )
        .prop_map(|(start, payloads)| {
            let mut blocks: Vec<Block> = Vec::with_capacity(payloads.len());
            for (height, payload) in payloads.into_iter().enumerate() {
                let previous = blocks.last().map(|b| *b.hash());
                blocks.push(Block::seal(
                    height as u64,
                    start + height as i64,
                    previous,
                    Candidate::new(payload),
                ));
            }
            blocks
        })
}
