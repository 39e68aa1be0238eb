//! Block validation: seal recomputation and linkage checks.
//!
//! These are pure functions over blocks. Looking blocks up is the caller's
//! job; the chain engine resolves the predecessor and passes it in.

use crate::block::Block;
use crate::error::{FaultKind, IntegrityFault};

/// Check a block's seal and its link to the resolved predecessor.
///
/// `predecessor` is whatever the block's `previous_hash` resolved to by hash
/// lookup (`None` if nothing matched). Returns every failed check; an empty
/// vector means the block is sound.
///
/// This performs:
/// - Seal recomputation (stored hash vs. hash of the fields)
/// - Genesis must not declare a predecessor
/// - Non-genesis must declare a predecessor that exists
/// - The predecessor must be the block at `height - 1`
pub fn validate_block(block: &Block, predecessor: Option<&Block>) -> Vec<FaultKind> {
    let mut faults = Vec::new();

    // 1. Seal
    if !block.is_seal_intact() {
        faults.push(FaultKind::HashMismatch);
    }

    // 2. Genesis has no predecessor
    if block.is_genesis() {
        if block.previous_hash().is_some() {
            faults.push(FaultKind::GenesisHasPredecessor);
        }
        return faults;
    }

    // 3. Predecessor must resolve
    let Some(declared) = block.previous_hash() else {
        faults.push(FaultKind::MissingLink);
        return faults;
    };
    let Some(predecessor) = predecessor else {
        faults.push(FaultKind::MissingPredecessor);
        return faults;
    };

    // 4. ...to the block directly below
    if predecessor.hash() != declared || predecessor.height() + 1 != block.height() {
        faults.push(FaultKind::LinkMismatch);
    }

    faults
}

/// Wrap a block's faults into an [`IntegrityFault`], or `None` if it passed.
pub fn fault_report(block: &Block, kinds: Vec<FaultKind>) -> Option<IntegrityFault> {
    if kinds.is_empty() {
        None
    } else {
        Some(IntegrityFault {
            height: block.height(),
            hash: *block.hash(),
            kinds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Candidate;
    use crate::types::BlockHash;

    fn genesis() -> Block {
        Block::seal(0, 1000, None, Candidate::new(b"genesis".to_vec()))
    }

    fn child(parent: &Block, payload: &[u8]) -> Block {
        Block::seal(
            parent.height() + 1,
            parent.timestamp() + 1,
            Some(*parent.hash()),
            Candidate::new(payload.to_vec()),
        )
    }

    #[test]
    fn test_valid_genesis() {
        assert!(validate_block(&genesis(), None).is_empty());
    }

    #[test]
    fn test_valid_child() {
        let g = genesis();
        let c = child(&g, b"one");
        assert!(validate_block(&c, Some(&g)).is_empty());
    }

    #[test]
    fn test_tampered_payload_detected() {
        let g = genesis();
        let c = child(&g, b"one");
        let tampered = Block::from_parts(
            c.height(),
            c.timestamp(),
            c.previous_hash().copied(),
            b"two".to_vec(),
            *c.hash(),
        );

        assert_eq!(validate_block(&tampered, Some(&g)), vec![FaultKind::HashMismatch]);
    }

    #[test]
    fn test_missing_predecessor() {
        let g = genesis();
        let c = child(&g, b"one");
        assert_eq!(validate_block(&c, None), vec![FaultKind::MissingPredecessor]);
    }

    #[test]
    fn test_predecessor_at_wrong_height() {
        let g = genesis();
        let one = child(&g, b"one");
        let two = child(&one, b"two");

        // A block at height 3 pointing at genesis: resolves, but not adjacent
        let skip = Block::seal(3, 2000, Some(*g.hash()), Candidate::new(b"skip".to_vec()));
        assert_eq!(validate_block(&skip, Some(&g)), vec![FaultKind::LinkMismatch]);
        assert!(validate_block(&two, Some(&one)).is_empty());
    }

    #[test]
    fn test_non_genesis_without_link() {
        let orphan = Block::seal(4, 1000, None, Candidate::new(b"orphan".to_vec()));
        assert_eq!(validate_block(&orphan, None), vec![FaultKind::MissingLink]);
    }

    #[test]
    fn test_genesis_with_predecessor() {
        let bad = Block::seal(
            0,
            1000,
            Some(BlockHash::from_bytes([1; 32])),
            Candidate::new(b"g".to_vec()),
        );
        assert_eq!(validate_block(&bad, None), vec![FaultKind::GenesisHasPredecessor]);
    }

    #[test]
    fn test_fault_report() {
        let g = genesis();
        assert!(fault_report(&g, vec![]).is_none());

        let report = fault_report(&g, vec![FaultKind::HashMismatch]).unwrap();
        assert_eq!(report.height, 0);
        assert_eq!(report.hash, *g.hash());
        assert!(report.has(FaultKind::HashMismatch));
    }
}
