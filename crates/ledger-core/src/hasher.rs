//! Canonical block-id computation.
//!
//! The block id is the lowercase-hex SHA-256 digest of the decimal ASCII
//! height concatenated with the block's transaction ids, sorted
//! lexicographically ascending and joined without separators. This encoding
//! is a wire contract; changing it breaks every previously submitted block id.

use sha2::{Digest, Sha256};

/// Compute the canonical block id for a height and set of transaction ids.
///
/// The order of `tx_ids` does not matter; ids are sorted before hashing.
pub fn compute_block_id(height: u64, tx_ids: &[&str]) -> String {
    let mut sorted: Vec<&str> = tx_ids.to_vec();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(height.to_string().as_bytes());
    for id in sorted {
        hasher.update(id.as_bytes());
    }

    hex::encode(hasher.finalize())
}
