//! Merkle proofs over sorted-pair keccak trees.
//!
//! Each parent is `keccak256(min(a, b) || max(a, b))`, so proofs only carry
//! the siblings along the path and not which side they are on.

use {
    crate::ValidationError,
    alloy::primitives::{B256, keccak256},
};

pub fn hash_pair(a: B256, b: B256) -> B256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_slice());
    buf[32..].copy_from_slice(hi.as_slice());
    keccak256(buf)
}

/// Folds the leaf with the siblings, leaf to root. An empty proof yields the
/// leaf itself.
pub fn compute_root(leaf: B256, siblings: &[B256]) -> B256 {
    siblings
        .iter()
        .fold(leaf, |node, sibling| hash_pair(node, *sibling))
}

/// Like [`compute_root`] but rejects empty proofs, so a single leaf can never
/// act as its own root.
pub fn compute_root_non_empty(leaf: B256, siblings: &[B256]) -> Result<B256, ValidationError> {
    if siblings.is_empty() {
        return Err(ValidationError::InsufficientProof);
    }
    Ok(compute_root(leaf, siblings))
}

/// Tree built bottom-up from its leaves. A node without a sibling is promoted
/// to the next level unchanged.
#[derive(Clone, Debug, Default)]
pub struct MerkleTree {
    levels: Vec<Vec<B256>>,
}

impl MerkleTree {
    pub fn new(leaves: Vec<B256>) -> Self {
        if leaves.is_empty() {
            return Self::default();
        }

        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next = level
                .chunks(2)
                .filter_map(|pair| pair.iter().copied().reduce(hash_pair))
                .collect();
            levels.push(next);
        }
        Self { levels }
    }

    pub fn leaves(&self) -> &[B256] {
        self.levels.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn root(&self) -> Option<B256> {
        self.levels.last().and_then(|level| level.first()).copied()
    }

    /// Sibling path from the leaf at `index` to the root.
    pub fn proof(&self, mut index: usize) -> Option<Vec<B256>> {
        if index >= self.leaves().len() {
            return None;
        }

        let mut proof = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            if let Some(sibling) = level.get(index ^ 1) {
                proof.push(*sibling);
            }
            index /= 2;
        }
        Some(proof)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, hex_literal::hex};

    fn leaves(n: u8) -> Vec<B256> {
        (0..n).map(|i| keccak256([i])).collect()
    }

    #[test]
    fn pair_hash_is_commutative() {
        let (a, b) = (B256::repeat_byte(1), B256::repeat_byte(2));
        assert_eq!(hash_pair(a, b), hash_pair(b, a));

        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(a.as_slice());
        buf[32..].copy_from_slice(b.as_slice());
        assert_eq!(hash_pair(b, a), keccak256(buf));
    }

    #[test]
    fn empty_proof_is_the_leaf() {
        let leaf = B256::from(hex!(
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        ));
        assert_eq!(compute_root(leaf, &[]), leaf);
        assert_eq!(
            compute_root_non_empty(leaf, &[]),
            Err(ValidationError::InsufficientProof)
        );
    }

    #[test]
    fn proofs_fold_to_root() {
        for n in 1..=9 {
            let tree = MerkleTree::new(leaves(n));
            let root = tree.root().unwrap();
            for (index, leaf) in tree.leaves().iter().enumerate() {
                let proof = tree.proof(index).unwrap();
                assert_eq!(compute_root(*leaf, &proof), root, "{n} leaves, index {index}");
            }
        }
    }

    #[test]
    fn odd_node_is_promoted() {
        let leaves = leaves(3);
        let tree = MerkleTree::new(leaves.clone());

        let expected = hash_pair(hash_pair(leaves[0], leaves[1]), leaves[2]);
        assert_eq!(tree.root(), Some(expected));
        assert_eq!(tree.proof(2), Some(vec![hash_pair(leaves[0], leaves[1])]));
    }

    #[test]
    fn reordered_proof_gives_different_root() {
        let tree = MerkleTree::new(leaves(8));
        let leaf = tree.leaves()[3];
        let mut proof = tree.proof(3).unwrap();
        proof.swap(0, 2);

        assert_ne!(compute_root(leaf, &proof), tree.root().unwrap());
    }

    #[test]
    fn empty_tree_has_no_root() {
        let tree = MerkleTree::new(Vec::new());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.proof(0), None);
    }
}
