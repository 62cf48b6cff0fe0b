//! A threshold multi-signature contract wallet.
//!
//! Signatures are the concatenation of 65 byte ECDSA signatures by distinct
//! owners, ordered by strictly ascending owner address.

use {
    crate::{ContractSigner, IS_VALID_SIGNATURE_MAGIC_VALUE},
    alloy::{
        primitives::{Address, B256, FixedBytes},
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result, ensure},
    model::signature::EcdsaSignature,
    std::collections::BTreeSet,
};

const SIGNATURE_LEN: usize = 65;

#[derive(Clone, Debug)]
pub struct Multisig {
    owners: BTreeSet<Address>,
    threshold: usize,
}

impl Multisig {
    pub fn new(owners: impl IntoIterator<Item = Address>, threshold: usize) -> Result<Self> {
        let owners: BTreeSet<_> = owners.into_iter().collect();
        ensure!(
            threshold > 0 && threshold <= owners.len(),
            "threshold {threshold} out of range for {} owners",
            owners.len()
        );
        Ok(Self { owners, threshold })
    }

    /// Signs a digest with the given owner keys in the order the wallet
    /// expects.
    pub fn sign(digest: &B256, signers: &[&PrivateKeySigner]) -> Result<Vec<u8>> {
        let mut signers = signers.to_vec();
        signers.sort_by_key(|signer| signer.address());

        let mut signature = Vec::with_capacity(signers.len() * SIGNATURE_LEN);
        for signer in signers {
            signature.extend_from_slice(&EcdsaSignature::sign(digest, signer)?.to_bytes());
        }
        Ok(signature)
    }
}

impl ContractSigner for Multisig {
    fn is_valid_signature(&self, hash: B256, signature: &[u8]) -> Result<FixedBytes<4>> {
        ensure!(
            signature.len() == self.threshold * SIGNATURE_LEN,
            "expected {} signatures",
            self.threshold
        );

        let mut last = Address::ZERO;
        for chunk in signature.chunks_exact(SIGNATURE_LEN) {
            let owner = EcdsaSignature::from_bytes(chunk)?
                .recover(&hash)
                .context("owner signature")?;
            ensure!(owner > last, "owners not in ascending order");
            ensure!(self.owners.contains(&owner), "{owner} is not an owner");
            last = owner;
        }

        Ok(IS_VALID_SIGNATURE_MAGIC_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::keccak256};

    fn key(byte: u8) -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(byte)).unwrap()
    }

    #[test]
    fn accepts_threshold_signatures() {
        let (a, b, c) = (key(1), key(2), key(3));
        let wallet = Multisig::new([a.address(), b.address(), c.address()], 2).unwrap();
        let hash = keccak256("authorization");

        let signature = Multisig::sign(&hash, &[&c, &a]).unwrap();
        assert_eq!(
            wallet.is_valid_signature(hash, &signature).unwrap(),
            IS_VALID_SIGNATURE_MAGIC_VALUE
        );
    }

    #[test]
    fn rejects_too_few_signatures() {
        let (a, b) = (key(1), key(2));
        let wallet = Multisig::new([a.address(), b.address()], 2).unwrap();
        let hash = keccak256("authorization");

        let signature = Multisig::sign(&hash, &[&a]).unwrap();
        assert!(wallet.is_valid_signature(hash, &signature).is_err());
    }

    #[test]
    fn rejects_non_owners() {
        let (a, b) = (key(1), key(2));
        let wallet = Multisig::new([a.address()], 1).unwrap();
        let hash = keccak256("authorization");

        let signature = Multisig::sign(&hash, &[&b]).unwrap();
        assert!(wallet.is_valid_signature(hash, &signature).is_err());
    }

    #[test]
    fn rejects_repeated_owner() {
        let (a, b) = (key(1), key(2));
        let wallet = Multisig::new([a.address(), b.address()], 2).unwrap();
        let hash = keccak256("authorization");

        let signature = Multisig::sign(&hash, &[&a, &a]).unwrap();
        assert!(wallet.is_valid_signature(hash, &signature).is_err());
    }

    #[test]
    fn threshold_must_be_reachable() {
        assert!(Multisig::new([Address::repeat_byte(1)], 0).is_err());
        assert!(Multisig::new([Address::repeat_byte(1)], 2).is_err());
    }
}
