//! EIP-712 signing domains.
//!
//! https://eips.ethereum.org/EIPS/eip-712

use {
    alloy::{
        primitives::{Address, B256, U256, hex::FromHexError, keccak256},
        sol_types::SolValue,
    },
    std::{fmt, str::FromStr},
};

/// The EIP-712 domain type used for computing the domain separator.
const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// domainSeparator as defined by EIP-712.
///
/// https://eips.ethereum.org/EIPS/eip-712#definition-of-domainseparator
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct DomainSeparator(pub B256);

impl FromStr for DomainSeparator {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl fmt::Debug for DomainSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DomainSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DomainSeparator {
    pub fn new(name: &str, version: &str, chain_id: u64, verifying_contract: Address) -> Self {
        let encoded = (
            keccak256(DOMAIN_TYPE),
            keccak256(name.as_bytes()),
            keccak256(version.as_bytes()),
            U256::from(chain_id),
            verifying_contract,
        )
            .abi_encode();
        Self(keccak256(encoded))
    }

    /// Combines the separator with the hash of a typed struct into the digest
    /// that is actually signed: `keccak256("\x19\x01" || separator ||
    /// structHash)`.
    pub fn signing_hash(&self, struct_hash: B256) -> B256 {
        let mut message = [0u8; 2 + 32 + 32];
        message[..2].copy_from_slice(b"\x19\x01");
        message[2..34].copy_from_slice(self.0.as_slice());
        message[34..].copy_from_slice(struct_hash.as_slice());
        keccak256(message)
    }
}

/// The signing domain of one validator deployment.
///
/// The separator for the deployment chain is computed once and reused for as
/// long as the executing chain reports the same chain ID. After a chain split
/// the live chain ID differs and the separator is derived again, so
/// signatures issued for one fork can not be replayed on the other.
#[derive(Clone, Debug)]
pub struct SigningDomain {
    name: String,
    version: String,
    verifying_contract: Address,
    cached_chain_id: u64,
    cached_separator: DomainSeparator,
}

impl SigningDomain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        let name = name.into();
        let version = version.into();
        let cached_separator =
            DomainSeparator::new(&name, &version, chain_id, verifying_contract);
        Self {
            name,
            version,
            verifying_contract,
            cached_chain_id: chain_id,
            cached_separator,
        }
    }

    /// Returns the domain separator for the chain that is currently
    /// executing.
    pub fn separator(&self, chain_id: u64) -> DomainSeparator {
        if chain_id == self.cached_chain_id {
            return self.cached_separator;
        }
        DomainSeparator::new(&self.name, &self.version, chain_id, self.verifying_contract)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::{primitives::address, sol_types::Eip712Domain},
        hex_literal::hex,
    };

    #[test]
    fn domain_separator_from_str() {
        assert!(
            DomainSeparator::from_str(
                "9d7e07ef92761aa9453ae5ff25083a2b19764131b15295d3c7e89f1f1b8c67d9"
            )
            .is_ok()
        );
        assert!(DomainSeparator::from_str("0x9d7e").is_err());
    }

    #[test]
    fn domain_separator_goerli() {
        // Separator of the settlement deployment at
        // 0x9008D19f58AAbD9eD0D60971565AA8510560ab41 on goerli.
        let separator = DomainSeparator::new(
            "Gnosis Protocol",
            "v2",
            5,
            address!("9008D19f58AAbD9eD0D60971565AA8510560ab41"),
        );
        assert_eq!(
            separator,
            DomainSeparator(B256::new(hex!(
                "fb378b35457022ecc5709ae5dafad9393c1387ae6d8ce24913a0c969074c07fb"
            )))
        );
    }

    #[test]
    fn matches_alloy_domain() {
        let contract = address!("00000000000000000000000000000000000000aa");
        let domain = Eip712Domain::new(
            Some("MerkleAuthorizer".into()),
            Some("3".into()),
            Some(U256::from(10)),
            Some(contract),
            None,
        );
        assert_eq!(
            DomainSeparator::new("MerkleAuthorizer", "3", 10, contract).0,
            domain.separator()
        );
    }

    #[test]
    fn cached_separator_is_reused_on_the_deployment_chain() {
        let contract = address!("00000000000000000000000000000000000000aa");
        let domain = SigningDomain::new("Authorizer", "1", 1, contract);
        assert_eq!(
            domain.separator(1),
            DomainSeparator::new("Authorizer", "1", 1, contract)
        );
    }

    #[test]
    fn separator_is_recomputed_after_a_chain_split() {
        let contract = address!("00000000000000000000000000000000000000aa");
        let domain = SigningDomain::new("Authorizer", "1", 1, contract);

        let forked = domain.separator(2);
        assert_ne!(forked, domain.separator(1));
        assert_eq!(forked, DomainSeparator::new("Authorizer", "1", 2, contract));
    }

    #[test]
    fn signing_hash_prefixes_domain() {
        let separator = DomainSeparator(B256::repeat_byte(1));
        let struct_hash = B256::repeat_byte(2);

        let mut expected = vec![0x19, 0x01];
        expected.extend_from_slice(&[1; 32]);
        expected.extend_from_slice(&[2; 32]);
        assert_eq!(separator.signing_hash(struct_hash), keccak256(expected));
    }
}
