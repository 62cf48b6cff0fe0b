use {
    crate::ContractSigner,
    alloy::primitives::Address,
    std::{collections::HashMap, fmt, sync::Arc},
};

/// Code lookup for the executing chain. Addresses without registered code are
/// externally owned accounts.
#[derive(Clone, Default)]
pub struct Accounts {
    contracts: HashMap<Address, Arc<dyn ContractSigner>>,
}

impl fmt::Debug for Accounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accounts")
            .field("contracts", &self.contracts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Accounts {
    pub fn with_contract(mut self, address: Address, contract: Arc<dyn ContractSigner>) -> Self {
        self.contracts.insert(address, contract);
        self
    }

    pub fn signer(&self, address: Address) -> Signer {
        match self.contracts.get(&address) {
            Some(contract) => Signer::Contract(contract.clone()),
            None => Signer::ExternalKey(address),
        }
    }
}

/// How signatures of an account get verified.
#[derive(Clone)]
pub enum Signer {
    /// The account has no code. Signatures are checked by ECDSA recovery.
    ExternalKey(Address),
    /// The account has code and validates signatures itself.
    Contract(Arc<dyn ContractSigner>),
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExternalKey(address) => f.debug_tuple("ExternalKey").field(address).finish(),
            Self::Contract(_) => f.write_str("Contract"),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::MockContractSigner};

    #[test]
    fn unknown_addresses_are_external_keys() {
        let wallet = Address::repeat_byte(1);
        let accounts =
            Accounts::default().with_contract(wallet, Arc::new(MockContractSigner::new()));

        assert!(matches!(accounts.signer(wallet), Signer::Contract(_)));
        assert!(matches!(
            accounts.signer(Address::repeat_byte(2)),
            Signer::ExternalKey(address) if address == Address::repeat_byte(2)
        ));
    }
}
