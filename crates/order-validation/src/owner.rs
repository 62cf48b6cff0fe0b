use {
    crate::OwnershipError,
    alloy::primitives::Address,
    std::sync::{PoisonError, RwLock},
};

/// The trusted authority of a validator. Issues server tokens and is the only
/// account that may hand the role over.
#[derive(Debug)]
pub struct Authority {
    owner: RwLock<Address>,
}

impl Authority {
    pub fn new(owner: Address) -> Self {
        Self {
            owner: RwLock::new(owner),
        }
    }

    pub fn owner(&self) -> Address {
        *self.owner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Transfers the role to `new_owner`. Takes effect immediately.
    pub fn transfer(&self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        let mut owner = self.owner.write().unwrap_or_else(PoisonError::into_inner);
        if *owner != caller {
            return Err(OwnershipError::NotOwner(caller));
        }
        tracing::info!(previous = ?*owner, new = ?new_owner, "ownership transferred");
        *owner = new_owner;
        Ok(())
    }
}
