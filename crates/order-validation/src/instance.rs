use {
    crate::{
        OwnershipError,
        ValidationError,
        auth::Authenticator,
        fills::{FillKey, FillLedger},
        owner::Authority,
    },
    alloy::primitives::{Address, U256},
    model::{DomainSeparator, OrderHash, SigningDomain},
    std::sync::Arc,
};

/// Where and as what a validator is deployed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deployment {
    pub name: String,
    pub version: String,
    pub address: Address,
    pub owner: Address,
}

/// Accounts allowed to invoke a restricted validator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Callers {
    pub settlement: Address,
    pub aggregator: Option<Address>,
}

impl Callers {
    pub fn check(&self, caller: Address) -> Result<(), ValidationError> {
        if caller == self.settlement || Some(caller) == self.aggregator {
            return Ok(());
        }
        tracing::debug!(?caller, "caller not authorized");
        Err(ValidationError::CallerNotAuthorized)
    }
}

/// State and identity every validator version carries.
#[derive(Debug)]
pub(crate) struct Instance {
    pub address: Address,
    pub auth: Authenticator,
    pub authority: Authority,
    pub ledger: Arc<FillLedger>,
}

impl Instance {
    pub fn new(deployment: Deployment, chain_id: u64) -> Self {
        Self {
            address: deployment.address,
            auth: Authenticator::new(SigningDomain::new(
                deployment.name,
                deployment.version,
                chain_id,
                deployment.address,
            )),
            authority: Authority::new(deployment.owner),
            ledger: Arc::default(),
        }
    }

    pub fn set_owner(&self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        self.authority.transfer(caller, new_owner)
    }

    pub fn filled(&self, order_hash: OrderHash, fulfiller: Address) -> U256 {
        self.ledger.filled(&FillKey {
            order_hash,
            fulfiller,
        })
    }

    pub fn domain_separator(&self, chain_id: u64) -> DomainSeparator {
        self.auth.domain_separator(chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_and_aggregator_may_call() {
        let callers = Callers {
            settlement: Address::repeat_byte(1),
            aggregator: Some(Address::repeat_byte(2)),
        };
        assert!(callers.check(Address::repeat_byte(1)).is_ok());
        assert!(callers.check(Address::repeat_byte(2)).is_ok());
        assert_eq!(
            callers.check(Address::repeat_byte(3)),
            Err(ValidationError::CallerNotAuthorized)
        );
    }

    #[test]
    fn missing_aggregator_admits_nobody_else() {
        let callers = Callers {
            settlement: Address::repeat_byte(1),
            aggregator: None,
        };
        assert_eq!(
            callers.check(Address::ZERO),
            Err(ValidationError::CallerNotAuthorized)
        );
    }
}
