//! Merkle validator.
//!
//! The offerer commits to a merkle tree of `(fulfiller, minFill, maxFill)`
//! leaves and signs its root together with a validity window. Fills are
//! measured in the amount of the first offer item. Only the settlement
//! protocol and the aggregator may invoke it.

use {
    crate::{
        Call,
        Callers,
        Deployment,
        OrderValidating,
        OwnershipError,
        ValidationError,
        fills::{FillBounds, FillKey},
        instance::Instance,
        merkle,
        window::TimeWindow,
    },
    alloy::{
        primitives::{Address, B256, U256, keccak256},
        sol,
        sol_types::{SolStruct, SolValue},
    },
    model::{DomainSeparator, MagicValue, OrderHash, ZoneParameters, payload::MerklePayload},
    tracing::instrument,
};

sol! {
    /// Signed by the offerer over the root of the fulfiller tree.
    #[derive(Debug, PartialEq, Eq)]
    struct OrderAuthorization {
        bytes32 orderHash;
        bytes32 merkleRoot;
        bool requireServerSignature;
        uint256 startTime;
        uint256 endTime;
    }

    /// Signed by the trusted authority for one fulfiller.
    #[derive(Debug, PartialEq, Eq)]
    struct ServerToken {
        bytes32 orderHash;
        address fulfiller;
        uint256 minFill;
        uint256 maxFill;
        uint256 deadline;
    }
}

/// `keccak256(abi.encode(fulfiller, minFill, maxFill))`
pub fn leaf(fulfiller: Address, min_fill: U256, max_fill: U256) -> B256 {
    keccak256((fulfiller, min_fill, max_fill).abi_encode())
}

#[derive(Debug)]
pub struct MerkleValidator {
    instance: Instance,
    callers: Callers,
}

impl MerkleValidator {
    pub fn new(deployment: Deployment, chain_id: u64, callers: Callers) -> Self {
        Self {
            instance: Instance::new(deployment, chain_id),
            callers,
        }
    }

    pub fn owner(&self) -> Address {
        self.instance.authority.owner()
    }

    pub fn set_owner(&self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        self.instance.set_owner(caller, new_owner)
    }

    pub fn filled(&self, order_hash: OrderHash, fulfiller: Address) -> U256 {
        self.instance.filled(order_hash, fulfiller)
    }

    pub fn domain_separator(&self, chain_id: u64) -> DomainSeparator {
        self.instance.domain_separator(chain_id)
    }
}

impl OrderValidating for MerkleValidator {
    fn address(&self) -> Address {
        self.instance.address
    }

    #[instrument(skip_all, fields(
        validator = %self.instance.address,
        order_hash = %params.order_hash,
        fulfiller = %params.fulfiller,
    ))]
    fn validate_order(
        &self,
        call: &mut Call,
        params: &ZoneParameters,
    ) -> Result<MagicValue, ValidationError> {
        self.callers.check(call.caller())?;

        let payload = MerklePayload::abi_decode(&params.extra_data).map_err(|err| {
            tracing::debug!(?err, "malformed merkle payload");
            ValidationError::InvalidExtraData
        })?;
        let amount = params
            .offered_amount()
            .ok_or(ValidationError::MissingOfferItem)?;

        TimeWindow {
            start: payload.startTime,
            end: payload.endTime,
        }
        .check(call.now())?;

        let key = FillKey::from(params);
        let bounds = FillBounds::Range {
            min: payload.minFill,
            max: payload.maxFill,
        };
        self.instance.ledger.check(&key, amount, bounds)?;

        let root = merkle::compute_root(
            leaf(params.fulfiller, payload.minFill, payload.maxFill),
            &payload.proof,
        );
        let authorization = OrderAuthorization {
            orderHash: params.order_hash.0,
            merkleRoot: root,
            requireServerSignature: payload.requireServerSignature,
            startTime: payload.startTime,
            endTime: payload.endTime,
        };
        self.instance.auth.verify(
            call,
            authorization.eip712_hash_struct(),
            params.offerer,
            &payload.signature,
        )?;

        if payload.requireServerSignature {
            let token = ServerToken {
                orderHash: params.order_hash.0,
                fulfiller: params.fulfiller,
                minFill: payload.minFill,
                maxFill: payload.maxFill,
                deadline: payload.serverToken.deadline,
            };
            self.instance.auth.verify_server_token(
                call,
                payload.serverToken.deadline,
                token.eip712_hash_struct(),
                self.owner(),
                &payload.serverToken.signature,
            )?;
        }

        let total = self
            .instance
            .ledger
            .fill(call.journal_mut(), key, amount, bounds)?;
        tracing::debug!(%amount, %total, "order validated");
        Ok(MagicValue::VALIDATE_ORDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_struct_names() {
        assert_eq!(
            OrderAuthorization::eip712_encode_type(),
            "OrderAuthorization(bytes32 orderHash,bytes32 merkleRoot,bool \
             requireServerSignature,uint256 startTime,uint256 endTime)"
        );
        assert_eq!(
            ServerToken::eip712_encode_type(),
            "ServerToken(bytes32 orderHash,address fulfiller,uint256 minFill,uint256 \
             maxFill,uint256 deadline)"
        );
    }

    #[test]
    fn leaf_commits_to_bounds() {
        let fulfiller = Address::repeat_byte(1);
        let base = leaf(fulfiller, U256::from(10), U256::from(100));

        assert_ne!(base, leaf(fulfiller, U256::from(11), U256::from(100)));
        assert_ne!(base, leaf(fulfiller, U256::from(10), U256::from(101)));
        assert_ne!(base, leaf(Address::repeat_byte(2), U256::from(10), U256::from(100)));
        assert_ne!(base, crate::v2::leaf(fulfiller, U256::from(100)));
    }
}
