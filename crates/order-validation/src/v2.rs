//! Fill-cap validator.
//!
//! The offerer commits to a merkle tree of `(fulfiller, fillCap)` leaves and
//! signs its root. Every successful fulfillment consumes one unit of the
//! fulfiller's cap. Anyone may invoke it.

use {
    crate::{
        Call,
        Deployment,
        OrderValidating,
        OwnershipError,
        ValidationError,
        fills::{FillBounds, FillKey},
        instance::Instance,
        merkle,
    },
    alloy::{
        primitives::{Address, B256, U256, keccak256},
        sol,
        sol_types::{SolStruct, SolValue},
    },
    model::{DomainSeparator, MagicValue, OrderHash, ZoneParameters, payload::FillCapPayload},
    tracing::instrument,
};

sol! {
    /// Signed by the offerer over the root of the fulfiller tree.
    #[derive(Debug, PartialEq, Eq)]
    struct FillCapAuthorization {
        bytes32 orderHash;
        bytes32 merkleRoot;
        bool requireServerSignature;
    }

    /// Signed by the trusted authority for one fulfiller.
    #[derive(Debug, PartialEq, Eq)]
    struct FillCapServerToken {
        bytes32 orderHash;
        address fulfiller;
        uint256 fillCap;
        uint256 deadline;
    }
}

/// `keccak256(abi.encode(fulfiller, fillCap))`
pub fn leaf(fulfiller: Address, fill_cap: U256) -> B256 {
    keccak256((fulfiller, fill_cap).abi_encode())
}

#[derive(Debug)]
pub struct FillCapValidator {
    instance: Instance,
}

impl FillCapValidator {
    pub fn new(deployment: Deployment, chain_id: u64) -> Self {
        Self {
            instance: Instance::new(deployment, chain_id),
        }
    }

    pub fn owner(&self) -> Address {
        self.instance.authority.owner()
    }

    pub fn set_owner(&self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        self.instance.set_owner(caller, new_owner)
    }

    /// Number of fills `fulfiller` has performed on the order.
    pub fn filled(&self, order_hash: OrderHash, fulfiller: Address) -> U256 {
        self.instance.filled(order_hash, fulfiller)
    }

    pub fn domain_separator(&self, chain_id: u64) -> DomainSeparator {
        self.instance.domain_separator(chain_id)
    }
}

impl OrderValidating for FillCapValidator {
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
        let payload = FillCapPayload::abi_decode(&params.extra_data).map_err(|err| {
            tracing::debug!(?err, "malformed fill cap payload");
            ValidationError::InvalidExtraData
        })?;

        let key = FillKey::from(params);
        let bounds = FillBounds::Cap(payload.fillCap);
        self.instance.ledger.check(&key, U256::ONE, bounds)?;

        let root = merkle::compute_root_non_empty(
            leaf(params.fulfiller, payload.fillCap),
            &payload.proof,
        )?;
        let authorization = FillCapAuthorization {
            orderHash: params.order_hash.0,
            merkleRoot: root,
            requireServerSignature: payload.requireServerSignature,
        };
        self.instance.auth.verify(
            call,
            authorization.eip712_hash_struct(),
            params.offerer,
            &payload.signature,
        )?;

        if payload.requireServerSignature {
            let token = FillCapServerToken {
                orderHash: params.order_hash.0,
                fulfiller: params.fulfiller,
                fillCap: payload.fillCap,
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
            .fill(call.journal_mut(), key, U256::ONE, bounds)?;
        tracing::debug!(%total, "order validated");
        Ok(MagicValue::VALIDATE_ORDER)
    }
}
