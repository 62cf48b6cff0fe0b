//! Delegated validator.
//!
//! The offerer signs nothing. A fill is authorized solely by a token from the
//! trusted authority that binds the fulfiller, the fill bounds and the
//! validity window.

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
        window::TimeWindow,
    },
    alloy::{
        primitives::{Address, U256},
        sol,
        sol_types::{SolStruct, SolValue},
    },
    model::{DomainSeparator, MagicValue, OrderHash, ZoneParameters, payload::DelegatedPayload},
    tracing::instrument,
};

sol! {
    /// Signed by the trusted authority for one fulfiller.
    #[derive(Debug, PartialEq, Eq)]
    struct DelegatedAuthorization {
        bytes32 orderHash;
        address fulfiller;
        uint256 minFill;
        uint256 maxFill;
        uint256 startTime;
        uint256 endTime;
        uint256 deadline;
    }
}

#[derive(Debug)]
pub struct DelegatedValidator {
    instance: Instance,
    callers: Callers,
}

impl DelegatedValidator {
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

impl OrderValidating for DelegatedValidator {
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

        let payload = DelegatedPayload::abi_decode(&params.extra_data).map_err(|err| {
            tracing::debug!(?err, "malformed delegated payload");
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

        let authorization = DelegatedAuthorization {
            orderHash: params.order_hash.0,
            fulfiller: params.fulfiller,
            minFill: payload.minFill,
            maxFill: payload.maxFill,
            startTime: payload.startTime,
            endTime: payload.endTime,
            deadline: payload.serverToken.deadline,
        };
        self.instance.auth.verify_server_token(
            call,
            payload.serverToken.deadline,
            authorization.eip712_hash_struct(),
            self.owner(),
            &payload.serverToken.signature,
        )?;

        let total = self
            .instance
            .ledger
            .fill(call.journal_mut(), key, amount, bounds)?;
        tracing::debug!(%amount, %total, "order validated");
        Ok(MagicValue::VALIDATE_ORDER)
    }
}
