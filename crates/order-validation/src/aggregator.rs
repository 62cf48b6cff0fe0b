//! Runs several validators for one order, all or nothing.
//!
//! The order's `zone_hash` commits to the exact list of validators and their
//! commitments, in order, so a fulfiller can neither skip, add nor reorder
//! validators.

use {
    crate::{Call, OrderValidating, ValidationError},
    alloy::{
        primitives::{Address, B256, keccak256},
        sol_types::SolValue,
    },
    model::{MagicValue, ZoneParameters, payload::ValidatorCall},
    std::{collections::HashMap, fmt, sync::Arc},
    tracing::instrument,
};

/// `keccak256(validator_0 || commitment_0 || validator_1 || ...)` with
/// addresses packed to 20 bytes.
pub fn aggregate_commitment(calls: &[ValidatorCall]) -> B256 {
    let mut packed = Vec::with_capacity(calls.len() * (20 + 32));
    for call in calls {
        packed.extend_from_slice(call.validator.as_slice());
        packed.extend_from_slice(call.commitment.as_slice());
    }
    keccak256(packed)
}

/// Validators the aggregator can dispatch to, by address.
#[derive(Clone, Default)]
pub struct Registry(HashMap<Address, Arc<dyn OrderValidating>>);

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl Registry {
    /// Registers a validator under its address. A validator already
    /// registered at that address is replaced and returned.
    pub fn register(
        &mut self,
        validator: Arc<dyn OrderValidating>,
    ) -> Option<Arc<dyn OrderValidating>> {
        let address = validator.address();
        let previous = self.0.insert(address, validator);
        if previous.is_some() {
            tracing::warn!(?address, "replaced registered validator");
        }
        previous
    }

    pub fn get(&self, address: Address) -> Option<&Arc<dyn OrderValidating>> {
        self.0.get(&address)
    }
}

#[derive(Debug)]
pub struct Aggregator {
    address: Address,
    settlement: Address,
    registry: Registry,
}

impl Aggregator {
    pub fn new(address: Address, settlement: Address, registry: Registry) -> Self {
        Self {
            address,
            settlement,
            registry,
        }
    }

    fn resolve(
        &self,
        calls: &[ValidatorCall],
    ) -> Result<Vec<Arc<dyn OrderValidating>>, ValidationError> {
        calls
            .iter()
            .map(|call| {
                self.registry
                    .get(call.validator)
                    .cloned()
                    .ok_or(ValidationError::UnknownValidator(call.validator))
            })
            .collect()
    }
}

impl OrderValidating for Aggregator {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(skip_all, fields(
        order_hash = %params.order_hash,
        fulfiller = %params.fulfiller,
    ))]
    fn validate_order(
        &self,
        call: &mut Call,
        params: &ZoneParameters,
    ) -> Result<MagicValue, ValidationError> {
        if call.caller() != self.settlement {
            return Err(ValidationError::CallerNotAuthorized);
        }

        let calls = Vec::<ValidatorCall>::abi_decode(&params.extra_data).map_err(|err| {
            tracing::debug!(?err, "malformed validator calls");
            ValidationError::InvalidExtraData
        })?;
        if aggregate_commitment(&calls) != params.zone_hash {
            return Err(ValidationError::InvalidAggregateCommitment);
        }
        let validators = self.resolve(&calls)?;

        let checkpoint = call.journal().checkpoint();
        let result = call.frame(self.address, |call| {
            for (validator, entry) in validators.iter().zip(&calls) {
                let sub = params.with_payload(entry.commitment, entry.payload.clone());
                let magic = validator.validate_order(call, &sub).inspect_err(|err| {
                    tracing::warn!(validator = ?entry.validator, ?err, "validator rejected order");
                })?;
                if magic != MagicValue::VALIDATE_ORDER {
                    return Err(ValidationError::UnexpectedMagicValue(entry.validator));
                }
            }
            Ok(())
        });

        if let Err(err) = result {
            call.journal_mut().revert_to(checkpoint);
            return Err(err);
        }
        tracing::debug!(validators = calls.len(), "order validated");
        Ok(MagicValue::VALIDATE_ORDER)
    }
}
