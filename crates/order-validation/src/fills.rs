//! Cumulative fill accounting per order and fulfiller.

use {
    crate::{ValidationError, call::Journal},
    alloy::primitives::{Address, U256},
    model::{OrderHash, ZoneParameters},
    std::{
        collections::HashMap,
        sync::{Arc, Mutex, MutexGuard, PoisonError},
    },
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FillKey {
    pub order_hash: OrderHash,
    pub fulfiller: Address,
}

impl From<&ZoneParameters> for FillKey {
    fn from(params: &ZoneParameters) -> Self {
        Self {
            order_hash: params.order_hash,
            fulfiller: params.fulfiller,
        }
    }
}

/// The limits an authorization puts on a fulfiller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FillBounds {
    /// Upper bound on the number of fills. There is no per fill minimum.
    Cap(U256),
    /// Every fill must be at least `min` and the total at most `max`.
    Range { min: U256, max: U256 },
}

impl FillBounds {
    /// Returns the new cumulative total if filling `amount` on top of
    /// `filled` stays within bounds.
    pub fn check(&self, filled: U256, amount: U256) -> Result<U256, ValidationError> {
        match *self {
            Self::Cap(cap) => filled
                .checked_add(amount)
                .filter(|total| *total <= cap)
                .ok_or(ValidationError::FillCapExceeded),
            Self::Range { min, max } => {
                if amount < min {
                    return Err(ValidationError::UnderMinimumFill);
                }
                filled
                    .checked_add(amount)
                    .filter(|total| *total <= max)
                    .ok_or(ValidationError::MaxFillExceeded)
            }
        }
    }
}

/// Fill counters of one validator deployment. Counters start at zero and
/// only grow, except when a transaction that wrote them is reverted.
#[derive(Debug, Default)]
pub struct FillLedger {
    filled: Mutex<HashMap<FillKey, U256>>,
}

impl FillLedger {
    pub fn filled(&self, key: &FillKey) -> U256 {
        self.lock().get(key).copied().unwrap_or_default()
    }

    /// Checks the bounds without writing anything.
    pub fn check(
        &self,
        key: &FillKey,
        amount: U256,
        bounds: FillBounds,
    ) -> Result<(), ValidationError> {
        bounds.check(self.filled(key), amount).map(|_| ())
    }

    /// Atomically checks the bounds and increments the counter, recording
    /// the write in the journal so it can be reverted.
    pub fn fill(
        self: &Arc<Self>,
        journal: &mut Journal,
        key: FillKey,
        amount: U256,
        bounds: FillBounds,
    ) -> Result<U256, ValidationError> {
        let total = {
            let mut filled = self.lock();
            let total = bounds.check(filled.get(&key).copied().unwrap_or_default(), amount)?;
            filled.insert(key, total);
            total
        };
        journal.record(self.clone(), key, amount);
        Ok(total)
    }

    pub(crate) fn unfill(&self, key: &FillKey, amount: U256) {
        if let Some(filled) = self.lock().get_mut(key) {
            *filled = filled.saturating_sub(amount);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<FillKey, U256>> {
        self.filled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
