//! The execution context of one validation call.

use {
    crate::fills::{FillKey, FillLedger},
    alloy::primitives::{Address, U256},
    signature_validator::SignatureValidating,
    std::{fmt, mem, sync::Arc},
};

/// Environment a validator executes in: who called it, the block it runs in
/// and the state writes performed so far by the enclosing transaction.
pub struct Call {
    caller: Address,
    timestamp: u64,
    chain_id: u64,
    signatures: Arc<dyn SignatureValidating>,
    journal: Journal,
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("caller", &self.caller)
            .field("timestamp", &self.timestamp)
            .field("chain_id", &self.chain_id)
            .field("journal", &self.journal)
            .finish_non_exhaustive()
    }
}

impl Call {
    pub fn new(
        caller: Address,
        timestamp: u64,
        chain_id: u64,
        signatures: Arc<dyn SignatureValidating>,
    ) -> Self {
        Self {
            caller,
            timestamp,
            chain_id,
            signatures,
            journal: Journal::default(),
        }
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    /// The block timestamp in the width timestamps are signed with.
    pub fn now(&self) -> U256 {
        U256::from(self.timestamp)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn signatures(&self) -> &dyn SignatureValidating {
        self.signatures.as_ref()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    /// Runs `f` as a nested call made by `caller`. The original caller is
    /// restored afterwards.
    pub fn frame<T>(&mut self, caller: Address, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = mem::replace(&mut self.caller, caller);
        let result = f(self);
        self.caller = previous;
        result
    }

    /// Undoes every state write of this transaction, for when the settlement
    /// fails after the validators accepted.
    pub fn revert(&mut self) {
        self.journal.revert();
    }
}

/// Position in a [`Journal`] that writes can be reverted back to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Checkpoint(usize);

/// Fill counter increments performed by a transaction, in order.
#[derive(Default)]
pub struct Journal {
    entries: Vec<Entry>,
}

struct Entry {
    ledger: Arc<FillLedger>,
    key: FillKey,
    amount: U256,
}

impl fmt::Debug for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| (&entry.key, entry.amount)))
            .finish()
    }
}

impl Journal {
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.entries.len())
    }

    pub(crate) fn record(&mut self, ledger: Arc<FillLedger>, key: FillKey, amount: U256) {
        self.entries.push(Entry {
            ledger,
            key,
            amount,
        });
    }

    /// Reverts the writes recorded after `checkpoint`, latest first.
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        for entry in self.entries.drain(checkpoint.0..).rev() {
            entry.ledger.unfill(&entry.key, entry.amount);
        }
    }

    pub fn revert(&mut self) {
        self.revert_to(Checkpoint(0));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::fills::FillBounds,
        model::OrderHash,
        signature_validator::MockSignatureValidating,
    };

    fn call() -> Call {
        Call::new(
            Address::repeat_byte(1),
            100,
            1,
            Arc::new(MockSignatureValidating::new()),
        )
    }

    #[test]
    fn frame_restores_caller() {
        let mut call = call();
        let inner = call.frame(Address::repeat_byte(2), |call| call.caller());

        assert_eq!(inner, Address::repeat_byte(2));
        assert_eq!(call.caller(), Address::repeat_byte(1));
    }

    #[test]
    fn reverts_writes_after_checkpoint() {
        let ledger = Arc::new(FillLedger::default());
        let key = FillKey {
            order_hash: OrderHash::default(),
            fulfiller: Address::repeat_byte(3),
        };
        let bounds = FillBounds::Cap(U256::from(10));
        let mut call = call();

        ledger
            .fill(call.journal_mut(), key, U256::from(2), bounds)
            .unwrap();
        let checkpoint = call.journal().checkpoint();
        ledger
            .fill(call.journal_mut(), key, U256::from(3), bounds)
            .unwrap();
        ledger
            .fill(call.journal_mut(), key, U256::from(4), bounds)
            .unwrap();
        assert_eq!(ledger.filled(&key), U256::from(9));

        call.journal_mut().revert_to(checkpoint);
        assert_eq!(ledger.filled(&key), U256::from(2));
        assert_eq!(call.journal().len(), 1);

        call.revert();
        assert_eq!(ledger.filled(&key), U256::ZERO);
        assert!(call.journal().is_empty());
    }
}
