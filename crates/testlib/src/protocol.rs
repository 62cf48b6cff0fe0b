//! Addresses of the protocol contracts used in tests.

use alloy::primitives::Address;

/// Address for the settlement contract.
pub const SETTLEMENT: Address = Address::new(hex_literal::hex!(
    "00000000000000ADc04C56Bf30aC9d3c0aAF14dC"
));

/// Address for the validator aggregator.
pub const AGGREGATOR: Address = Address::new(hex_literal::hex!(
    "a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9"
));

/// Chain the test deployments live on.
pub const CHAIN_ID: u64 = 1;
