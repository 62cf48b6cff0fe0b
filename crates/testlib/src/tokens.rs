//! Mainnet addresses of commonly used tokens.

use alloy::primitives::Address;

/// Address for the `WETH` token.
pub const WETH: Address = Address::new(hex_literal::hex!(
    "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
));

/// Address for the `USDC` token.
pub const USDC: Address = Address::new(hex_literal::hex!(
    "A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
));
