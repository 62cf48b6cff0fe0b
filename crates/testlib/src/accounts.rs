//! Deterministic accounts.

use alloy::{
    primitives::{Address, B256},
    signers::local::PrivateKeySigner,
};

/// Account with the private key `[byte; 32]`. Bytes below `0x80` always give
/// a valid secp256k1 key.
pub fn account(byte: u8) -> PrivateKeySigner {
    assert!(byte != 0 && byte < 0x80, "no deterministic key for {byte:#x}");
    PrivateKeySigner::from_bytes(&B256::repeat_byte(byte)).unwrap()
}

pub fn offerer() -> PrivateKeySigner {
    account(0x01)
}

pub fn server() -> PrivateKeySigner {
    account(0x02)
}

/// Distinct fulfiller addresses, for tests that only need to tell fulfillers
/// apart.
pub fn fulfiller(n: u8) -> Address {
    Address::repeat_byte(0xf0 | (n & 0x0f))
}
