//! Builders for the parameters validators are called with.

use {
    crate::tokens,
    alloy::primitives::{Address, B256, Bytes, U256},
    model::{ItemType, OrderHash, ReceivedItem, SpentItem, ZoneParameters},
};

/// A fulfillment of `order` by `fulfiller` offering `amount` WETH for USDC.
pub fn fulfillment(
    order: u8,
    offerer: Address,
    fulfiller: Address,
    amount: u64,
) -> ZoneParameters {
    ZoneParameters {
        order_hash: order_hash(order),
        fulfiller,
        offerer,
        offer: vec![SpentItem {
            item_type: ItemType::Erc20,
            token: tokens::WETH,
            identifier: U256::ZERO,
            amount: U256::from(amount),
        }],
        consideration: vec![ReceivedItem {
            item_type: ItemType::Erc20,
            token: tokens::USDC,
            identifier: U256::ZERO,
            amount: U256::from(amount) * U256::from(3_000),
            recipient: offerer,
        }],
        order_hashes: vec![order_hash(order)],
        ..Default::default()
    }
}

pub fn order_hash(order: u8) -> OrderHash {
    B256::repeat_byte(order).into()
}

/// Replaces the authorization payload of a fulfillment.
pub fn with_extra_data(params: ZoneParameters, extra_data: impl Into<Bytes>) -> ZoneParameters {
    ZoneParameters {
        extra_data: extra_data.into(),
        ..params
    }
}
