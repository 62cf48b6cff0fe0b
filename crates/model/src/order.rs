//! The fulfillment data the settlement protocol hands to a validator.

use {
    alloy::primitives::{Address, B256, Bytes, FixedBytes, U256, fixed_bytes},
    std::fmt,
};

/// Identifies one order. Computed by the settlement protocol from the order
/// terms; validators only ever use it as a key.
#[derive(
    Clone,
    Copy,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    derive_more::From,
    derive_more::Into,
)]
pub struct OrderHash(pub B256);

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The value a validator returns when it accepts an order. Anything else,
/// including an aborted call, means the order must not settle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MagicValue(pub FixedBytes<4>);

impl MagicValue {
    /// Selector of
    /// `validateOrder((bytes32,address,address,(uint8,address,uint256,uint256)[],(uint8,address,uint256,uint256,address)[],bytes,bytes32[],uint256,uint256,bytes32))`.
    pub const VALIDATE_ORDER: Self = Self(fixed_bytes!("17b1f942"));
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ItemType {
    #[default]
    Native,
    Erc20,
    Erc721,
    Erc1155,
    Erc721WithCriteria,
    Erc1155WithCriteria,
}

/// An item the offerer gives up in this fulfillment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SpentItem {
    pub item_type: ItemType,
    pub token: Address,
    pub identifier: U256,
    pub amount: U256,
}

/// An item the offerer receives in this fulfillment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReceivedItem {
    pub item_type: ItemType,
    pub token: Address,
    pub identifier: U256,
    pub amount: U256,
    pub recipient: Address,
}

/// Everything the settlement protocol passes to a validator when an order is
/// fulfilled. Immutable for the duration of the call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ZoneParameters {
    pub order_hash: OrderHash,
    pub fulfiller: Address,
    pub offerer: Address,
    pub offer: Vec<SpentItem>,
    pub consideration: Vec<ReceivedItem>,
    /// Validator specific authorization payload supplied by the fulfiller.
    pub extra_data: Bytes,
    pub order_hashes: Vec<OrderHash>,
    pub start_time: U256,
    pub end_time: U256,
    /// The commitment the offerer declared when creating the order.
    pub zone_hash: B256,
}

impl ZoneParameters {
    /// The amount of the first offer item, which is what partial fills are
    /// measured in.
    pub fn offered_amount(&self) -> Option<U256> {
        self.offer.first().map(|item| item.amount)
    }

    /// Returns a copy of the parameters addressed to a sub-validator, with
    /// the commitment and payload meant for it.
    pub fn with_payload(&self, zone_hash: B256, extra_data: Bytes) -> Self {
        Self {
            zone_hash,
            extra_data,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::keccak256};

    #[test]
    fn validate_order_magic_value_is_the_selector() {
        let selector = keccak256(
            "validateOrder((bytes32,address,address,(uint8,address,uint256,uint256)[],(uint8,\
             address,uint256,uint256,address)[],bytes,bytes32[],uint256,uint256,bytes32))",
        );
        assert_eq!(MagicValue::VALIDATE_ORDER.0.as_slice(), &selector[..4]);
    }

    #[test]
    fn offered_amount_uses_first_offer_item() {
        let mut params = ZoneParameters::default();
        assert_eq!(params.offered_amount(), None);

        params.offer = vec![
            SpentItem {
                amount: U256::from(7),
                ..Default::default()
            },
            SpentItem {
                amount: U256::from(9),
                ..Default::default()
            },
        ];
        assert_eq!(params.offered_amount(), Some(U256::from(7)));
    }

    #[test]
    fn payload_replacement_keeps_order_data() {
        let params = ZoneParameters {
            order_hash: OrderHash(B256::repeat_byte(1)),
            fulfiller: Address::repeat_byte(2),
            zone_hash: B256::repeat_byte(3),
            extra_data: Bytes::from_static(&[4]),
            ..Default::default()
        };

        let sub = params.with_payload(B256::repeat_byte(5), Bytes::from_static(&[6]));
        assert_eq!(sub.order_hash, params.order_hash);
        assert_eq!(sub.fulfiller, params.fulfiller);
        assert_eq!(sub.zone_hash, B256::repeat_byte(5));
        assert_eq!(sub.extra_data, Bytes::from_static(&[6]));
    }
}
