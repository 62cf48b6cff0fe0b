//! Contains models that are shared between the order validators, the
//! aggregator and the off-chain authorization tooling.

pub mod domain;
pub mod order;
pub mod payload;
pub mod signature;

pub use {
    domain::{DomainSeparator, SigningDomain},
    order::{ItemType, MagicValue, OrderHash, ReceivedItem, SpentItem, ZoneParameters},
};
