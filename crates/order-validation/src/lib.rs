//! Validators that decide whether an order may be fulfilled.
//!
//! The settlement protocol calls a validator once per fulfillment with the
//! order data and an authorization payload chosen by the fulfiller. A
//! validator either returns [`MagicValue::VALIDATE_ORDER`] or rejects the
//! fulfillment with a [`ValidationError`].
//!
//! - [`v2::FillCapValidator`] limits how often each fulfiller may fill.
//! - [`v3::MerkleValidator`] bounds the amount each fulfiller may fill within
//!   a validity window.
//! - [`v4::DelegatedValidator`] delegates all authorization to a trusted
//!   authority.
//! - [`aggregator::Aggregator`] runs several of the above for one order.

pub mod aggregator;
pub mod auth;
mod call;
mod error;
pub mod fills;
mod instance;
pub mod merkle;
mod owner;
pub mod v2;
pub mod v3;
pub mod v4;
pub mod window;

pub use {
    call::{Call, Checkpoint, Journal},
    error::{ErrorKind, OwnershipError, ValidationError},
    instance::{Callers, Deployment},
};
use {
    alloy::primitives::Address,
    model::{MagicValue, ZoneParameters},
};

/// A validator the settlement protocol calls back into before settling an
/// order.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait OrderValidating: Send + Sync {
    /// The address the validator is deployed at.
    fn address(&self) -> Address;

    /// Validates one fulfillment. State writes are recorded in the call's
    /// journal. A rejected fulfillment leaves no writes behind.
    fn validate_order(
        &self,
        call: &mut Call,
        params: &ZoneParameters,
    ) -> Result<MagicValue, ValidationError>;
}
