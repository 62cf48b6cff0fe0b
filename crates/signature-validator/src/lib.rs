//! Resolves who signed an authorization.
//!
//! Signers are either externally owned keys, whose signatures are checked by
//! recovering the public key from an ECDSA signature, or contracts that
//! expose a signature validation capability as defined by EIP-1271. The
//! latter lets contract wallets such as multi-signature accounts create
//! orders and act as trusted authorities.
//!
//! <https://eips.ethereum.org/EIPS/eip-1271>

mod accounts;
pub mod multisig;

pub use accounts::{Accounts, Signer};
use {
    alloy::primitives::{Address, B256, Bytes, FixedBytes, fixed_bytes},
    model::signature::{EcdsaSignature, InvalidSignature},
    thiserror::Error,
};

/// The magic value as defined by EIP-1271.
pub const IS_VALID_SIGNATURE_MAGIC_VALUE: FixedBytes<4> = fixed_bytes!("1626ba7e");

/// Structure used to represent a signature.
#[derive(Clone, Debug, PartialEq)]
pub struct SignatureCheck {
    pub signer: Address,
    /// The final digest that was signed.
    pub hash: B256,
    pub signature: Bytes,
}

#[derive(Debug, Error)]
pub enum SignatureValidationError {
    /// The signature is invalid.
    ///
    /// Either the recovered key does not belong to the signer, or the signer
    /// contract reverted or did not return the magic value.
    #[error("invalid signature")]
    Invalid,
    /// The signature bytes can not be decoded as an ECDSA signature.
    #[error(transparent)]
    Malformed(#[from] InvalidSignature),
}

#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait SignatureValidating: Send + Sync {
    fn validate_signature(&self, check: SignatureCheck) -> Result<(), SignatureValidationError>;
}

/// The signature validation capability of a contract account.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait ContractSigner: Send + Sync {
    /// `isValidSignature(bytes32,bytes)`. An error means the call reverted.
    fn is_valid_signature(&self, hash: B256, signature: &[u8]) -> anyhow::Result<FixedBytes<4>>;
}

/// Validates signatures against the accounts known to the executing chain.
#[derive(Debug, Default)]
pub struct Validator {
    accounts: Accounts,
}

impl Validator {
    pub fn new(accounts: Accounts) -> Self {
        Self { accounts }
    }

    fn validate_ecdsa(
        &self,
        expected: Address,
        check: &SignatureCheck,
    ) -> Result<(), SignatureValidationError> {
        let signature = EcdsaSignature::from_bytes(&check.signature)?;
        let recovered = signature.recover(&check.hash).map_err(|err| {
            tracing::debug!(?err, "unable to recover signer");
            SignatureValidationError::Invalid
        })?;

        if expected.is_zero() || recovered != expected {
            tracing::debug!(?recovered, ?expected, "unexpected signer");
            return Err(SignatureValidationError::Invalid);
        }
        Ok(())
    }
}

impl SignatureValidating for Validator {
    fn validate_signature(&self, check: SignatureCheck) -> Result<(), SignatureValidationError> {
        match self.accounts.signer(check.signer) {
            Signer::ExternalKey(expected) => self.validate_ecdsa(expected, &check),
            Signer::Contract(contract) => {
                let magic_value = contract
                    .is_valid_signature(check.hash, &check.signature)
                    .map_err(|err| {
                        tracing::debug!(?err, signer = ?check.signer, "isValidSignature reverted");
                        SignatureValidationError::Invalid
                    })?;

                if magic_value != IS_VALID_SIGNATURE_MAGIC_VALUE {
                    return Err(SignatureValidationError::Invalid);
                }
                Ok(())
            }
        }
    }
}
