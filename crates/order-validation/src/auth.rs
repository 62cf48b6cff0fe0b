//! Verification of EIP-712 signed authorizations.

use {
    crate::{Call, ValidationError},
    alloy::primitives::{Address, B256, Bytes, U256},
    model::{DomainSeparator, SigningDomain},
    signature_validator::SignatureCheck,
};

/// Verifies typed structs signed for one validator deployment.
#[derive(Clone, Debug)]
pub struct Authenticator {
    domain: SigningDomain,
}

impl Authenticator {
    pub fn new(domain: SigningDomain) -> Self {
        Self { domain }
    }

    pub fn domain_separator(&self, chain_id: u64) -> DomainSeparator {
        self.domain.separator(chain_id)
    }

    /// The digest a signer signs for `struct_hash` on the given chain.
    pub fn digest(&self, chain_id: u64, struct_hash: B256) -> B256 {
        self.domain_separator(chain_id).signing_hash(struct_hash)
    }

    /// Checks that `signer` signed the typed struct hashing to `struct_hash`.
    /// Every failure, whatever kind of account the signer is, is reported as
    /// [`ValidationError::BadSignature`].
    pub fn verify(
        &self,
        call: &Call,
        struct_hash: B256,
        signer: Address,
        signature: &Bytes,
    ) -> Result<(), ValidationError> {
        let check = SignatureCheck {
            signer,
            hash: self.digest(call.chain_id(), struct_hash),
            signature: signature.clone(),
        };
        call.signatures().validate_signature(check).map_err(|err| {
            tracing::debug!(?err, ?signer, "signature rejected");
            ValidationError::from(err)
        })
    }

    /// Verifies a server co-signature. The deadline is inclusive and checked
    /// before the signature, so an expired token is rejected even when its
    /// signature is valid.
    pub fn verify_server_token(
        &self,
        call: &Call,
        deadline: U256,
        struct_hash: B256,
        authority: Address,
        signature: &Bytes,
    ) -> Result<(), ValidationError> {
        if call.now() > deadline {
            return Err(ValidationError::DeadlineExceeded);
        }
        self.verify(call, struct_hash, authority, signature)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        mockall::predicate::eq,
        signature_validator::{MockSignatureValidating, SignatureValidationError},
        std::sync::Arc,
    };

    fn authenticator() -> Authenticator {
        Authenticator::new(SigningDomain::new("Test", "1", 1, Address::repeat_byte(0xaa)))
    }

    #[test]
    fn checks_digest_of_current_chain() {
        let auth = authenticator();
        let struct_hash = B256::repeat_byte(7);
        let signer = Address::repeat_byte(1);
        let signature = Bytes::from_static(&[1, 2, 3]);

        let mut signatures = MockSignatureValidating::new();
        signatures
            .expect_validate_signature()
            .with(eq(SignatureCheck {
                signer,
                hash: auth.digest(5, struct_hash),
                signature: signature.clone(),
            }))
            .times(1)
            .returning(|_| Ok(()));

        let call = Call::new(Address::ZERO, 0, 5, Arc::new(signatures));
        auth.verify(&call, struct_hash, signer, &signature).unwrap();
        assert_ne!(auth.digest(5, struct_hash), auth.digest(1, struct_hash));
    }

    #[test]
    fn rejections_are_bad_signatures() {
        let mut signatures = MockSignatureValidating::new();
        signatures
            .expect_validate_signature()
            .returning(|_| Err(SignatureValidationError::Invalid));

        let call = Call::new(Address::ZERO, 0, 1, Arc::new(signatures));
        assert_eq!(
            authenticator().verify(&call, B256::ZERO, Address::repeat_byte(1), &Bytes::new()),
            Err(ValidationError::BadSignature)
        );
    }

    #[test]
    fn deadline_is_checked_before_signature() {
        let mut signatures = MockSignatureValidating::new();
        signatures.expect_validate_signature().never();

        let call = Call::new(Address::ZERO, 101, 1, Arc::new(signatures));
        assert_eq!(
            authenticator().verify_server_token(
                &call,
                U256::from(100),
                B256::ZERO,
                Address::repeat_byte(1),
                &Bytes::new(),
            ),
            Err(ValidationError::DeadlineExceeded)
        );
    }

    #[test]
    fn deadline_is_inclusive() {
        let mut signatures = MockSignatureValidating::new();
        signatures
            .expect_validate_signature()
            .times(1)
            .returning(|_| Ok(()));

        let call = Call::new(Address::ZERO, 100, 1, Arc::new(signatures));
        assert!(
            authenticator()
                .verify_server_token(
                    &call,
                    U256::from(100),
                    B256::ZERO,
                    Address::repeat_byte(1),
                    &Bytes::new(),
                )
                .is_ok()
        );
    }
}
