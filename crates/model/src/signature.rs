use {
    alloy::{
        primitives::{Address, B256, Signature, U256, uint},
        signers::{SignerSync, local::PrivateKeySigner},
    },
    std::fmt::{self, Debug, Formatter},
};

/// Half the order of the secp256k1 curve. Signatures with a larger `s` are
/// the malleated twin of a valid signature and are rejected, as EVM
/// signature libraries do.
pub const SECP256K1_HALF_ORDER: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

#[derive(Debug, thiserror::Error)]
pub enum InvalidSignature {
    #[error("ECDSA signature must be 64 or 65 bytes long, got {0}")]
    Length(usize),
    #[error("unsupported recovery id {0}")]
    RecoveryId(u8),
    #[error("s value is in the upper half of the curve order")]
    HighS,
    #[error("unable to recover signer: {0}")]
    Recovery(#[from] alloy::primitives::SignatureError),
}

/// An ECDSA signature over secp256k1 as produced by externally owned
/// accounts.
#[derive(Eq, PartialEq, Clone, Copy, Default, Hash)]
pub struct EcdsaSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl Debug for EcdsaSignature {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", alloy::primitives::hex::encode(self.to_bytes()))
    }
}

impl EcdsaSignature {
    /// r + s + v
    pub fn to_bytes(self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    /// Decodes either a 65 byte `r || s || v` signature or a 64 byte
    /// EIP-2098 compact signature where the parity is stored in the highest
    /// bit of `s`.
    ///
    /// https://eips.ethereum.org/EIPS/eip-2098
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InvalidSignature> {
        match bytes.len() {
            65 => Ok(Self {
                r: B256::from_slice(&bytes[..32]),
                s: B256::from_slice(&bytes[32..64]),
                v: bytes[64],
            }),
            64 => {
                let mut s = B256::from_slice(&bytes[32..64]);
                let parity = s[0] >> 7;
                s[0] &= 0x7f;
                Ok(Self {
                    r: B256::from_slice(&bytes[..32]),
                    s,
                    v: 27 + parity,
                })
            }
            len => Err(InvalidSignature::Length(len)),
        }
    }

    fn y_parity(&self) -> Result<bool, InvalidSignature> {
        match self.v {
            0 | 27 => Ok(false),
            1 | 28 => Ok(true),
            v => Err(InvalidSignature::RecoveryId(v)),
        }
    }

    /// Recovers the address that signed the specified digest. Only the
    /// low-s form of a signature is accepted.
    pub fn recover(&self, digest: &B256) -> Result<Address, InvalidSignature> {
        let y_parity = self.y_parity()?;
        let s = U256::from_be_bytes(self.s.0);
        if s > SECP256K1_HALF_ORDER {
            return Err(InvalidSignature::HighS);
        }
        let signature = Signature::new(U256::from_be_bytes(self.r.0), s, y_parity);
        Ok(signature.recover_address_from_prehash(digest)?)
    }

    /// Signs a digest directly, without any message prefix.
    pub fn sign(digest: &B256, signer: &PrivateKeySigner) -> Result<Self, alloy::signers::Error> {
        let signature = signer.sign_hash_sync(digest)?;
        Ok(Self {
            r: B256::from(signature.r().to_be_bytes::<32>()),
            s: B256::from(signature.s().to_be_bytes::<32>()),
            v: 27 + u8::from(signature.v()),
        })
    }
}
