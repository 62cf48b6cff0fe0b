use {alloy::primitives::Address, signature_validator::SignatureValidationError, thiserror::Error};

/// Coarse classification of why a validation was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The fulfiller supplied data that can not be interpreted.
    MalformedInput,
    /// A signature does not belong to the expected signer.
    Authentication,
    /// The authorization is valid but does not allow this fill right now.
    AuthorizationState,
    /// The caller is not allowed to perform the operation.
    AccessControl,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ValidationError {
    #[error("caller is not authorized to validate orders")]
    CallerNotAuthorized,
    #[error("extra data can not be decoded")]
    InvalidExtraData,
    #[error("fulfillment has no offer item")]
    MissingOfferItem,
    #[error("bad signature")]
    BadSignature,
    #[error("merkle proof must not be empty")]
    InsufficientProof,
    #[error("fill is below the authorized minimum")]
    UnderMinimumFill,
    #[error("fill cap exceeded")]
    FillCapExceeded,
    #[error("maximum fill exceeded")]
    MaxFillExceeded,
    #[error("authorization is not active yet")]
    BeforeStartTime,
    #[error("authorization expired")]
    WindowExpired,
    #[error("server token deadline exceeded")]
    DeadlineExceeded,
    #[error("validator calls do not match the order's commitment")]
    InvalidAggregateCommitment,
    #[error("validator {0} is not registered")]
    UnknownValidator(Address),
    #[error("validator {0} returned an unexpected magic value")]
    UnexpectedMagicValue(Address),
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidExtraData
            | Self::MissingOfferItem
            | Self::InsufficientProof
            | Self::InvalidAggregateCommitment
            | Self::UnknownValidator(_)
            | Self::UnexpectedMagicValue(_) => ErrorKind::MalformedInput,
            Self::BadSignature => ErrorKind::Authentication,
            Self::UnderMinimumFill
            | Self::FillCapExceeded
            | Self::MaxFillExceeded
            | Self::BeforeStartTime
            | Self::WindowExpired
            | Self::DeadlineExceeded => ErrorKind::AuthorizationState,
            Self::CallerNotAuthorized => ErrorKind::AccessControl,
        }
    }
}

impl From<SignatureValidationError> for ValidationError {
    fn from(_: SignatureValidationError) -> Self {
        Self::BadSignature
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum OwnershipError {
    #[error("caller {0} is not the owner")]
    NotOwner(Address),
}

impl OwnershipError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::AccessControl
    }
}
