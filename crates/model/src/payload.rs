//! ABI encoded authorization payloads that fulfillers pass to validators in
//! `extra_data`. The layouts are shared by the validators, which decode
//! them, and the off-chain tooling, which builds them.

use alloy::sol;

sol! {
    /// Co-signature issued by a validator's trusted authority.
    #[derive(Debug, PartialEq, Eq)]
    struct ServerToken {
        uint256 deadline;
        bytes signature;
    }

    /// Payload of the fill-cap validator (V2).
    #[derive(Debug, PartialEq, Eq)]
    struct FillCapPayload {
        uint256 fillCap;
        bytes32[] proof;
        bytes signature;
        bool requireServerSignature;
        ServerToken serverToken;
    }

    /// Payload of the merkle validator (V3).
    #[derive(Debug, PartialEq, Eq)]
    struct MerklePayload {
        uint256 minFill;
        uint256 maxFill;
        uint256 startTime;
        uint256 endTime;
        bytes32[] proof;
        bytes signature;
        bool requireServerSignature;
        ServerToken serverToken;
    }

    /// Payload of the delegated validator (V4).
    #[derive(Debug, PartialEq, Eq)]
    struct DelegatedPayload {
        uint256 minFill;
        uint256 maxFill;
        uint256 startTime;
        uint256 endTime;
        ServerToken serverToken;
    }

    /// One entry of an aggregated batch. The aggregator payload is
    /// `abi.encode(ValidatorCall[])`.
    #[derive(Debug, PartialEq, Eq)]
    struct ValidatorCall {
        address validator;
        bytes32 commitment;
        bytes payload;
    }
}
