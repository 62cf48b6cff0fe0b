use {
    crate::{
        arguments::{Args, CallArg, Command, TokenArguments},
        config::{self, Config, Kind},
    },
    alloy::{
        primitives::{Address, B256, Bytes, U256},
        sol_types::{SolStruct, SolValue},
    },
    anyhow::{Context, Result, bail, ensure},
    model::{
        payload::{DelegatedPayload, ServerToken, ValidatorCall},
        signature::EcdsaSignature,
    },
    order_validation::{aggregator, merkle::MerkleTree, v2, v3, v4},
};

pub fn execute(args: &Args) -> Result<String> {
    let config = || -> Result<Config> {
        let path = args.config.as_deref().context("--config is required")?;
        config::load(path)
    };

    match &args.command {
        Command::Domain { validator } => domain(&config()?, *validator),
        Command::Merkle { leaves } => merkle_root(leaves),
        Command::Proof { leaves, index } => proof(leaves, *index),
        Command::Leaf {
            version,
            fulfiller,
            min,
            max,
        } => leaf(*version, *fulfiller, *min, *max),
        Command::Aggregate { calls } => Ok(aggregate(calls)),
        Command::SignServerToken(token) => {
            sign_server_token(&config()?, token).map(const_hex::encode_prefixed)
        }
    }
}

pub fn domain(config: &Config, validator: Address) -> Result<String> {
    let validator = config.validator(validator)?;
    Ok(const_hex::encode_prefixed(
        validator.domain_separator(config.chain_id).0,
    ))
}

pub fn merkle_root(leaves: &[B256]) -> Result<String> {
    let root = MerkleTree::new(leaves.to_vec())
        .root()
        .context("no leaves")?;
    Ok(const_hex::encode_prefixed(root))
}

/// One sibling per line, leaf to root.
pub fn proof(leaves: &[B256], index: usize) -> Result<String> {
    let proof = MerkleTree::new(leaves.to_vec())
        .proof(index)
        .with_context(|| format!("no leaf at index {index} of {}", leaves.len()))?;
    Ok(proof
        .iter()
        .map(const_hex::encode_prefixed)
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn leaf(kind: Kind, fulfiller: Address, min: U256, max: U256) -> Result<String> {
    let leaf = match kind {
        Kind::V2 => v2::leaf(fulfiller, max),
        Kind::V3 => v3::leaf(fulfiller, min, max),
        Kind::V4 => bail!("the delegated validator has no fulfiller tree"),
    };
    Ok(const_hex::encode_prefixed(leaf))
}

pub fn aggregate(calls: &[CallArg]) -> String {
    let calls = calls
        .iter()
        .map(|call| ValidatorCall {
            validator: call.validator,
            commitment: call.commitment,
            payload: Bytes::new(),
        })
        .collect::<Vec<_>>();
    const_hex::encode_prefixed(aggregator::aggregate_commitment(&calls))
}

/// Signs the co-signature the validator at `token.validator` expects from its
/// trusted authority. The fill cap and merkle validators take an encoded
/// `ServerToken`; the delegated validator takes the whole payload.
pub fn sign_server_token(config: &Config, token: &TokenArguments) -> Result<Bytes> {
    let validator = config.validator(token.validator)?;
    if token.private_key.address() != validator.owner {
        tracing::warn!(
            signer = %token.private_key.address(),
            owner = %validator.owner,
            "signing key is not the validator's configured owner"
        );
    }

    let domain = validator.domain_separator(config.chain_id);
    let sign = |struct_hash: B256| -> Result<Bytes> {
        let digest = domain.signing_hash(struct_hash);
        let signature = EcdsaSignature::sign(&digest, &token.private_key)
            .context("signing server token")?;
        Ok(Bytes::from(signature.to_bytes().to_vec()))
    };

    let encoded = match validator.kind {
        Kind::V2 => {
            let struct_hash = v2::FillCapServerToken {
                orderHash: token.order_hash,
                fulfiller: token.fulfiller,
                fillCap: token.max,
                deadline: token.deadline,
            }
            .eip712_hash_struct();
            ServerToken {
                deadline: token.deadline,
                signature: sign(struct_hash)?,
            }
            .abi_encode()
        }
        Kind::V3 => {
            ensure!(token.min <= token.max, "min fill exceeds max fill");
            let struct_hash = v3::ServerToken {
                orderHash: token.order_hash,
                fulfiller: token.fulfiller,
                minFill: token.min,
                maxFill: token.max,
                deadline: token.deadline,
            }
            .eip712_hash_struct();
            ServerToken {
                deadline: token.deadline,
                signature: sign(struct_hash)?,
            }
            .abi_encode()
        }
        Kind::V4 => {
            ensure!(token.min <= token.max, "min fill exceeds max fill");
            let end = token.end.unwrap_or(U256::MAX);
            ensure!(token.start <= end, "window ends before it starts");
            let struct_hash = v4::DelegatedAuthorization {
                orderHash: token.order_hash,
                fulfiller: token.fulfiller,
                minFill: token.min,
                maxFill: token.max,
                startTime: token.start,
                endTime: end,
                deadline: token.deadline,
            }
            .eip712_hash_struct();
            DelegatedPayload {
                minFill: token.min,
                maxFill: token.max,
                startTime: token.start,
                endTime: end,
                serverToken: ServerToken {
                    deadline: token.deadline,
                    signature: sign(struct_hash)?,
                },
            }
            .abi_encode()
        }
    };
    Ok(encoded.into())
}
