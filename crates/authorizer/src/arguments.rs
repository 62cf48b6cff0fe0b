use {
    crate::config::Kind,
    alloy::{
        primitives::{Address, B256, U256},
        signers::local::PrivateKeySigner,
    },
    anyhow::Context,
    std::{fmt, path::PathBuf, str::FromStr},
    tracing::level_filters::LevelFilter,
};

#[derive(clap::Parser)]
#[clap(version, about = "Off-chain tooling for order authorizations")]
pub struct Args {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Path to the TOML file describing the deployed validators.
    #[clap(long, env = "AUTHORIZER_CONFIG")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

/// Arg types have custom `Display` impls instead of relying on `Debug` to avoid
/// accidentally printing secrets. Secret values are printed as "SECRET".
impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.logging)?;
        writeln!(f, "config: {:?}", self.config)?;
        write!(f, "{}", self.command)
    }
}

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,authorizer=info")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Output log events as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

impl fmt::Display for LoggingArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")
    }
}

impl LoggingArguments {
    pub fn observe(&self) -> observe::Config {
        observe::Config::new(
            &self.log_filter,
            self.log_stderr_threshold.into_level(),
            self.use_json_logs,
        )
    }
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Prints the EIP-712 domain separator of a configured validator.
    Domain {
        #[clap(long)]
        validator: Address,
    },

    /// Prints the root of the merkle tree built from the leaves, in order.
    Merkle {
        #[clap(long = "leaf", required = true)]
        leaves: Vec<B256>,
    },

    /// Prints the proof for one leaf of the merkle tree built from the
    /// leaves.
    Proof {
        #[clap(long = "leaf", required = true)]
        leaves: Vec<B256>,

        #[clap(long)]
        index: usize,
    },

    /// Prints the merkle leaf granting a fulfiller the fill bounds. The fill
    /// cap validator only uses `--max`, as the cap.
    Leaf {
        #[clap(long, value_enum)]
        version: Kind,

        #[clap(long)]
        fulfiller: Address,

        #[clap(long, default_value = "0")]
        min: U256,

        #[clap(long)]
        max: U256,
    },

    /// Prints the commitment over a list of validator calls, to be used as
    /// the order's zone hash.
    Aggregate {
        /// `<validator>:<commitment>`, in call order.
        #[clap(long = "call")]
        calls: Vec<CallArg>,
    },

    /// Signs a server token for a configured validator and prints the ABI
    /// encoded token. For the delegated validator the whole payload is
    /// printed.
    SignServerToken(TokenArguments),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain { validator } => writeln!(f, "command: domain {validator}"),
            Self::Merkle { leaves } => writeln!(f, "command: merkle of {} leaves", leaves.len()),
            Self::Proof { leaves, index } => {
                writeln!(f, "command: proof {index} of {} leaves", leaves.len())
            }
            Self::Leaf { version, .. } => writeln!(f, "command: leaf {version:?}"),
            Self::Aggregate { calls } => writeln!(f, "command: aggregate {} calls", calls.len()),
            Self::SignServerToken(token) => {
                writeln!(f, "command: sign-server-token")?;
                write!(f, "{token}")
            }
        }
    }
}

#[derive(clap::Parser)]
pub struct TokenArguments {
    /// The private key of the validator's trusted authority. Expects a
    /// 32-byte hex encoded string.
    #[clap(long, env = "AUTHORIZER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: PrivateKeySigner,

    #[clap(long)]
    pub validator: Address,

    #[clap(long)]
    pub order_hash: B256,

    #[clap(long)]
    pub fulfiller: Address,

    #[clap(long, default_value = "0")]
    pub min: U256,

    /// The maximum fill, or the fill cap for the fill cap validator.
    #[clap(long)]
    pub max: U256,

    /// Start of the validity window. Only used by the delegated validator.
    #[clap(long, default_value = "0")]
    pub start: U256,

    /// End of the validity window. Only used by the delegated validator.
    #[clap(long)]
    pub end: Option<U256>,

    #[clap(long)]
    pub deadline: U256,
}

impl fmt::Display for TokenArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "private_key: SECRET")?;
        writeln!(f, "validator: {}", self.validator)?;
        writeln!(f, "order_hash: {}", self.order_hash)?;
        writeln!(f, "fulfiller: {}", self.fulfiller)?;
        writeln!(f, "min: {}", self.min)?;
        writeln!(f, "max: {}", self.max)?;
        writeln!(f, "start: {}", self.start)?;
        writeln!(f, "end: {:?}", self.end)?;
        writeln!(f, "deadline: {}", self.deadline)
    }
}

/// One entry of an aggregated validator list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallArg {
    pub validator: Address,
    pub commitment: B256,
}

impl FromStr for CallArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (validator, commitment) = s
            .split_once(':')
            .context("expected <validator>:<commitment>")?;
        Ok(Self {
            validator: validator.parse().context("validator address")?,
            commitment: commitment.parse().context("commitment")?,
        })
    }
}
