//! The deployment file describing the validators an authority operates.

use {
    alloy::primitives::Address,
    anyhow::{Context, Result, ensure},
    model::DomainSeparator,
    order_validation::{Callers, Deployment},
    serde::Deserialize,
    std::{collections::HashSet, fs, path::Path},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub chain_id: u64,
    /// The settlement protocol validators accept calls from.
    pub settlement: Address,
    /// The aggregator restricted validators accept calls from.
    #[serde(default)]
    pub aggregator: Option<Address>,
    #[serde(default, rename = "validator")]
    pub validators: Vec<ValidatorConfig>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Fill-cap validator.
    V2,
    /// Merkle validator.
    V3,
    /// Delegated validator.
    V4,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ValidatorConfig {
    pub kind: Kind,
    pub name: String,
    pub version: String,
    pub address: Address,
    pub owner: Address,
}

impl ValidatorConfig {
    pub fn deployment(&self) -> Deployment {
        Deployment {
            name: self.name.clone(),
            version: self.version.clone(),
            address: self.address,
            owner: self.owner,
        }
    }

    pub fn domain_separator(&self, chain_id: u64) -> DomainSeparator {
        DomainSeparator::new(&self.name, &self.version, chain_id, self.address)
    }
}

impl Config {
    pub fn callers(&self) -> Callers {
        Callers {
            settlement: self.settlement,
            aggregator: self.aggregator,
        }
    }

    pub fn validator(&self, address: Address) -> Result<&ValidatorConfig> {
        self.validators
            .iter()
            .find(|validator| validator.address == address)
            .with_context(|| format!("validator {address} is not configured"))
    }

    fn validate(&self) -> Result<()> {
        let mut addresses = HashSet::new();
        for validator in &self.validators {
            ensure!(
                addresses.insert(validator.address),
                "validator {} is configured more than once",
                validator.address
            );
            ensure!(
                Some(validator.address) != self.aggregator,
                "validator {} uses the aggregator address",
                validator.address
            );
        }
        Ok(())
    }
}

/// Loads and validates the deployment file.
pub fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    let config: Config = toml::from_str(&data).with_context(|| format!("parsing {path:?}"))?;
    config.validate().with_context(|| format!("validating {path:?}"))?;
    tracing::debug!(validators = config.validators.len(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address, std::io::Write, tempfile::NamedTempFile};

    fn write(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_deployment_file() {
        let file = write(
            r#"
            chain-id = 1
            settlement = "0x00000000000000ADc04C56Bf30aC9d3c0aAF14dC"
            aggregator = "0xa9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9"

            [[validator]]
            kind = "v3"
            name = "MerkleAuthorizer"
            version = "3"
            address = "0x3333333333333333333333333333333333333333"
            owner = "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF"

            [[validator]]
            kind = "v4"
            name = "DelegatedAuthorizer"
            version = "4"
            address = "0x4444444444444444444444444444444444444444"
            owner = "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF"
            "#,
        );

        let config = load(file.path()).unwrap();
        assert_eq!(config.chain_id, 1);
        assert_eq!(
            config.callers(),
            Callers {
                settlement: address!("00000000000000ADc04C56Bf30aC9d3c0aAF14dC"),
                aggregator: Some(address!("a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9a9")),
            }
        );
        assert_eq!(config.validators.len(), 2);

        let merkle = config
            .validator(address!("3333333333333333333333333333333333333333"))
            .unwrap();
        assert_eq!(merkle.kind, Kind::V3);
        assert_eq!(merkle.deployment().name, "MerkleAuthorizer");
        assert!(
            config
                .validator(address!("5555555555555555555555555555555555555555"))
                .is_err()
        );
    }

    #[test]
    fn aggregator_is_optional() {
        let file = write(
            r#"
            chain-id = 5
            settlement = "0x00000000000000ADc04C56Bf30aC9d3c0aAF14dC"
            "#,
        );

        let config = load(file.path()).unwrap();
        assert_eq!(config.aggregator, None);
        assert!(config.validators.is_empty());
    }

    #[test]
    fn rejects_unknown_fields() {
        let file = write(
            r#"
            chain-id = 1
            settlement = "0x00000000000000ADc04C56Bf30aC9d3c0aAF14dC"
            solver = "0x00000000000000ADc04C56Bf30aC9d3c0aAF14dC"
            "#,
        );
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn rejects_duplicate_validators() {
        let validator = r#"
            [[validator]]
            kind = "v2"
            name = "FillCapAuthorizer"
            version = "2"
            address = "0x2222222222222222222222222222222222222222"
            owner = "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF"
        "#;
        let file = write(&format!(
            r#"
            chain-id = 1
            settlement = "0x00000000000000ADc04C56Bf30aC9d3c0aAF14dC"
            {validator}
            {validator}
            "#
        ));
        assert!(load(file.path()).is_err());
    }
}
