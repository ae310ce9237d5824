use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::audit::AuditOptions;
use crate::error::CliError;
use crate::retry::RetryPolicy;
use crate::service::{coingecko, solana};
use crate::CliResult;

const CONFIGURATION_FILENAME: &str = "config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub threshold: Decimal,
    /// Wait between accounts, in milliseconds.
    pub pacing: u64,
    pub retry: RetryPolicy,
    pub services: Services,
    files: Files,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Services {
    pub rpc_url: String,
    pub commitment: String,
    pub price_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Files {
    input: String,
    output: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            threshold: Decimal::TEN,
            pacing: 1000,
            retry: RetryPolicy::default(),
            services: Services::default(),
            files: Files::default(),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Services {
            rpc_url: solana::URL.to_string(),
            commitment: solana::COMMITMENT.to_string(),
            price_url: coingecko::URL.to_string(),
        }
    }
}

impl Default for Files {
    fn default() -> Self {
        Files {
            input: "wallets.txt".to_string(),
            output: "wallet_balances.txt".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> CliResult<Config> {
        let config = Config::stored()?;

        config.validate()?;

        Ok(config)
    }

    /// The stored configuration, not yet validated so that overrides can still fix it.
    pub fn stored() -> CliResult<Config> {
        Config::load(&Config::path()?)
    }

    pub fn load(config_path: &str) -> CliResult<Config> {
        if Path::new(config_path).exists() {
            let file = File::open(config_path)?;
            Ok(serde_yaml::from_reader(file)?)
        } else {
            Config::create(config_path)
        }
    }

    pub fn create(config_path: &str) -> CliResult<Config> {
        let default = Config::default();

        let mut file = File::create(config_path)?;
        let yaml = serde_yaml::to_string(&default)?;
        file.write_all(yaml.as_bytes())?;
        Ok(default)
    }

    /// Location under the XDG config home, creating the parent directory when needed.
    pub fn path() -> CliResult<String> {
        let filepath = xdg::BaseDirectories::with_prefix(env!("CARGO_PKG_NAME"))?
            .place_config_file(CONFIGURATION_FILENAME)?;

        filepath
            .to_str()
            .map(|v| v.to_string())
            .ok_or_else(|| CliError::IncorrectPath {
                message: filepath.display().to_string(),
            })
    }

    pub fn validate(&self) -> CliResult<()> {
        let invalid = |message: &str| {
            Err(CliError::InvalidConfiguration {
                message: message.to_string(),
            })
        };

        if self.retry.max_attempts == 0 {
            return invalid("retry.max_attempts must be at least 1");
        }

        if !(self.retry.backoff_multiplier > 1.0 && self.retry.backoff_multiplier.is_finite()) {
            return invalid("retry.backoff_multiplier must be greater than 1");
        }

        if self.threshold < Decimal::ZERO {
            return invalid("threshold must not be negative");
        }

        Ok(())
    }

    pub fn options(&self) -> AuditOptions {
        AuditOptions {
            threshold: self.threshold,
            retry: self.retry.clone(),
            pacing: Duration::from_millis(self.pacing),
        }
    }

    pub fn input(&self) -> String {
        shellexpand::tilde(&self.files.input).to_string()
    }

    pub fn output(&self) -> String {
        shellexpand::tilde(&self.files.output).to_string()
    }
}
