use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("{0}")]
    AnyHow(#[from] anyhow::Error),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("Unable to install the interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("Unable to retrieve the price quote: {0}")]
    QuoteUnavailable(FetchError),
    #[error("An error occurred while determining the path for: {message}")]
    IncorrectPath { message: String },
    #[error("Configuration file already exists, use --force to overwrite it")]
    ExistingConfiguration,
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Failure of a single remote call, classified so that only rate limiting is retried.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },
    #[error("Invalid account format: '{account}'")]
    InvalidFormat { account: String },
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    Service { message: String },
    #[error("Failed after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        source: Box<FetchError>,
    },
    #[error("Operation cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }

    pub fn service(message: impl Into<String>) -> Self {
        FetchError::Service {
            message: message.into(),
        }
    }
}
