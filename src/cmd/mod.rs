use log::warn;

use std::sync::OnceLock;
use std::time::Duration;

use crate::audit::{Audit, AuditOptions, Cancellation};
use crate::config::Config;
use crate::entity::quote::Quote;
use crate::error::CliError;
use crate::retry::ThreadSleep;
use crate::service::coingecko::CoinGecko;
use crate::service::solana::Solana;
use crate::CliResult;

pub mod audit;
pub mod check;
pub mod configure;
pub mod menu;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const INTERRUPTED: i32 = 130;

static CANCELLATION: OnceLock<Cancellation> = OnceLock::new();

/// The first Ctrl-C cancels the running audit, a second one exits.
fn interrupt() -> CliResult<Cancellation> {
    if let Some(cancellation) = CANCELLATION.get() {
        return Ok(cancellation.clone());
    }

    let cancellation = Cancellation::default();
    let handler = cancellation.clone();

    ctrlc::set_handler(move || {
        if handler.cancelled() {
            std::process::exit(INTERRUPTED);
        }
        warn!("Interrupted, stopping after the current wallet (press Ctrl-C again to exit)");
        handler.cancel();
    })?;

    Ok(CANCELLATION.get_or_init(|| cancellation).clone())
}

/// Remote clients and run settings shared by the commands.
pub struct Session {
    prices: CoinGecko,
    balances: Solana,
    options: AuditOptions,
    sleeper: ThreadSleep,
    cancellation: Cancellation,
}

impl Session {
    pub fn new(config: &Config) -> CliResult<Self> {
        let cancellation = interrupt()?;
        cancellation.reset();

        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            prices: CoinGecko::new(&config.services.price_url, http.clone()),
            balances: Solana::new(&config.services.rpc_url, &config.services.commitment, http),
            options: config.options(),
            sleeper: ThreadSleep::new(cancellation.clone()),
            cancellation,
        })
    }

    pub fn audit(&self) -> Audit<'_> {
        Audit::new(
            &self.prices,
            &self.balances,
            &self.options,
            &self.sleeper,
            &self.cancellation,
        )
    }

    pub fn quote(&self) -> CliResult<Quote> {
        self.audit().quote().map_err(CliError::QuoteUnavailable)
    }
}
