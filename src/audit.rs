use log::{error, info, warn};
use rust_decimal::Decimal;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::entity::account::Account;
use crate::entity::balance::{Balance, Outcome};
use crate::entity::quote::Quote;
use crate::entity::report::{Aggregator, Report};
use crate::error::FetchError;
use crate::progress::Progress;
use crate::retry::{Retry, RetryPolicy, Sleep};
use crate::service::{BalanceSource, PriceSource};

/// Shared flag checked between accounts and at every retry sleep.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditOptions {
    pub threshold: Decimal,
    pub retry: RetryPolicy,
    /// Wait imposed after every account, whatever its outcome.
    pub pacing: Duration,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            threshold: Decimal::TEN,
            retry: RetryPolicy::default(),
            pacing: Duration::from_millis(1000),
        }
    }
}

/// Resolves one account to an outcome. Never fails past its own boundary.
pub struct Querier<'a> {
    balances: &'a dyn BalanceSource,
    retry: Retry<'a>,
    threshold: Decimal,
}

impl<'a> Querier<'a> {
    pub fn query(&self, account: &Account, quote: &Quote) -> Outcome {
        match self.balance(account, quote) {
            Ok(balance) => Outcome::classify(balance, self.threshold),
            Err(err) => Outcome::Failure(account.clone(), err),
        }
    }

    fn balance(&self, account: &Account, quote: &Quote) -> Result<Balance, FetchError> {
        account.validate()?;

        let native = self
            .retry
            .attempt(account.as_str(), || self.balances.balance(account))?;

        Ok(Balance::new(account.clone(), native, quote))
    }
}

pub struct Audit<'a> {
    prices: &'a dyn PriceSource,
    balances: &'a dyn BalanceSource,
    options: &'a AuditOptions,
    sleeper: &'a dyn Sleep,
    cancellation: &'a Cancellation,
}

impl<'a> Audit<'a> {
    pub fn new(
        prices: &'a dyn PriceSource,
        balances: &'a dyn BalanceSource,
        options: &'a AuditOptions,
        sleeper: &'a dyn Sleep,
        cancellation: &'a Cancellation,
    ) -> Self {
        Self {
            prices,
            balances,
            options,
            sleeper,
            cancellation,
        }
    }

    fn retry(&self) -> Retry<'a> {
        let options = self.options;

        Retry::new(&options.retry, self.sleeper, self.cancellation)
    }

    pub fn querier(&self) -> Querier<'a> {
        Querier {
            balances: self.balances,
            retry: self.retry(),
            threshold: self.options.threshold,
        }
    }

    /// Fetches a fresh price quote. Any failure here is fatal for a run.
    pub fn quote(&self) -> Result<Quote, FetchError> {
        let price = self
            .retry()
            .attempt("price quote", || self.prices.unit_price())?;

        Quote::new(price)
    }

    /// Checks every non-blank entry of `lines` in order and aggregates the outcomes.
    ///
    /// Only a failure to obtain the price quote is returned as an error. When the run is
    /// cancelled, the report covers the accounts resolved so far.
    pub fn run<I, S>(&self, lines: I, progress: &dyn Progress) -> Result<Report, FetchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accounts = Account::parse_list(lines);

        info!("Auditing {} accounts", accounts.len());

        let quote = self.quote()?;

        info!("Using price quote of {}", quote);

        Ok(self.process(&accounts, &quote, progress))
    }

    /// Resolves `accounts` in order and hands every outcome to `resolved` with its position,
    /// pacing between accounts. Stops early once cancelled; an account interrupted mid-retry is
    /// not handed over.
    pub fn each<F>(&self, accounts: &[Account], quote: &Quote, mut resolved: F)
    where
        F: FnMut(usize, Outcome),
    {
        let total = accounts.len();
        let querier = self.querier();

        for (position, account) in accounts.iter().enumerate() {
            if self.cancellation.cancelled() {
                warn!("Cancelled after {} of {} accounts", position, total);
                return;
            }

            let outcome = querier.query(account, quote);

            if let Outcome::Failure(_, FetchError::Cancelled) = outcome {
                warn!("Cancelled while checking {}", account);
                return;
            }

            resolved(position, outcome);

            if position + 1 < total {
                self.sleeper.sleep(self.options.pacing);
            }
        }
    }

    fn process(&self, accounts: &[Account], quote: &Quote, progress: &dyn Progress) -> Report {
        let total = accounts.len();
        let mut aggregator = Aggregator::new(total);

        self.each(accounts, quote, |position, outcome| {
            if let Outcome::Failure(_, reason) = &outcome {
                error!("Error checking balance for wallet {}: {}", outcome.account(), reason);
            }

            aggregator.record(position, outcome);

            progress.advance(position as u64 + 1, total as u64);
        });

        progress.finish();

        let report = aggregator.finalize();

        info!(
            "Audited {}/{} accounts: {} above threshold, {} below, {} failed",
            report.processed(),
            report.total(),
            report.ranked().len(),
            report.below_threshold(),
            report.failures().len()
        );

        report
    }
}
