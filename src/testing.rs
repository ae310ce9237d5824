//! In-memory stand-ins for the remote services, sleeping and progress reporting.

use rust_decimal::Decimal;

use std::cell::RefCell;
use std::time::Duration;

use crate::audit::Cancellation;
use crate::entity::account::Account;
use crate::error::FetchError;
use crate::progress::Progress;
use crate::retry::Sleep;
use crate::service::{BalanceSource, PriceSource};

pub const SYSTEM: &str = "11111111111111111111111111111111";
pub const WRAPPED_SOL: &str = "So11111111111111111111111111111111111111112";
pub const TOKEN: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const VOTE: &str = "Vote111111111111111111111111111111111111111";

pub fn rate_limited() -> FetchError {
    FetchError::RateLimited {
        message: "429 Too Many Requests".to_string(),
    }
}

#[derive(Default)]
pub struct RecordingSleep {
    delays: RefCell<Vec<Duration>>,
    cancel_on_sleep: Option<Cancellation>,
}

impl RecordingSleep {
    pub fn cancelling(cancellation: Cancellation) -> Self {
        Self {
            delays: RefCell::default(),
            cancel_on_sleep: Some(cancellation),
        }
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Sleep for RecordingSleep {
    fn sleep(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);

        if let Some(cancellation) = &self.cancel_on_sleep {
            cancellation.cancel();
        }
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    events: RefCell<Vec<(u64, u64)>>,
    cancel_at: Option<(u64, Cancellation)>,
}

impl RecordingProgress {
    pub fn cancelling_at(completed: u64, cancellation: Cancellation) -> Self {
        Self {
            events: RefCell::default(),
            cancel_at: Some((completed, cancellation)),
        }
    }

    pub fn events(&self) -> Vec<(u64, u64)> {
        self.events.borrow().clone()
    }
}

impl Progress for RecordingProgress {
    fn advance(&self, completed: u64, total: u64) {
        self.events.borrow_mut().push((completed, total));

        if let Some((at, cancellation)) = &self.cancel_at {
            if *at == completed {
                cancellation.cancel();
            }
        }
    }
}

pub struct Prices<F>(pub F);

impl<F> PriceSource for Prices<F>
where
    F: Fn() -> Result<Decimal, FetchError>,
{
    fn unit_price(&self) -> Result<Decimal, FetchError> {
        (self.0)()
    }
}

pub struct Ledger<F>(pub F);

impl<F> BalanceSource for Ledger<F>
where
    F: Fn(&Account) -> Result<Decimal, FetchError>,
{
    fn balance(&self, account: &Account) -> Result<Decimal, FetchError> {
        (self.0)(account)
    }
}
