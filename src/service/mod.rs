use reqwest::blocking::Response;
use reqwest::StatusCode;
use rust_decimal::Decimal;

use crate::entity::account::Account;
use crate::error::FetchError;

pub mod coingecko;
pub mod solana;

/// Remote price of one native unit in the reporting currency.
pub trait PriceSource {
    fn unit_price(&self) -> Result<Decimal, FetchError>;
}

/// Remote ledger returning the native-unit balance of an account.
pub trait BalanceSource {
    fn balance(&self, account: &Account) -> Result<Decimal, FetchError>;
}

/// Maps HTTP 429 to a transient failure and any other non-success status to a permanent one.
fn check_status(response: Response) -> Result<Response, FetchError> {
    classify_status(response.status(), response.url().as_str())?;

    Ok(response)
}

fn classify_status(status: StatusCode, url: &str) -> Result<(), FetchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        Err(FetchError::RateLimited {
            message: format!("{} answered {}", url, status),
        })
    } else if !status.is_success() {
        Err(FetchError::service(format!("{} answered {}", url, status)))
    } else {
        Ok(())
    }
}
