use rust_decimal::Decimal;

use std::fmt;

use crate::entity::account::Account;
use crate::entity::quote::Quote;
use crate::error::FetchError;

#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub account: Account,
    pub native: Decimal,
    pub fiat: Decimal,
}

impl Balance {
    pub fn new(account: Account, native: Decimal, quote: &Quote) -> Self {
        Self {
            account,
            native,
            fiat: quote.convert(native),
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:.4} SOL (~${:.2})",
            self.native.round_dp(4),
            self.fiat.round_dp(2)
        )
    }
}

/// Result of checking one account. Every non-blank input produces exactly one.
#[derive(Debug)]
pub enum Outcome {
    Success(Balance),
    BelowThreshold(Balance),
    Failure(Account, FetchError),
}

impl Outcome {
    /// Only balances strictly above the threshold are reported individually.
    pub fn classify(balance: Balance, threshold: Decimal) -> Self {
        if balance.fiat > threshold {
            Outcome::Success(balance)
        } else {
            Outcome::BelowThreshold(balance)
        }
    }

    pub fn account(&self) -> &Account {
        match self {
            Outcome::Success(balance) | Outcome::BelowThreshold(balance) => &balance.account,
            Outcome::Failure(account, _) => account,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(native: Decimal) -> Balance {
        Balance::new(Account::new("A"), native, &Quote::new(Decimal::new(20, 0)).unwrap())
    }

    #[test]
    fn above_threshold_is_success() {
        let outcome = Outcome::classify(balance(Decimal::ONE), Decimal::new(10, 0));

        assert!(matches!(outcome, Outcome::Success(b) if b.fiat == Decimal::new(20, 0)));
    }

    #[test]
    fn equal_to_threshold_is_below() {
        let outcome = Outcome::classify(balance(Decimal::new(5, 1)), Decimal::new(10, 0));

        assert!(matches!(outcome, Outcome::BelowThreshold(_)));
    }

    #[test]
    fn displays_rounded_amounts() {
        let balance = Balance {
            account: Account::new("A"),
            native: Decimal::new(123456789, 9),
            fiat: Decimal::new(24691, 3),
        };

        assert_eq!(balance.to_string(), "0.1235 SOL (~$24.69)");
    }

    #[test]
    fn failure_keeps_the_account() {
        let outcome = Outcome::Failure(Account::new("C"), FetchError::service("down"));

        assert_eq!(outcome.account(), &Account::new("C"));
    }
}
