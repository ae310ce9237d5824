use clap::Parser;

use std::io::Write;

use crate::audit::Audit;
use crate::cmd::Session;
use crate::config::Config;
use crate::entity::account::Account;
use crate::entity::balance::{Balance, Outcome};
use crate::entity::quote::Quote;
use crate::CliResult;

#[derive(Parser, Debug)]
pub struct Args {
    /// Wallet addresses to check
    #[arg(required = true)]
    addresses: Vec<String>,
}

pub fn run(args: Args) -> CliResult<()> {
    let config = Config::new()?;

    args.check(&config)
}

impl Args {
    fn check(&self, config: &Config) -> CliResult<()> {
        let session = Session::new(config)?;

        let quote = session.quote()?;

        let accounts = Account::parse_list(&self.addresses);

        check(&session.audit(), &quote, &accounts, &mut std::io::stdout());

        Ok(())
    }
}

/// Prints each wallet as soon as it is resolved, until done or interrupted.
fn check<W: Write>(audit: &Audit, quote: &Quote, accounts: &[Account], out: &mut W) {
    audit.each(accounts, quote, |_, outcome| {
        let _ = writeln!(out, "{}", describe(&outcome));
    });
}

/// Outcome of a single wallet check, shown regardless of the reporting threshold.
pub fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success(balance) | Outcome::BelowThreshold(balance) => describe_balance(balance),
        Outcome::Failure(account, reason) => {
            format!("Error checking balance for wallet {}: {}\n", account, reason)
        }
    }
}

fn describe_balance(balance: &Balance) -> String {
    format!("Wallet Address: {}\nBalance: {}\n", balance.account, balance)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::audit::{AuditOptions, Cancellation};
    use crate::error::FetchError;
    use crate::testing::*;

    #[test]
    fn describes_balances_below_threshold_too() {
        let quote = Quote::new(Decimal::new(20, 0)).unwrap();
        let balance = Balance::new(Account::new("A"), Decimal::new(3, 1), &quote);

        assert_eq!(
            describe(&Outcome::BelowThreshold(balance)),
            "Wallet Address: A\nBalance: 0.3000 SOL (~$6.00)\n"
        );
    }

    #[test]
    fn describes_failures() {
        let outcome = Outcome::Failure(
            Account::new("C"),
            FetchError::InvalidFormat {
                account: "C".to_string(),
            },
        );

        assert_eq!(
            describe(&outcome),
            "Error checking balance for wallet C: Invalid account format: 'C'\n"
        );
    }

    #[test]
    fn interrupted_check_skips_the_remaining_wallets() {
        let cancellation = Cancellation::default();
        let prices = Prices(|| -> Result<Decimal, FetchError> { Ok(Decimal::new(20, 0)) });
        let ledger = Ledger(|_: &Account| {
            cancellation.cancel();
            Ok(Decimal::ONE)
        });
        let options = AuditOptions::default();
        let sleeper = RecordingSleep::default();
        let audit = Audit::new(&prices, &ledger, &options, &sleeper, &cancellation);
        let quote = audit.quote().unwrap();
        let mut out = Vec::new();

        check(
            &audit,
            &quote,
            &Account::parse_list(vec![SYSTEM, TOKEN]),
            &mut out,
        );

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with(&format!("Wallet Address: {}\n", SYSTEM)));
        assert!(!printed.contains(TOKEN));
    }
}
