use std::cmp::Ordering;

use crate::entity::account::Account;
use crate::entity::balance::{Balance, Outcome};
use crate::error::FetchError;

#[derive(Debug)]
pub struct Failure {
    pub account: Account,
    pub reason: FetchError,
}

/// Outcome of a run. Built once by `Aggregator::finalize`.
#[derive(Debug)]
pub struct Report {
    ranked: Vec<Balance>,
    below_threshold: usize,
    failures: Vec<Failure>,
    processed: usize,
    total: usize,
}

impl Report {
    /// Accounts above the threshold, highest fiat value first.
    pub fn ranked(&self) -> &[Balance] {
        &self.ranked
    }

    pub fn below_threshold(&self) -> usize {
        self.below_threshold
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn failed_identifiers(&self) -> Vec<&Account> {
        self.failures.iter().map(|failure| &failure.account).collect()
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// True when the run stopped before every account was checked.
    pub fn partial(&self) -> bool {
        self.processed < self.total
    }
}

#[derive(Debug, Default)]
pub struct Aggregator {
    total: usize,
    recorded: usize,
    ranked: Vec<(usize, Balance)>,
    below_threshold: usize,
    failures: Vec<(usize, Failure)>,
}

impl Aggregator {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// `position` is the index of the account in the input, used to keep input order.
    pub fn record(&mut self, position: usize, outcome: Outcome) {
        self.recorded += 1;

        match outcome {
            Outcome::Success(balance) => self.ranked.push((position, balance)),
            Outcome::BelowThreshold(_) => self.below_threshold += 1,
            Outcome::Failure(account, reason) => {
                self.failures.push((position, Failure { account, reason }))
            }
        }
    }

    pub fn finalize(mut self) -> Report {
        self.ranked.sort_by(|(lpos, left), (rpos, right)| {
            match right.fiat.cmp(&left.fiat) {
                Ordering::Equal => lpos.cmp(rpos),
                val => val,
            }
        });

        self.failures.sort_by_key(|(position, _)| *position);

        Report {
            ranked: self.ranked.into_iter().map(|(_, balance)| balance).collect(),
            below_threshold: self.below_threshold,
            failures: self.failures.into_iter().map(|(_, failure)| failure).collect(),
            processed: self.recorded,
            total: self.total,
        }
    }
}
