pub mod account;
pub mod balance;
pub mod quote;
pub mod report;
