use anyhow::Context;
use clap::Parser;
use prettytable::{format, Cell, Row, Table};
use rust_decimal::Decimal;

use std::fmt::Write;

use crate::cmd::Session;
use crate::config::Config;
use crate::entity::account::Account;
use crate::entity::balance::Balance;
use crate::entity::report::Report;
use crate::error::CliError;
use crate::{progress, CliResult};

#[derive(Parser, Debug, Default)]
pub struct Args {
    /// File with one wallet address per line [default: files.input from the configuration]
    #[arg(short, long)]
    input: Option<String>,
    /// Where the text report is written [default: files.output from the configuration]
    #[arg(short, long)]
    output: Option<String>,
    /// Value (USD) above which a wallet is listed individually
    #[arg(short, long)]
    threshold: Option<Decimal>,
    /// Wait between wallets, in milliseconds
    #[arg(short, long)]
    pacing: Option<u64>,
    /// Maximum attempts per remote call when rate limited
    #[arg(short, long)]
    attempts: Option<u32>,
}

pub fn run(args: Args) -> CliResult<()> {
    let config = Config::stored()?;

    args.audit(config)
}

impl Args {
    fn audit(&self, config: Config) -> CliResult<()> {
        let config = self.apply(config)?;

        let input = self.input.clone().unwrap_or_else(|| config.input());
        let output = self.output.clone().unwrap_or_else(|| config.output());

        let report = perform(&config, &input, &output)?;

        display(&report, config.threshold);

        Ok(())
    }

    fn apply(&self, mut config: Config) -> CliResult<Config> {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }

        if let Some(pacing) = self.pacing {
            config.pacing = pacing;
        }

        if let Some(attempts) = self.attempts {
            config.retry.max_attempts = attempts;
        }

        config.validate()?;

        Ok(config)
    }
}

/// Audits every wallet listed in `input` and writes the text report to `output`.
pub fn perform(config: &Config, input: &str, output: &str) -> CliResult<Report> {
    let lines = read_lines(input)?;

    let session = Session::new(config)?;

    let pb = progress::bar(Account::parse_list(&lines).len() as u64);

    let report = session
        .audit()
        .run(&lines, &pb)
        .map_err(CliError::QuoteUnavailable)?;

    std::fs::write(output, render(&report, config.threshold))
        .with_context(|| format!("Unable to write the report to {}", output))?;

    if report.partial() {
        crate::wout!(
            "Audit interrupted after {} of {} wallets",
            report.processed(),
            report.total()
        );
    }

    crate::wout!("Report written to {}", output);

    Ok(report)
}

fn read_lines(path: &str) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read wallet addresses from {}", path))?;

    Ok(content.lines().map(|line| line.to_string()).collect())
}

pub fn render(report: &Report, threshold: Decimal) -> String {
    let mut out = String::from("Wallet Checker\n\n");

    for (index, balance) in report.ranked().iter().enumerate() {
        let _ = write!(
            out,
            "{}. Wallet Address: {}\n   Balance: {}\n\n",
            index + 1,
            balance.account,
            balance
        );
    }

    let _ = writeln!(
        out,
        "Total number of wallets with balance of ${} or less: {}",
        threshold,
        report.below_threshold()
    );

    if !report.failures().is_empty() {
        out.push_str("\nErrors occurred for the following addresses:\n");

        for (index, account) in report.failed_identifiers().iter().enumerate() {
            let _ = writeln!(out, "   {}. {}", index + 1, account);
        }
    }

    if report.partial() {
        let _ = writeln!(
            out,
            "\nAudit interrupted: {} of {} wallets checked",
            report.processed(),
            report.total()
        );
    }

    out
}

fn display(report: &Report, threshold: Decimal) {
    if !report.ranked().is_empty() {
        ranking(report).printstd();
    }

    summary(report, threshold).printstd();

    if !report.failures().is_empty() {
        failures(report).printstd();
    }
}

fn ranking(report: &Report) -> Table {
    let mut table = Table::new();

    table.set_format(format::FormatBuilder::new().padding(2, 3).build());

    table.set_titles(Row::new(vec![Cell::new("Wallets")
        .with_hspan(4)
        .style_spec("bcFC")]));

    table.add_row(Row::new(vec![
        Cell::new("#").style_spec("bFB"),
        Cell::new("Address").style_spec("bFB"),
        Cell::new("Balance").style_spec("brFB"),
        Cell::new("Value").style_spec("brFB"),
    ]));

    for (index, balance) in report.ranked().iter().enumerate() {
        table.add_row(row(index + 1, balance));
    }

    table
}

fn row(rank: usize, balance: &Balance) -> Row {
    Row::new(vec![
        Cell::new(&rank.to_string()).style_spec("FW"),
        Cell::new(balance.account.as_str()).style_spec("bFW"),
        Cell::new(&format!("{:.4} SOL", balance.native.round_dp(4))).style_spec("rFW"),
        Cell::new(&format!("${:.2}", balance.fiat.round_dp(2))).style_spec("brFG"),
    ])
}

fn summary(report: &Report, threshold: Decimal) -> Table {
    let mut table = Table::new();

    table.set_format(format::FormatBuilder::new().padding(2, 3).build());

    table.set_titles(Row::new(vec![Cell::new("Totals")
        .with_hspan(2)
        .style_spec("bcFC")]));

    table.add_row(Row::new(vec![
        Cell::new(&format!("Above ${}", threshold)).style_spec("bFB"),
        Cell::new(&report.ranked().len().to_string()).style_spec("brFG"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new(&format!("At or below ${}", threshold)).style_spec("bFB"),
        Cell::new(&report.below_threshold().to_string()).style_spec("brFW"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Errors").style_spec("bFB"),
        Cell::new(&report.failures().len().to_string()).style_spec("brFR"),
    ]));

    table
}

fn failures(report: &Report) -> Table {
    let mut table = Table::new();

    table.set_format(format::FormatBuilder::new().padding(2, 3).build());

    table.set_titles(Row::new(vec![Cell::new("Errors")
        .with_hspan(2)
        .style_spec("bcFR")]));

    for failure in report.failures() {
        table.add_row(Row::new(vec![
            Cell::new(failure.account.as_str()).style_spec("bFW"),
            Cell::new(&failure.reason.to_string()).style_spec("FR"),
        ]));
    }

    table
}
