use clap::{Parser, Subcommand};

mod audit;
mod cmd;
mod config;
mod entity;
mod error;
mod progress;
mod retry;
mod service;
#[cfg(test)]
mod testing;

pub type CliResult<T> = Result<T, error::CliError>;

#[macro_export]
macro_rules! wout {
    ($($arg:tt)*) => ({
        use std::io::Write;
        let _ = writeln!(&mut ::std::io::stdout(), $($arg)*);
    });
}

#[macro_export]
macro_rules! werr {
    ($code:expr, $($arg:tt)*) => ({
        use std::io::Write;
        let _ = writeln!(&mut ::std::io::stderr(), $($arg)*);
        ::std::process::exit($code);
    });
}

#[derive(Parser, Debug)]
#[command(version, about = "Audit wallet balances against a live price quote")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the default configuration file
    Configure(cmd::configure::Args),
    /// Check the balance of specific wallets
    Check(cmd::check::Args),
    /// Check every wallet listed in a file and write a report
    Audit(cmd::audit::Args),
    /// Interactive menu
    Menu(cmd::menu::Args),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Configure(args) => cmd::configure::run(args),
        Command::Check(args) => cmd::check::run(args),
        Command::Audit(args) => cmd::audit::run(args),
        Command::Menu(args) => cmd::menu::run(args),
    };

    if let Err(err) = result {
        werr!(1, "{}", err);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_audit_overrides() {
        let cli = Cli::try_parse_from([
            "balance-audit",
            "audit",
            "--input",
            "list.txt",
            "--threshold",
            "25.5",
            "--attempts",
            "3",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Audit(_)));
    }

    #[test]
    fn check_requires_an_address() {
        assert!(Cli::try_parse_from(["balance-audit", "check"]).is_err());
    }
}
