use clap::Parser;

use std::path::Path;

use crate::config::Config;
use crate::error::CliError;
use crate::CliResult;

static SUCCESS: &str = "Generated default configuration file on";

#[derive(Parser, Debug)]
pub struct Args {
    /// Write the default configuration file, overriding existing file
    #[arg(short, long)]
    force: bool,
}

pub fn run(args: Args) -> CliResult<()> {
    args.configure(&Config::path()?)
}

impl Args {
    fn configure(&self, config_path: &str) -> CliResult<()> {
        if Path::new(config_path).exists() && !self.force {
            Err(CliError::ExistingConfiguration)
        } else {
            Config::create(config_path)?;
            crate::wout!("{} {}", SUCCESS, config_path);
            Ok(())
        }
    }
}
