mod commands;
mod convert;
mod exit_codes;
mod logging;
mod output;

pub use commands::Cli;

use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.config.as_deref());
    commands::execute(cli)
}
