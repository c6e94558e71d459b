//! folio-cli: walks a Folio archive through the pagination controller.
#![deny(clippy::all)]

mod args;
mod browse;
mod print;


use clap::Parser;

use args::{Cli, Commands};
use browse::CliError;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let site = cli.site.clone().ok_or(CliError::MissingSite)?;

    match cli.command {
        Commands::Browse(args) => {
            let report = browse::handle(&site, &args).await?;
            if args.json {
                print::print_json(&report)?;
            } else {
                print::print_text(&report);
            }
        }
    }

    Ok(())
}
