use clap::Parser;
use colored::*;

use cli::{Cli, Commands, CompressArgs};

mod cli;
mod commands;
mod constants;
mod errors;
mod format;
mod logging;
mod manifest;
mod report;
mod selection;
mod utils;

fn main() {
    if let Err(e) = run() {
        match e.kind_label() {
            Some(label) => eprintln!("{}", format!("{label}: {e}").red()),
            None => eprintln!("{}", e.to_string().red()),
        }
    };
}

fn run() -> errors::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command.unwrap_or_else(|| Commands::Compress(CompressArgs::default())) {
        Commands::Compress(args) => commands::compress::run(args),
        Commands::Fix(args) => commands::fix::run(args),
    }?;

    Ok(())
}
