// reqlint - Requirements Manifest Linter
// Main CLI entry point

use clap::Parser;
use std::process;
use reqlint::cli::{Cli, CliDispatcher};
use reqlint::utils::error::UserError;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = CliDispatcher::execute(cli.command);

    if let Err(err) = result {
        let user_error = UserError::from_error(&err);
        user_error.print();
        process::exit(user_error.exit_code);
    }
}
