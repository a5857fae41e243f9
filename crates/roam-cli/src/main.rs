//! eduroam log analyzer CLI.

use std::io::{self, IsTerminal};

use clap::Parser;

use roam_cli::cli::{Cli, Command};
use roam_cli::commands::{run_export, run_parse, run_summary, run_user};
use roam_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Summary(args) => run_summary(args),
        Command::User(args) => run_user(args),
        Command::Export(args) => run_export(args).map(|_| ()),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
