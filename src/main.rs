use clap::Parser;

use cataloger::cli::{Cli, Commands};
use cataloger::commands::{run_check, run_create};
use cataloger::config::DEFAULT_VERBOSE;
use cataloger::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose.unwrap_or(DEFAULT_VERBOSE));

    let exit_code = match &cli.command {
        Commands::Create => run_create(&cli),
        Commands::Check(_) => run_check(&cli),
    };

    std::process::exit(exit_code);
}
