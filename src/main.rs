use anyhow::Result;
use clap::Parser;

use chatbot::{
    cli::{handle_command, Cli},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging if verbose
    if cli.verbose {
        init_logger();
    }

    // Failures already rendered to the user only need the exit code
    if !handle_command(cli).await? {
        std::process::exit(1);
    }

    Ok(())
}
