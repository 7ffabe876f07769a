use clap::Parser;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "recolor")]
#[command(version, about = "Affinity v3 icon and splash patcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
