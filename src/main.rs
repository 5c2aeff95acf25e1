mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    let level = if cli.verbose { "debug" } else { "warn" };
    cloudprobe::logger::init_logger(level);

    match cli.command {
        Commands::Run(args) => cli::run_checks(args, cli.verbose).await?,
        Commands::Stats { clear, config } => cli::show_stats(config, clear)?,
    }
    Ok(())
}
