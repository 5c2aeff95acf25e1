use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use cloudprobe::cloud::HttpCloudSession;
use cloudprobe::config::{ConfigLoader, ConfigOverrides, ProbeConfig};
use cloudprobe::context::TestContext;
use cloudprobe::runner::{TestReporter, TestRunner, create_event_channel};
use cloudprobe::stats::{FileStore, StatsStore, list_stats};
use cloudprobe::units::Registry;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 显示进行中的检查和 debug 日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full check sequence against the cloud API
    Run(RunArgs),

    /// Show (or clear) the timing statistics of previous runs
    Stats {
        /// Forget every recorded duration
        #[arg(long)]
        clear: bool,

        /// Path to cloudprobe.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to cloudprobe.toml (searched in parent dirs and ~/.config by default)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API base URL, overrides cloud.base_url
    #[arg(long)]
    pub base_url: Option<String>,

    /// Access token, overrides cloud.token
    #[arg(long)]
    pub token: Option<String>,

    /// Local file used by the upload check
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

pub async fn run_checks(args: RunArgs, verbose: bool) -> Result<()> {
    let config = ConfigLoader::load(args.config.as_deref())?.apply(ConfigOverrides {
        base_url: args.base_url,
        token: args.token,
        fixture: args.fixture,
    });
    config.validate()?;

    let session = HttpCloudSession::new(&config.cloud)?;
    let stats = open_stats(&config);
    let context = TestContext::new(session, config.fixture_path());

    let (tx, rx) = create_event_channel();
    let reporter = tokio::spawn(TestReporter::new(verbose).consume(rx));

    let mut runner = TestRunner::new(Registry::standard(), context, stats).with_events(tx);
    let result = runner.start().await;
    if let Some(free) = runner.context().session.free_space() {
        info!("Free space after run: {} bytes", free);
    }
    // closing the channel lets the reporter drain and exit
    drop(runner);
    reporter.await?;

    let summary = result?;
    if !summary.all_passed() {
        bail!("{} of {} checks failed", summary.failed, summary.total);
    }
    Ok(())
}

pub fn show_stats(config_path: Option<PathBuf>, clear: bool) -> Result<()> {
    let config = ConfigLoader::load(config_path.as_deref())?;
    let mut stats = open_stats(&config);

    if clear {
        stats.clear();
        println!("Timing statistics cleared.");
    } else {
        list_stats(&stats);
    }
    Ok(())
}

fn open_stats(config: &ProbeConfig) -> StatsStore {
    let dir = config.stats_dir();
    info!("Using stats in {}", dir.display());
    StatsStore::open(FileStore::new(dir))
}
