mod analyze;
mod collect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use yolix_analysis::AnalysisIntent;

#[derive(Debug, Parser)]
#[command(name = "yolix-cli")]
#[command(about = "Collect and analyze YouTube comments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every comment of a video and export them as CSV
    Collect {
        /// Watch URL containing a `v=` parameter
        url: String,
        /// CSV destination (defaults to youtube-comments-YYYY-MM-DD.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show the most active authors and monthly comment volume
    Stats {
        /// Watch URL containing a `v=` parameter
        url: String,
    },
    /// Run one or more LLM analyses over a video's comments
    Analyze {
        /// Watch URL containing a `v=` parameter
        url: String,
        /// summary, keywords, topics or combined; repeat or comma-separate
        #[arg(long = "intent", required = true, value_delimiter = ',')]
        intents: Vec<AnalysisIntent>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = yolix_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Collect { url, output }) => {
            collect::run_collect(&config, &url, output).await?;
        }
        Some(Commands::Stats { url }) => collect::run_stats(&config, &url).await?,
        Some(Commands::Analyze { url, intents }) => {
            analyze::run_analyze(&config, &url, &intents).await?;
        }
        None => println!("no command given; run `yolix-cli --help` for usage"),
    }

    Ok(())
}
