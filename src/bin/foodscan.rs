//! foodscan - scan an ingredient label from the command line
//!
//! Reads the label from the positional argument or stdin, analyzes it
//! against the embedded seed dataset (or `--dataset`) and prints the
//! analysis as pretty JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use foodscan::FoodscanConfig;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for foodscan
#[derive(Parser, Debug)]
#[command(name = "foodscan")]
#[command(about = "Scan an ingredient label for allergen and irritant triggers")]
#[command(version)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "FOODSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// JSON dataset overriding the configured knowledge base
    #[arg(short, long, env = "FOODSCAN_DATASET")]
    dataset: Option<PathBuf>,

    /// Escalate moderate-risk findings to avoid
    #[arg(short, long)]
    flare: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Ingredient list; read from stdin when omitted
    ingredients: Option<String>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let mut config = match &args.config {
        Some(path) => FoodscanConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FoodscanConfig::default(),
    };
    if let Some(dataset) = args.dataset {
        config.knowledge.dataset_path = Some(dataset);
    }

    let ingredients = match args.ingredients {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read ingredients from stdin")?;
            buf
        }
    };

    let analyzer = config
        .build_analyzer()
        .context("failed to initialize analyzer")?;
    let flare_mode = args.flare || config.analysis.flare_mode;
    info!(flare_mode, chars = ingredients.chars().count(), "foodscan.scan");

    let result = analyzer
        .analyze(&ingredients, flare_mode)
        .await
        .context("analysis failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
