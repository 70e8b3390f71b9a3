//! claimflow - train and score an insurance-claims classifier

use anyhow::Context;
use clap::Parser;
use claimflow::config::ModelParams;
use claimflow::{data, pipeline, training};

const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/Josepholaidepetro/Umojahack/main/maven/Train.csv";

/// Train a gradient-boosted claims classifier and report cross-validated ROC-AUC.
#[derive(Parser)]
#[command(name = "claimflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cross-validated gradient-boosted classification of insurance claims")]
struct Cli {
    /// Path or URL of the training CSV
    #[arg(short, long, default_value = DEFAULT_DATA_URL)]
    data: String,

    /// Number of cross-validation folds
    #[arg(long, default_value_t = 5)]
    folds: usize,

    /// Control the balance of positive and negative weights, useful for unbalanced classes
    #[arg(long, default_value_t = 8.192_292_9)]
    scale_pos_weight: f64,

    /// The subsample ratio of columns for each level
    #[arg(long, default_value_t = 0.8)]
    colsample_bylevel: f64,

    /// Step size shrinkage used in update to prevent overfitting
    #[arg(long, default_value_t = 0.143_242)]
    eta: f64,

    /// Maximum depth of a tree
    #[arg(long, default_value_t = 10)]
    max_depth: usize,

    /// Number of trees to fit
    #[arg(long, default_value_t = 800)]
    n_estimators: usize,

    /// L1 regularization term on weights
    #[arg(long, default_value_t = 0.8)]
    reg_alpha: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "claimflow=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let params = ModelParams {
        scale_pos_weight: cli.scale_pos_weight,
        colsample_bylevel: cli.colsample_bylevel,
        eta: cli.eta,
        max_depth: cli.max_depth,
        n_estimators: cli.n_estimators,
        reg_alpha: cli.reg_alpha,
        ..ModelParams::default()
    };
    tracing::debug!(params = %serde_json::to_string(&params)?, "run configuration");

    let raw = data::loader::load(&cli.data).context("loading dataset")?;
    let engineered = pipeline::run(&raw).context("running transform pipeline")?;
    let report = training::cross_validate(&engineered, &params, cli.folds)
        .context("cross-validated training")?;

    tracing::info!(
        folds = report.n_folds,
        std = format!("{:.4}", report.std_score),
        "cross-validation complete"
    );
    println!("mean ROC-AUC = {:.4}", report.mean_score);

    Ok(())
}
