//! premium-cli - Train and query the premium estimator offline
//!
//! Usage:
//!   premium-cli train --dataset data.csv            # Fit and save a bundle
//!   premium-cli predict --age 30 --weight 70 ...    # Score one submission
//!   premium-cli schema                              # Show the feature layout

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use premium_core::constants::{APP_VERSION, DEFAULT_SEED, DEFAULT_TEST_RATIO};
use premium_core::logic::artifacts::{default_bundle_path, load_bundle, save_bundle};
use premium_core::{CollinearityPolicy, RawInput, Trainer, TrainerConfig};

#[derive(Parser)]
#[command(name = "premium-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit schema, preprocessor and model on a CSV dataset
    Train {
        /// Path to the training CSV
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,

        /// Where to write the bundle (defaults to the local data directory)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Fraction of labeled rows held out for evaluation
        #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
        test_ratio: f64,

        /// Fail instead of dropping collinear feature columns
        #[arg(long)]
        reject_collinear: bool,
    },

    /// Estimate the premium for one submission
    Predict {
        #[arg(long, value_name = "FILE")]
        bundle: Option<PathBuf>,

        #[arg(long)]
        age: f64,

        /// Kilograms
        #[arg(long)]
        weight: f64,

        /// Homme / Femme
        #[arg(long)]
        sex: String,

        /// Oui / Non
        #[arg(long)]
        smoker: String,

        #[arg(long)]
        region: String,

        #[arg(long, default_value_t = 0)]
        children: i64,
    },

    /// Print the feature layout of a saved bundle
    Schema {
        #[arg(long, value_name = "FILE")]
        bundle: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Train {
            dataset,
            out,
            seed,
            test_ratio,
            reject_collinear,
        } => {
            log::info!("premium-cli v{} training on {}", APP_VERSION, dataset.display());

            let config = TrainerConfig {
                seed,
                test_ratio,
                collinearity: if reject_collinear {
                    CollinearityPolicy::Reject
                } else {
                    CollinearityPolicy::MinimumNorm
                },
                ..Default::default()
            };
            let bundle = Trainer::new(config)?
                .train_file(&dataset)
                .context("training failed")?;

            let path = out.unwrap_or_else(default_bundle_path);
            save_bundle(&bundle, &path)
                .with_context(|| format!("cannot save bundle to {}", path.display()))?;

            println!("{}", serde_json::to_string_pretty(&bundle.metadata.report)?);
        }

        Commands::Predict {
            bundle,
            age,
            weight,
            sex,
            smoker,
            region,
            children,
        } => {
            let path = bundle.unwrap_or_else(default_bundle_path);
            let bundle = load_bundle(&path)
                .with_context(|| format!("cannot load bundle from {}", path.display()))?;

            let raw = RawInput {
                age,
                weight,
                sex,
                smoking_status: smoker,
                region,
                number_of_children: children,
            };
            let premium = bundle.predict(&raw)?;
            println!("{:.2}", premium);
        }

        Commands::Schema { bundle } => {
            let path = bundle.unwrap_or_else(default_bundle_path);
            let bundle = load_bundle(&path)
                .with_context(|| format!("cannot load bundle from {}", path.display()))?;

            println!("{}", serde_json::to_string_pretty(&bundle.schema.layout_info())?);
        }
    }

    Ok(())
}
