use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use ndarray::s;
use protocol_advisor::error::AppError;
use protocol_advisor::ml::{
    factory, DecisionTreeModel, DecisionTreeParams, FeatureEncoder, Model, RandomForestModel,
    RandomForestParams,
};
use protocol_advisor::models::{IncidentCategory, IncidentRecord, Severity};
use protocol_advisor::protocols::ProtocolCatalog;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "protocol-advisor-cli")]
#[command(about = "Protocol Advisor training CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a classifier on a labeled incident CSV and save the artifact
    Train {
        /// Labeled dataset: severity,occurred_at,latitude,longitude,description,category,protocol
        #[arg(short, long)]
        data: PathBuf,

        /// Model variant key (decision_tree or random_forest)
        #[arg(short, long, default_value = "decision_tree")]
        model_type: String,

        /// Where to write the trained model artifact
        #[arg(short, long)]
        output: PathBuf,

        /// Fraction of rows held out for evaluation, taken from the tail
        #[arg(long, default_value_t = 0.2)]
        test_split: f64,

        /// Maximum tree depth
        #[arg(long)]
        max_depth: Option<u16>,

        /// Ensemble size (random forest only)
        #[arg(long)]
        n_estimators: Option<u16>,

        /// Random seed
        #[arg(long)]
        random_state: Option<u64>,
    },

    /// Evaluate a saved model artifact against a labeled incident CSV
    Evaluate {
        /// Labeled dataset, same format as `train --data`
        #[arg(short, long)]
        data: PathBuf,

        /// Model variant key the artifact was trained as
        #[arg(short, long, default_value = "decision_tree")]
        model_type: String,

        /// Path of the model artifact
        #[arg(short, long)]
        artifact: PathBuf,
    },

    /// Print the protocol catalog
    Protocols,
}

/// One labeled row of the training CSV
#[derive(Debug, Deserialize)]
struct DatasetRow {
    severity: Severity,
    /// RFC 3339 timestamp, e.g. 2024-01-15T08:30:00Z
    occurred_at: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    description: String,
    category: IncidentCategory,
    protocol: i32,
}

fn load_dataset(path: &Path) -> Result<(Vec<IncidentRecord>, Vec<i32>)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let mut records = Vec::new();
    let mut labels = Vec::new();

    for (line, row) in reader.deserialize::<DatasetRow>().enumerate() {
        let row = row.with_context(|| format!("invalid dataset row {}", line + 2))?;
        records.push(IncidentRecord::new(
            row.severity,
            row.occurred_at,
            row.latitude,
            row.longitude,
            row.description,
            row.category,
        ));
        labels.push(row.protocol);
    }

    if records.is_empty() {
        bail!("dataset {} contains no rows", path.display());
    }

    Ok((records, labels))
}

fn build_model(
    model_type: &str,
    max_depth: Option<u16>,
    n_estimators: Option<u16>,
    random_state: Option<u64>,
) -> Result<Box<dyn Model>> {
    match model_type {
        "decision_tree" => {
            let mut params = DecisionTreeParams::default();
            if let Some(depth) = max_depth {
                params.max_depth = depth;
            }
            if let Some(seed) = random_state {
                params.random_state = seed;
            }
            Ok(Box::new(DecisionTreeModel::new(params)))
        }
        "random_forest" => {
            let mut params = RandomForestParams::default();
            if let Some(n) = n_estimators {
                params.n_estimators = n;
            }
            if let Some(depth) = max_depth {
                params.max_depth = depth;
            }
            if let Some(seed) = random_state {
                params.random_state = seed;
            }
            Ok(Box::new(RandomForestModel::new(params)))
        }
        other => Err(AppError::UnknownModelType {
            requested: other.to_string(),
            known: factory::MODEL_TYPES,
        }
        .into()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            model_type,
            output,
            test_split,
            max_depth,
            n_estimators,
            random_state,
        } => {
            if !(0.0..1.0).contains(&test_split) {
                bail!("--test-split must be in [0, 1), got {test_split}");
            }

            let (records, labels) = load_dataset(&data)?;
            tracing::info!("Loaded {} labeled incidents from {}", records.len(), data.display());

            let encoder = FeatureEncoder::new();
            let features = encoder.encode_batch(&records);

            let n_test = (records.len() as f64 * test_split) as usize;
            let n_train = records.len() - n_test;
            if n_train == 0 {
                bail!("test split {test_split} leaves no training rows");
            }

            let mut model = build_model(&model_type, max_depth, n_estimators, random_state)?;

            let train_features = features.slice(s![..n_train, ..]).to_owned();
            model.train(&train_features, &labels[..n_train])?;
            tracing::info!("{} trained on {} rows", model.model_name(), n_train);

            if n_test > 0 {
                let test_features = features.slice(s![n_train.., ..]).to_owned();
                let report = model.evaluate(&test_features, &labels[n_train..])?;
                tracing::info!(
                    precision = report.precision,
                    recall = report.recall,
                    f1_score = report.f1_score,
                    "Held-out evaluation ({} rows)",
                    n_test
                );
                println!("{}", serde_json::to_string_pretty(&report)?);
            }

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
            }
            model.save(&output)?;
            tracing::info!(path = %output.display(), "Model artifact saved");
        }

        Commands::Evaluate {
            data,
            model_type,
            artifact,
        } => {
            let (records, labels) = load_dataset(&data)?;

            let mut model = factory::create_model(&model_type)?;
            model.load(&artifact)?;

            let encoder = FeatureEncoder::new();
            let features = encoder.encode_batch(&records);
            let report = model.evaluate(&features, &labels)?;

            tracing::info!(
                precision = report.precision,
                recall = report.recall,
                f1_score = report.f1_score,
                "Evaluated {} on {} rows",
                model.model_name(),
                records.len()
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Protocols => {
            let catalog = ProtocolCatalog::new();
            for protocol in catalog.all() {
                println!(
                    "{:<3} {:<20} {:<28} units: {}",
                    protocol.label,
                    protocol.code,
                    protocol.name,
                    protocol.units.join(", ")
                );
            }
        }
    }

    Ok(())
}
