//! Fit the marine condition forest from labelled samples and write the
//! artifact the dashboard loads.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use marine_model::{ForestClassifier, RandomForestClassifierParameters, TrainingSample};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the marine condition model", long_about = None)]
struct Args {
    /// Labelled samples (wave_height, wind_speed, swell_height, swell_period, label)
    #[arg(long, default_value = "models/training_samples.csv")]
    input: PathBuf,

    /// Where to write the model artifact
    #[arg(long, default_value = "models/marine_model.json")]
    output: PathBuf,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 25)]
    n_trees: u16,

    /// Maximum depth of trees (unbounded when omitted)
    #[arg(long)]
    max_depth: Option<u16>,

    /// Seed for bootstrap sampling and feature selection
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Version recorded in the artifact
    #[arg(long, default_value = "2.0.0")]
    model_version: String,
}

fn load_samples(path: &Path) -> Result<Vec<TrainingSample>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open training data {}", path.display()))?;

    let mut samples = Vec::new();
    for (line, record) in reader.deserialize().enumerate() {
        let sample: TrainingSample =
            record.with_context(|| format!("Bad training record {}", line + 1))?;
        samples.push(sample);
    }
    Ok(samples)
}

fn main() -> Result<()> {
    let args = Args::parse();
    marine_core::init()?;

    let samples = load_samples(&args.input)?;
    tracing::info!("Loaded {} samples from {}", samples.len(), args.input.display());

    let mut parameters = RandomForestClassifierParameters::default()
        .with_n_trees(args.n_trees)
        .with_seed(args.seed);
    if let Some(depth) = args.max_depth {
        parameters = parameters.with_max_depth(depth);
    }

    let model = ForestClassifier::fit(
        "marine-condition-forest",
        &args.model_version,
        &samples,
        parameters,
    )?;

    let mut correct = 0;
    for sample in &samples {
        if model.classify(&sample.features())? == sample.label {
            correct += 1;
        }
    }
    println!(
        "Training accuracy: {}/{} ({:.1}%), labels: {}",
        correct,
        samples.len(),
        correct as f64 / samples.len() as f64 * 100.0,
        model.labels().join(", ")
    );

    model.save(&args.output)?;
    println!("Model saved to {}", args.output.display());
    Ok(())
}
