//! Marine Weather Predictor dashboard.
//!
//! Predicts the marine condition at a coordinate from StormGlass
//! observations, falling back to a synthetic sample when no API key is
//! given or the provider is unavailable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use marine_core::Config;
use marine_services::{report, App};

#[derive(Parser)]
#[command(author, version, about = "Marine Weather Predictor Dashboard", long_about = None)]
struct Cli {
    /// Latitude in decimal degrees (defaults to the configured value)
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees (defaults to the configured value)
    #[arg(long, allow_negative_numbers = true)]
    lng: Option<f64>,

    /// StormGlass API key
    #[arg(long, env = "STORMGLASS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model artifact, overriding the configured path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Print the forecast as JSON instead of the text dashboard
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    marine_core::init()?;

    let (mut config, _) = match Config::load_validated(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            return Err(e).context("Cannot start without a usable configuration");
        }
    };
    if let Some(model) = cli.model {
        config.model.path = model;
    }

    let latitude = cli.lat.unwrap_or(config.dashboard.default_latitude);
    let longitude = cli.lng.unwrap_or(config.dashboard.default_longitude);
    let preview_rows = config.dashboard.preview_rows;

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            return Err(e).context("Cannot serve predictions without a model");
        }
    };

    let forecast = match app.predict(latitude, longitude, cli.api_key.as_deref()).await {
        Ok(forecast) => forecast,
        Err(e) => {
            eprintln!("⚠️ {}", e.user_message());
            return Err(e.into());
        }
    };

    if cli.json {
        let json =
            serde_json::to_string_pretty(&forecast).context("Failed to serialize forecast")?;
        println!("{}", json);
    } else {
        print!("{}", report::render_dashboard(&forecast, preview_rows));
    }

    tracing::debug!("Dashboard request complete");
    Ok(())
}
