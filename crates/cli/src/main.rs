//! Machine Failure Predictor CLI
//!
//! A command-line tool for requesting failure predictions and checking
//! the health of the prediction service.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::QualityGrade;
use commands::{predict, status};

/// Machine Failure Predictor CLI
#[derive(Parser)]
#[command(name = "mfp")]
#[command(author, version, about = "CLI for the Machine Failure Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via MFP_API_URL env var)
    #[arg(long, env = "MFP_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request a failure prediction for one sensor reading
    Predict {
        /// Air temperature in Kelvin
        #[arg(long, default_value_t = 298.7)]
        air_temperature: f64,

        /// Process temperature in Kelvin
        #[arg(long, default_value_t = 305.1)]
        process_temperature: f64,

        /// Rotational speed in rpm
        #[arg(long, default_value_t = 1500)]
        rotational_speed: i64,

        /// Torque in Nm
        #[arg(long, default_value_t = 40.3)]
        torque: f64,

        /// Tool wear in minutes
        #[arg(long, default_value_t = 150)]
        tool_wear: i64,

        /// Product quality grade
        #[arg(long, value_enum, default_value_t = QualityGrade::L)]
        quality: QualityGrade,
    },

    /// Show service health and readiness
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Predict {
            air_temperature,
            process_temperature,
            rotational_speed,
            torque,
            tool_wear,
            quality,
        } => {
            let reading = client::PredictRequest {
                air_temperature_k: air_temperature,
                process_temperature_k: process_temperature,
                rotational_speed_rpm: rotational_speed,
                torque_nm: torque,
                tool_wear_min: tool_wear,
                quality_type: quality,
            };
            predict::request_prediction(&client, &reading, cli.format).await?;
        }
        Commands::Status => {
            status::show_status(&client, cli.format).await?;
        }
    }

    Ok(())
}
