use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitals_client::{bind, ClientConfig, SensorForm, Submission, TerminalContainer, UploadFile, UploadRequest};

#[derive(Parser)]
#[command(name = "vitals-client")]
#[command(version)]
#[command(about = "Submit sensor readings to the stress / heart-alert predictor", long_about = None)]
struct Cli {
    /// JSON config file (base_url, predict_path, upload_path, upload_field, timeout_ms)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send four readings to /predict
    Predict {
        /// Heart rate variability
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        hrv: String,

        /// Blood oxygen saturation
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        spo2: String,

        #[arg(long, default_value = "", allow_hyphen_values = true)]
        accelerometer: String,

        #[arg(long, default_value = "", allow_hyphen_values = true)]
        gyroscope: String,
    },

    /// Upload a CSV/Excel file of readings to /upload
    Upload {
        /// File to send; omitted means no file selected
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;
    tracing::info!(base_url = %config.base_url, "prediction service");

    let (manual, upload) = bind(&config, TerminalContainer, TerminalContainer)?;

    let submission = match cli.command {
        Commands::Predict {
            hrv,
            spo2,
            accelerometer,
            gyroscope,
        } => {
            let form = SensorForm::new(hrv, spo2, accelerometer, gyroscope);
            manual.submit(&form).await
        }
        Commands::Upload { file } => {
            let file = match file {
                Some(path) => Some(
                    UploadFile::from_path(&path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?,
                ),
                None => None,
            };
            upload.submit(UploadRequest::new(file)).await
        }
    };

    if let Submission::Superseded = submission {
        tracing::warn!("submission was superseded before it finished");
    }
    Ok(())
}
