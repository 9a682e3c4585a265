use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::OutputArgs;
use config::Config;

#[derive(Parser)]
#[command(name = "poster-scraper")]
#[command(about = "Extract event details from hackathon posters into a CSV row")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults to the per-user config, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run OCR on a poster image and classify the recognized text
    Extract {
        /// Poster image (PNG, JPEG, ...)
        image: PathBuf,
        /// Tesseract language code(s), e.g. "eng"
        #[arg(long)]
        lang: Option<String>,
        /// Directory containing Tesseract traineddata files
        #[arg(long)]
        tessdata: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Classify already recognized text, one text region per line
    Classify {
        /// Text file to read; stdin when omitted or "-"
        input: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    // Logs go to stderr; stdout carries the extracted record.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract { image, lang, tessdata, output } => {
            if let Some(lang) = lang {
                config.ocr.language = lang;
            }
            if let Some(dir) = tessdata {
                config.ocr.data_path = Some(dir);
            }
            commands::extract(&config, &image, &output)
        }
        Commands::Classify { input, output } => {
            commands::classify(&config, input.as_deref(), &output)
        }
    }
}
