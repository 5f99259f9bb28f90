//! Command-line trainer for the IMU gesture classifier.

mod config;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use candle_core::DType;
use candle_nn::{VarBuilder, VarMap};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gesture_core::GestureVocabulary;
use gesture_model::evaluate::{classify, evaluate};
use gesture_model::export::{export_weights, load_classifier};
use gesture_model::model::{ClassifierConfig, DeviceType, GestureClassifier};
use gesture_model::training::Trainer;
use gesture_signal::pipeline::SignalPipeline;

use crate::config::TrainerConfig;

fn device_parser(s: &str) -> Result<DeviceType, String> {
    match s {
        "cpu" => Ok(DeviceType::Cpu),
        "metal" => Ok(DeviceType::Metal),
        "cuda" => Ok(DeviceType::Cuda(0)),
        other => match other.strip_prefix("cuda:") {
            Some(ordinal) => ordinal
                .parse()
                .map(DeviceType::Cuda)
                .map_err(|_| format!("invalid cuda ordinal in \"{other}\"")),
            None => Err(format!("unknown device \"{other}\"")),
        },
    }
}

#[derive(Parser)]
#[command(name = "gesture-trainer")]
#[command(bin_name = "gesture-trainer")]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(long, short)]
    config: Option<String>,

    /// Compute device: cpu, cuda, cuda:N, or metal
    #[arg(long, default_value = "cpu", value_parser = device_parser)]
    device: DeviceType,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Train a classifier from capture files and export its weights")]
    Train,
    Classify(ClassifyArgs),
}

#[derive(clap::Args)]
#[command(about = "Classify the recordings of a capture file with exported weights")]
struct ClassifyArgs {
    capture: PathBuf,

    /// Weights file; defaults to the configured export path
    #[arg(long)]
    model: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TrainerConfig::from_file(path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => TrainerConfig::default(),
    };

    match cli.command {
        Commands::Train => train(&config, cli.device),
        Commands::Classify(args) => run_classify(&config, cli.device, &args),
    }
}

fn train(config: &TrainerConfig, device_type: DeviceType) -> Result<()> {
    let device = device_type.device()?;

    let pipeline = SignalPipeline::new(config.pipeline_config());
    let (vocabulary, split) = pipeline.build_split(&config.data.gestures)?;

    let model_config =
        ClassifierConfig::for_pipeline(config.data.num_samples, vocabulary.len());
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let model = GestureClassifier::new(model_config, vb)?;

    let trainer = Trainer::new(config.training_config());
    let history = trainer.train(&model, &varmap, &split, &device)?;

    output::ensure_parent(&config.output.model_path)?;
    export_weights(&varmap, &config.output.model_path)?;
    output::write_history_csv(&history, &config.output.history_path)?;

    if split.test.is_empty() {
        tracing::warn!("test split is empty; skipping evaluation");
        return Ok(());
    }

    let evaluation = evaluate(&model, &split.test, &device)?;
    for (index, prediction) in evaluation.predictions.iter().enumerate() {
        let rounded: Vec<f32> = prediction
            .probabilities
            .iter()
            .map(|p| (p * 1000.0).round() / 1000.0)
            .collect();
        let expected = vocabulary.name(prediction.expected)?;
        let predicted = vocabulary.name(prediction.predicted)?;
        tracing::info!(
            recording = index,
            expected,
            predicted,
            probabilities = ?rounded,
            "test prediction"
        );
    }
    tracing::info!(
        accuracy = evaluation.accuracy,
        mae = evaluation.mae,
        duration_secs = history.duration_secs(),
        "training complete"
    );

    output::write_report(&vocabulary, &evaluation, &config.output.report_path)?;
    Ok(())
}

fn run_classify(
    config: &TrainerConfig,
    device_type: DeviceType,
    args: &ClassifyArgs,
) -> Result<()> {
    let device = device_type.device()?;

    let vocabulary = GestureVocabulary::new(
        config
            .data
            .gestures
            .iter()
            .map(|g| g.name.clone())
            .collect(),
    )?;

    let model_path = args
        .model
        .clone()
        .unwrap_or_else(|| config.output.model_path.clone());
    let model_config =
        ClassifierConfig::for_pipeline(config.data.num_samples, vocabulary.len());
    let model = load_classifier(&model_path, model_config, &device)?;

    let pipeline = SignalPipeline::new(config.pipeline_config());
    let features = pipeline.load_capture_file(&args.capture)?;

    for (index, vector) in features.iter().enumerate() {
        let (label, confidence) = classify(&model, vector, &device)?;
        println!(
            "recording {index}: {} ({:.1}%)",
            vocabulary.name(label)?,
            confidence * 100.0
        );
    }

    Ok(())
}
