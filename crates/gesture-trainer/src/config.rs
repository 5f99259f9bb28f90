//! Trainer configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use gesture_core::ChannelRanges;
use gesture_model::training::TrainingConfig;
use gesture_signal::dataset::SplitRatios;
use gesture_signal::pipeline::{GestureSource, PipelineConfig};

/// Complete trainer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Capture files and windowing/normalization parameters
    pub data: DataConfig,

    /// Training loop parameters
    pub training: TrainingSection,

    /// Output artifact paths
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Gesture vocabulary in one-hot order, each with its capture file
    pub gestures: Vec<GestureSource>,

    /// Rows per recording window
    pub num_samples: usize,

    /// Per-sensor normalization ranges
    pub ranges: ChannelRanges,

    /// Train/test proportions (validation is the remainder)
    pub split: SplitRatios,

    /// Seed for the dataset shuffle and epoch shuffles
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSection {
    /// Passes over the training set
    pub epochs: usize,

    /// Examples per optimizer step
    pub batch_size: usize,

    /// AdamW learning rate
    pub learning_rate: f64,

    /// Epoch interval between progress log lines
    pub log_every: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Exported weights (.safetensors)
    pub model_path: PathBuf,

    /// Per-epoch metrics history (CSV)
    pub history_path: PathBuf,

    /// Test-set evaluation report (JSON)
    pub report_path: PathBuf,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                gestures: vec![
                    GestureSource {
                        name: "punch".to_string(),
                        path: PathBuf::from("data/punch.csv"),
                    },
                    GestureSource {
                        name: "flex".to_string(),
                        path: PathBuf::from("data/flex.csv"),
                    },
                ],
                num_samples: 119,
                ranges: ChannelRanges::nano33_default(),
                split: SplitRatios::default(),
                seed: 1337,
            },
            training: TrainingSection {
                epochs: 600,
                batch_size: 1,
                learning_rate: 1e-3,
                log_every: 50,
            },
            output: OutputConfig {
                model_path: PathBuf::from("models/gesture_model.safetensors"),
                history_path: PathBuf::from("models/training_history.csv"),
                report_path: PathBuf::from("models/evaluation.json"),
            },
        }
    }
}

impl TrainerConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("GESTURE"))
            .build()?;

        settings.try_deserialize()
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("GESTURE"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            num_samples: self.data.num_samples,
            ranges: self.data.ranges,
            ratios: self.data.split,
            seed: self.data.seed,
        }
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            epochs: self.training.epochs,
            batch_size: self.training.batch_size,
            learning_rate: self.training.learning_rate,
            seed: self.data.seed,
            log_every: self.training.log_every,
        }
    }
}
