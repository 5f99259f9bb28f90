//! Complete signal-to-feature pipeline.
//!
//! Integrates capture parsing, windowing, normalization, and dataset
//! assembly: one labeled capture file per gesture in, a shuffled and
//! split dataset out.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use gesture_core::{ChannelRanges, GestureVocabulary, Result, SensorChannel};

use crate::dataset::{Dataset, DatasetSplit, LabeledFeature, SplitRatios};
use crate::loader::read_sensor_csv;
use crate::normalize::ChannelNormalizer;
use crate::recording::FeatureVector;
use crate::window::{Windower, DEFAULT_WINDOW_SAMPLES};

/// One gesture of the vocabulary and the capture file that records it.
/// Vocabulary order (and therefore one-hot position) follows the order
/// these appear in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureSource {
    pub name: String,
    pub path: PathBuf,
}

/// Configuration for the signal pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rows per recording window
    pub num_samples: usize,

    /// Per-sensor normalization ranges
    pub ranges: ChannelRanges,

    /// Proportional cut for the split
    pub ratios: SplitRatios,

    /// Seed for the dataset shuffle
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_WINDOW_SAMPLES,
            ranges: ChannelRanges::nano33_default(),
            ratios: SplitRatios::default(),
            seed: 1337,
        }
    }
}

impl PipelineConfig {
    /// Dimensionality of every feature vector the pipeline produces
    pub fn feature_dim(&self) -> usize {
        self.num_samples * SensorChannel::COUNT
    }
}

/// The signal-to-feature pipeline
pub struct SignalPipeline {
    config: PipelineConfig,
    windower: Windower,
    normalizer: ChannelNormalizer,
}

impl SignalPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            windower: Windower::new(config.num_samples),
            normalizer: ChannelNormalizer::new().with_ranges(config.ranges),
        }
    }

    /// Parse one capture file into unlabeled feature vectors
    pub fn load_capture_file(&self, path: &std::path::Path) -> Result<Vec<FeatureVector>> {
        let samples = read_sensor_csv(path)?;
        let windows = self.windower.windows(&samples)?;
        windows
            .iter()
            .map(|w| self.normalizer.feature_vector(w))
            .collect()
    }

    /// Build the labeled dataset for a gesture vocabulary.
    ///
    /// Every window of a gesture's capture file receives that gesture's
    /// label index.
    pub fn build_dataset(
        &self,
        sources: &[GestureSource],
    ) -> Result<(GestureVocabulary, Dataset)> {
        let vocabulary =
            GestureVocabulary::new(sources.iter().map(|s| s.name.clone()).collect())?;

        let mut dataset = Dataset::new(vocabulary.len(), self.config.feature_dim());

        for (label_index, source) in sources.iter().enumerate() {
            let features = self.load_capture_file(&source.path)?;
            tracing::info!(
                gesture = %source.name,
                recordings = features.len(),
                "loaded gesture capture"
            );

            for features in features {
                dataset.push(LabeledFeature {
                    label_index,
                    features,
                })?;
            }
        }

        Ok((vocabulary, dataset))
    }

    /// Build, shuffle, and split in one step
    pub fn build_split(
        &self,
        sources: &[GestureSource],
    ) -> Result<(GestureVocabulary, DatasetSplit)> {
        let (vocabulary, dataset) = self.build_dataset(sources)?;
        let split = dataset.shuffle_split(self.config.ratios, self.config.seed)?;
        Ok((vocabulary, split))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
