//! Dataset assembly and the shuffled train/test/validation split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use gesture_core::{Error, Result};

use crate::recording::FeatureVector;

/// A feature vector paired with its gesture label index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledFeature {
    pub label_index: usize,
    pub features: FeatureVector,
}

/// Proportional cut for the three partitions. The validation share is
/// the remainder after train and test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.6,
            test: 0.2,
        }
    }
}

impl SplitRatios {
    pub fn validate(&self) -> Result<()> {
        let usable = self.train > 0.0
            && self.test >= 0.0
            && self.train.is_finite()
            && self.test.is_finite()
            && self.train + self.test <= 1.0;

        if !usable {
            return Err(Error::Config(format!(
                "invalid split ratios: train={}, test={}",
                self.train, self.test
            )));
        }
        Ok(())
    }
}

/// The three disjoint partitions of a shuffled dataset, in the cut
/// order train, test, validation
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub train: Vec<LabeledFeature>,
    pub test: Vec<LabeledFeature>,
    pub validation: Vec<LabeledFeature>,
}

impl DatasetSplit {
    pub fn total(&self) -> usize {
        self.train.len() + self.test.len() + self.validation.len()
    }
}

/// All labeled feature vectors for a gesture vocabulary
#[derive(Debug, Clone)]
pub struct Dataset {
    examples: Vec<LabeledFeature>,
    n_classes: usize,
    feature_dim: usize,
}

impl Dataset {
    pub fn new(n_classes: usize, feature_dim: usize) -> Self {
        Self {
            examples: Vec::new(),
            n_classes,
            feature_dim,
        }
    }

    /// Add an example, enforcing uniform dimensionality and a label
    /// inside the vocabulary
    pub fn push(&mut self, example: LabeledFeature) -> Result<()> {
        if example.features.dim() != self.feature_dim {
            return Err(Error::Dataset(format!(
                "feature dimension mismatch: expected {}, got {}",
                self.feature_dim,
                example.features.dim()
            )));
        }
        if example.label_index >= self.n_classes {
            return Err(Error::Dataset(format!(
                "label index {} outside vocabulary of {}",
                example.label_index, self.n_classes
            )));
        }
        self.examples.push(example);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    pub fn examples(&self) -> &[LabeledFeature] {
        &self.examples
    }

    /// Shuffle once with a seeded RNG and cut proportionally.
    ///
    /// Partition sizes are `floor(train * n)` and `floor(test * n)`;
    /// the remainder is the validation set. The same seed always
    /// reproduces the same split.
    pub fn shuffle_split(&self, ratios: SplitRatios, seed: u64) -> Result<DatasetSplit> {
        ratios.validate()?;

        if self.examples.is_empty() {
            return Err(Error::Dataset("no recordings to split".into()));
        }

        let n = self.examples.len();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train_end = (ratios.train * n as f64) as usize;
        let test_end = train_end + (ratios.test * n as f64) as usize;

        let take = |range: &[usize]| -> Vec<LabeledFeature> {
            range.iter().map(|&i| self.examples[i].clone()).collect()
        };

        let split = DatasetSplit {
            train: take(&indices[..train_end]),
            test: take(&indices[train_end..test_end]),
            validation: take(&indices[test_end..]),
        };

        tracing::info!(
            total = n,
            train = split.train.len(),
            test = split.test.len(),
            validation = split.validation.len(),
            "dataset shuffled and split"
        );

        Ok(split)
    }
}
