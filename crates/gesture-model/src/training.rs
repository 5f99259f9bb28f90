//! Training loop for the dense classifier.
//!
//! Loss is mean squared error between the softmax output and the
//! one-hot target; mean absolute error is tracked as the metric.
//! Gradient descent itself is candle's: the loop only batches,
//! shuffles, and records.

use candle_core::{Device, Result as CandleResult, Tensor};
use candle_nn::{loss, AdamW, Optimizer, ParamsAdamW, VarMap};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use gesture_core::{Error, Result, Timestamp};
use gesture_signal::dataset::{DatasetSplit, LabeledFeature};

use crate::model::GestureClassifier;

/// Configuration for a training run
#[derive(Debug, Clone, Copy)]
pub struct TrainingConfig {
    /// Passes over the training set
    pub epochs: usize,

    /// Examples per optimizer step
    pub batch_size: usize,

    /// AdamW learning rate
    pub learning_rate: f64,

    /// Seed for the per-epoch shuffles
    pub seed: u64,

    /// Epoch interval between progress log lines
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 600,
            batch_size: 1,
            learning_rate: 1e-3,
            seed: 1337,
            log_every: 50,
        }
    }
}

/// Metrics recorded at the end of one epoch
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub loss: f32,
    pub mae: f32,
    pub val_loss: f32,
    pub val_mae: f32,
}

/// Per-epoch metrics history of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingHistory {
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    pub fn duration_secs(&self) -> f64 {
        self.finished_at.as_secs_f64() - self.started_at.as_secs_f64()
    }
}

/// Stack labeled examples into a feature batch and a one-hot target
/// batch on the given device
pub fn to_tensors(
    examples: &[LabeledFeature],
    n_classes: usize,
    device: &Device,
) -> CandleResult<(Tensor, Tensor)> {
    let n = examples.len();
    let dim = examples.first().map(|e| e.features.dim()).unwrap_or(0);

    let mut xs = Vec::with_capacity(n * dim);
    let mut ys = vec![0.0f32; n * n_classes];

    for (row, example) in examples.iter().enumerate() {
        xs.extend_from_slice(&example.features.values);
        ys[row * n_classes + example.label_index] = 1.0;
    }

    let xs = Tensor::from_vec(xs, (n, dim), device)?;
    let ys = Tensor::from_vec(ys, (n, n_classes), device)?;
    Ok((xs, ys))
}

/// Drives the epoch/batch loop over a dataset split
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Train the model in place, returning the metrics history.
    ///
    /// The training set is reshuffled every epoch with an RNG derived
    /// from the configured seed; validation metrics are computed after
    /// each epoch on the held-out validation split.
    pub fn train(
        &self,
        model: &GestureClassifier,
        varmap: &VarMap,
        split: &DatasetSplit,
        device: &Device,
    ) -> Result<TrainingHistory> {
        if split.train.is_empty() {
            return Err(Error::Training("training split is empty".into()));
        }

        self.train_inner(model, varmap, split, device)
            .map_err(|e| Error::Training(e.to_string()))
    }

    fn train_inner(
        &self,
        model: &GestureClassifier,
        varmap: &VarMap,
        split: &DatasetSplit,
        device: &Device,
    ) -> CandleResult<TrainingHistory> {
        let n_classes = model.config().n_classes;
        let (train_xs, train_ys) = to_tensors(&split.train, n_classes, device)?;

        let validation = if split.validation.is_empty() {
            tracing::warn!("validation split is empty; validation metrics will be NaN");
            None
        } else {
            Some(to_tensors(&split.validation, n_classes, device)?)
        };

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(varmap.all_vars(), params)?;

        let n = split.train.len();
        let batch_size = self.config.batch_size.max(1);
        let log_every = self.config.log_every.max(1);
        let started_at = Timestamp::now();
        let mut epochs = Vec::with_capacity(self.config.epochs);

        tracing::info!(
            examples = n,
            epochs = self.config.epochs,
            batch_size,
            "starting training"
        );

        for epoch in 1..=self.config.epochs {
            let mut indices: Vec<u32> = (0..n as u32).collect();
            let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(epoch as u64));
            indices.shuffle(&mut rng);

            for chunk in indices.chunks(batch_size) {
                let ids = Tensor::from_vec(chunk.to_vec(), (chunk.len(),), device)?;
                let xb = train_xs.index_select(&ids, 0)?;
                let yb = train_ys.index_select(&ids, 0)?;

                let probs = model.probabilities(&xb)?;
                let batch_loss = loss::mse(&probs, &yb)?;
                optimizer.backward_step(&batch_loss)?;
            }

            let (epoch_loss, epoch_mae) = Self::metrics(model, &train_xs, &train_ys)?;
            let (val_loss, val_mae) = match &validation {
                Some((xs, ys)) => Self::metrics(model, xs, ys)?,
                None => (f32::NAN, f32::NAN),
            };

            if epoch == 1 || epoch == self.config.epochs || epoch % log_every == 0 {
                tracing::info!(
                    epoch,
                    loss = epoch_loss,
                    mae = epoch_mae,
                    val_loss,
                    val_mae,
                    "epoch complete"
                );
            }

            epochs.push(EpochMetrics {
                epoch,
                loss: epoch_loss,
                mae: epoch_mae,
                val_loss,
                val_mae,
            });
        }

        Ok(TrainingHistory {
            started_at,
            finished_at: Timestamp::now(),
            epochs,
        })
    }

    /// MSE loss and MAE of the model over a full tensor batch
    fn metrics(
        model: &GestureClassifier,
        xs: &Tensor,
        ys: &Tensor,
    ) -> CandleResult<(f32, f32)> {
        let probs = model.probabilities(xs)?;
        let mse = loss::mse(&probs, ys)?.to_scalar::<f32>()?;
        let mae = probs.sub(ys)?.abs()?.mean_all()?.to_scalar::<f32>()?;
        Ok((mse, mae))
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }
}
