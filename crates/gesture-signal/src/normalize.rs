//! Per-channel normalization and feature flattening.
//!
//! Raw readings use physical units with very different scales
//! (accelerometer in g, gyroscope in degrees/second). Each channel is
//! mapped through `(v - min) / (max - min)` using its configured
//! full-scale range so every feature lands near the unit interval before
//! reaching the dense network.

use ndarray::Array2;

use gesture_core::{ChannelRanges, Error, Result, SensorChannel};

use crate::recording::{FeatureVector, RecordingWindow};

/// Normalizes recording windows into feature vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelNormalizer {
    pub ranges: ChannelRanges,
}

impl ChannelNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the per-sensor normalization ranges
    pub fn with_ranges(mut self, ranges: ChannelRanges) -> Self {
        self.ranges = ranges;
        self
    }

    /// Normalize every channel of a window into unit-range values
    pub fn normalize_window(&self, window: &RecordingWindow) -> Result<Array2<f64>> {
        self.ranges.validate()?;

        if !window.is_valid() {
            return Err(Error::InvalidInput(
                "window contains non-finite readings".into(),
            ));
        }

        let mut normalized = window.samples().clone();
        for channel in SensorChannel::ALL {
            let range = self.ranges.for_channel(channel);
            let mut column = normalized.column_mut(channel.index());
            column.mapv_inplace(|v| range.normalize(v));
        }

        Ok(normalized)
    }

    /// Normalize and flatten a window into its feature vector.
    ///
    /// Flattening is row-major: all six channels of sample 0, then all
    /// six channels of sample 1, and so on. Dimensionality is
    /// `num_samples x 6`.
    pub fn feature_vector(&self, window: &RecordingWindow) -> Result<FeatureVector> {
        let normalized = self.normalize_window(window)?;
        let values: Vec<f32> = normalized.iter().map(|&v| v as f32).collect();
        Ok(FeatureVector::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_core::{ChannelRange, SensorSample};

    fn test_window() -> RecordingWindow {
        RecordingWindow::from_samples(&[
            SensorSample::new(-4.0, 0.0, 4.0, -2000.0, 0.0, 2000.0),
            SensorSample::new(2.0, -2.0, 0.0, 1000.0, -1000.0, 500.0),
        ])
    }

    #[test]
    fn test_normalization_bounds() {
        let normalizer = ChannelNormalizer::new();
        let normalized = normalizer.normalize_window(&test_window()).unwrap();

        // first row hits the range endpoints and midpoints exactly
        assert!((normalized[[0, 0]] - 0.0).abs() < 1e-12);
        assert!((normalized[[0, 1]] - 0.5).abs() < 1e-12);
        assert!((normalized[[0, 2]] - 1.0).abs() < 1e-12);
        assert!((normalized[[0, 3]] - 0.0).abs() < 1e-12);
        assert!((normalized[[0, 5]] - 1.0).abs() < 1e-12);

        assert!((normalized[[1, 0]] - 0.75).abs() < 1e-12);
        assert!((normalized[[1, 3]] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_flattening_is_row_major() {
        let normalizer = ChannelNormalizer::new();
        let features = normalizer.feature_vector(&test_window()).unwrap();

        assert_eq!(features.dim(), 12);
        // sample 0 occupies the first six slots in channel order
        assert!((features.values[0] - 0.0).abs() < 1e-6); // aX
        assert!((features.values[2] - 1.0).abs() < 1e-6); // aZ
        assert!((features.values[6] - 0.75).abs() < 1e-6); // sample 1 aX
    }

    #[test]
    fn test_out_of_range_not_clamped() {
        let window =
            RecordingWindow::from_samples(&[SensorSample::new(8.0, 0.0, 0.0, 0.0, 0.0, 0.0)]);
        let features = ChannelNormalizer::new().feature_vector(&window).unwrap();
        assert!(features.values[0] > 1.0);
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let normalizer = ChannelNormalizer::new().with_ranges(ChannelRanges {
            accel: ChannelRange::new(0.0, 0.0),
            gyro: ChannelRange::new(-2000.0, 2000.0),
        });
        assert!(normalizer.normalize_window(&test_window()).is_err());
    }

    #[test]
    fn test_non_finite_window_rejected() {
        let window = RecordingWindow::from_samples(&[SensorSample::new(
            f64::INFINITY,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
        )]);
        assert!(matches!(
            ChannelNormalizer::new().feature_vector(&window),
            Err(Error::InvalidInput(_))
        ));
    }
}
