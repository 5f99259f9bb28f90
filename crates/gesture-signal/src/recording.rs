//! Recording window and feature vector data structures.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use gesture_core::{SensorChannel, SensorSample};

/// A fixed-length window of consecutive capture rows
///
/// Stored as a `num_samples x 6` matrix with one column per channel in
/// capture file order. One gesture label applies to an entire window,
/// never to individual rows; labels are attached at dataset assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingWindow {
    samples: Array2<f64>,
}

impl RecordingWindow {
    /// Build a window from consecutive capture rows
    pub fn from_samples(samples: &[SensorSample]) -> Self {
        let mut matrix = Array2::zeros((samples.len(), SensorChannel::COUNT));
        for (row, sample) in samples.iter().enumerate() {
            for channel in SensorChannel::ALL {
                matrix[[row, channel.index()]] = sample.channel(channel);
            }
        }
        Self { samples: matrix }
    }

    pub fn num_samples(&self) -> usize {
        self.samples.nrows()
    }

    /// Time series of a single channel
    pub fn channel(&self, channel: SensorChannel) -> ArrayView1<'_, f64> {
        self.samples.column(channel.index())
    }

    pub fn samples(&self) -> &Array2<f64> {
        &self.samples
    }

    /// Validate window integrity
    pub fn is_valid(&self) -> bool {
        self.samples.nrows() > 0 && self.samples.iter().all(|v| v.is_finite())
    }
}

/// The normalized, row-major flattened numeric representation of one
/// RecordingWindow. Dimensionality is fixed at `num_samples x 6`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn is_valid(&self) -> bool {
        !self.values.is_empty() && self.values.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_layout() {
        let samples = vec![
            SensorSample::new(0.1, 0.2, 0.3, 10.0, 20.0, 30.0),
            SensorSample::new(0.4, 0.5, 0.6, 40.0, 50.0, 60.0),
        ];

        let window = RecordingWindow::from_samples(&samples);
        assert_eq!(window.num_samples(), 2);
        assert!(window.is_valid());

        let az = window.channel(SensorChannel::Az);
        assert_eq!(az.to_vec(), vec![0.3, 0.6]);

        let gx = window.channel(SensorChannel::Gx);
        assert_eq!(gx.to_vec(), vec![10.0, 40.0]);
    }

    #[test]
    fn test_non_finite_window_invalid() {
        let samples = vec![SensorSample::new(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0)];
        let window = RecordingWindow::from_samples(&samples);
        assert!(!window.is_valid());
    }
}
