//! Fixed-length windowing of capture rows.

use gesture_core::{Error, Result, SensorSample};

use crate::recording::RecordingWindow;

/// Samples per movement in the stock capture sketch (~1 second at 119 Hz)
pub const DEFAULT_WINDOW_SAMPLES: usize = 119;

/// Slices a capture into consecutive fixed-length windows
#[derive(Debug, Clone, Copy)]
pub struct Windower {
    pub num_samples: usize,
}

impl Default for Windower {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_WINDOW_SAMPLES,
        }
    }
}

impl Windower {
    pub fn new(num_samples: usize) -> Self {
        Self { num_samples }
    }

    /// Slice samples into windows of exactly `num_samples` rows.
    ///
    /// A trailing partial window is dropped, not padded; windows never
    /// span file boundaries because each call covers a single capture.
    pub fn windows(&self, samples: &[SensorSample]) -> Result<Vec<RecordingWindow>> {
        if self.num_samples == 0 {
            return Err(Error::Config("window length must be positive".into()));
        }

        if samples.len() < self.num_samples {
            return Err(Error::InsufficientSamples {
                required: self.num_samples,
                available: samples.len(),
            });
        }

        let windows: Vec<RecordingWindow> = samples
            .chunks_exact(self.num_samples)
            .map(RecordingWindow::from_samples)
            .collect();

        let dropped = samples.len() % self.num_samples;
        if dropped > 0 {
            tracing::debug!(dropped, "dropped trailing rows short of a full window");
        }

        Ok(windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(v: f64) -> SensorSample {
        SensorSample::new(v, v, v, v, v, v)
    }

    #[test]
    fn test_exact_windows() {
        let samples: Vec<SensorSample> = (0..10).map(|i| sample(i as f64)).collect();
        let windows = Windower::new(5).windows(&samples).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].num_samples(), 5);
        assert_eq!(windows[1].samples()[[0, 0]], 5.0);
    }

    #[test]
    fn test_trailing_remainder_dropped() {
        let samples: Vec<SensorSample> = (0..13).map(|i| sample(i as f64)).collect();
        let windows = Windower::new(5).windows(&samples).unwrap();

        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn test_too_few_samples() {
        let samples: Vec<SensorSample> = (0..3).map(|i| sample(i as f64)).collect();
        let result = Windower::new(5).windows(&samples);

        assert!(matches!(
            result,
            Err(Error::InsufficientSamples {
                required: 5,
                available: 3
            })
        ));
    }

    #[test]
    fn test_default_window_length() {
        assert_eq!(Windower::default().num_samples, 119);
    }
}
