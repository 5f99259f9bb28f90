//! Fundamental types for the gesture training pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }
}

/// The six IMU channels of a capture row, in file column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorChannel {
    /// Acceleration X (g)
    Ax,
    /// Acceleration Y (g)
    Ay,
    /// Acceleration Z (g)
    Az,
    /// Angular rate X (degrees/second)
    Gx,
    /// Angular rate Y (degrees/second)
    Gy,
    /// Angular rate Z (degrees/second)
    Gz,
}

impl SensorChannel {
    pub const COUNT: usize = 6;

    /// All channels in capture file column order
    pub const ALL: [SensorChannel; Self::COUNT] = [
        SensorChannel::Ax,
        SensorChannel::Ay,
        SensorChannel::Az,
        SensorChannel::Gx,
        SensorChannel::Gy,
        SensorChannel::Gz,
    ];

    /// Column index in the capture file
    pub fn index(&self) -> usize {
        match self {
            SensorChannel::Ax => 0,
            SensorChannel::Ay => 1,
            SensorChannel::Az => 2,
            SensorChannel::Gx => 3,
            SensorChannel::Gy => 4,
            SensorChannel::Gz => 5,
        }
    }

    /// Column name as written by the capture sketch
    pub fn name(&self) -> &'static str {
        match self {
            SensorChannel::Ax => "aX",
            SensorChannel::Ay => "aY",
            SensorChannel::Az => "aZ",
            SensorChannel::Gx => "gX",
            SensorChannel::Gy => "gY",
            SensorChannel::Gz => "gZ",
        }
    }

    pub fn is_accelerometer(&self) -> bool {
        matches!(
            self,
            SensorChannel::Ax | SensorChannel::Ay | SensorChannel::Az
        )
    }
}

/// Normalization bounds for one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub min: f64,
    pub max: f64,
}

impl ChannelRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// A range is usable when it has positive span and finite bounds
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.span() > 0.0
    }

    /// Map a raw reading into the unit interval. Readings outside the
    /// configured range map outside [0, 1]; no clamping is applied.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }
}

/// Per-channel normalization ranges, grouped by sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelRanges {
    /// Bounds for aX/aY/aZ
    pub accel: ChannelRange,
    /// Bounds for gX/gY/gZ
    pub gyro: ChannelRange,
}

impl ChannelRanges {
    /// Full-scale settings of the Arduino Nano 33 BLE Sense IMU:
    /// ±4 g accelerometer, ±2000 dps gyroscope
    pub fn nano33_default() -> Self {
        Self {
            accel: ChannelRange::new(-4.0, 4.0),
            gyro: ChannelRange::new(-2000.0, 2000.0),
        }
    }

    pub fn for_channel(&self, channel: SensorChannel) -> ChannelRange {
        if channel.is_accelerometer() {
            self.accel
        } else {
            self.gyro
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.accel.is_valid() {
            return Err(Error::Config(format!(
                "degenerate accelerometer range: [{}, {}]",
                self.accel.min, self.accel.max
            )));
        }
        if !self.gyro.is_valid() {
            return Err(Error::Config(format!(
                "degenerate gyroscope range: [{}, {}]",
                self.gyro.min, self.gyro.max
            )));
        }
        Ok(())
    }
}

impl Default for ChannelRanges {
    fn default() -> Self {
        Self::nano33_default()
    }
}

/// One row of a capture file: six simultaneous channel readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
    pub gx: f64,
    pub gy: f64,
    pub gz: f64,
}

impl SensorSample {
    pub fn new(ax: f64, ay: f64, az: f64, gx: f64, gy: f64, gz: f64) -> Self {
        Self {
            ax,
            ay,
            az,
            gx,
            gy,
            gz,
        }
    }

    pub fn channel(&self, channel: SensorChannel) -> f64 {
        match channel {
            SensorChannel::Ax => self.ax,
            SensorChannel::Ay => self.ay,
            SensorChannel::Az => self.az,
            SensorChannel::Gx => self.gx,
            SensorChannel::Gy => self.gy,
            SensorChannel::Gz => self.gz,
        }
    }

    pub fn is_finite(&self) -> bool {
        SensorChannel::ALL
            .iter()
            .all(|&c| self.channel(c).is_finite())
    }
}

/// Ordered gesture vocabulary. The index of a gesture is fixed at
/// configuration time and determines its one-hot label position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureVocabulary {
    names: Vec<String>,
}

impl GestureVocabulary {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::Config("gesture vocabulary is empty".into()));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::Config(format!("duplicate gesture: {name}")));
            }
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name(&self, index: usize) -> Result<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownGesture(format!("label index {index}")))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// One-hot label row for a gesture index, e.g. [1, 0] for index 0 of two
    pub fn one_hot(&self, index: usize) -> Result<Vec<f32>> {
        if index >= self.names.len() {
            return Err(Error::UnknownGesture(format!("label index {index}")));
        }
        let mut row = vec![0.0; self.names.len()];
        row[index] = 1.0;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order_matches_capture_header() {
        let names: Vec<&str> = SensorChannel::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["aX", "aY", "aZ", "gX", "gY", "gZ"]);
        for (i, channel) in SensorChannel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn test_range_normalization() {
        let accel = ChannelRange::new(-4.0, 4.0);
        assert!((accel.normalize(-4.0) - 0.0).abs() < 1e-12);
        assert!((accel.normalize(0.0) - 0.5).abs() < 1e-12);
        assert!((accel.normalize(4.0) - 1.0).abs() < 1e-12);

        // out-of-range readings are not clamped
        assert!(accel.normalize(8.0) > 1.0);
        assert!(accel.normalize(-8.0) < 0.0);
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let ranges = ChannelRanges {
            accel: ChannelRange::new(1.0, 1.0),
            gyro: ChannelRange::new(-2000.0, 2000.0),
        };
        assert!(ranges.validate().is_err());
        assert!(ChannelRanges::nano33_default().validate().is_ok());
    }

    #[test]
    fn test_vocabulary_one_hot() {
        let vocab =
            GestureVocabulary::new(vec!["punch".to_string(), "flex".to_string()]).unwrap();

        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.index_of("flex"), Some(1));
        assert_eq!(vocab.one_hot(0).unwrap(), vec![1.0, 0.0]);
        assert_eq!(vocab.one_hot(1).unwrap(), vec![0.0, 1.0]);
        assert!(vocab.one_hot(2).is_err());
    }

    #[test]
    fn test_vocabulary_rejects_duplicates() {
        let result =
            GestureVocabulary::new(vec!["punch".to_string(), "punch".to_string()]);
        assert!(result.is_err());
    }
}
