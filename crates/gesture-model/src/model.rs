//! Dense gesture classifier.
//!
//! The network mirrors the classic TinyML gesture architecture: two
//! small ReLU layers feeding a softmax output, one unit per gesture.
//! Softmax is used because exactly one gesture occurs per window.

use candle_core::{Device, Module, Result, Tensor, D};
use candle_nn::{linear, Linear, VarBuilder};

use gesture_core::SensorChannel;

/// Configuration for the dense classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Flattened feature dimension (`num_samples x 6`)
    pub input_dim: usize,
    /// Widths of the two hidden layers
    pub hidden_dims: [usize; 2],
    /// Number of gestures in the vocabulary
    pub n_classes: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_dim: 119 * SensorChannel::COUNT,
            hidden_dims: [50, 15],
            n_classes: 2,
        }
    }
}

impl ClassifierConfig {
    /// Configuration matching a signal pipeline's window length and a
    /// vocabulary size
    pub fn for_pipeline(num_samples: usize, n_classes: usize) -> Self {
        Self {
            input_dim: num_samples * SensorChannel::COUNT,
            n_classes,
            ..Default::default()
        }
    }
}

/// Device to run training and inference on
#[derive(Debug, Clone, Copy)]
pub enum DeviceType {
    Cpu,
    Cuda(usize),
    Metal,
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Cpu
    }
}

impl DeviceType {
    pub fn device(&self) -> Result<Device> {
        match self {
            DeviceType::Cpu => Ok(Device::Cpu),
            DeviceType::Cuda(ordinal) => Device::new_cuda(*ordinal),
            DeviceType::Metal => Device::new_metal(0),
        }
    }
}

/// Feed-forward gesture classifier
pub struct GestureClassifier {
    fc1: Linear,
    fc2: Linear,
    output: Linear,
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig, vb: VarBuilder) -> Result<Self> {
        let fc1 = linear(config.input_dim, config.hidden_dims[0], vb.pp("fc1"))?;
        let fc2 = linear(config.hidden_dims[0], config.hidden_dims[1], vb.pp("fc2"))?;
        let output = linear(config.hidden_dims[1], config.n_classes, vb.pp("output"))?;

        Ok(Self {
            fc1,
            fc2,
            output,
            config,
        })
    }

    /// Forward pass producing raw class logits
    ///
    /// # Arguments
    /// * `xs` - Feature batch [batch, input_dim]
    ///
    /// # Returns
    /// Logits tensor [batch, n_classes]
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = self.fc1.forward(xs)?.relu()?;
        let xs = self.fc2.forward(&xs)?.relu()?;
        self.output.forward(&xs)
    }

    /// Softmax class probabilities, one distribution per batch row
    pub fn probabilities(&self, xs: &Tensor) -> Result<Tensor> {
        let logits = self.forward(xs)?;
        candle_nn::ops::softmax(&logits, D::Minus1)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;

    fn test_model(config: ClassifierConfig) -> Result<GestureClassifier> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        GestureClassifier::new(config, vb)
    }

    #[test]
    fn test_forward_shapes() -> Result<()> {
        let config = ClassifierConfig {
            input_dim: 12,
            hidden_dims: [8, 4],
            n_classes: 3,
        };
        let model = test_model(config)?;

        let xs = Tensor::zeros((5, 12), DType::F32, &Device::Cpu)?;
        let logits = model.forward(&xs)?;
        assert_eq!(logits.dims(), &[5, 3]);

        Ok(())
    }

    #[test]
    fn test_probabilities_sum_to_one() -> Result<()> {
        let config = ClassifierConfig {
            input_dim: 6,
            hidden_dims: [4, 3],
            n_classes: 2,
        };
        let model = test_model(config)?;

        let xs = Tensor::randn(0f32, 1.0, (4, 6), &Device::Cpu)?;
        let probs = model.probabilities(&xs)?;
        let sums: Vec<f32> = probs.sum(D::Minus1)?.to_vec1()?;

        for sum in sums {
            assert!((sum - 1.0).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_config_for_pipeline() {
        let config = ClassifierConfig::for_pipeline(119, 2);
        assert_eq!(config.input_dim, 714);
        assert_eq!(config.hidden_dims, [50, 15]);
        assert_eq!(config.n_classes, 2);
    }
}
