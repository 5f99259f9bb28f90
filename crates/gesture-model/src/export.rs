//! Weight export and reload in candle's safetensors format.
//!
//! Safetensors is the deployment format for candle models: a flat,
//! mmap-friendly tensor container suitable for embedded inference
//! targets. Architecture is not stored; loading requires the same
//! `ClassifierConfig` the model was trained with.

use std::path::Path;

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};

use gesture_core::{Error, Result};

use crate::model::{ClassifierConfig, GestureClassifier};

/// Save trained weights to a `.safetensors` file
pub fn export_weights<P: AsRef<Path>>(varmap: &VarMap, path: P) -> Result<()> {
    let path = path.as_ref();
    varmap
        .save(path)
        .map_err(|e| Error::Model(format!("saving weights to {}: {e}", path.display())))?;

    tracing::info!(path = %path.display(), "exported model weights");
    Ok(())
}

/// Load a classifier from exported weights
pub fn load_classifier<P: AsRef<Path>>(
    path: P,
    config: ClassifierConfig,
    device: &Device,
) -> Result<GestureClassifier> {
    let path = path.as_ref();

    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device)
            .map_err(|e| Error::Model(format!("loading weights from {}: {e}", path.display())))?
    };

    GestureClassifier::new(config, vb).map_err(|e| Error::Model(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Tensor;

    #[test]
    fn test_weights_round_trip() {
        let device = Device::Cpu;
        let config = ClassifierConfig {
            input_dim: 6,
            hidden_dims: [5, 4],
            n_classes: 2,
        };

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = GestureClassifier::new(config, vb).unwrap();

        let xs = Tensor::from_vec(
            vec![0.1f32, 0.9, 0.4, 0.2, 0.7, 0.3],
            (1, 6),
            &device,
        )
        .unwrap();
        let before: Vec<Vec<f32>> = model.probabilities(&xs).unwrap().to_vec2().unwrap();

        let path = std::env::temp_dir().join("gesture-model-roundtrip.safetensors");
        export_weights(&varmap, &path).unwrap();

        let reloaded = load_classifier(&path, config, &device).unwrap();
        let after: Vec<Vec<f32>> = reloaded.probabilities(&xs).unwrap().to_vec2().unwrap();

        for (b, a) in before[0].iter().zip(&after[0]) {
            assert!((b - a).abs() < 1e-6);
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = load_classifier(
            "/nonexistent/gesture.safetensors",
            ClassifierConfig::default(),
            &Device::Cpu,
        );
        assert!(matches!(result, Err(Error::Model(_))));
    }
}
