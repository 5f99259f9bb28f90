//! Held-out evaluation and single-window classification.

use candle_core::{Device, Result as CandleResult, Tensor};
use serde::Serialize;

use gesture_core::{Error, Result};
use gesture_signal::dataset::LabeledFeature;
use gesture_signal::recording::FeatureVector;

use crate::model::GestureClassifier;
use crate::training::to_tensors;

/// One test-set prediction against its expected label
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub expected: usize,
    pub predicted: usize,
    /// Softmax probability of the predicted class
    pub confidence: f32,
    /// Full probability distribution over the vocabulary
    pub probabilities: Vec<f32>,
}

impl Prediction {
    pub fn is_correct(&self) -> bool {
        self.expected == self.predicted
    }
}

/// Aggregate result of evaluating a model on held-out examples
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Fraction of argmax predictions matching the expected label
    pub accuracy: f32,
    /// Mean absolute error against the one-hot targets
    pub mae: f32,
    pub predictions: Vec<Prediction>,
}

/// Evaluate the model on labeled examples
pub fn evaluate(
    model: &GestureClassifier,
    examples: &[LabeledFeature],
    device: &Device,
) -> Result<Evaluation> {
    if examples.is_empty() {
        return Err(Error::Dataset("nothing to evaluate".into()));
    }

    evaluate_inner(model, examples, device).map_err(|e| Error::Model(e.to_string()))
}

fn evaluate_inner(
    model: &GestureClassifier,
    examples: &[LabeledFeature],
    device: &Device,
) -> CandleResult<Evaluation> {
    let n_classes = model.config().n_classes;
    let (xs, ys) = to_tensors(examples, n_classes, device)?;

    let probs = model.probabilities(&xs)?;
    let mae = probs.sub(&ys)?.abs()?.mean_all()?.to_scalar::<f32>()?;

    let rows: Vec<Vec<f32>> = probs.to_vec2()?;
    let mut correct = 0usize;
    let mut predictions = Vec::with_capacity(rows.len());

    for (row, example) in rows.iter().zip(examples) {
        let (predicted, confidence) = argmax(row);
        let prediction = Prediction {
            expected: example.label_index,
            predicted,
            confidence,
            probabilities: row.clone(),
        };
        if prediction.is_correct() {
            correct += 1;
        }
        predictions.push(prediction);
    }

    Ok(Evaluation {
        accuracy: correct as f32 / predictions.len() as f32,
        mae,
        predictions,
    })
}

/// Classify one feature vector, returning the argmax label index and
/// its softmax confidence
pub fn classify(
    model: &GestureClassifier,
    features: &FeatureVector,
    device: &Device,
) -> Result<(usize, f32)> {
    let xs = Tensor::from_vec(features.values.clone(), (1, features.dim()), device)
        .map_err(|e| Error::Model(e.to_string()))?;

    let probs = model
        .probabilities(&xs)
        .and_then(|p| p.to_vec2::<f32>())
        .map_err(|e| Error::Model(e.to_string()))?;

    Ok(argmax(&probs[0]))
}

fn argmax(row: &[f32]) -> (usize, f32) {
    let (index, &value) = row
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap();
    (index, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassifierConfig;
    use candle_core::DType;
    use candle_nn::{VarBuilder, VarMap};

    fn test_model() -> GestureClassifier {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        GestureClassifier::new(
            ClassifierConfig {
                input_dim: 4,
                hidden_dims: [4, 3],
                n_classes: 2,
            },
            vb,
        )
        .unwrap()
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), (1, 0.7));
        assert_eq!(argmax(&[0.9, 0.1]), (0, 0.9));
    }

    #[test]
    fn test_evaluation_shape() {
        let model = test_model();
        let examples = vec![
            LabeledFeature {
                label_index: 0,
                features: FeatureVector::new(vec![0.1, 0.2, 0.3, 0.4]),
            },
            LabeledFeature {
                label_index: 1,
                features: FeatureVector::new(vec![0.4, 0.3, 0.2, 0.1]),
            },
        ];

        let evaluation = evaluate(&model, &examples, &Device::Cpu).unwrap();
        assert_eq!(evaluation.predictions.len(), 2);
        assert!(evaluation.accuracy >= 0.0 && evaluation.accuracy <= 1.0);
        assert!(evaluation.mae.is_finite());

        for prediction in &evaluation.predictions {
            assert_eq!(prediction.probabilities.len(), 2);
            assert!(prediction.confidence >= 0.5 - 1e-6);
        }
    }

    #[test]
    fn test_empty_examples_rejected() {
        let model = test_model();
        assert!(evaluate(&model, &[], &Device::Cpu).is_err());
    }

    #[test]
    fn test_classify_single_vector() {
        let model = test_model();
        let features = FeatureVector::new(vec![0.5, 0.5, 0.5, 0.5]);

        let (label, confidence) = classify(&model, &features, &Device::Cpu).unwrap();
        assert!(label < 2);
        assert!(confidence > 0.0 && confidence <= 1.0);
    }
}
