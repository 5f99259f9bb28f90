//! Run artifacts: metrics history CSV and evaluation report JSON.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use gesture_core::GestureVocabulary;
use gesture_model::evaluate::Evaluation;
use gesture_model::training::TrainingHistory;

/// Create the parent directory of an artifact path if needed
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Write the per-epoch metrics history as CSV for external plotting
pub fn write_history_csv(history: &TrainingHistory, path: &Path) -> Result<()> {
    ensure_parent(path)?;

    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;

    writeln!(file, "epoch,loss,mae,val_loss,val_mae")?;
    for metrics in &history.epochs {
        writeln!(
            file,
            "{},{},{},{},{}",
            metrics.epoch, metrics.loss, metrics.mae, metrics.val_loss, metrics.val_mae
        )?;
    }

    tracing::info!(path = %path.display(), epochs = history.epochs.len(), "wrote training history");
    Ok(())
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    gestures: Vec<String>,
    accuracy: f32,
    mae: f32,
    predictions: Vec<ReportPrediction>,
}

#[derive(Debug, Serialize)]
struct ReportPrediction {
    expected: String,
    predicted: String,
    confidence: f32,
    probabilities: Vec<f32>,
}

/// Write the test-set evaluation as a JSON report
pub fn write_report(
    vocabulary: &GestureVocabulary,
    evaluation: &Evaluation,
    path: &Path,
) -> Result<()> {
    ensure_parent(path)?;

    let predictions = evaluation
        .predictions
        .iter()
        .map(|p| {
            Ok(ReportPrediction {
                expected: vocabulary.name(p.expected)?.to_string(),
                predicted: vocabulary.name(p.predicted)?.to_string(),
                confidence: p.confidence,
                probabilities: p.probabilities.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let report = EvaluationReport {
        gestures: vocabulary.names().to_vec(),
        accuracy: evaluation.accuracy,
        mae: evaluation.mae,
        predictions,
    };

    let json = serde_json::to_string_pretty(&report)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote evaluation report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_core::Timestamp;
    use gesture_model::evaluate::Prediction;
    use gesture_model::training::EpochMetrics;

    #[test]
    fn test_history_csv_format() {
        let history = TrainingHistory {
            started_at: Timestamp::from_nanos(0),
            finished_at: Timestamp::from_nanos(1_000_000_000),
            epochs: vec![EpochMetrics {
                epoch: 1,
                loss: 0.25,
                mae: 0.5,
                val_loss: 0.3,
                val_mae: 0.55,
            }],
        };

        let path = std::env::temp_dir().join("gesture-trainer-history-test.csv");
        write_history_csv(&history, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("epoch,loss,mae,val_loss,val_mae"));
        assert_eq!(lines.next(), Some("1,0.25,0.5,0.3,0.55"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_report_names_labels() {
        let vocabulary =
            GestureVocabulary::new(vec!["punch".to_string(), "flex".to_string()]).unwrap();
        let evaluation = Evaluation {
            accuracy: 1.0,
            mae: 0.01,
            predictions: vec![Prediction {
                expected: 1,
                predicted: 1,
                confidence: 0.98,
                probabilities: vec![0.02, 0.98],
            }],
        };

        let path = std::env::temp_dir().join("gesture-trainer-report-test.json");
        write_report(&vocabulary, &evaluation, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"expected\": \"flex\""));
        assert!(contents.contains("\"accuracy\": 1.0"));

        fs::remove_file(&path).ok();
    }
}
