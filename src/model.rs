use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const FEATURES: [&str; 11] = [
    "Sex",
    "Fever",
    "Cough",
    "Headache",
    "Runny nose",
    "Difficulty breathing or Dyspnea",
    "Fatigue or general weakness",
    "Nausea",
    "Diarrhea",
    "Chest pain",
    "Vomiting",
];

#[derive(Debug, Clone, Deserialize)]
pub struct ModelWeights {
    bias: f64,
    weights: HashMap<String, f64>,
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("model path '{}' must be a file", .0.display())]
    NotAFile(PathBuf),
    #[error("model read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("model parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model has no weights")]
    EmptyWeights,
}

#[derive(Debug, Error)]
#[error("model produced a non-finite score")]
pub struct InferenceError;

#[derive(Debug, Clone)]
pub struct Model {
    weights: ModelWeights,
}

impl Model {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound(path.to_path_buf()));
        }

        if path.is_dir() {
            return Err(ModelLoadError::NotAFile(path.to_path_buf()));
        }

        let data = std::fs::read(path)?;
        let weights = serde_json::from_slice::<ModelWeights>(&data)?;
        if weights.weights.is_empty() {
            return Err(ModelLoadError::EmptyWeights);
        }

        Ok(Self { weights })
    }

    // Positive-class probability for one row, columns in FEATURES order.
    // Features without a weight entry contribute nothing.
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let mut total = self.weights.bias;
        for (name, value) in FEATURES.iter().zip(row) {
            if let Some(weight) = self.weights.weights.get(*name) {
                total += weight * value;
            }
        }

        let proba = sigmoid(total);
        if proba.is_finite() {
            Ok(proba)
        } else {
            Err(InferenceError)
        }
    }
}

fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_artifact(dir: &tempfile::TempDir, name: &str, data: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(data.as_bytes()).unwrap();
        path
    }

    fn sample_artifact(dir: &tempfile::TempDir) -> PathBuf {
        write_artifact(
            dir,
            "model.json",
            r#"{"bias": -2.0, "weights": {"Fever": 1.5, "Cough": 1.0}}"#,
        )
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Model::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ModelLoadError::NotFound(_))));
    }

    #[test]
    fn load_rejects_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = Model::load(dir.path());
        assert!(matches!(result, Err(ModelLoadError::NotAFile(_))));
    }

    #[test]
    fn load_rejects_malformed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "model.json", "not json");
        assert!(matches!(Model::load(&path), Err(ModelLoadError::Parse(_))));
    }

    #[test]
    fn load_rejects_empty_weight_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "model.json", r#"{"bias": 0.0, "weights": {}}"#);
        assert!(matches!(
            Model::load(&path),
            Err(ModelLoadError::EmptyWeights)
        ));
    }

    #[test]
    fn predict_proba_matches_logistic_form() {
        let dir = tempfile::tempdir().unwrap();
        let model = Model::load(&sample_artifact(&dir)).unwrap();

        let mut row = [0.0; 11];
        row[1] = 1.0; // Fever
        let proba = model.predict_proba(&row).unwrap();

        let expected = 1.0 / (1.0 + (-(-2.0f64 + 1.5)).exp());
        assert!((proba - expected).abs() < 1e-12);
    }

    #[test]
    fn predict_proba_stays_in_unit_interval() {
        let dir = tempfile::tempdir().unwrap();
        let model = Model::load(&sample_artifact(&dir)).unwrap();

        let all_ones = [1.0; 11];
        let all_zeros = [0.0; 11];
        for row in [&all_ones, &all_zeros] {
            let proba = model.predict_proba(row.as_slice()).unwrap();
            assert!((0.0..=1.0).contains(&proba));
        }
    }

    #[test]
    fn predict_proba_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let model = Model::load(&sample_artifact(&dir)).unwrap();

        let row = [1.0; 11];
        let first = model.predict_proba(&row).unwrap();
        let second = model.predict_proba(&row).unwrap();
        assert_eq!(first, second);
    }
}
