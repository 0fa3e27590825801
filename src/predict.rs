use axum::http::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::FEATURES;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Model not loaded. Please check server configuration.")]
    ModelUnavailable,
    #[error("No input data provided")]
    NoInput,
    #[error("Missing features: {0:?}")]
    MissingFeatures(Vec<&'static str>),
    #[error("Invalid input data format: {0}")]
    InvalidFormat(String),
    #[error("Invalid value for {0}: must be 0 or 1")]
    InvalidValue(&'static str),
    #[error("Prediction failed: {0}")]
    Inference(String),
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::ModelUnavailable | PredictError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

// Content type is not enforced; the raw body is parsed here.
pub fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, PredictError> {
    if body.iter().all(|byte| byte.is_ascii_whitespace()) {
        return Err(PredictError::NoInput);
    }

    let value = serde_json::from_slice::<Value>(body)
        .map_err(|error| PredictError::InvalidFormat(error.to_string()))?;

    match value {
        Value::Null => Err(PredictError::NoInput),
        Value::Object(map) if map.is_empty() => Err(PredictError::NoInput),
        Value::Object(map) => Ok(map),
        other => Err(PredictError::InvalidFormat(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

// Schema validation in three passes: completeness, coercion, domain. Extra
// payload fields are ignored. The returned row is ordered per FEATURES.
pub fn validate(payload: &Map<String, Value>) -> Result<Vec<f64>, PredictError> {
    let missing = FEATURES
        .iter()
        .copied()
        .filter(|feature| !payload.contains_key(*feature))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(PredictError::MissingFeatures(missing));
    }

    let mut row = Vec::with_capacity(FEATURES.len());
    for feature in FEATURES {
        let value = coerce_to_float(&payload[feature])
            .map_err(PredictError::InvalidFormat)?;
        row.push(value);
    }

    for (feature, value) in FEATURES.iter().zip(&row) {
        if *value != 0.0 && *value != 1.0 {
            return Err(PredictError::InvalidValue(feature));
        }
    }

    Ok(row)
}

fn coerce_to_float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| format!("could not convert number to float: {}", number)),
        Value::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("could not convert string to float: '{}'", text)),
        other => Err(format!(
            "could not convert {} to float",
            json_type_name(other)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
