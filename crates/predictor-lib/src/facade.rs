//! Prediction request façade
//!
//! The façade owns the contract of the prediction endpoint: it validates
//! the payload, runs the pipeline, and shapes the response. Every failure
//! is folded into a well-formed `{"error": ...}` body, so callers always
//! receive valid JSON and never a panic or a transport-level error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PredictError;
use crate::models::{FailurePrediction, SensorReading};
use crate::pipeline::InferencePipeline;

pub const PREDICTION_NO_FAILURE: &str = "No Failure";
pub const PREDICTION_FAILURE_DETECTED: &str = "Failure Detected";

/// Wire shape of every prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Outcome {
        prediction: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        failure_type: Option<String>,
    },
    Error {
        error: String,
    },
}

impl PredictResponse {
    pub fn error(message: impl Into<String>) -> Self {
        PredictResponse::Error {
            error: message.into(),
        }
    }
}

impl From<FailurePrediction> for PredictResponse {
    fn from(prediction: FailurePrediction) -> Self {
        match prediction {
            FailurePrediction::NoFailure => PredictResponse::Outcome {
                prediction: PREDICTION_NO_FAILURE.to_string(),
                failure_type: None,
            },
            FailurePrediction::FailureDetected { failure_type } => PredictResponse::Outcome {
                prediction: PREDICTION_FAILURE_DETECTED.to_string(),
                failure_type: Some(failure_type.as_str().to_string()),
            },
        }
    }
}

impl From<PredictError> for PredictResponse {
    fn from(err: PredictError) -> Self {
        PredictResponse::error(err.to_string())
    }
}

fn parse_reading(payload: Value) -> Result<SensorReading, PredictError> {
    serde_json::from_value(payload).map_err(|e| PredictError::Validation(e.to_string()))
}

/// Serve one prediction request. Validation runs before the pipeline, so a
/// malformed payload never reaches a classifier.
pub fn handle(pipeline: &InferencePipeline, payload: Value) -> PredictResponse {
    let reading = match parse_reading(payload) {
        Ok(reading) => reading,
        Err(err) => return err.into(),
    };

    match pipeline.predict(&reading) {
        Ok(prediction) => prediction.into(),
        Err(err) => err.into(),
    }
}
