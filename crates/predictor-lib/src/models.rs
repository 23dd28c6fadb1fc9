//! Core data models for the failure predictor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product quality grade attached to every sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityType {
    L,
    M,
    H,
}

impl QualityType {
    /// Ordinal code the models were trained with (L < M < H)
    pub fn ordinal(&self) -> u8 {
        match self {
            QualityType::L => 0,
            QualityType::M => 1,
            QualityType::H => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityType::L => "L",
            QualityType::M => "M",
            QualityType::H => "H",
        }
    }
}

/// One sensor reading from an industrial machine
///
/// Field names mirror the request wire format; the quality grade arrives
/// under the `type` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(rename = "air_temperature_K")]
    pub air_temperature_k: f64,
    #[serde(rename = "process_temperature_K")]
    pub process_temperature_k: f64,
    pub rotational_speed_rpm: i64,
    #[serde(rename = "torque_Nm")]
    pub torque_nm: f64,
    pub tool_wear_min: i64,
    #[serde(rename = "type")]
    pub quality_type: QualityType,
}

/// Failure mode labels emitted by the failure-type model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureLabel {
    #[serde(rename = "Overstrain Failure")]
    Overstrain,
    #[serde(rename = "Power Failure")]
    Power,
    #[serde(rename = "Random Failures")]
    Random,
    #[serde(rename = "Tool Wear")]
    ToolWear,
    #[serde(rename = "Heat Dissipation Failure")]
    HeatDissipation,
    #[serde(rename = "Unknown Failure Type")]
    Unknown,
}

impl FailureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureLabel::Overstrain => "Overstrain Failure",
            FailureLabel::Power => "Power Failure",
            FailureLabel::Random => "Random Failures",
            FailureLabel::ToolWear => "Tool Wear",
            FailureLabel::HeatDissipation => "Heat Dissipation Failure",
            FailureLabel::Unknown => "Unknown Failure Type",
        }
    }
}

impl fmt::Display for FailureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the two-stage inference sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePrediction {
    NoFailure,
    FailureDetected { failure_type: FailureLabel },
}

/// Feature vector produced by the preprocessing pipeline
///
/// Values follow the column order declared by the transform specification.
/// Produced and consumed within a single request; never shared or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedFeatures {
    pub values: Vec<f32>,
}

impl PreprocessedFeatures {
    pub fn width(&self) -> usize {
        self.values.len()
    }
}
