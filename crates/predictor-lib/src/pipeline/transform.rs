//! Preprocessing pipeline loaded from a transform specification
//!
//! The specification file names each transform step and carries the
//! parameters learned at training time. Ownership of the step code is
//! explicit: every `op` name resolves to a function compiled into this
//! module, and loading fails if a name or its parameters do not line up.
//! Steps run in file order; the output vector follows the declared column
//! order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{PredictError, Result};
use crate::models::PreprocessedFeatures;
use crate::pipeline::columns::{CellValue, FeatureRow, COLUMN_MAP};
use crate::pipeline::FeatureTransform;

/// Offset between the Kelvin and Celsius scales
pub const KELVIN_OFFSET: f64 = 273.15;

/// One named transform step with its learned parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformStep {
    /// Convert the listed columns from Kelvin to Celsius
    KelvinToCelsius { columns: Vec<String> },
    /// Replace the quality grade column with its ordinal code
    OrdinalEncode { column: String },
    /// Standardize the listed columns with training-time means and scales
    StandardScale {
        columns: Vec<String>,
        means: Vec<f64>,
        scales: Vec<f64>,
    },
}

/// On-disk transform specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformSpec {
    pub version: String,
    pub steps: Vec<TransformStep>,
    pub output_columns: Vec<String>,
}

/// Executable preprocessing pipeline
#[derive(Debug)]
pub struct PipelineTransform {
    spec: TransformSpec,
}

impl PipelineTransform {
    /// Build a transform from a validated specification
    pub fn new(spec: TransformSpec) -> Result<Self> {
        Self::validate(&spec)?;
        Ok(Self { spec })
    }

    /// Parse and validate a specification from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: TransformSpec = serde_json::from_str(json).map_err(|e| {
            PredictError::Preprocessing(format!("invalid transform spec: {}", e))
        })?;
        Self::new(spec)
    }

    pub fn version(&self) -> &str {
        &self.spec.version
    }

    /// Number of features emitted per row
    pub fn output_width(&self) -> usize {
        self.spec.output_columns.len()
    }

    fn validate(spec: &TransformSpec) -> Result<()> {
        let known: BTreeSet<&str> = COLUMN_MAP.iter().map(|(_, label)| *label).collect();

        if spec.output_columns.is_empty() {
            return Err(PredictError::Preprocessing(
                "transform spec declares no output columns".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for col in &spec.output_columns {
            if !known.contains(col.as_str()) {
                return Err(PredictError::Preprocessing(format!(
                    "unknown output column '{}'",
                    col
                )));
            }
            if !seen.insert(col.as_str()) {
                return Err(PredictError::Preprocessing(format!(
                    "duplicate output column '{}'",
                    col
                )));
            }
        }

        for step in &spec.steps {
            match step {
                TransformStep::KelvinToCelsius { columns } => {
                    Self::check_columns_known(&known, columns)?;
                }
                TransformStep::OrdinalEncode { column } => {
                    Self::check_columns_known(&known, std::slice::from_ref(column))?;
                }
                TransformStep::StandardScale {
                    columns,
                    means,
                    scales,
                } => {
                    Self::check_columns_known(&known, columns)?;
                    if means.len() != columns.len() || scales.len() != columns.len() {
                        return Err(PredictError::Preprocessing(format!(
                            "standard_scale has {} columns but {} means and {} scales",
                            columns.len(),
                            means.len(),
                            scales.len()
                        )));
                    }
                    if scales.iter().any(|s| !s.is_finite() || *s == 0.0) {
                        return Err(PredictError::Preprocessing(
                            "standard_scale has a zero or non-finite scale".to_string(),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn check_columns_known(known: &BTreeSet<&str>, columns: &[String]) -> Result<()> {
        for col in columns {
            if !known.contains(col.as_str()) {
                return Err(PredictError::Preprocessing(format!(
                    "transform step references unknown column '{}'",
                    col
                )));
            }
        }
        Ok(())
    }

    /// Every column named anywhere in the specification
    fn fitted_columns(&self) -> BTreeSet<&str> {
        let mut cols: BTreeSet<&str> = self
            .spec
            .output_columns
            .iter()
            .map(String::as_str)
            .collect();
        for step in &self.spec.steps {
            match step {
                TransformStep::KelvinToCelsius { columns }
                | TransformStep::StandardScale { columns, .. } => {
                    cols.extend(columns.iter().map(String::as_str));
                }
                TransformStep::OrdinalEncode { column } => {
                    cols.insert(column.as_str());
                }
            }
        }
        cols
    }

    fn apply_step(step: &TransformStep, row: &mut FeatureRow) -> Result<()> {
        match step {
            TransformStep::KelvinToCelsius { columns } => {
                for col in columns {
                    match row.get_mut(col) {
                        Some(CellValue::Number(v)) => *v -= KELVIN_OFFSET,
                        Some(CellValue::Grade(_)) => {
                            return Err(PredictError::Preprocessing(format!(
                                "column '{}' is not numeric",
                                col
                            )))
                        }
                        None => {
                            return Err(PredictError::Preprocessing(format!(
                                "missing column '{}'",
                                col
                            )))
                        }
                    }
                }
            }
            TransformStep::OrdinalEncode { column } => match row.get_mut(column) {
                Some(cell) => match cell {
                    CellValue::Grade(grade) => {
                        let ordinal = grade.ordinal() as f64;
                        *cell = CellValue::Number(ordinal);
                    }
                    CellValue::Number(_) => {
                        return Err(PredictError::Preprocessing(format!(
                            "column '{}' is not a quality grade",
                            column
                        )))
                    }
                },
                None => {
                    return Err(PredictError::Preprocessing(format!(
                        "missing column '{}'",
                        column
                    )))
                }
            },
            TransformStep::StandardScale {
                columns,
                means,
                scales,
            } => {
                for ((col, mean), scale) in columns.iter().zip(means).zip(scales) {
                    match row.get_mut(col) {
                        Some(CellValue::Number(v)) => *v = (*v - mean) / scale,
                        Some(CellValue::Grade(_)) => {
                            return Err(PredictError::Preprocessing(format!(
                                "column '{}' is not numeric",
                                col
                            )))
                        }
                        None => {
                            return Err(PredictError::Preprocessing(format!(
                                "missing column '{}'",
                                col
                            )))
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl FeatureTransform for PipelineTransform {
    fn transform(&self, row: &FeatureRow) -> Result<PreprocessedFeatures> {
        // The row shape must match what the pipeline was fitted on.
        let fitted = self.fitted_columns();
        for key in row.keys() {
            if !fitted.contains(key.as_str()) {
                return Err(PredictError::Preprocessing(format!(
                    "unexpected column '{}'",
                    key
                )));
            }
        }

        let mut working = row.clone();
        for step in &self.spec.steps {
            Self::apply_step(step, &mut working)?;
        }

        let mut values = Vec::with_capacity(self.spec.output_columns.len());
        for col in &self.spec.output_columns {
            match working.get(col) {
                Some(CellValue::Number(v)) => values.push(*v as f32),
                Some(CellValue::Grade(_)) => {
                    return Err(PredictError::Preprocessing(format!(
                        "column '{}' was never encoded to a number",
                        col
                    )))
                }
                None => {
                    return Err(PredictError::Preprocessing(format!(
                        "missing column '{}'",
                        col
                    )))
                }
            }
        }

        Ok(PreprocessedFeatures { values })
    }
}
