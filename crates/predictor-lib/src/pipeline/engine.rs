//! Two-stage inference pipeline
//!
//! A reading flows through rename, preprocessing, a binary failure gate,
//! and only when the gate reports a failure, the failure-type classifier.
//! Stage progress is explicit so a prediction can never skip the gate or
//! invoke the multiclass model for a healthy reading.

use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::models::{FailurePrediction, PreprocessedFeatures, SensorReading};
use crate::pipeline::columns::{reading_to_row, rename_columns};
use crate::pipeline::labels::resolve_failure_label;
use crate::pipeline::{Classifier, FeatureTransform};

/// Outcome of the binary failure gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryVerdict {
    NoFailure,
    Failure,
}

impl BinaryVerdict {
    /// Code 0 means no failure; any other code is treated as a failure.
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            BinaryVerdict::NoFailure
        } else {
            BinaryVerdict::Failure
        }
    }
}

/// Progress of one reading through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStage {
    Init,
    BinaryChecked(BinaryVerdict),
    MulticlassChecked(i64),
    Resolved(FailurePrediction),
}

/// The assembled pipeline. All stages are immutable after construction, so
/// clones share the same artifacts and predictions can run concurrently.
#[derive(Clone)]
pub struct InferencePipeline {
    transform: Arc<dyn FeatureTransform>,
    binary: Arc<dyn Classifier>,
    multiclass: Arc<dyn Classifier>,
}

impl InferencePipeline {
    pub fn new(
        transform: Arc<dyn FeatureTransform>,
        binary: Arc<dyn Classifier>,
        multiclass: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            transform,
            binary,
            multiclass,
        }
    }

    /// Run one reading through the full pipeline
    pub fn predict(&self, reading: &SensorReading) -> Result<FailurePrediction> {
        let row = rename_columns(&reading_to_row(reading))?;
        let features = self.transform.transform(&row)?;

        let mut stage = PipelineStage::Init;
        loop {
            stage = self.advance(stage, &features)?;
            if let PipelineStage::Resolved(prediction) = stage {
                return Ok(prediction);
            }
        }
    }

    fn advance(
        &self,
        stage: PipelineStage,
        features: &PreprocessedFeatures,
    ) -> Result<PipelineStage> {
        match stage {
            PipelineStage::Init => {
                let code = self.binary.predict(features)?;
                let verdict = BinaryVerdict::from_code(code);
                debug!(code, ?verdict, "Binary gate checked");
                Ok(PipelineStage::BinaryChecked(verdict))
            }
            PipelineStage::BinaryChecked(BinaryVerdict::NoFailure) => {
                Ok(PipelineStage::Resolved(FailurePrediction::NoFailure))
            }
            PipelineStage::BinaryChecked(BinaryVerdict::Failure) => {
                let code = self.multiclass.predict(features)?;
                debug!(code, "Failure type checked");
                Ok(PipelineStage::MulticlassChecked(code))
            }
            PipelineStage::MulticlassChecked(code) => {
                Ok(PipelineStage::Resolved(FailurePrediction::FailureDetected {
                    failure_type: resolve_failure_label(code),
                }))
            }
            PipelineStage::Resolved(prediction) => Ok(PipelineStage::Resolved(prediction)),
        }
    }
}
