//! Two-stage failure inference pipeline

mod columns;
mod engine;
mod inference;
mod labels;
mod transform;

pub use columns::{reading_to_row, rename_columns, CellValue, FeatureRow, RawRow, COLUMN_MAP};
pub use engine::{BinaryVerdict, InferencePipeline, PipelineStage};
pub use inference::OnnxClassifier;
pub use labels::{resolve_failure_label, FAILURE_LABELS};
pub use transform::{PipelineTransform, TransformSpec, TransformStep, KELVIN_OFFSET};

use crate::error::Result;
use crate::models::PreprocessedFeatures;

/// Trait for preprocessing implementations
pub trait FeatureTransform: Send + Sync {
    /// Produce the model-ready feature vector for one renamed row
    fn transform(&self, row: &FeatureRow) -> Result<PreprocessedFeatures>;
}

/// Trait for classifier implementations
pub trait Classifier: Send + Sync {
    /// Run the classifier over the features and return its class code
    fn predict(&self, features: &PreprocessedFeatures) -> Result<i64>;
}
