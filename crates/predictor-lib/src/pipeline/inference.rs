//! ONNX classifier execution using tract

use anyhow::Context;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

use crate::error::{PredictError, Result};
use crate::models::PreprocessedFeatures;
use crate::pipeline::Classifier;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Inference above this threshold is logged as slow
const MAX_INFERENCE_MS: u128 = 5;

/// A classifier backed by an optimized ONNX plan. The plan is immutable
/// after loading, so a shared reference is enough to run inference.
#[derive(Debug)]
pub struct OnnxClassifier {
    name: String,
    plan: TractModel,
    input_width: usize,
}

impl OnnxClassifier {
    /// Parse and optimize an ONNX model for single-row inference
    pub fn from_bytes(name: &str, model_bytes: &[u8], input_width: usize) -> anyhow::Result<Self> {
        let plan = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, input_width]).into())
            .context("Failed to set model input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to make model runnable")?;

        Ok(Self {
            name: name.to_string(),
            plan,
            input_width,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &PreprocessedFeatures) -> Result<i64> {
        let start = Instant::now();

        let input = features_to_tensor(&self.name, self.input_width, features)?;
        let result = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| PredictError::ModelInvocation(format!("{}: {}", self.name, e)))?;
        let output = result.get(0).ok_or_else(|| {
            PredictError::ModelInvocation(format!("{} produced no output", self.name))
        })?;
        let code = tensor_to_code(&self.name, output)?;

        let elapsed = start.elapsed().as_millis();
        if elapsed > MAX_INFERENCE_MS {
            warn!(model = %self.name, elapsed_ms = elapsed, "Slow inference");
        } else {
            debug!(model = %self.name, code, "Inference complete");
        }

        Ok(code)
    }
}

fn features_to_tensor(
    name: &str,
    input_width: usize,
    features: &PreprocessedFeatures,
) -> Result<Tensor> {
    if features.width() != input_width {
        return Err(PredictError::ModelInvocation(format!(
            "{} expects {} features, got {}",
            name,
            input_width,
            features.width()
        )));
    }
    let array = tract_ndarray::Array2::from_shape_vec((1, input_width), features.values.clone())
        .map_err(|e| PredictError::ModelInvocation(format!("{}: {}", name, e)))?;
    Ok(array.into())
}

/// Read a class code out of the model's first output tensor.
///
/// Classifiers exported from training emit an int64 label tensor. Graphs
/// that expose raw scores instead are handled by thresholding a single
/// score at 0.5 or taking the argmax of a score row.
fn tensor_to_code(name: &str, output: &Tensor) -> Result<i64> {
    if let Ok(view) = output.to_array_view::<i64>() {
        return view.iter().next().copied().ok_or_else(|| {
            PredictError::ModelInvocation(format!("{} emitted an empty label tensor", name))
        });
    }

    let view = output
        .to_array_view::<f32>()
        .map_err(|e| PredictError::ModelInvocation(format!("{}: {}", name, e)))?;
    let scores: Vec<f32> = view.iter().copied().collect();
    match scores.len() {
        0 => Err(PredictError::ModelInvocation(format!(
            "{} emitted an empty output tensor",
            name
        ))),
        1 => Ok((scores[0] >= 0.5) as i64),
        _ => {
            let mut best = 0;
            for (i, score) in scores.iter().enumerate() {
                if *score > scores[best] {
                    best = i;
                }
            }
            Ok(best as i64)
        }
    }
}
