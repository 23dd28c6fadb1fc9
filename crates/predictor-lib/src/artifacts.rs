//! Model artifact loading
//!
//! All artifacts are read once at startup. A bundle that fails to load is
//! fatal; there is no lazy or partial loading, so a running service always
//! has a complete pipeline.

use anyhow::{bail, Context};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::pipeline::{InferencePipeline, OnnxClassifier, PipelineTransform};

/// Filesystem locations of the three artifacts
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub transform_spec: PathBuf,
    pub binary_model: PathBuf,
    pub multiclass_model: PathBuf,
}

/// Provenance record for one loaded artifact
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    pub name: &'static str,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub checksum: String,
}

/// The three loaded artifacts plus their provenance
#[derive(Debug)]
pub struct ArtifactBundle {
    pub transform: Arc<PipelineTransform>,
    pub binary: Arc<OnnxClassifier>,
    pub multiclass: Arc<OnnxClassifier>,
    pub manifest: Vec<ArtifactInfo>,
}

impl ArtifactBundle {
    /// Load and validate all artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> anyhow::Result<Self> {
        let (spec_bytes, spec_info) = read_artifact("transform_spec", &paths.transform_spec)?;
        let (binary_bytes, binary_info) = read_artifact("binary_model", &paths.binary_model)?;
        let (multi_bytes, multi_info) = read_artifact("multiclass_model", &paths.multiclass_model)?;

        let spec_json = String::from_utf8(spec_bytes).with_context(|| {
            format!(
                "Transform spec {} is not valid UTF-8",
                paths.transform_spec.display()
            )
        })?;
        let transform = PipelineTransform::from_json(&spec_json).with_context(|| {
            format!(
                "Failed to load transform spec from {}",
                paths.transform_spec.display()
            )
        })?;
        let width = transform.output_width();

        let binary = OnnxClassifier::from_bytes("binary", &binary_bytes, width)
            .with_context(|| {
                format!(
                    "Failed to load binary classifier from {}",
                    paths.binary_model.display()
                )
            })?;
        let multiclass = OnnxClassifier::from_bytes("multiclass", &multi_bytes, width)
            .with_context(|| {
                format!(
                    "Failed to load multiclass classifier from {}",
                    paths.multiclass_model.display()
                )
            })?;

        let manifest = vec![spec_info, binary_info, multi_info];
        for info in &manifest {
            info!(
                artifact = info.name,
                path = %info.path.display(),
                size_bytes = info.size_bytes,
                checksum = %info.checksum,
                "Artifact loaded"
            );
        }

        Ok(Self {
            transform: Arc::new(transform),
            binary: Arc::new(binary),
            multiclass: Arc::new(multiclass),
            manifest,
        })
    }

    /// Assemble the inference pipeline over the loaded artifacts
    pub fn pipeline(&self) -> InferencePipeline {
        InferencePipeline::new(
            self.transform.clone(),
            self.binary.clone(),
            self.multiclass.clone(),
        )
    }
}

fn read_artifact(name: &'static str, path: &Path) -> anyhow::Result<(Vec<u8>, ArtifactInfo)> {
    if !path.exists() {
        bail!("Artifact {} not found at {}", name, path.display());
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {} from {}", name, path.display()))?;
    let info = ArtifactInfo {
        name,
        path: path.to_path_buf(),
        size_bytes: bytes.len() as u64,
        checksum: compute_checksum(&bytes),
    };
    Ok((bytes, info))
}

fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
