//! Server configuration

use anyhow::Result;
use predictor_lib::artifacts::ArtifactPaths;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP port for the prediction and ops endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Path to the preprocessing transform specification
    #[serde(default = "default_transform_spec_path")]
    pub transform_spec_path: PathBuf,

    /// Path to the binary failure classifier
    #[serde(default = "default_binary_model_path")]
    pub binary_model_path: PathBuf,

    /// Path to the failure type classifier
    #[serde(default = "default_multiclass_model_path")]
    pub multiclass_model_path: PathBuf,
}

fn default_api_port() -> u16 {
    8000
}

fn default_transform_spec_path() -> PathBuf {
    PathBuf::from("models/preprocessing.json")
}

fn default_binary_model_path() -> PathBuf {
    PathBuf::from("models/machine_failure.onnx")
}

fn default_multiclass_model_path() -> PathBuf {
    PathBuf::from("models/failure_type.onnx")
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PREDICT"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServerConfig {
            api_port: default_api_port(),
            transform_spec_path: default_transform_spec_path(),
            binary_model_path: default_binary_model_path(),
            multiclass_model_path: default_multiclass_model_path(),
        }))
    }

    /// Artifact locations from this configuration
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            transform_spec: self.transform_spec_path.clone(),
            binary_model: self.binary_model_path.clone(),
            multiclass_model: self.multiclass_model_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_models_directory() {
        assert_eq!(default_api_port(), 8000);
        assert_eq!(
            default_transform_spec_path(),
            PathBuf::from("models/preprocessing.json")
        );
        assert_eq!(
            default_binary_model_path(),
            PathBuf::from("models/machine_failure.onnx")
        );
        assert_eq!(
            default_multiclass_model_path(),
            PathBuf::from("models/failure_type.onnx")
        );
    }
}
