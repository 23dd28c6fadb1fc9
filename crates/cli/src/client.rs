//! API client for communicating with the prediction service

use anyhow::{Context, Result};
use clap::ValueEnum;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// API client for the prediction service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request where non-2xx responses still carry a JSON body
    pub async fn get_with_status<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<(StatusCode, T)> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response.json().await.context("Failed to parse response")?;
        Ok((status, body))
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}

// API request and response types

/// Product quality grade
#[derive(Debug, Clone, Copy, Serialize, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum QualityGrade {
    L,
    M,
    H,
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grade = match self {
            QualityGrade::L => "L",
            QualityGrade::M => "M",
            QualityGrade::H => "H",
        };
        write!(f, "{}", grade)
    }
}

/// Request body for the prediction endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    #[serde(rename = "air_temperature_K")]
    pub air_temperature_k: f64,
    #[serde(rename = "process_temperature_K")]
    pub process_temperature_k: f64,
    pub rotational_speed_rpm: i64,
    #[serde(rename = "torque_Nm")]
    pub torque_nm: f64,
    pub tool_wear_min: i64,
    #[serde(rename = "type")]
    pub quality_type: QualityGrade,
}

/// Response body of the prediction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictReply {
    Outcome {
        prediction: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        failure_type: Option<String>,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentReply {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReply {
    pub status: String,
    pub components: HashMap<String, ComponentReply>,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessReply {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
