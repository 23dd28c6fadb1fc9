//! Core library for the machine failure prediction service
//!
//! This crate provides the core functionality for:
//! - The two-stage failure inference pipeline
//! - Model artifact loading and verification
//! - The prediction request facade
//! - Health checks and observability

pub mod artifacts;
pub mod error;
pub mod facade;
pub mod health;
pub mod models;
pub mod observability;
pub mod pipeline;

pub use error::{PredictError, Result};
pub use facade::PredictResponse;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use pipeline::InferencePipeline;
