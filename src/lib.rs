//! Aluna Risk - client pipeline for obstetric risk predictions
//!
//! Clinicians enter eight clinical observations; this library validates them,
//! encodes them for the remote prediction service, performs the request and
//! classifies both the outcome and any failure. Risk-level classification and
//! summary aggregation are also available as pure functions.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{aggregate, classify_confidence, classify_risk_level, from_wire, to_wire, validate, validate_all, RawInputBuffer};
pub use crate::models::{ClinicalInput, WirePatient, RiskType, RiskLevel, ConfidenceLevel, RiskPrediction, PredictionSummary, PredictionResult, BatchResult, HealthStatus};
pub use crate::services::{ClientConfig, ClientError, PredictionClient};
