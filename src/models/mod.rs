// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ClinicalInput, WirePatient, RiskType, RiskLevel, ConfidenceLevel};
pub use requests::{BatchPredictionRequest, MAX_BATCH_SIZE};
pub use responses::{
    RiskPrediction, PredictionSummary, PredictionResult, SinglePredictionResponse,
    BatchPatientResult, BatchStatistics, BatchResult, HealthStatus, ServiceStatus,
    LocSegment, ValidationDetail, ValidationErrorBody, ErrorBody,
};
