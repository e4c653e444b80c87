use serde::{Deserialize, Serialize};
use crate::models::domain::WirePatient;

/// Maximum number of patients accepted by the batch endpoint
pub const MAX_BATCH_SIZE: usize = 100;

/// Request body for the batch prediction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionRequest {
    #[serde(rename = "pacientes")]
    pub patients: Vec<WirePatient>,
}
