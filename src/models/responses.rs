use serde::{Deserialize, Serialize};
use crate::models::domain::{ConfidenceLevel, RiskLevel, RiskType, WirePatient};

/// Prediction for a single risk type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    #[serde(rename = "riesgo")]
    pub risk_type: RiskType,
    /// 0.0 - 1.0
    #[serde(rename = "probabilidad")]
    pub probability: f64,
    #[serde(rename = "nivelRiesgo")]
    pub risk_level: RiskLevel,
    #[serde(rename = "nivelConfianza")]
    pub confidence_level: ConfidenceLevel,
    #[serde(rename = "recomendacion")]
    pub recommendation: String,
}

/// Cross-risk summary for one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    #[serde(rename = "riesgo_general")]
    pub overall_risk: RiskLevel,
    #[serde(rename = "total_riesgos_altos")]
    pub high_count: u32,
    #[serde(rename = "total_riesgos_moderados")]
    pub moderate_count: u32,
    #[serde(rename = "total_riesgos_bajos")]
    pub low_count: u32,
    #[serde(rename = "requiere_atencion_especial")]
    pub requires_special_attention: bool,
    #[serde(rename = "riesgo_mas_alto")]
    pub highest_risk_type: String,
    #[serde(rename = "probabilidad_mas_alta")]
    pub highest_probability: f64,
}

/// Response of the all-risks prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "predicciones")]
    pub predictions: Vec<RiskPrediction>,
    #[serde(rename = "resumen")]
    pub summary: PredictionSummary,
    #[serde(rename = "datosPaciente")]
    pub patient_data: WirePatient,
}

/// Response of the single-risk prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinglePredictionResponse {
    #[serde(flatten)]
    pub prediction: RiskPrediction,
    #[serde(rename = "datosPaciente")]
    pub patient_data: WirePatient,
}

/// Per-patient entry of a batch response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPatientResult {
    #[serde(rename = "id_paciente")]
    pub patient_id: u32,
    #[serde(rename = "predicciones")]
    pub predictions: Vec<RiskPrediction>,
    #[serde(rename = "resumen")]
    pub summary: PredictionSummary,
    #[serde(rename = "datosPaciente")]
    pub patient_data: WirePatient,
}

/// Aggregate figures over a whole batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchStatistics {
    #[serde(rename = "total_pacientes")]
    pub total_patients: u32,
    #[serde(rename = "riesgos_altos")]
    pub high_risks: u32,
    #[serde(rename = "riesgos_moderados")]
    pub moderate_risks: u32,
    #[serde(rename = "riesgos_bajos")]
    pub low_risks: u32,
    #[serde(rename = "casos_urgentes")]
    pub urgent_cases: u32,
}

/// Response of the batch prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(rename = "resultados")]
    pub results: Vec<BatchPatientResult>,
    #[serde(rename = "estadisticas")]
    pub statistics: BatchStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: ServiceStatus,
    pub models_loaded: u32,
    #[serde(default)]
    pub models: Vec<RiskType>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// One segment of a validation error location: an object key or an array index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Key(String),
    Index(u64),
}

impl std::fmt::Display for LocSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocSegment::Key(key) => f.write_str(key),
            LocSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Single entry of a 422 response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub input: Option<serde_json::Value>,
}

/// Error body returned with status 422
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub detail: Vec<ValidationDetail>,
}

/// Error body returned with status 400 and 500
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_prediction_flattened() {
        let body = r#"{
            "riesgo": "hemorragia_posparto",
            "probabilidad": 0.41,
            "nivelRiesgo": "bajo",
            "nivelConfianza": "media",
            "recomendacion": "Seguimiento estándar",
            "datosPaciente": {
                "edadMaterna": 30, "paridad": 2, "controlesPrenatales": 5,
                "semanasGestacion": 37.5, "hipertensionPrevia": 0,
                "diabetesGestacional": 1, "cesareaPrevia": 0, "embarazoMultiple": 0
            }
        }"#;

        let parsed: SinglePredictionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.prediction.risk_type, RiskType::PostpartumHemorrhage);
        assert_eq!(parsed.prediction.risk_level, RiskLevel::Low);
        assert_eq!(parsed.patient_data.diabetes_gestacional, 1);
    }

    #[test]
    fn test_validation_body_mixed_locations() {
        let body = r#"{"detail": [{"loc": ["body", "pacientes", 3, "paridad"], "msg": "too large", "type": "less_than_equal", "input": 25}]}"#;

        let parsed: ValidationErrorBody = serde_json::from_str(body).unwrap();
        let loc = &parsed.detail[0].loc;
        assert_eq!(loc[2], LocSegment::Index(3));
        assert_eq!(loc[3].to_string(), "paridad");
    }

    #[test]
    fn test_health_status() {
        let body = r#"{"status": "healthy", "models_loaded": 3, "models": ["sepsis", "hipertension_gestacional", "hemorragia_posparto"]}"#;

        let health: HealthStatus = serde_json::from_str(body).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.models, RiskType::ALL.to_vec());
    }
}
