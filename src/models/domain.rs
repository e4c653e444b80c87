use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;
use crate::core::validation::has_more_than_one_decimal;

/// Canonical clinical observations for one patient.
///
/// Built by [`crate::core::validation::validate_all`] (through a
/// [`crate::core::form::RawInputBuffer`]) or decoded by
/// [`crate::core::transcode::from_wire`]. Fields are read through accessors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClinicalInput {
    /// 15-60 years
    #[serde(rename = "maternalAgeYears")]
    pub(crate) maternal_age_years: u8,
    /// Prior births, 0-20
    pub(crate) parity: u8,
    /// 0-20
    #[serde(rename = "prenatalControls")]
    pub(crate) prenatal_controls: u8,
    /// 4.0-45.0, one decimal digit at most
    #[serde(rename = "gestationalWeeks")]
    pub(crate) gestational_weeks: f64,
    #[serde(rename = "previousHypertension")]
    pub(crate) previous_hypertension: bool,
    #[serde(rename = "gestationalDiabetes")]
    pub(crate) gestational_diabetes: bool,
    #[serde(rename = "previousCSection")]
    pub(crate) previous_c_section: bool,
    #[serde(rename = "multiplePregnancy")]
    pub(crate) multiple_pregnancy: bool,
}

impl ClinicalInput {
    pub fn maternal_age_years(&self) -> u8 {
        self.maternal_age_years
    }

    pub fn parity(&self) -> u8 {
        self.parity
    }

    pub fn prenatal_controls(&self) -> u8 {
        self.prenatal_controls
    }

    pub fn gestational_weeks(&self) -> f64 {
        self.gestational_weeks
    }

    pub fn previous_hypertension(&self) -> bool {
        self.previous_hypertension
    }

    pub fn gestational_diabetes(&self) -> bool {
        self.gestational_diabetes
    }

    pub fn previous_c_section(&self) -> bool {
        self.previous_c_section
    }

    pub fn multiple_pregnancy(&self) -> bool {
        self.multiple_pregnancy
    }
}

/// Gestational weeks on the wire must be finite with one decimal digit at most
fn validate_gestational_weeks(value: f64) -> Result<(), validator::ValidationError> {
    if !value.is_finite() {
        return Err(validator::ValidationError::new("not_finite"));
    }
    if has_more_than_one_decimal(value) {
        return Err(validator::ValidationError::new("too_many_decimals"));
    }
    Ok(())
}

/// Patient payload in the prediction service's wire format.
///
/// Flags travel as `0` (no) or `1` (yes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct WirePatient {
    #[validate(range(min = 15, max = 60))]
    #[serde(rename = "edadMaterna")]
    pub edad_materna: u8,
    #[validate(range(max = 20))]
    pub paridad: u8,
    #[validate(range(max = 20))]
    #[serde(rename = "controlesPrenatales")]
    pub controles_prenatales: u8,
    #[validate(range(min = 4.0, max = 45.0), custom(function = "validate_gestational_weeks"))]
    #[serde(rename = "semanasGestacion")]
    pub semanas_gestacion: f64,
    #[validate(range(max = 1))]
    #[serde(rename = "hipertensionPrevia")]
    pub hipertension_previa: u8,
    #[validate(range(max = 1))]
    #[serde(rename = "diabetesGestacional")]
    pub diabetes_gestacional: u8,
    #[validate(range(max = 1))]
    #[serde(rename = "cesareaPrevia")]
    pub cesarea_previa: u8,
    #[validate(range(max = 1))]
    #[serde(rename = "embarazoMultiple")]
    pub embarazo_multiple: u8,
}

/// Obstetric risks the service can predict, in their fixed reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskType {
    #[serde(rename = "sepsis")]
    Sepsis,
    #[serde(rename = "hipertension_gestacional")]
    GestationalHypertension,
    #[serde(rename = "hemorragia_posparto")]
    PostpartumHemorrhage,
}

impl RiskType {
    pub const ALL: [RiskType; 3] = [
        RiskType::Sepsis,
        RiskType::GestationalHypertension,
        RiskType::PostpartumHemorrhage,
    ];

    /// Identifier used in URLs and response bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::Sepsis => "sepsis",
            RiskType::GestationalHypertension => "hipertension_gestacional",
            RiskType::PostpartumHemorrhage => "hemorragia_posparto",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskType::Sepsis => "Sepsis",
            RiskType::GestationalHypertension => "Gestational hypertension",
            RiskType::PostpartumHemorrhage => "Postpartum hemorrhage",
        }
    }
}

impl fmt::Display for RiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskType::ALL
            .into_iter()
            .find(|risk| risk.as_str() == s)
            .ok_or_else(|| format!("unknown risk type: {}", s))
    }
}

/// Discretized probability band.
///
/// Variants are declared lowest first so that `Ord` follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "muy_bajo")]
    VeryLow,
    #[serde(rename = "bajo")]
    Low,
    #[serde(rename = "moderado")]
    Moderate,
    #[serde(rename = "alto")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "muy_bajo",
            RiskLevel::Low => "bajo",
            RiskLevel::Moderate => "moderado",
            RiskLevel::High => "alto",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very low",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "muy_bajo" => Ok(RiskLevel::VeryLow),
            "bajo" => Ok(RiskLevel::Low),
            "moderado" => Ok(RiskLevel::Moderate),
            "alto" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {}", other)),
        }
    }
}

/// Discretized model certainty, independent of the risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "baja")]
    Low,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "baja",
            ConfidenceLevel::Medium => "media",
            ConfidenceLevel::High => "alta",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::High => "High",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baja" => Ok(ConfidenceLevel::Low),
            "media" => Ok(ConfidenceLevel::Medium),
            "alta" => Ok(ConfidenceLevel::High),
            other => Err(format!("unknown confidence level: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_patient() -> WirePatient {
        WirePatient {
            edad_materna: 28,
            paridad: 1,
            controles_prenatales: 8,
            semanas_gestacion: 39.0,
            hipertension_previa: 0,
            diabetes_gestacional: 0,
            cesarea_previa: 1,
            embarazo_multiple: 0,
        }
    }

    #[test]
    fn test_wire_patient_field_names() {
        let json = serde_json::to_value(wire_patient()).unwrap();

        assert_eq!(json["edadMaterna"], 28);
        assert_eq!(json["controlesPrenatales"], 8);
        assert_eq!(json["semanasGestacion"], 39.0);
        assert_eq!(json["cesareaPrevia"], 1);
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_wire_patient_validation() {
        assert!(wire_patient().validate().is_ok());

        let mut flag_out_of_range = wire_patient();
        flag_out_of_range.embarazo_multiple = 2;
        assert!(flag_out_of_range.validate().is_err());

        let mut two_decimals = wire_patient();
        two_decimals.semanas_gestacion = 20.05;
        assert!(two_decimals.validate().is_err());

        let mut not_a_number = wire_patient();
        not_a_number.semanas_gestacion = f64::NAN;
        assert!(not_a_number.validate().is_err());

        let mut too_young = wire_patient();
        too_young.edad_materna = 14;
        assert!(too_young.validate().is_err());
    }

    #[test]
    fn test_risk_type_wire_names() {
        for risk in RiskType::ALL {
            let json = serde_json::to_string(&risk).unwrap();
            assert_eq!(json, format!("\"{}\"", risk.as_str()));
            assert_eq!(risk.as_str().parse::<RiskType>().unwrap(), risk);
        }
        assert!("preeclampsia".parse::<RiskType>().is_err());
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::High > RiskLevel::Moderate);
        assert!(RiskLevel::Moderate > RiskLevel::Low);
        assert!(RiskLevel::Low > RiskLevel::VeryLow);
    }

    #[test]
    fn test_level_wire_names() {
        let level: RiskLevel = serde_json::from_str("\"muy_bajo\"").unwrap();
        assert_eq!(level, RiskLevel::VeryLow);

        let confidence: ConfidenceLevel = serde_json::from_str("\"alta\"").unwrap();
        assert_eq!(confidence, ConfidenceLevel::High);
        assert_eq!("media".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::Medium);
    }
}
