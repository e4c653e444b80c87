use crate::models::{ClinicalInput, WirePatient};

#[inline]
fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// Convert canonical input into the service's wire format
///
/// No validation happens here; `input` is assumed to be in domain.
pub fn to_wire(input: &ClinicalInput) -> WirePatient {
    WirePatient {
        edad_materna: input.maternal_age_years,
        paridad: input.parity,
        controles_prenatales: input.prenatal_controls,
        semanas_gestacion: input.gestational_weeks,
        hipertension_previa: flag(input.previous_hypertension),
        diabetes_gestacional: flag(input.gestational_diabetes),
        cesarea_previa: flag(input.previous_c_section),
        embarazo_multiple: flag(input.multiple_pregnancy),
    }
}

/// Convert a wire patient back to canonical input for display
pub fn from_wire(patient: &WirePatient) -> ClinicalInput {
    ClinicalInput {
        maternal_age_years: patient.edad_materna,
        parity: patient.paridad,
        prenatal_controls: patient.controles_prenatales,
        gestational_weeks: patient.semanas_gestacion,
        previous_hypertension: patient.hipertension_previa != 0,
        gestational_diabetes: patient.diabetes_gestacional != 0,
        previous_c_section: patient.cesarea_previa != 0,
        multiple_pregnancy: patient.embarazo_multiple != 0,
    }
}

impl From<&ClinicalInput> for WirePatient {
    fn from(input: &ClinicalInput) -> Self {
        to_wire(input)
    }
}

impl From<&WirePatient> for ClinicalInput {
    fn from(patient: &WirePatient) -> Self {
        from_wire(patient)
    }
}
