use std::collections::BTreeSet;
use crate::core::validation::{validate, validate_all, FieldErrors, NumericField, ValidationError};
use crate::models::ClinicalInput;

/// Text-level state of the patient form.
///
/// Numeric fields are kept as the strings the clinician typed, so transient
/// states such as an empty field mid-edit never reach [`ClinicalInput`].
/// The canonical input is derived on demand with [`RawInputBuffer::to_input`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawInputBuffer {
    maternal_age_years: String,
    parity: String,
    prenatal_controls: String,
    gestational_weeks: String,
    pub previous_hypertension: bool,
    pub gestational_diabetes: bool,
    pub previous_c_section: bool,
    pub multiple_pregnancy: bool,
    touched: BTreeSet<NumericField>,
}

impl Default for RawInputBuffer {
    fn default() -> Self {
        Self {
            maternal_age_years: "28".to_string(),
            parity: "0".to_string(),
            prenatal_controls: "0".to_string(),
            gestational_weeks: "20.0".to_string(),
            previous_hypertension: false,
            gestational_diabetes: false,
            previous_c_section: false,
            multiple_pregnancy: false,
            touched: BTreeSet::new(),
        }
    }
}

impl RawInputBuffer {
    /// Buffer pre-filled from an already valid input, e.g. to edit a previous evaluation
    pub fn from_input(input: &ClinicalInput) -> Self {
        Self {
            maternal_age_years: input.maternal_age_years.to_string(),
            parity: input.parity.to_string(),
            prenatal_controls: input.prenatal_controls.to_string(),
            gestational_weeks: format!("{:.1}", input.gestational_weeks),
            previous_hypertension: input.previous_hypertension,
            gestational_diabetes: input.gestational_diabetes,
            previous_c_section: input.previous_c_section,
            multiple_pregnancy: input.multiple_pregnancy,
            touched: BTreeSet::new(),
        }
    }

    pub fn text(&self, field: NumericField) -> &str {
        match field {
            NumericField::MaternalAgeYears => &self.maternal_age_years,
            NumericField::Parity => &self.parity,
            NumericField::PrenatalControls => &self.prenatal_controls,
            NumericField::GestationalWeeks => &self.gestational_weeks,
        }
    }

    /// Replace the text of a field; called on every keystroke
    pub fn set_text(&mut self, field: NumericField, value: impl Into<String>) {
        let slot = match field {
            NumericField::MaternalAgeYears => &mut self.maternal_age_years,
            NumericField::Parity => &mut self.parity,
            NumericField::PrenatalControls => &mut self.prenatal_controls,
            NumericField::GestationalWeeks => &mut self.gestational_weeks,
        };
        *slot = value.into();
    }

    /// Record that the clinician has interacted with a field
    pub fn mark_touched(&mut self, field: NumericField) {
        self.touched.insert(field);
    }

    pub fn mark_all_touched(&mut self) {
        self.touched.extend(NumericField::ALL);
    }

    pub fn is_touched(&self, field: NumericField) -> bool {
        self.touched.contains(&field)
    }

    /// Validation result for a single field, regardless of touch state
    pub fn field_error(&self, field: NumericField) -> Option<ValidationError> {
        validate(field, self.text(field)).err()
    }

    /// Errors to show while editing: only fields the clinician has touched
    pub fn visible_errors(&self) -> Vec<ValidationError> {
        self.touched
            .iter()
            .filter_map(|field| self.field_error(*field))
            .collect()
    }

    /// Derive the canonical input, or every violation in the form
    pub fn to_input(&self) -> Result<ClinicalInput, FieldErrors> {
        validate_all(self)
    }

    /// Back to the initial form for a new evaluation
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::ValidationErrorKind;

    #[test]
    fn test_default_buffer_is_valid() {
        let input = RawInputBuffer::default().to_input().unwrap();
        assert_eq!(input.maternal_age_years, 28);
        assert_eq!(input.gestational_weeks, 20.0);
    }

    #[test]
    fn test_untouched_errors_hidden() {
        let mut buffer = RawInputBuffer::default();
        buffer.set_text(NumericField::Parity, "");
        buffer.set_text(NumericField::MaternalAgeYears, "99");

        assert!(buffer.visible_errors().is_empty());

        buffer.mark_touched(NumericField::Parity);
        let visible = buffer.visible_errors();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind, ValidationErrorKind::Required);

        // Submission still sees every problem
        assert_eq!(buffer.to_input().unwrap_err().len(), 2);
    }

    #[test]
    fn test_from_input_round_trip() {
        let mut buffer = RawInputBuffer::default();
        buffer.set_text(NumericField::GestationalWeeks, "33");
        buffer.gestational_diabetes = true;
        let input = buffer.to_input().unwrap();

        let rebuilt = RawInputBuffer::from_input(&input);
        assert_eq!(rebuilt.text(NumericField::GestationalWeeks), "33.0");
        assert_eq!(rebuilt.to_input().unwrap(), input);
    }

    #[test]
    fn test_reset() {
        let mut buffer = RawInputBuffer::default();
        buffer.set_text(NumericField::Parity, "3");
        buffer.mark_all_touched();
        buffer.reset();

        assert_eq!(buffer, RawInputBuffer::default());
        assert!(!buffer.is_touched(NumericField::Parity));
    }
}
