use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use crate::core::form::RawInputBuffer;
use crate::models::ClinicalInput;

/// Numeric clinical fields, the only ones that need validation.
///
/// Flags are plain `bool`s in [`RawInputBuffer`] and cannot hold an invalid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    MaternalAgeYears,
    Parity,
    PrenatalControls,
    GestationalWeeks,
}

impl NumericField {
    pub const ALL: [NumericField; 4] = [
        NumericField::MaternalAgeYears,
        NumericField::Parity,
        NumericField::PrenatalControls,
        NumericField::GestationalWeeks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericField::MaternalAgeYears => "maternalAgeYears",
            NumericField::Parity => "parity",
            NumericField::PrenatalControls => "prenatalControls",
            NumericField::GestationalWeeks => "gestationalWeeks",
        }
    }

    /// Inclusive domain of the field
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            NumericField::MaternalAgeYears => (15.0, 60.0),
            NumericField::Parity => (0.0, 20.0),
            NumericField::PrenatalControls => (0.0, 20.0),
            NumericField::GestationalWeeks => (4.0, 45.0),
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, NumericField::GestationalWeeks)
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The bound a value fell outside of
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeBound {
    Lower(f64),
    Upper(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationErrorKind {
    #[error("a value is required")]
    Required,

    #[error("must be a number")]
    NotANumber,

    #[error("must be a whole number")]
    MustBeInteger,

    #[error("{}", out_of_range_message(.0))]
    OutOfRange(RangeBound),

    #[error("at most one decimal digit is allowed")]
    TooManyDecimals,
}

fn out_of_range_message(bound: &RangeBound) -> String {
    match bound {
        RangeBound::Lower(min) => format!("must be at least {}", min),
        RangeBound::Upper(max) => format!("must be at most {}", max),
    }
}

/// A single field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{field}: {kind}")]
pub struct ValidationError {
    pub field: NumericField,
    pub kind: ValidationErrorKind,
}

/// Canonical value of a numeric field after validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanonicalValue {
    Integer(u8),
    Decimal(f64),
}

/// Every violation found in a form, keyed by field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldErrors(BTreeMap<NumericField, ValidationError>);

impl FieldErrors {
    pub fn get(&self, field: NumericField) -> Option<&ValidationError> {
        self.0.get(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.values()
    }

    fn insert(&mut self, error: ValidationError) {
        self.0.insert(error.field, error);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.values().map(|e| e.to_string()).collect();
        write!(f, "invalid clinical input: {}", messages.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Validate and canonicalize one numeric field from its text form
///
/// Checks, in order: presence, numeric parse, integrality (integer fields) or
/// one-decimal precision (gestational weeks), then the inclusive domain.
pub fn validate(field: NumericField, raw: &str) -> Result<CanonicalValue, ValidationError> {
    let fail = |kind| ValidationError { field, kind };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(fail(ValidationErrorKind::Required));
    }

    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| fail(ValidationErrorKind::NotANumber))?;

    if field.is_integer() {
        if value.fract() != 0.0 {
            return Err(fail(ValidationErrorKind::MustBeInteger));
        }
    } else if has_more_than_one_decimal(value) {
        return Err(fail(ValidationErrorKind::TooManyDecimals));
    }

    let (min, max) = field.bounds();
    if value < min {
        return Err(fail(ValidationErrorKind::OutOfRange(RangeBound::Lower(min))));
    }
    if value > max {
        return Err(fail(ValidationErrorKind::OutOfRange(RangeBound::Upper(max))));
    }

    if field.is_integer() {
        // Domain check above keeps the value within 0..=60
        Ok(CanonicalValue::Integer(value as u8))
    } else {
        Ok(CanonicalValue::Decimal((value * 10.0).round() / 10.0))
    }
}

/// Scaling by ten must land on a whole number; the tolerance absorbs binary
/// representation error such as `39.7 * 10.0`.
#[inline]
pub(crate) fn has_more_than_one_decimal(value: f64) -> bool {
    let scaled = value * 10.0;
    (scaled.round() - scaled).abs() > 1e-9
}

/// Validate the whole form at once
///
/// Returns the canonical input, or every violation found (not just the first).
pub fn validate_all(buffer: &RawInputBuffer) -> Result<ClinicalInput, FieldErrors> {
    let mut errors = FieldErrors::default();
    let mut integer = |field: NumericField| match validate(field, buffer.text(field)) {
        Ok(CanonicalValue::Integer(v)) => Some(v),
        Ok(CanonicalValue::Decimal(_)) => None,
        Err(e) => {
            errors.insert(e);
            None
        }
    };

    let maternal_age_years = integer(NumericField::MaternalAgeYears);
    let parity = integer(NumericField::Parity);
    let prenatal_controls = integer(NumericField::PrenatalControls);

    let gestational_weeks = match validate(
        NumericField::GestationalWeeks,
        buffer.text(NumericField::GestationalWeeks),
    ) {
        Ok(CanonicalValue::Decimal(v)) => Some(v),
        Ok(CanonicalValue::Integer(_)) => None,
        Err(e) => {
            errors.insert(e);
            None
        }
    };

    match (maternal_age_years, parity, prenatal_controls, gestational_weeks) {
        (Some(maternal_age_years), Some(parity), Some(prenatal_controls), Some(gestational_weeks))
            if errors.is_empty() =>
        {
            Ok(ClinicalInput {
                maternal_age_years,
                parity,
                prenatal_controls,
                gestational_weeks,
                previous_hypertension: buffer.previous_hypertension,
                gestational_diabetes: buffer.gestational_diabetes,
                previous_c_section: buffer.previous_c_section,
                multiple_pregnancy: buffer.multiple_pregnancy,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_required() {
        let err = validate(NumericField::Parity, "  ").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Required);
        assert_eq!(err.field, NumericField::Parity);
    }

    #[test]
    fn test_not_a_number() {
        for raw in ["abc", "12a", "NaN", "inf"] {
            let err = validate(NumericField::MaternalAgeYears, raw).unwrap_err();
            assert_eq!(err.kind, ValidationErrorKind::NotANumber, "input {:?}", raw);
        }
    }

    #[test]
    fn test_integer_fields_reject_fractions() {
        let err = validate(NumericField::PrenatalControls, "4.5").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MustBeInteger);

        // A whole number written with a decimal point is still integral
        assert_eq!(
            validate(NumericField::PrenatalControls, "4.0").unwrap(),
            CanonicalValue::Integer(4)
        );
    }

    #[test]
    fn test_out_of_range_carries_bound() {
        let low = validate(NumericField::MaternalAgeYears, "14").unwrap_err();
        assert_eq!(low.kind, ValidationErrorKind::OutOfRange(RangeBound::Lower(15.0)));

        let high = validate(NumericField::Parity, "21").unwrap_err();
        assert_eq!(high.kind, ValidationErrorKind::OutOfRange(RangeBound::Upper(20.0)));

        let negative = validate(NumericField::Parity, "-1").unwrap_err();
        assert_eq!(negative.kind, ValidationErrorKind::OutOfRange(RangeBound::Lower(0.0)));
    }

    #[test]
    fn test_gestational_weeks_precision() {
        assert_eq!(
            validate(NumericField::GestationalWeeks, "39.7").unwrap(),
            CanonicalValue::Decimal(39.7)
        );
        assert_eq!(
            validate(NumericField::GestationalWeeks, "4").unwrap(),
            CanonicalValue::Decimal(4.0)
        );

        let err = validate(NumericField::GestationalWeeks, "20.05").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooManyDecimals);
    }

    #[test]
    fn test_error_messages() {
        let err = validate(NumericField::MaternalAgeYears, "61").unwrap_err();
        assert_eq!(err.to_string(), "maternalAgeYears: must be at most 60");
    }

    #[test]
    fn test_validate_all_collects_every_error() {
        let mut buffer = RawInputBuffer::default();
        buffer.set_text(NumericField::MaternalAgeYears, "");
        buffer.set_text(NumericField::Parity, "2.5");
        buffer.set_text(NumericField::GestationalWeeks, "50");

        let errors = validate_all(&buffer).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get(NumericField::MaternalAgeYears).unwrap().kind,
            ValidationErrorKind::Required
        );
        assert_eq!(
            errors.get(NumericField::Parity).unwrap().kind,
            ValidationErrorKind::MustBeInteger
        );
        assert!(errors.get(NumericField::PrenatalControls).is_none());
        assert_eq!(
            errors.get(NumericField::GestationalWeeks).unwrap().kind,
            ValidationErrorKind::OutOfRange(RangeBound::Upper(45.0))
        );
    }

    #[test]
    fn test_validate_all_success() {
        let mut buffer = RawInputBuffer::default();
        buffer.set_text(NumericField::GestationalWeeks, "38.5");
        buffer.previous_c_section = true;

        let input = validate_all(&buffer).unwrap();

        assert_eq!(input.maternal_age_years, 28);
        assert_eq!(input.parity, 0);
        assert_eq!(input.gestational_weeks, 38.5);
        assert!(input.previous_c_section);
        assert!(!input.multiple_pregnancy);
    }
}
