// Core pipeline exports
pub mod classifier;
pub mod form;
pub mod transcode;
pub mod validation;

pub use classifier::{aggregate, batch_statistics, classify_confidence, classify_risk_level, reclassify};
pub use form::RawInputBuffer;
pub use transcode::{from_wire, to_wire};
pub use validation::{
    validate, validate_all, CanonicalValue, FieldErrors, NumericField, RangeBound,
    ValidationError, ValidationErrorKind,
};
