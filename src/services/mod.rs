// Service exports
pub mod errors;
pub mod prediction;

pub use errors::{classify_status, classify_transport, ClientError, FieldIssue, SERVER_ERROR_MESSAGE};
pub use prediction::{ClassificationMode, ClientConfig, PredictionClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
