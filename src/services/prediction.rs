use crate::core::{aggregate, batch_statistics, reclassify, to_wire};
use crate::models::{
    BatchPredictionRequest, BatchResult, ClinicalInput, HealthStatus, PredictionResult,
    PredictionSummary, RiskPrediction, RiskType, SinglePredictionResponse, WirePatient,
    MAX_BATCH_SIZE,
};
use crate::services::errors::{classify_status, classify_transport, ClientError};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_BASE_URL: &str = "https://aluna-api.deployhero.dev";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Where risk levels and summaries come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationMode {
    /// Use the levels and summary exactly as the service returns them
    #[default]
    TrustServer,
    /// Re-derive levels from probabilities and rebuild summaries locally
    RecomputeLocally,
}

/// Immutable client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub classification: ClassificationMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            classification: ClassificationMode::default(),
        }
    }
}

/// Client for the obstetric risk prediction service
///
/// Every call is a single attempt bounded by the configured timeout; failures
/// are classified into [`ClientError`]. The client is cheap to clone and holds
/// no mutable state, so calls may run concurrently.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    base_url: String,
    timeout: Duration,
    classification: ClassificationMode,
    client: Client,
}

impl PredictionClient {
    /// Create a new client with its own connection pool
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::RequestSetup(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_http_client(config, client)
    }

    /// Create a client on top of an existing `reqwest::Client`
    pub fn with_http_client(config: ClientConfig, client: Client) -> Result<Self, ClientError> {
        Url::parse(&config.base_url).map_err(|e| {
            ClientError::RequestSetup(format!("Invalid base URL {:?}: {}", config.base_url, e))
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            classification: config.classification,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn classification(&self) -> ClassificationMode {
        self.classification
    }

    /// Query service liveness and loaded models
    ///
    /// GET /health
    pub async fn health_check(&self) -> Result<HealthStatus, ClientError> {
        let health: HealthStatus = self.execute(self.request(Method::GET, "/health")).await?;

        tracing::debug!(
            "Health check: {:?}, {} models loaded",
            health.status,
            health.models_loaded
        );

        Ok(health)
    }

    /// Predict every risk type for one patient
    ///
    /// POST /api/v1/predictions/predict
    pub async fn predict_all(&self, patient: &WirePatient) -> Result<PredictionResult, ClientError> {
        check_patient(patient)?;

        let request = self
            .request(Method::POST, "/api/v1/predictions/predict")
            .json(patient);
        let mut result: PredictionResult = self.execute(request).await?;

        if self.classification == ClassificationMode::RecomputeLocally {
            recompute(&mut result.predictions, &mut result.summary);
        }

        Ok(result)
    }

    /// Predict a single risk type for one patient
    ///
    /// POST /api/v1/predictions/predict/{risk_type}
    pub async fn predict_one(
        &self,
        risk_type: RiskType,
        patient: &WirePatient,
    ) -> Result<RiskPrediction, ClientError> {
        check_patient(patient)?;

        let path = format!("/api/v1/predictions/predict/{}", risk_type.as_str());
        let request = self.request(Method::POST, &path).json(patient);
        let response: SinglePredictionResponse = self.execute(request).await?;

        let mut prediction = response.prediction;
        if prediction.risk_type != risk_type {
            return Err(ClientError::InvalidResponse(format!(
                "Requested {} prediction but received {}",
                risk_type, prediction.risk_type
            )));
        }

        if self.classification == ClassificationMode::RecomputeLocally && reclassify(&mut prediction) {
            tracing::warn!(
                "Service risk level for {} disagreed with probability {}, using {}",
                risk_type,
                prediction.probability,
                prediction.risk_level
            );
        }

        Ok(prediction)
    }

    /// Predict every risk type for up to [`MAX_BATCH_SIZE`] patients
    ///
    /// POST /api/v1/predictions/batch
    ///
    /// Oversized batches fail before any request is sent.
    pub async fn predict_batch(&self, patients: &[WirePatient]) -> Result<BatchResult, ClientError> {
        if patients.len() > MAX_BATCH_SIZE {
            return Err(ClientError::BatchTooLarge {
                size: patients.len(),
                max: MAX_BATCH_SIZE,
            });
        }

        for (index, patient) in patients.iter().enumerate() {
            check_patient(patient).map_err(|e| match e {
                ClientError::RequestSetup(msg) => {
                    ClientError::RequestSetup(format!("Patient {}: {}", index, msg))
                }
                other => other,
            })?;
        }

        let body = BatchPredictionRequest {
            patients: patients.to_vec(),
        };
        let request = self
            .request(Method::POST, "/api/v1/predictions/batch")
            .json(&body);
        let mut batch: BatchResult = self.execute(request).await?;

        if self.classification == ClassificationMode::RecomputeLocally {
            for result in &mut batch.results {
                recompute(&mut result.predictions, &mut result.summary);
            }
            batch.statistics = batch_statistics(&batch.results);
        }

        tracing::debug!(
            "Batch of {} patients: {} urgent cases",
            batch.statistics.total_patients,
            batch.statistics.urgent_cases
        );

        Ok(batch)
    }

    /// Transcode canonical input and predict every risk type
    pub async fn predict_input(&self, input: &ClinicalInput) -> Result<PredictionResult, ClientError> {
        self.predict_all(&to_wire(input)).await
    }

    /// Transcode canonical inputs and run them as one batch
    pub async fn predict_batch_inputs(&self, inputs: &[ClinicalInput]) -> Result<BatchResult, ClientError> {
        let patients: Vec<WirePatient> = inputs.iter().map(to_wire).collect();
        self.predict_batch(&patients).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .timeout(self.timeout)
    }

    /// Send a request and decode a success body, classifying every failure
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request_id = Uuid::new_v4().to_string();
        let request = request.header(REQUEST_ID_HEADER, &request_id);

        let response = request.send().await.map_err(|e| {
            let err = classify_transport(&e);
            tracing::warn!("Request {} failed before a response: {}", request_id, e);
            err
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        tracing::debug!("Request {} to {} returned {}", request_id, url, status);

        let body = response.text().await.map_err(|e| classify_transport(&e))?;

        if !status.is_success() {
            let err = classify_status(status, &body);
            tracing::warn!("Request {} to {} failed: {}", request_id, url, err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Request {} returned an unreadable body: {}", request_id, e);
            ClientError::InvalidResponse(e.to_string())
        })
    }
}

/// Range and flag checks on the wire payload, so a known-invalid patient is never sent
fn check_patient(patient: &WirePatient) -> Result<(), ClientError> {
    patient
        .validate()
        .map_err(|errors| ClientError::RequestSetup(format!("Patient fails range checks: {}", errors)))
}

fn recompute(predictions: &mut [RiskPrediction], summary: &mut PredictionSummary) {
    for prediction in predictions.iter_mut() {
        if reclassify(prediction) {
            tracing::warn!(
                "Service risk level for {} disagreed with probability {}, using {}",
                prediction.risk_type,
                prediction.probability,
                prediction.risk_level
            );
        }
    }

    let local = aggregate(predictions);
    if local != *summary {
        tracing::warn!("Service summary differs from local aggregation, using local summary");
    }
    *summary = local;
}
