use aluna_risk::config::Settings;
use aluna_risk::core::{NumericField, RawInputBuffer};
use aluna_risk::{ClientError, ClinicalInput, PredictionClient, PredictionResult};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Reference patients used to exercise the prediction endpoint
fn reference_patients() -> Vec<(&'static str, RawInputBuffer)> {
    let mut low_risk = RawInputBuffer::default();
    low_risk.set_text(NumericField::Parity, "1");
    low_risk.set_text(NumericField::PrenatalControls, "8");
    low_risk.set_text(NumericField::GestationalWeeks, "39.0");

    let mut high_risk = RawInputBuffer::default();
    high_risk.set_text(NumericField::MaternalAgeYears, "35");
    high_risk.set_text(NumericField::Parity, "2");
    high_risk.set_text(NumericField::PrenatalControls, "6");
    high_risk.set_text(NumericField::GestationalWeeks, "38.0");
    high_risk.previous_hypertension = true;
    high_risk.previous_c_section = true;

    vec![("low-risk", low_risk), ("high-risk", high_risk)]
}

fn log_result(name: &str, result: &PredictionResult) {
    for prediction in &result.predictions {
        info!(
            "[{}] {}: {:.1}% ({}, confidence {})",
            name,
            prediction.risk_type.label(),
            prediction.probability * 100.0,
            prediction.risk_level.label(),
            prediction.confidence_level.label()
        );
    }

    let summary = &result.summary;
    info!(
        "[{}] overall {} - high: {}, moderate: {}, low: {}, special attention: {}",
        name,
        summary.overall_risk.label(),
        summary.high_count,
        summary.moderate_count,
        summary.low_count,
        summary.requires_special_attention
    );
}

/// Validate every reference patient up front; one invalid patient fails the run
fn prepare(
    patients: Vec<(&'static str, RawInputBuffer)>,
) -> Result<Vec<(&'static str, ClinicalInput)>, ClientError> {
    patients
        .into_iter()
        .map(|(name, buffer)| {
            buffer.to_input().map(|input| (name, input)).map_err(|e| {
                ClientError::RequestSetup(format!("Reference patient {} is invalid: {}", name, e))
            })
        })
        .collect()
}

async fn run(client: &PredictionClient) -> Result<(), ClientError> {
    let patients = prepare(reference_patients())?;

    let health = client.health_check().await?;
    info!(
        "Service status: {:?} ({} models loaded)",
        health.status, health.models_loaded
    );

    for (name, input) in patients {
        let result = client.predict_input(&input).await?;
        log_result(name, &result);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }

    info!("Checking prediction service at {}", settings.api.base_url);

    let client = match PredictionClient::new(settings.api.client_config()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create prediction client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&client).await {
        Ok(()) => {
            info!("Prediction service check completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Prediction service check failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
