use crate::models::{
    BatchPatientResult, BatchStatistics, ConfidenceLevel, PredictionSummary, RiskLevel,
    RiskPrediction,
};

/// Probability thresholds: each band is closed below and open above
const LOW_THRESHOLD: f64 = 0.30;
const MODERATE_THRESHOLD: f64 = 0.50;
const HIGH_THRESHOLD: f64 = 0.70;

const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.60;
const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.80;

/// Map a probability in [0, 1] to its risk band
///
/// | probability    | level      |
/// |----------------|------------|
/// | < 0.30         | `VeryLow`  |
/// | [0.30, 0.50)   | `Low`      |
/// | [0.50, 0.70)   | `Moderate` |
/// | >= 0.70        | `High`     |
#[inline]
pub fn classify_risk_level(probability: f64) -> RiskLevel {
    if probability >= HIGH_THRESHOLD {
        RiskLevel::High
    } else if probability >= MODERATE_THRESHOLD {
        RiskLevel::Moderate
    } else if probability >= LOW_THRESHOLD {
        RiskLevel::Low
    } else {
        RiskLevel::VeryLow
    }
}

/// Map a model confidence score in [0, 1] to its confidence band
#[inline]
pub fn classify_confidence(score: f64) -> ConfidenceLevel {
    if score >= HIGH_CONFIDENCE_THRESHOLD {
        ConfidenceLevel::High
    } else if score >= MEDIUM_CONFIDENCE_THRESHOLD {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Build the cross-risk summary for one patient
///
/// The highest probability wins; on equal probabilities the risk type that
/// comes first in [`crate::models::RiskType::ALL`] is reported. An empty slice
/// yields a very-low summary with no highest risk.
pub fn aggregate(predictions: &[RiskPrediction]) -> PredictionSummary {
    let count = |level: RiskLevel| {
        predictions.iter().filter(|p| p.risk_level == level).count() as u32
    };

    let high_count = count(RiskLevel::High);
    let moderate_count = count(RiskLevel::Moderate);
    let low_count = count(RiskLevel::Low);

    let overall_risk = predictions
        .iter()
        .map(|p| p.risk_level)
        .max()
        .unwrap_or(RiskLevel::VeryLow);

    let highest = predictions.iter().fold(None::<&RiskPrediction>, |best, p| match best {
        Some(b)
            if b.probability > p.probability
                || (b.probability == p.probability && b.risk_type <= p.risk_type) =>
        {
            Some(b)
        }
        _ => Some(p),
    });

    PredictionSummary {
        overall_risk,
        high_count,
        moderate_count,
        low_count,
        requires_special_attention: high_count >= 1,
        highest_risk_type: highest
            .map(|p| p.risk_type.as_str().to_string())
            .unwrap_or_default(),
        highest_probability: highest.map(|p| p.probability).unwrap_or(0.0),
    }
}

/// Re-derive a prediction's risk level from its probability
///
/// Returns `true` when the reported level disagreed and was replaced.
pub fn reclassify(prediction: &mut RiskPrediction) -> bool {
    let level = classify_risk_level(prediction.probability);
    if level == prediction.risk_level {
        return false;
    }
    prediction.risk_level = level;
    true
}

/// Batch-level figures derived from per-patient results
///
/// Band counts sum the per-patient summary counts; a case is urgent when its
/// patient requires special attention.
pub fn batch_statistics(results: &[BatchPatientResult]) -> BatchStatistics {
    results.iter().fold(
        BatchStatistics {
            total_patients: results.len() as u32,
            ..BatchStatistics::default()
        },
        |mut stats, result| {
            stats.high_risks += result.summary.high_count;
            stats.moderate_risks += result.summary.moderate_count;
            stats.low_risks += result.summary.low_count;
            if result.summary.requires_special_attention {
                stats.urgent_cases += 1;
            }
            stats
        },
    )
}
