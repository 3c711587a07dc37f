//! Risk model collaborator.
//!
//! The model is an externally trained artifact; the core only calls
//! `predict` and `coefficients`. The shipped implementation is a linear
//! regression over standard-scaled features, loaded from a JSON file
//! exported by the training pipeline.

use std::path::Path;

use serde::Deserialize;

use crate::models::assessment::RiskLevel;

/// Feature order the model was trained on.
pub const FEATURE_NAMES: [&str; 5] = ["sleep", "activity", "social", "stress", "academics"];

pub trait RiskModel: Send + Sync {
    /// Deterministic score for `[sleep, activity, social, stress, academics]`.
    fn predict(&self, features: &[f64; 5]) -> f64;
    /// Raw model coefficients, used for the influence display.
    fn coefficients(&self) -> [f64; 5];
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    coefficients: [f64; 5],
    intercept: f64,
    /// Standard-scaler parameters captured at training time.
    feature_means: [f64; 5],
    feature_scales: [f64; 5],
}

impl LinearModel {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("Failed to read model artifact {:?}: {}", path.as_ref(), e)
        })?;
        let model: LinearModel = serde_json::from_str(&raw)?;
        Ok(model)
    }

    #[cfg(test)]
    pub fn for_tests(coefficients: [f64; 5], intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            feature_means: [0.0; 5],
            feature_scales: [1.0; 5],
        }
    }
}

impl RiskModel for LinearModel {
    fn predict(&self, features: &[f64; 5]) -> f64 {
        self.coefficients
            .iter()
            .zip(features.iter())
            .zip(self.feature_means.iter().zip(self.feature_scales.iter()))
            .map(|((coef, x), (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                coef * ((x - mean) / scale)
            })
            .sum::<f64>()
            + self.intercept
    }

    fn coefficients(&self) -> [f64; 5] {
        self.coefficients
    }
}

/// Normalizes coefficients to [-1, 1] by the largest magnitude, for the
/// "what influenced your score" display.
pub fn influences(coefficients: &[f64; 5]) -> [f64; 5] {
    let max_abs = coefficients
        .iter()
        .map(|c| c.abs())
        .fold(0.0_f64, f64::max);
    let max_abs = if max_abs == 0.0 { 1.0 } else { max_abs };
    let mut out = [0.0; 5];
    for (slot, coef) in out.iter_mut().zip(coefficients.iter()) {
        *slot = coef / max_abs;
    }
    out
}

/// Personalized guidance derived from the submitted metrics and the
/// resulting classification. Thresholds match the advisory copy the portal
/// has always shown.
pub fn recommendations(features: &[f64; 5], level: RiskLevel) -> Vec<String> {
    let [sleep, activity, social, stress, academics] = *features;
    let mut recs = Vec::new();

    if sleep < 6.0 {
        recs.push("Sleep: aim for 7-8 hours per night.".to_string());
    }
    if sleep < 4.0 {
        recs.push(
            "Severe sleep deprivation: contact the Dean of Students immediately.".to_string(),
        );
    }
    if activity < 3.0 {
        recs.push("Activity: start with 15-minute walks daily.".to_string());
    }
    if social < 4.0 {
        recs.push("Social: reach out to a friend or student group.".to_string());
    }
    if stress > 7.0 {
        recs.push("Stress: contact the Dean of Students office for support.".to_string());
    }
    if academics < 65.0 {
        recs.push("Academics: visit the Academic Support Centre.".to_string());
    }

    if recs.is_empty() {
        match level {
            RiskLevel::Low => recs.push("Great job! Keep it up.".to_string()),
            RiskLevel::High => {
                recs.push("Please contact the Dean of Students for support.".to_string())
            }
        }
    }

    recs
}
