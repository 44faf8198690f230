//! Inference contract types.
//!
//! The trained model is an external collaborator. These types describe the
//! record it consumes and the outcome it produces; nothing here validates
//! clinical ranges.

use serde::{Deserialize, Serialize};

use crate::constants::HIGH_RISK_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

/// Patient health parameters fed to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct HealthRecord {
    pub age: u32,
    pub gender: Gender,
    /// Resting blood pressure (mm Hg)
    pub resting_bp: f32,
    /// Serum cholesterol (mg/dl)
    pub serum_cholesterol: f32,
    #[serde(rename = "TRI_GLYCERIDE")]
    pub triglycerides: f32,
    pub ldl: f32,
    pub hdl: f32,
    /// Fasting blood sugar (mg/dl)
    #[serde(rename = "FBS")]
    pub fasting_blood_sugar: f32,
    /// Chest pain type code
    pub chest_pain: u8,
    /// Resting electrocardiogram result code
    pub resting_ecg: u8,
    /// Treadmill stress test result code
    #[serde(rename = "TMT")]
    pub stress_test: u8,
    /// Echocardiogram result code
    pub echo: u8,
    pub max_heart_rate: f32,
}

impl HealthRecord {
    /// Feature names in the order the model was trained on.
    pub const FEATURES: [&'static str; 13] = [
        "AGE",
        "GENDER",
        "RESTING_BP",
        "SERUM_CHOLESTEROL",
        "TRI_GLYCERIDE",
        "LDL",
        "HDL",
        "FBS",
        "CHEST_PAIN",
        "RESTING_ECG",
        "TMT",
        "ECHO",
        "MAX_HEART_RATE",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: f32) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Classifier output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskOutcome {
    /// Probability of heart disease in [0, 1]
    pub probability: f32,
    pub level: RiskLevel,
}

impl RiskOutcome {
    /// Build an outcome from a raw probability, clamped to [0, 1].
    pub fn from_probability(probability: f32) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        Self {
            probability,
            level: RiskLevel::from_probability(probability),
        }
    }

    /// Build an outcome only if `probability` is a finite value in [0, 1].
    pub fn try_from_probability(probability: f32) -> Option<Self> {
        if probability.is_finite() && (0.0..=1.0).contains(&probability) {
            Some(Self::from_probability(probability))
        } else {
            None
        }
    }
}
