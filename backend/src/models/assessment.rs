//! Models for risk assessments: stored rows, submission payloads, and the
//! responses built for the trend views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Scores at or above this are classified High risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Immutable record of one completed risk check.
pub struct Assessment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub sleep: f64,
    pub activity: f64,
    pub social: f64,
    pub stress: f64,
    pub academics: f64,
    pub mood_comment: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// Pure function of the score and the fixed 0.4 threshold.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Low => "low",
        }
    }
}

impl Serialize for RiskLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "high" | "High" => Ok(RiskLevel::High),
            "low" | "Low" => Ok(RiskLevel::Low),
            other => Err(serde::de::Error::unknown_variant(other, &["high", "low"])),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for a risk check. Metric bounds mirror the documented input
/// ranges of the trained model.
pub struct SubmitAssessmentRequest {
    /// Hours of sleep per night.
    #[validate(range(min = 2.0, max = 12.0))]
    pub sleep: f64,
    /// Physical activity, hours per week.
    #[validate(range(min = 0.0, max = 20.0))]
    pub activity: f64,
    /// Social engagement, 0 (isolated) to 10 (very social).
    #[validate(range(min = 0.0, max = 10.0))]
    pub social: f64,
    /// Stress, 0 (relaxed) to 10 (overwhelmed).
    #[validate(range(min = 0.0, max = 10.0))]
    pub stress: f64,
    /// Current semester performance, percent.
    #[validate(range(min = 0.0, max = 100.0))]
    pub academics: f64,
    /// Optional free-text mood note.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub mood_comment: String,
    /// Consent to store the assessment; required before anything persists.
    #[serde(default)]
    pub consent: bool,
}

impl SubmitAssessmentRequest {
    /// Feature vector in the order the model was trained on.
    pub fn features(&self) -> [f64; 5] {
        [
            self.sleep,
            self.activity,
            self.social,
            self.stress,
            self.academics,
        ]
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// How one input feature pushed the score, normalized to [-1, 1].
pub struct FeatureInfluence {
    pub feature: &'static str,
    pub value: f64,
    pub influence: f64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Returned after a risk check: score, classification, and explanations.
pub struct RiskCheckResponse {
    pub assessment_id: Uuid,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub influences: Vec<FeatureInfluence>,
}

#[derive(Debug, Serialize, ToSchema)]
/// One history row for the trend table.
pub struct AssessmentResponse {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub sleep: f64,
    pub activity: f64,
    pub social: f64,
    pub stress: f64,
    pub academics: f64,
    pub mood_comment: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

impl From<Assessment> for AssessmentResponse {
    fn from(a: Assessment) -> Self {
        AssessmentResponse {
            id: a.id,
            recorded_at: a.recorded_at,
            sleep: a.sleep,
            activity: a.activity,
            social: a.social,
            stress: a.stress,
            academics: a.academics,
            mood_comment: a.mood_comment,
            risk_score: a.risk_score,
            risk_level: a.risk_level,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// First-vs-latest risk movement for the history view.
pub struct AssessmentSummary {
    pub count: i64,
    pub first_score: Option<f64>,
    pub latest_score: Option<f64>,
    pub change: Option<f64>,
    pub trend: Option<RiskTrend>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskTrend {
    Improved,
    Increased,
    Stable,
}

impl RiskTrend {
    /// Classifies a first-to-latest score delta at the +/-0.1 boundary.
    pub fn from_change(change: f64) -> Self {
        if change < -0.1 {
            RiskTrend::Improved
        } else if change > 0.1 {
            RiskTrend::Increased
        } else {
            RiskTrend::Stable
        }
    }
}
