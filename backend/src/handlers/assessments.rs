//! Risk assessment handlers: submit a check, browse history, summarize the
//! trend, purge everything.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::assessment::{
        Assessment, AssessmentResponse, AssessmentSummary, FeatureInfluence, RiskCheckResponse,
        RiskLevel, RiskTrend, SubmitAssessmentRequest,
    },
    models::user::User,
    repositories::assessment as assessment_repo,
    services::risk::{self, FEATURE_NAMES},
    state::AppState,
};

/// Scores the submitted metrics, persists the result and returns the
/// classification with recommendations and per-feature influences.
pub async fn submit(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<SubmitAssessmentRequest>,
) -> Result<(StatusCode, Json<RiskCheckResponse>), AppError> {
    payload.validate()?;
    if !payload.consent {
        return Err(AppError::BadRequest(
            "Consent is required to record an assessment".to_string(),
        ));
    }

    let features = payload.features();
    let risk_score = state.model.predict(&features);
    let risk_level = RiskLevel::from_score(risk_score);

    let assessment = Assessment {
        id: Uuid::new_v4(),
        user_id: user.id,
        recorded_at: Utc::now(),
        sleep: payload.sleep,
        activity: payload.activity,
        social: payload.social,
        stress: payload.stress,
        academics: payload.academics,
        mood_comment: payload.mood_comment.trim().to_string(),
        risk_score,
        risk_level,
    };
    let assessment = assessment_repo::insert_assessment(&state.pool, &assessment).await?;

    tracing::info!(
        user_id = %user.id,
        risk_level = risk_level.as_str(),
        "Assessment recorded"
    );

    let coefficients = state.model.coefficients();
    let weights = risk::influences(&coefficients);
    let influences = FEATURE_NAMES
        .iter()
        .zip(features.iter().zip(weights.iter()))
        .map(|(name, (value, influence))| FeatureInfluence {
            feature: name,
            value: *value,
            influence: *influence,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(RiskCheckResponse {
            assessment_id: assessment.id,
            risk_score,
            risk_level,
            recommendations: risk::recommendations(&features, risk_level),
            influences,
        }),
    ))
}

/// Full history for the logged-in user, oldest first.
pub async fn history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<AssessmentResponse>>, AppError> {
    let rows = assessment_repo::list_for_user(&state.pool, user.id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// First-vs-latest movement of the risk score.
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<AssessmentSummary>, AppError> {
    let rows = assessment_repo::list_for_user(&state.pool, user.id).await?;
    Ok(Json(summarize(&rows)))
}

/// Deletes every assessment the user has recorded.
pub async fn delete_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let deleted = assessment_repo::delete_all_for_user(&state.pool, user.id).await?;
    tracing::info!(user_id = %user.id, deleted, "Assessment history purged");
    Ok(Json(json!({"message": "History cleared", "deleted": deleted})))
}

fn summarize(rows: &[Assessment]) -> AssessmentSummary {
    let (Some(first), Some(latest)) = (rows.first(), rows.last()) else {
        return AssessmentSummary {
            count: 0,
            first_score: None,
            latest_score: None,
            change: None,
            trend: None,
        };
    };

    let change = latest.risk_score - first.risk_score;
    AssessmentSummary {
        count: rows.len() as i64,
        first_score: Some(first.risk_score),
        latest_score: Some(latest.risk_score),
        change: Some(change),
        trend: Some(RiskTrend::from_change(change)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(score: f64) -> Assessment {
        Assessment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            sleep: 7.0,
            activity: 5.0,
            social: 6.0,
            stress: 3.0,
            academics: 70.0,
            mood_comment: String::new(),
            risk_score: score,
            risk_level: RiskLevel::from_score(score),
        }
    }

    #[test]
    fn summarize_empty_history() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.trend.is_none());
    }

    #[test]
    fn summarize_single_entry_is_stable() {
        let summary = summarize(&[row(0.5)]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.change, Some(0.0));
        assert_eq!(summary.trend, Some(RiskTrend::Stable));
    }

    #[test]
    fn summarize_detects_improvement() {
        let summary = summarize(&[row(0.6), row(0.5), row(0.3)]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.first_score, Some(0.6));
        assert_eq!(summary.latest_score, Some(0.3));
        assert_eq!(summary.trend, Some(RiskTrend::Improved));
    }
}
