//! Append-only storage for completed risk assessments.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assessment::Assessment;

pub async fn insert_assessment(
    pool: &PgPool,
    assessment: &Assessment,
) -> Result<Assessment, AppError> {
    let record = sqlx::query_as::<_, Assessment>(
        r#"
        INSERT INTO assessments
            (id, user_id, recorded_at, sleep, activity, social, stress, academics,
             mood_comment, risk_score, risk_level)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, user_id, recorded_at, sleep, activity, social, stress, academics,
                  mood_comment, risk_score, risk_level
        "#,
    )
    .bind(assessment.id)
    .bind(assessment.user_id)
    .bind(assessment.recorded_at)
    .bind(assessment.sleep)
    .bind(assessment.activity)
    .bind(assessment.social)
    .bind(assessment.stress)
    .bind(assessment.academics)
    .bind(&assessment.mood_comment)
    .bind(assessment.risk_score)
    .bind(assessment.risk_level)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// History for the trend view, oldest first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Assessment>, AppError> {
    let rows = sqlx::query_as::<_, Assessment>(
        r#"
        SELECT id, user_id, recorded_at, sleep, activity, social, stress, academics,
               mood_comment, risk_score, risk_level
        FROM assessments
        WHERE user_id = $1
        ORDER BY recorded_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Bulk privacy purge. There is deliberately no single-row delete.
pub async fn delete_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM assessments WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
