//! Storage for one-time passcodes.
//!
//! The table is keyed by email, so `upsert_code` atomically supersedes any
//! earlier code for the address, and `consume_code` is a single row-locked
//! UPDATE. Two concurrent verification attempts for the same email serialize
//! on that row; only one can observe the code unconsumed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::otp::OtpCode;

pub async fn upsert_code(
    pool: &PgPool,
    email: &str,
    code: &str,
    expires_at: DateTime<Utc>,
) -> Result<OtpCode, AppError> {
    let now = Utc::now();

    let record = sqlx::query_as::<_, OtpCode>(
        r#"
        INSERT INTO otp_codes (email, code, created_at, expires_at, consumed)
        VALUES ($1, $2, $3, $4, FALSE)
        ON CONFLICT (email) DO UPDATE
        SET code = EXCLUDED.code,
            created_at = EXCLUDED.created_at,
            expires_at = EXCLUDED.expires_at,
            consumed = FALSE
        RETURNING email, code, created_at, expires_at, consumed
        "#,
    )
    .bind(email)
    .bind(code)
    .bind(now)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// Marks the matching code consumed and reports whether anything matched.
///
/// The match requires the exact code, unconsumed, and unexpired at `now`;
/// the caller learns only success or failure, never which condition failed.
pub async fn consume_code(
    pool: &PgPool,
    email: &str,
    code: &str,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE otp_codes
        SET consumed = TRUE
        WHERE email = $1
          AND code = $2
          AND consumed = FALSE
          AND expires_at >= $3
        "#,
    )
    .bind(email)
    .bind(code)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Storage hygiene only; expiry is enforced at verification time.
pub async fn delete_expired_codes(pool: &PgPool) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM otp_codes
        WHERE expires_at < $1
        "#,
    )
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
