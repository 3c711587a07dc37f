//! OTP issuance and verification engine.
//!
//! Issuing replaces any prior unconsumed code for the email (the otp_codes
//! table is keyed by address); verification consumes atomically, so a code
//! redeems at most once even under concurrent attempts.

use chrono::{Duration, Utc};
use rand::{rngs::OsRng, Rng};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::otp::OTP_CODE_LEN;
use crate::repositories::otp as otp_repo;

/// Generates a cryptographically random 6-digit code, zero-padded.
pub fn generate_code() -> String {
    let n: u32 = OsRng.gen_range(0..1_000_000);
    format!("{:0width$}", n, width = OTP_CODE_LEN)
}

/// Issues a fresh code for `email`, superseding any earlier one, valid for
/// `ttl_minutes` from now. Returns the plaintext code for delivery.
pub async fn issue(pool: &PgPool, email: &str, ttl_minutes: i64) -> Result<String, AppError> {
    let code = generate_code();
    let expires_at = Utc::now() + Duration::minutes(ttl_minutes);

    otp_repo::upsert_code(pool, email, &code, expires_at).await?;
    tracing::debug!(email, "Issued password reset code");

    Ok(code)
}

/// Redeems `submitted` for `email`. Succeeds at most once per issued code;
/// any failure (no code, wrong code, expired, already consumed) is reported
/// identically as `false`.
pub async fn verify(pool: &PgPool, email: &str, submitted: &str) -> Result<bool, AppError> {
    if submitted.len() != OTP_CODE_LEN || !submitted.chars().all(|c| c.is_ascii_digit()) {
        return Ok(false);
    }

    otp_repo::consume_code(pool, email, submitted, Utc::now()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_ascii_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn generated_codes_vary() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate_code()).collect();
        // 50 draws from a million values colliding down to one is not credible.
        assert!(codes.len() > 1);
    }
}
