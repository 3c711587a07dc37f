//! Models for one-time passcodes and the password-reset payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Number of digits in an issued code.
pub const OTP_CODE_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// A single-use verification code bound to an email address.
///
/// `email` is the table's primary key: issuing a new code for an address
/// replaces whatever code was there before, so at most one code per address
/// can ever verify.
pub struct OtpCode {
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Payload that kicks off OTP delivery for a reset.
pub struct SendOtpRequest {
    /// Registration number or student email.
    pub identifier: String,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Payload completing a password reset from the verify stage.
pub struct ResetPasswordRequest {
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}
