use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    /// Validity window for password-reset OTP codes.
    pub otp_ttl_minutes: i64,
    /// Minimum accepted password length at signup and reset.
    pub password_min_length: usize,
    /// Path to the trained linear risk model artifact (JSON).
    pub model_path: String,
    pub cookie_secure: bool,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/wellbeing".to_string());

        let otp_ttl_minutes = env::var("OTP_TTL_MINUTES")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        let password_min_length = env::var("PASSWORD_MIN_LENGTH")
            .unwrap_or_else(|_| "6".to_string())
            .parse()
            .unwrap_or(6);

        let model_path = env::var("MODEL_PATH").unwrap_or_else(|_| "./model.json".to_string());

        let cookie_secure = env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        Ok(Config {
            database_url,
            otp_ttl_minutes,
            password_min_length,
            model_path,
            cookie_secure,
        })
    }
}
