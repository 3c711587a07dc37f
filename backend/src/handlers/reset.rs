//! Password reset flow handlers.
//!
//! Every step loads the session's flow state, checks that the requested
//! transition is legal before doing any work, performs its side effects and
//! stores the successor state. Responses are deliberately uniform so they
//! never reveal whether an identifier maps to an account.

use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    handlers::{flow_error, load_or_create_session, session_cookie, SessionCookie},
    models::otp::{ResetPasswordRequest, SendOtpRequest},
    repositories::user as user_repo,
    services::otp as otp_service,
    state::AppState,
    utils::password::hash_password_blocking,
    validation::is_valid_identifier,
};

/// The one message for every failed confirm, regardless of which check
/// actually failed.
const INVALID_CODE: &str = "Invalid or expired code";

/// Starts the reset flow: LoggedOut -> ResetInitiate.
pub async fn initiate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    let (session_id, flow) = load_or_create_session(&state.sessions, &headers);

    let next = flow.begin_reset().map_err(flow_error)?;
    state.sessions.put(&session_id, next);

    Ok((
        session_cookie(&session_id, state.config.cookie_secure),
        Json(json!({"message": "Enter your registration number or student email"})),
    ))
}

/// Resolves the identifier and dispatches an OTP when it maps to an account.
/// The flow advances to the verify stage either way, and the response is the
/// same either way.
pub async fn send_otp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SendOtpRequest>,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    let (session_id, flow) = load_or_create_session(&state.sessions, &headers);

    // Confirm the transition is legal before touching the database.
    flow.otp_dispatched(None).map_err(flow_error)?;

    let identifier = payload.identifier.trim();
    if identifier.is_empty() {
        return Err(AppError::Validation(vec![
            "identifier is required".to_string(),
        ]));
    }
    if !is_valid_identifier(identifier) {
        return Err(AppError::Validation(vec![
            "identifier: expected a registration number or student email".to_string(),
        ]));
    }

    let email = user_repo::find_email_by_identifier(&state.pool, identifier).await?;

    let email = match email {
        Some(email) => {
            let code = otp_service::issue(&state.pool, &email, state.config.otp_ttl_minutes).await?;
            // SMTP is a blocking transaction; keep it off the async workers,
            // like argon2 hashing. A delivery failure must not change the
            // response shape; the user can cancel and request another code.
            let mailer = state.mailer.clone();
            let to = email.clone();
            let delivery = tokio::task::spawn_blocking(move || mailer.send_otp_email(&to, &code))
                .await
                .map_err(anyhow::Error::from)
                .and_then(|sent| sent);
            if let Err(err) = delivery {
                tracing::warn!(error = %err, "Failed to send reset code email");
            }
            Some(email)
        }
        None => {
            tracing::debug!("Reset requested for unknown identifier");
            None
        }
    };

    let next = flow.otp_dispatched(email).map_err(flow_error)?;
    state.sessions.put(&session_id, next);

    Ok((
        session_cookie(&session_id, state.config.cookie_secure),
        Json(json!({
            "message": "If the account exists, a reset code has been sent to its email"
        })),
    ))
}

/// Verifies the OTP and replaces the password: ResetVerify -> ResetSuccess.
///
/// Format and confirmation checks run before the code is redeemed, so a
/// correct code is never burned by an unrelated validation failure.
pub async fn confirm(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    let (session_id, flow) = load_or_create_session(&state.sessions, &headers);

    flow.complete_reset().map_err(flow_error)?;

    let mut errors = Vec::new();
    if payload.otp.trim().is_empty() {
        errors.push("otp is required".to_string());
    }
    if payload.new_password.len() < state.config.password_min_length {
        errors.push(format!(
            "new_password: must be at least {} characters",
            state.config.password_min_length
        ));
    }
    if payload.new_password != payload.confirm_password {
        errors.push("confirm_password: does not match".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // None means the identifier never resolved; fail the same way a wrong
    // code would.
    let Some(email) = flow.reset_email().map(str::to_owned) else {
        return Err(AppError::Unauthorized(INVALID_CODE.to_string()));
    };

    let redeemed = otp_service::verify(&state.pool, &email, payload.otp.trim()).await?;
    if !redeemed {
        return Err(AppError::Unauthorized(INVALID_CODE.to_string()));
    }

    let password_hash = hash_password_blocking(&payload.new_password).await?;
    user_repo::update_password_by_email(&state.pool, &email, &password_hash).await?;

    tracing::info!("Password reset completed");

    let next = flow.complete_reset().map_err(flow_error)?;
    state.sessions.put(&session_id, next);

    Ok((
        session_cookie(&session_id, state.config.cookie_secure),
        Json(json!({"message": "Password updated"})),
    ))
}

/// Dismisses the success screen: ResetSuccess -> LoggedOut.
pub async fn acknowledge(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    let (session_id, flow) = load_or_create_session(&state.sessions, &headers);

    let next = flow.acknowledge_reset().map_err(flow_error)?;
    state.sessions.put(&session_id, next);

    Ok((
        session_cookie(&session_id, state.config.cookie_secure),
        Json(json!({"message": "You can now log in with your new password"})),
    ))
}

/// Abandons the reset from any of its stages.
pub async fn cancel(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    let (session_id, flow) = load_or_create_session(&state.sessions, &headers);

    let next = flow.cancel_reset().map_err(flow_error)?;
    state.sessions.put(&session_id, next);

    Ok((
        session_cookie(&session_id, state.config.cookie_secure),
        Json(json!({"message": "Reset cancelled"})),
    ))
}
