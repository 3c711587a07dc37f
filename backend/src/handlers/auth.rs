use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::{
    error::AppError,
    handlers::{flow_error, load_or_create_session, session_cookie, SessionCookie},
    middleware::SessionToken,
    models::user::{AuthResponse, LoginRequest, SignupRequest, User},
    repositories::user as user_repo,
    services::flow::FlowState,
    utils::{
        cookies::build_clear_session_cookie,
        password::{hash_password_blocking, verify_password_blocking},
    },
    validation::{is_valid_email, is_valid_identifier, is_valid_reg_number},
};

/// One message for every credential failure, so callers cannot tell an
/// unknown identifier from a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn signup(
    State(state): State<crate::state::AppState>,
    headers: HeaderMap,
    Json(payload): Json<SignupRequest>,
) -> Result<(SessionCookie, Json<AuthResponse>), AppError> {
    let (session_id, flow) = load_or_create_session(&state.sessions, &headers);
    ensure_logged_out(&flow)?;

    validate_signup(&payload, state.config.password_min_length)?;

    let password_hash = hash_password_blocking(&payload.password).await?;
    let user = User::new(&payload.reg_number, &payload.email, password_hash);
    let user = user_repo::insert_user(&state.pool, &user).await?;

    tracing::info!(user_id = %user.id, "New account registered");

    let next = flow.log_in(user.id).map_err(flow_error)?;
    // A pre-auth session id must not survive the privilege change.
    state.sessions.remove(&session_id);
    let session_id = state.sessions.create();
    state.sessions.put(&session_id, next);

    Ok((
        session_cookie(&session_id, state.config.cookie_secure),
        Json(AuthResponse {
            message: "Account created".to_string(),
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<crate::state::AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<(SessionCookie, Json<AuthResponse>), AppError> {
    let (session_id, flow) = load_or_create_session(&state.sessions, &headers);
    ensure_logged_out(&flow)?;

    let identifier = payload.identifier.trim();
    if identifier.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(vec![
            "identifier and password are required".to_string(),
        ]));
    }
    if !is_valid_identifier(identifier) {
        return Err(AppError::Validation(vec![
            "identifier: expected a registration number or student email".to_string(),
        ]));
    }

    let user = authenticate_user(&state.pool, identifier, &payload.password).await?;

    let next = flow.log_in(user.id).map_err(flow_error)?;
    // A pre-auth session id must not survive the privilege change.
    state.sessions.remove(&session_id);
    let session_id = state.sessions.create();
    state.sessions.put(&session_id, next);

    Ok((
        session_cookie(&session_id, state.config.cookie_secure),
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: user.into(),
        }),
    ))
}

pub async fn logout(
    State(state): State<crate::state::AppState>,
    Extension(SessionToken(session_id)): Extension<SessionToken>,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    // Dropping the slot clears every transient field at once.
    state.sessions.remove(&session_id);

    Ok((
        axum::response::AppendHeaders([(
            axum::http::header::SET_COOKIE,
            build_clear_session_cookie(state.config.cookie_secure),
        )]),
        Json(json!({"message": "Logged out"})),
    ))
}

/// Looks the identifier up and verifies the password, collapsing both
/// failure modes into one indistinguishable error.
pub async fn authenticate_user(
    pool: &PgPool,
    identifier: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = user_repo::find_user_by_identifier(pool, identifier)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let matches = verify_password_blocking(password, &user.password_hash).await?;
    if matches {
        Ok(user)
    } else {
        Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }
}

fn ensure_logged_out(flow: &FlowState) -> Result<(), AppError> {
    match flow {
        FlowState::LoggedOut => Ok(()),
        FlowState::LoggedIn { .. } => Err(AppError::BadRequest("Already logged in".to_string())),
        _ => Err(AppError::BadRequest(
            "A password reset is in progress".to_string(),
        )),
    }
}

fn validate_signup(payload: &SignupRequest, password_min_length: usize) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if payload.reg_number.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        errors.push("all fields are required".to_string());
    }
    if !payload.reg_number.trim().is_empty() && !is_valid_reg_number(payload.reg_number.trim()) {
        errors.push("reg_number: expected a format like X123-45-6789/2024".to_string());
    }
    if !payload.email.trim().is_empty() && !is_valid_email(payload.email.trim()) {
        errors.push("email: expected a format like jane.doe22@students.dkut.ac.ke".to_string());
    }
    if !payload.password.is_empty() && payload.password.len() < password_min_length {
        errors.push(format!(
            "password: must be at least {} characters",
            password_min_length
        ));
    }
    if payload.password != payload.confirm_password {
        errors.push("confirm_password: does not match".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
