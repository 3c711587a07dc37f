pub mod assessments;
pub mod auth;
pub mod reset;

use axum::{
    http::{header, HeaderMap, HeaderName},
    middleware as axum_middleware,
    response::AppendHeaders,
    routing::{get, post},
    Router,
};
use std::time::Duration;

use crate::{
    error::AppError,
    services::flow::{FlowError, FlowState},
    services::session::SessionStore,
    state::AppState,
    utils::cookies::{build_session_cookie, extract_cookie_value, SESSION_COOKIE_NAME},
};

/// How long the session cookie (and therefore the flow-state slot) lives on
/// the client.
const SESSION_COOKIE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Builds the full application router. Split out of `main` so integration
/// tests can drive the same routes in-process.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/reset/initiate", post(reset::initiate))
        .route("/api/auth/reset/send-otp", post(reset::send_otp))
        .route("/api/auth/reset/confirm", post(reset::confirm))
        .route("/api/auth/reset/acknowledge", post(reset::acknowledge))
        .route("/api/auth/reset/cancel", post(reset::cancel))
        .route("/api/docs/openapi.json", get(crate::docs::openapi_json));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/assessments", post(assessments::submit))
        .route(
            "/api/assessments/me",
            get(assessments::history).delete(assessments::delete_history),
        )
        .route("/api/assessments/me/summary", get(assessments::summary))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub(crate) type SessionCookie = AppendHeaders<[(HeaderName, String); 1]>;

/// Resolves the request's session slot, allocating a fresh `LoggedOut` one
/// when the cookie is absent or stale.
pub(crate) fn load_or_create_session(
    sessions: &SessionStore,
    headers: &HeaderMap,
) -> (String, FlowState) {
    let existing = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| extract_cookie_value(raw, SESSION_COOKIE_NAME))
        .and_then(|id| sessions.get(&id).map(|flow| (id, flow)));

    match existing {
        Some(found) => found,
        None => {
            let id = sessions.create();
            (id, FlowState::LoggedOut)
        }
    }
}

/// Set-Cookie header refreshing the session id on every auth-flow response.
pub(crate) fn session_cookie(session_id: &str, secure: bool) -> SessionCookie {
    AppendHeaders([(
        header::SET_COOKIE,
        build_session_cookie(session_id, SESSION_COOKIE_MAX_AGE, secure),
    )])
}

/// A sequencing violation is a client programming error, not a secret.
pub(crate) fn flow_error(err: FlowError) -> AppError {
    AppError::BadRequest(err.to_string())
}
