use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{
    repositories::user as user_repo,
    state::AppState,
    utils::cookies::{extract_cookie_value, SESSION_COOKIE_NAME},
};

/// Session id of the authenticated request, made available to handlers that
/// need to touch their own slot (logout).
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Requires a session whose flow state is `LoggedIn` and injects the backing
/// `User` plus the session token into request extensions.
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned());

    let session_id = cookie_header
        .as_deref()
        .and_then(|raw| extract_cookie_value(raw, SESSION_COOKIE_NAME))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let flow = state
        .sessions
        .get(&session_id)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let user_id = flow.user_id().ok_or(StatusCode::UNAUTHORIZED)?;

    let user = user_repo::find_user_by_id(&state.pool, user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(SessionToken(session_id));

    Ok(next.run(request).await)
}
