use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wellbeing_backend::{handlers, repositories::user as user_repo, utils::password::verify_password};

mod support;

fn post_json(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, format!("wellbeing_session={cookie}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn session_cookie_from(headers: &HeaderMap) -> Option<String> {
    headers.get_all(header::SET_COOKIE).iter().find_map(|value| {
        let value = value.to_str().ok()?;
        let token = value
            .strip_prefix("wellbeing_session=")?
            .split(';')
            .next()?
            .trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Walks the flow up to the verify stage and returns the session cookie.
async fn reach_verify_stage(router: &Router, identifier: &str) -> String {
    let initiate = router
        .clone()
        .oneshot(post_json("/api/auth/reset/initiate", None, json!({})))
        .await
        .expect("response");
    assert_eq!(initiate.status(), StatusCode::OK);
    let cookie = session_cookie_from(initiate.headers()).expect("session cookie");

    let send = router
        .clone()
        .oneshot(post_json(
            "/api/auth/reset/send-otp",
            Some(&cookie),
            json!({"identifier": identifier}),
        ))
        .await
        .expect("response");
    assert_eq!(send.status(), StatusCode::OK);

    cookie
}

#[tokio::test]
async fn full_reset_flow_changes_the_password() {
    let (state, mailer) = support::test_state().await;
    let pool = state.pool.clone();
    let user = support::seed_user(&pool, "old-secret").await;
    let router = handlers::router(state);

    let cookie = reach_verify_stage(&router, &user.reg_number).await;
    let code = mailer.last_code_for(&user.email).expect("code delivered");

    let confirm = router
        .clone()
        .oneshot(post_json(
            "/api/auth/reset/confirm",
            Some(&cookie),
            json!({
                "otp": code,
                "new_password": "new-secret",
                "confirm_password": "new-secret",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(confirm.status(), StatusCode::OK);

    let reloaded = user_repo::find_user_by_id(&pool, user.id)
        .await
        .expect("query")
        .expect("still exists");
    assert!(verify_password("new-secret", &reloaded.password_hash).expect("verify"));

    let ack = router
        .oneshot(post_json(
            "/api/auth/reset/acknowledge",
            Some(&cookie),
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(ack.status(), StatusCode::OK);
}

#[tokio::test]
async fn send_otp_response_is_uniform_for_unknown_identifiers() {
    let (state, mailer) = support::test_state().await;
    let user = support::seed_user(&state.pool, "old-secret").await;
    let router = handlers::router(state);

    let known = reach_verify_stage(&router, &user.email).await;
    let unknown = reach_verify_stage(&router, &support::unique_email()).await;
    assert_ne!(known, unknown);

    // Only the real account got an email, but the flow advanced both times.
    assert_eq!(mailer.sent().len(), 1);
    assert_eq!(mailer.sent()[0].0, user.email);
}

#[tokio::test]
async fn confirm_after_unknown_identifier_fails_generically() {
    let (state, _) = support::test_state().await;
    let router = handlers::router(state);

    let cookie = reach_verify_stage(&router, &support::unique_email()).await;

    let confirm = router
        .oneshot(post_json(
            "/api/auth/reset/confirm",
            Some(&cookie),
            json!({
                "otp": "123456",
                "new_password": "new-secret",
                "confirm_password": "new-secret",
            }),
        ))
        .await
        .expect("response");

    assert_eq!(confirm.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(confirm).await;
    assert_eq!(body["error"], "Invalid or expired code");
}

#[tokio::test]
async fn confirm_mismatch_does_not_consume_the_code() {
    let (state, mailer) = support::test_state().await;
    let user = support::seed_user(&state.pool, "old-secret").await;
    let router = handlers::router(state);

    let cookie = reach_verify_stage(&router, &user.email).await;
    let code = mailer.last_code_for(&user.email).expect("code delivered");

    // Confirmation mismatch is caught before the code is redeemed.
    let mismatch = router
        .clone()
        .oneshot(post_json(
            "/api/auth/reset/confirm",
            Some(&cookie),
            json!({
                "otp": code,
                "new_password": "new-secret",
                "confirm_password": "different",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);

    let retry = router
        .oneshot(post_json(
            "/api/auth/reset/confirm",
            Some(&cookie),
            json!({
                "otp": code,
                "new_password": "new-secret",
                "confirm_password": "new-secret",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(retry.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_code_leaves_the_flow_at_verify() {
    let (state, mailer) = support::test_state().await;
    let user = support::seed_user(&state.pool, "old-secret").await;
    let router = handlers::router(state);

    let cookie = reach_verify_stage(&router, &user.email).await;
    let code = mailer.last_code_for(&user.email).expect("code delivered");
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let rejected = router
        .clone()
        .oneshot(post_json(
            "/api/auth/reset/confirm",
            Some(&cookie),
            json!({
                "otp": wrong,
                "new_password": "new-secret",
                "confirm_password": "new-secret",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

    // The session is still at verify; the real code goes through.
    let retry = router
        .oneshot(post_json(
            "/api/auth/reset/confirm",
            Some(&cookie),
            json!({
                "otp": code,
                "new_password": "new-secret",
                "confirm_password": "new-secret",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(retry.status(), StatusCode::OK);
}

#[tokio::test]
async fn steps_out_of_order_are_rejected() {
    let (state, _) = support::test_state().await;
    let router = handlers::router(state);

    // send-otp without initiate
    let send = router
        .clone()
        .oneshot(post_json(
            "/api/auth/reset/send-otp",
            None,
            json!({"identifier": support::unique_email()}),
        ))
        .await
        .expect("response");
    assert_eq!(send.status(), StatusCode::BAD_REQUEST);
    let body = body_json(send).await;
    assert_eq!(body["error"], "No password reset in progress");

    // confirm straight from initiate
    let initiate = router
        .clone()
        .oneshot(post_json("/api/auth/reset/initiate", None, json!({})))
        .await
        .expect("response");
    let cookie = session_cookie_from(initiate.headers()).expect("session cookie");

    let confirm = router
        .oneshot(post_json(
            "/api/auth/reset/confirm",
            Some(&cookie),
            json!({
                "otp": "123456",
                "new_password": "new-secret",
                "confirm_password": "new-secret",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(confirm.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancel_returns_the_flow_to_logged_out() {
    let (state, mailer) = support::test_state().await;
    let user = support::seed_user(&state.pool, "old-secret").await;
    let router = handlers::router(state);

    let cookie = reach_verify_stage(&router, &user.email).await;
    let code = mailer.last_code_for(&user.email).expect("code delivered");

    let cancel = router
        .clone()
        .oneshot(post_json(
            "/api/auth/reset/cancel",
            Some(&cookie),
            json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(cancel.status(), StatusCode::OK);

    // The captured email is gone with the state, so confirm cannot proceed.
    let confirm = router
        .oneshot(post_json(
            "/api/auth/reset/confirm",
            Some(&cookie),
            json!({
                "otp": code,
                "new_password": "new-secret",
                "confirm_password": "new-secret",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(confirm.status(), StatusCode::BAD_REQUEST);
}
