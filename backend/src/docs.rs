#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use axum::Json;
use utoipa::OpenApi;

use crate::models::{
    assessment::{
        AssessmentResponse, AssessmentSummary, FeatureInfluence, RiskCheckResponse, RiskLevel,
        RiskTrend, SubmitAssessmentRequest,
    },
    otp::{ResetPasswordRequest, SendOtpRequest},
    user::{AuthResponse, LoginRequest, SignupRequest, UserResponse},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        signup_doc,
        login_doc,
        logout_doc,
        reset_initiate_doc,
        reset_send_otp_doc,
        reset_confirm_doc,
        reset_acknowledge_doc,
        reset_cancel_doc,
        submit_assessment_doc,
        my_assessments_doc,
        my_assessment_summary_doc,
        delete_my_assessments_doc
    ),
    components(
        schemas(
            // auth
            SignupRequest,
            LoginRequest,
            AuthResponse,
            UserResponse,
            // password reset
            SendOtpRequest,
            ResetPasswordRequest,
            // assessments
            SubmitAssessmentRequest,
            RiskCheckResponse,
            RiskLevel,
            RiskTrend,
            FeatureInfluence,
            AssessmentResponse,
            AssessmentSummary
        )
    ),
    tags(
        (name = "Auth", description = "Signup, login and session management"),
        (name = "Reset", description = "OTP password reset flow"),
        (name = "Assessments", description = "Well-being risk checks and history")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created and logged in", body = AuthResponse),
        (status = 409, description = "Registration number or email already registered"),
        (status = 400, description = "Malformed identifier or weak password")
    ),
    tag = "Auth"
)]
fn signup_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared", body = serde_json::Value)),
    tag = "Auth"
)]
fn logout_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/reset/initiate",
    responses(
        (status = 200, description = "Reset flow started", body = serde_json::Value),
        (status = 400, description = "Flow is not at the login screen")
    ),
    tag = "Reset"
)]
fn reset_initiate_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/reset/send-otp",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Uniform response whether or not the account exists", body = serde_json::Value),
        (status = 400, description = "Flow is not at the identifier step")
    ),
    tag = "Reset"
)]
fn reset_send_otp_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/reset/confirm",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = serde_json::Value),
        (status = 401, description = "Invalid or expired code"),
        (status = 400, description = "Password too short or confirmation mismatch")
    ),
    tag = "Reset"
)]
fn reset_confirm_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/reset/acknowledge",
    responses((status = 200, description = "Back to login", body = serde_json::Value)),
    tag = "Reset"
)]
fn reset_acknowledge_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/reset/cancel",
    responses((status = 200, description = "Reset abandoned", body = serde_json::Value)),
    tag = "Reset"
)]
fn reset_cancel_doc() {}

#[utoipa::path(
    post,
    path = "/api/assessments",
    request_body = SubmitAssessmentRequest,
    responses(
        (status = 201, description = "Assessment recorded", body = RiskCheckResponse),
        (status = 400, description = "Consent missing or metric out of range")
    ),
    tag = "Assessments"
)]
fn submit_assessment_doc() {}

#[utoipa::path(
    get,
    path = "/api/assessments/me",
    responses((status = 200, body = Vec<AssessmentResponse>)),
    tag = "Assessments"
)]
fn my_assessments_doc() {}

#[utoipa::path(
    get,
    path = "/api/assessments/me/summary",
    responses((status = 200, body = AssessmentSummary)),
    tag = "Assessments"
)]
fn my_assessment_summary_doc() {}

#[utoipa::path(
    delete,
    path = "/api/assessments/me",
    responses((status = 200, description = "All history rows removed", body = serde_json::Value)),
    tag = "Assessments"
)]
fn delete_my_assessments_doc() {}
