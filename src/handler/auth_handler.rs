use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::dto::auth_dto::{
    ForgotPasswordRequest, LoginRequest, RefreshTokenRequest, ResetPasswordRequest, SupervisorSignupRequest,
    UserSignupRequest,
};
use crate::handler::{parse_body, validate_payload};
use crate::model::AuthContext;
use crate::service::auth_service::AuthService;
use crate::util::error::HandlerError;

pub type AuthState = Arc<dyn AuthService>;

pub async fn user_signup_handler(
    State(service): State<AuthState>,
    payload: Result<Json<UserSignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = parse_body(payload)?;
    validate_payload(&payload)?;
    let res = service.signup_user(payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn supervisor_signup_handler(
    State(service): State<AuthState>,
    payload: Result<Json<SupervisorSignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = parse_body(payload)?;
    validate_payload(&payload)?;
    let res = service.signup_supervisor(payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn confirm_user_email_handler(
    State(service): State<AuthState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.confirm_user_email(&token).await?))
}

pub async fn confirm_supervisor_email_handler(
    State(service): State<AuthState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.confirm_supervisor_email(&token).await?))
}

pub async fn user_login_handler(
    State(service): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.login_user(parse_body(payload)?).await?))
}

pub async fn supervisor_login_handler(
    State(service): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.login_supervisor(parse_body(payload)?).await?))
}

pub async fn admin_login_handler(
    State(service): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.login_admin(parse_body(payload)?).await?))
}

pub async fn login_handler(
    State(service): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.login(parse_body(payload)?).await?))
}

pub async fn refresh_token_handler(
    State(service): State<AuthState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.refresh_token(parse_body(payload)?).await?))
}

pub async fn forgot_password_handler(
    State(service): State<AuthState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = parse_body(payload)?;
    validate_payload(&payload)?;
    Ok(Json(service.forgot_password(payload).await?))
}

pub async fn user_forgot_password_handler(
    State(service): State<AuthState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let mut payload = parse_body(payload)?;
    validate_payload(&payload)?;
    payload.user_type = Some("user".to_string());
    Ok(Json(service.forgot_password(payload).await?))
}

pub async fn supervisor_forgot_password_handler(
    State(service): State<AuthState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let mut payload = parse_body(payload)?;
    validate_payload(&payload)?;
    payload.user_type = Some("supervisor".to_string());
    Ok(Json(service.forgot_password(payload).await?))
}

pub async fn reset_password_handler(
    State(service): State<AuthState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.reset_password(parse_body(payload)?).await?))
}

pub async fn me_handler(
    State(service): State<AuthState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.current_account(&ctx).await?))
}
