use axum::{middleware, routing::{get, post}, Router};
use std::sync::Arc;

use crate::handler::auth_handler::{
    admin_login_handler, confirm_supervisor_email_handler, confirm_user_email_handler, forgot_password_handler,
    login_handler, me_handler, refresh_token_handler, reset_password_handler, supervisor_forgot_password_handler,
    supervisor_login_handler, supervisor_signup_handler, user_forgot_password_handler, user_login_handler,
    user_signup_handler, AuthState,
};
use crate::middlewares::auth_middleware::require_auth;
use crate::util::jwt::JwtTokenUtilsImpl;

/// Routes mounted under `/api/auth`
pub fn auth_router(service: AuthState, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Router {
    let public = Router::new()
        .route("/user/signup", post(user_signup_handler))
        .route("/supervisor/signup", post(supervisor_signup_handler))
        .route("/user/confirm-email/:token", get(confirm_user_email_handler))
        .route("/supervisor/confirm-email/:token", get(confirm_supervisor_email_handler))
        .route("/user/login", post(user_login_handler))
        .route("/supervisor/login", post(supervisor_login_handler))
        .route("/admin/login", post(admin_login_handler))
        .route("/login", post(login_handler))
        .route("/refresh-token", post(refresh_token_handler))
        .route("/forgot-password", post(forgot_password_handler))
        .route("/user/forgot-password", post(user_forgot_password_handler))
        .route("/supervisor/forgot-password", post(supervisor_forgot_password_handler))
        .route("/reset-password", post(reset_password_handler));

    let protected = Router::new()
        .route("/me", get(me_handler))
        .route_layer(middleware::from_fn_with_state(jwt_utils, require_auth));

    public.merge(protected).with_state(service)
}
