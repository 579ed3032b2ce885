use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::handler::profile_handler::{get_profile_handler, update_profile_handler, ProfileState};
use crate::middlewares::auth_middleware::require_auth;
use crate::util::jwt::JwtTokenUtilsImpl;

/// Routes mounted under `/api/users`
pub fn user_router(service: ProfileState, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Router {
    Router::new()
        .route("/profile", get(get_profile_handler).put(update_profile_handler))
        .route_layer(middleware::from_fn_with_state(jwt_utils, require_auth))
        .with_state(service)
}
