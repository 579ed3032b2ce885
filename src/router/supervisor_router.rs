use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::handler::supervisor_handler::{dashboard_handler, students_handler, SupervisorState};
use crate::middlewares::auth_middleware::{require_auth, require_supervisor};
use crate::util::jwt::JwtTokenUtilsImpl;

/// Routes mounted under `/api/supervisors`
pub fn supervisor_router(service: SupervisorState, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Router {
    // The last route_layer added runs first: authenticate, then check the role.
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/students", get(students_handler))
        .route_layer(middleware::from_fn(require_supervisor))
        .route_layer(middleware::from_fn_with_state(jwt_utils, require_auth))
        .with_state(service)
}
