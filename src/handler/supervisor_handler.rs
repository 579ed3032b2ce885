use axum::{
    extract::{Extension, Json, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::model::AuthContext;
use crate::service::supervisor_service::SupervisorService;
use crate::util::error::HandlerError;

pub type SupervisorState = Arc<dyn SupervisorService>;

pub async fn dashboard_handler(
    State(service): State<SupervisorState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.dashboard(&ctx).await?))
}

pub async fn students_handler(
    State(service): State<SupervisorState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.students(&ctx).await?))
}
