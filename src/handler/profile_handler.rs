use axum::{
    extract::{rejection::JsonRejection, Extension, Json, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::dto::profile_dto::UpdateProfileRequest;
use crate::handler::{parse_body, validate_payload};
use crate::model::AuthContext;
use crate::service::profile_service::ProfileService;
use crate::util::error::HandlerError;

pub type ProfileState = Arc<dyn ProfileService>;

pub async fn get_profile_handler(
    State(service): State<ProfileState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.get_profile(&ctx).await?))
}

pub async fn update_profile_handler(
    State(service): State<ProfileState>,
    Extension(ctx): Extension<AuthContext>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = parse_body(payload)?;
    validate_payload(&payload)?;
    Ok(Json(service.update_profile(&ctx, payload).await?))
}
