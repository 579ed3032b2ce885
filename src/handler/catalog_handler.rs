use axum::{
    extract::{Json, Path, Query},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::model::catalog;
use crate::util::error::HandlerError;

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn recommendations_handler(Query(query): Query<RecommendationQuery>) -> impl IntoResponse {
    Json(catalog::search_categories(&query.q))
}

pub async fn assessments_handler() -> impl IntoResponse {
    Json(catalog::ASSESSMENTS)
}

pub async fn assessment_handler(Path(kind): Path<String>) -> Result<impl IntoResponse, HandlerError> {
    catalog::find_assessment(&kind)
        .map(Json)
        .ok_or_else(|| HandlerError::not_found(format!("Unknown assessment: {}", kind)))
}

pub async fn constants_handler() -> impl IntoResponse {
    Json(catalog::constants())
}
