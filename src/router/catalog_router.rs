use axum::{routing::get, Router};

use crate::handler::catalog_handler::{
    assessment_handler, assessments_handler, constants_handler, recommendations_handler,
};

/// Routes mounted under `/api/catalog`
pub fn catalog_router() -> Router {
    Router::new()
        .route("/recommendations", get(recommendations_handler))
        .route("/assessments", get(assessments_handler))
        .route("/assessments/:kind", get(assessment_handler))
        .route("/constants", get(constants_handler))
}
