use axum::{body::Body, extract::State, http::{header, Request}, middleware::Next, response::Response};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::model::{AccountKind, AuthContext};
use crate::util::error::HandlerError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub const NO_TOKEN: &str = "No token provided";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// Validates the bearer access token and stores an [`AuthContext`] in the
/// request extensions.
pub async fn require_auth(
    State(jwt_utils): State<Arc<JwtTokenUtilsImpl>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| HandlerError::unauthorized(NO_TOKEN))?;

    let token = jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| HandlerError::unauthorized(NO_TOKEN))?;

    let claims = jwt_utils.validate_access_token(&token).map_err(|e| {
        debug!("Rejected access token: {}", e);
        HandlerError::unauthorized(INVALID_TOKEN)
    })?;

    let account_id = ObjectId::parse_str(&claims.sub).map_err(|_| {
        warn!("Access token subject is not an ObjectId");
        HandlerError::unauthorized(INVALID_TOKEN)
    })?;

    req.extensions_mut().insert(AuthContext {
        account_id,
        kind: AccountKind::from_role(&claims.role),
        role: claims.role,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

/// Must run after [`require_auth`].
pub async fn require_supervisor(req: Request<Body>, next: Next) -> Result<Response, HandlerError> {
    match req.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.kind == AccountKind::Supervisor => Ok(next.run(req).await),
        Some(ctx) => {
            warn!("{} {} denied supervisor route", ctx.kind, ctx.email);
            Err(HandlerError::forbidden("Access denied. Supervisor role required."))
        }
        None => Err(HandlerError::unauthorized(NO_TOKEN)),
    }
}
