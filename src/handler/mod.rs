pub mod auth_handler;
pub mod catalog_handler;
pub mod profile_handler;
pub mod supervisor_handler;
pub mod system_handler;

use axum::extract::{rejection::JsonRejection, Json};
use serde_json::{json, Value};
use tracing::debug;
use validator::Validate;

use crate::util::error::{HandlerError, HandlerErrorKind};

/// Unwraps a JSON body, turning extraction failures into 400 responses.
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(HandlerError::bad_request("Request body is missing")),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Err(HandlerError::bad_request("Malformed request body")
                .with_details(Value::String(rejection.body_text())))
        }
    }
}

pub(crate) fn validate_payload<T: Validate>(payload: &T) -> Result<(), HandlerError> {
    let errors = match payload.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };
    let fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
    let message = if fields.iter().any(|f| f == "email") {
        "Invalid email format"
    } else {
        "Validation error"
    };
    Err(HandlerError::new(HandlerErrorKind::Validation, message).with_details(json!({ "fields": fields })))
}
