use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Validate request input, listing each failing field in the error message
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input.validate().map_err(ServiceError::from)
}

/// Rejects a body whose id disagrees with the id in the path
pub fn ensure_matching_id(path_id: Uuid, body_id: Uuid) -> Result<(), ServiceError> {
    if path_id != body_id {
        return Err(ServiceError::BadRequest(format!(
            "Path id {} does not match body id {}",
            path_id, body_id
        )));
    }
    Ok(())
}
