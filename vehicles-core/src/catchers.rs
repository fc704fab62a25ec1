//! JSON error catchers registered by every service

use rocket::{
    catch,
    catchers,
    http::Status,
    response::status::Custom,
    serde::json::Json,
    Catcher,
};

use crate::reqres::ErrorResponse;

fn error_body(status: Status, message: &str) -> Custom<Json<ErrorResponse>> {
    Custom(
        status,
        Json(ErrorResponse {
            message: String::from(message),
            errors: Vec::new(),
        }),
    )
}

#[catch(404)]
pub fn not_found() -> Custom<Json<ErrorResponse>> {
    error_body(Status::NotFound, "Resource does not exist")
}

#[catch(422)]
pub fn unprocessable_entity() -> Custom<Json<ErrorResponse>> {
    error_body(Status::UnprocessableEntity, "Unprocessable request")
}

#[catch(500)]
pub fn internal_error() -> Custom<Json<ErrorResponse>> {
    error_body(Status::InternalServerError, "Internal server error")
}

/// Register at `/`
pub fn all() -> Vec<Catcher> {
    catchers![not_found, unprocessable_entity, internal_error]
}
