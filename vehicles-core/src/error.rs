//! Service layer errors and their http mapping

use kn0sys_lmdb_rs::MdbError;
use rocket::{
    http::Status,
    response::{
        self,
        status::Custom,
        Responder,
    },
    serde::json::Json,
    Request,
};
use thiserror::Error;

use crate::reqres::ErrorResponse;

/// Use for mapping errors in functions that can throw multiple errors.
#[derive(Debug, Error)]
pub enum VehiclesError {
    #[error("Car not found")]
    CarNotFound(u64),
    #[error("Cannot find price for Vehicle {0}")]
    PriceNotFound(u64),
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error("Malformed request body")]
    MalformedBody(String),
    #[error("Application not found: {0}")]
    ApplicationNotFound(String),
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),
    #[error("Database error: {0:?}")]
    Database(MdbError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Discovery error: {0}")]
    Discovery(String),
}

impl VehiclesError {
    pub fn status(&self) -> Status {
        match self {
            VehiclesError::CarNotFound(_)
            | VehiclesError::PriceNotFound(_)
            | VehiclesError::ApplicationNotFound(_)
            | VehiclesError::InstanceNotFound(_) => Status::NotFound,
            VehiclesError::Validation(_) | VehiclesError::MalformedBody(_) => Status::BadRequest,
            VehiclesError::Discovery(_) => Status::ServiceUnavailable,
            VehiclesError::Database(_) | VehiclesError::Serialization(_) => {
                Status::InternalServerError
            }
        }
    }

    /// Field level details reported next to the message
    pub fn details(&self) -> Vec<String> {
        match self {
            VehiclesError::Validation(errors) => errors.clone(),
            VehiclesError::MalformedBody(reason) => vec![String::from(reason)],
            _ => Vec::new(),
        }
    }
}

impl From<MdbError> for VehiclesError {
    fn from(e: MdbError) -> Self {
        VehiclesError::Database(e)
    }
}

impl From<bincode::Error> for VehiclesError {
    fn from(e: bincode::Error) -> Self {
        VehiclesError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for VehiclesError {
    fn from(e: reqwest::Error) -> Self {
        VehiclesError::Discovery(e.to_string())
    }
}

impl<'r> Responder<'r, 'static> for VehiclesError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let body = ErrorResponse {
            message: self.to_string(),
            errors: self.details(),
        };
        Custom(status, Json(body)).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_test() {
        assert_eq!(Status::NotFound, VehiclesError::CarNotFound(7).status());
        assert_eq!(
            Status::BadRequest,
            VehiclesError::Validation(vec![String::from("details.model must not be blank")])
                .status()
        );
        assert_eq!(
            Status::InternalServerError,
            VehiclesError::Database(MdbError::NotFound).status()
        );
    }

    #[test]
    fn price_not_found_message_test() {
        let expected = "Cannot find price for Vehicle 42";
        assert_eq!(expected, VehiclesError::PriceNotFound(42).to_string());
    }
}
