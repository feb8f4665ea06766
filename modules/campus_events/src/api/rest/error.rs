//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::{CampusError, ErrorKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Stable machine-readable error code, e.g. `EVENT_FULL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            code: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict | ErrorKind::State => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn title_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "Not Found",
        ErrorKind::Conflict => "Conflict",
        ErrorKind::Validation => "Validation Error",
        ErrorKind::State => "Invalid State",
        ErrorKind::Transient => "Service Unavailable",
        ErrorKind::Internal => "Internal Server Error",
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: CampusError) -> Problem {
    let kind = error.kind();
    let detail = match kind {
        ErrorKind::Internal => "An unexpected error occurred".to_string(),
        _ => error.to_string(),
    };
    Problem::new(status_for(kind), title_for(kind))
        .with_detail(detail)
        .with_code(error.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_map_to_statuses() {
        let full = map_domain_error(CampusError::EventFull {
            id: 3,
            max_capacity: 20,
        });
        assert_eq!(full.status, 409);
        assert_eq!(full.code.as_deref(), Some("EVENT_FULL"));

        let rating = map_domain_error(CampusError::InvalidRating { rating: 9 });
        assert_eq!(rating.status, 400);

        let missing = map_domain_error(CampusError::RegistrationNotFound { id: 12 });
        assert_eq!(missing.status, 404);

        let busy = map_domain_error(CampusError::unavailable("pool timed out"));
        assert_eq!(busy.status, 503);

        let internal = map_domain_error(CampusError::Internal);
        assert_eq!(internal.status, 500);
        assert_eq!(internal.detail.as_deref(), Some("An unexpected error occurred"));
    }
}
