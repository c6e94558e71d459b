use std::error::Error as StdError;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_api_types::{ErrorBody, FETCH_FAILED_MESSAGE};

use crate::application::error::ErrorReport;

/// JSON error with a fixed public message; details travel in the attached report.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    report: ErrorReport,
}

impl ApiError {
    pub fn fetch_failed(source: &'static str, error: &dyn StdError) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self {
            status,
            message: FETCH_FAILED_MESSAGE,
            report: ErrorReport::from_error(source, status, error),
        }
    }

    pub fn not_found(source: &'static str, path: &str) -> Self {
        let status = StatusCode::NOT_FOUND;
        Self {
            status,
            message: "Not found",
            report: ErrorReport::from_message(source, status, format!("no route for `{path}`")),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message.to_string(),
        };
        let mut response = (self.status, Json(body)).into_response();
        self.report.attach(&mut response);
        response
    }
}
