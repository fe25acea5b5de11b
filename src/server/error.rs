use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::pipeline::error::AnalysisError;

#[derive(Debug)]
pub enum ApiError {
    Analysis(AnalysisError),

    /// Request was understood but unusable (bad query, bad JSON body)
    BadRequest(String),

    /// Worker task died
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Analysis(AnalysisError::MissingInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(AnalysisError::Provider(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Analysis(AnalysisError::Parse { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Analysis(AnalysisError::MalformedInput(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        ApiError::Analysis(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Missing input keeps the short `{"error": ...}` shape clients expect.
        let body = match &self {
            ApiError::Analysis(AnalysisError::MissingInput(msg)) => json!({ "error": msg }),
            ApiError::Analysis(e) => json!({ "status": "error", "message": e.to_string() }),
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => {
                json!({ "status": "error", "message": msg })
            }
        };

        (status, Json(body)).into_response()
    }
}
