use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeriscopeError {
    #[error("Image directory not configured or not found")]
    RootUnavailable,

    #[error("Path is outside root directory")]
    PathTraversal,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Directory operation not allowed on file")]
    NotADirectory,

    #[error("File operation not allowed on directory")]
    NotAFile,

    #[error("Not an HTML document: {0}")]
    NotHtml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl PeriscopeError {
    pub fn status(&self) -> StatusCode {
        match self {
            PeriscopeError::RootUnavailable => StatusCode::BAD_REQUEST,
            PeriscopeError::PathTraversal => StatusCode::FORBIDDEN,
            PeriscopeError::NotFound(_)
            | PeriscopeError::NotADirectory
            | PeriscopeError::NotAFile
            | PeriscopeError::NotHtml(_) => StatusCode::NOT_FOUND,
            PeriscopeError::Io(_) | PeriscopeError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            PeriscopeError::RootUnavailable => "ROOT_UNAVAILABLE",
            PeriscopeError::PathTraversal => "PATH_TRAVERSAL",
            PeriscopeError::NotFound(_) => "NOT_FOUND",
            PeriscopeError::NotADirectory => "NOT_A_DIRECTORY",
            PeriscopeError::NotAFile => "NOT_A_FILE",
            PeriscopeError::NotHtml(_) => "NOT_HTML",
            PeriscopeError::Io(_) => "IO_ERROR",
            PeriscopeError::Task(_) => "TASK_FAILED",
        }
    }
}

impl IntoResponse for PeriscopeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}
