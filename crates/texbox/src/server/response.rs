//! JSON envelopes and error-to-status mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::config::Compiler;
use crate::runner::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Body of every JSON response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Base64 encoded document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_output: Option<String>,
}

impl Envelope {
    pub fn success(pdf: String, compiler_output: String) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message: None,
            pdf: Some(pdf),
            compiler_output: Some(compiler_output),
        }
    }

    pub fn error_message(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            message: Some(message.into()),
            pdf: None,
            compiler_output: None,
        }
    }

    pub fn compiler_error(compiler_output: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            message: None,
            pdf: None,
            compiler_output: Some(compiler_output.into()),
        }
    }
}

/// Everything a request can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid compiler. Valid compilers are: {}", Compiler::valid_list())]
    InvalidCompiler(String),

    #[error("Content-Length header not provided")]
    MissingContentLength { strict: bool },

    #[error("Request body exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("Invalid JSON body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("You need to pass a tex_source")]
    MissingTexSource,

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCompiler(_) => StatusCode::BAD_REQUEST,
            // Legacy clients expect 200 here
            ApiError::MissingContentLength { strict: false } => StatusCode::OK,
            ApiError::MissingContentLength { strict: true } => StatusCode::LENGTH_REQUIRED,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Body(_) | ApiError::MalformedBody(_) | ApiError::MissingTexSource => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Compile(CompileError::Workspace(e)) if e.is_client_error() => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Compile(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error
    pub fn envelope(&self) -> Envelope {
        match self {
            ApiError::Compile(CompileError::Failed { output, .. }) => {
                Envelope::compiler_error(output.clone())
            }
            other => Envelope::error_message(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && !matches!(self, ApiError::Compile(CompileError::Failed { .. }))
        {
            error!(error = %self, "request failed");
        }
        (status, Json(self.envelope())).into_response()
    }
}
