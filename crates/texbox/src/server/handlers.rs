// HTTP route handlers for the texbox server

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, Uri, header},
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::runner::CompileJob;
use crate::server::AppState;
use crate::server::response::{ApiError, Envelope};

const JSON_MIME: &str = "application/json";
const PDF_MIME: &str = "application/pdf";

/// JSON request body
#[derive(Debug, Deserialize)]
pub struct CompileRequest {
    #[serde(default)]
    pub tex_source: Option<String>,
    /// Auxiliary files: relative path -> base64 content
    #[serde(default)]
    pub files: Option<BTreeMap<String, String>>,
}

/// POST /{compiler} - Compile a document with the engine named by the path
///
/// The body is the raw TeX source, or a JSON [`CompileRequest`] when the
/// content type is `application/json`. Responds with the PDF itself, or a
/// JSON envelope when `Accept` is exactly `application/json`.
#[instrument(skip_all, fields(path = %uri.path()))]
pub async fn compile_document(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ApiError> {
    let config = state.runner.config();

    let id = uri.path().replace('/', "");
    let compiler = config
        .get_compiler(&id)
        .map_err(|_| ApiError::InvalidCompiler(id.clone()))?;

    info!(%compiler, "incoming request");

    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .ok_or(ApiError::MissingContentLength {
            strict: config.strict_content_length,
        })?
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok());

    let limit = config.max_body_bytes;
    if content_length.is_some_and(|len| len > limit) {
        return Err(ApiError::PayloadTooLarge { limit });
    }

    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(ApiError::Body)?;

    let job = if is_json(&headers) {
        let request: CompileRequest =
            serde_json::from_slice(&body).map_err(ApiError::MalformedBody)?;
        let source = request.tex_source.ok_or(ApiError::MissingTexSource)?;
        debug!(
            source_len = source.len(),
            files = request.files.as_ref().map_or(0, BTreeMap::len),
            "json request"
        );
        CompileJob::new(compiler, source).with_files(request.files.unwrap_or_default())
    } else {
        debug!(source_len = body.len(), "raw request");
        CompileJob::new(compiler, body.to_vec())
    };

    let result = state.runner.run_job(&job).await?;

    if wants_json(&headers) {
        let envelope = Envelope::success(STANDARD.encode(&result.artifact), result.process.output);
        return Ok(Json(envelope).into_response());
    }

    Ok(([(header::CONTENT_TYPE, PDF_MIME)], result.artifact).into_response())
}

/// Check whether the body should be read as a JSON request
///
/// Parameters such as `charset` are ignored.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(JSON_MIME))
}

/// Check whether the client asked for a JSON envelope instead of the PDF
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .is_some_and(|v| v.as_bytes() == JSON_MIME.as_bytes())
}
