use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use summariser_common::SummariserError;
use summariser_llm::PromptKind;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::pipeline;
use crate::state::AppState;

/// POST /summarize
pub async fn summarize(
    req: HttpRequest,
    body: Result<web::Bytes, actix_web::Error>,
    state: web::Data<AppState>,
) -> HttpResponse {
    respond(PromptKind::Summary, &req, body, &state).await
}

/// POST /keypoints
pub async fn keypoints(
    req: HttpRequest,
    body: Result<web::Bytes, actix_web::Error>,
    state: web::Data<AppState>,
) -> HttpResponse {
    respond(PromptKind::KeyPoints, &req, body, &state).await
}

async fn respond(
    kind: PromptKind,
    req: &HttpRequest,
    body: Result<web::Bytes, actix_web::Error>,
    state: &AppState,
) -> HttpResponse {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let outcome = match body {
        Ok(body) => pipeline::handle(state, kind, content_type, &body).await,
        Err(e) => Err(payload_error(&e)),
    };

    // Rendered here rather than returned as `Err`: an error attached to the
    // response would be logged a second time by the tracing middleware.
    match outcome {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(err) => {
            log_failure(kind, &err);
            ApiError(err).error_response()
        }
    }
}

fn payload_error(err: &actix_web::Error) -> SummariserError {
    if err.as_response_error().status_code() == StatusCode::PAYLOAD_TOO_LARGE {
        SummariserError::PayloadTooLarge
    } else {
        SummariserError::validation("Failed to read request body")
    }
}

/// One log entry per failed request
fn log_failure(kind: PromptKind, err: &SummariserError) {
    let status = err.status_code();

    if err.is_client_error() {
        warn!(endpoint = kind.as_str(), status, "Request rejected: {}", err);
    } else {
        error!(endpoint = kind.as_str(), status, "Request failed: {}", err);
    }
}
