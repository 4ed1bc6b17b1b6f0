use actix_web::http::header::RETRY_AFTER;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use summariser_common::SummariserError;

use crate::types::ErrorResponse;

/// actix-web adapter for [`SummariserError`]
///
/// Only [`SummariserError::client_message`] reaches the caller.
#[derive(Debug)]
pub struct ApiError(pub SummariserError);

impl From<SummariserError> for ApiError {
    fn from(err: SummariserError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());

        if let SummariserError::RateLimited { retry_after } = &self.0 {
            // whole seconds, rounded up, never zero
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response.insert_header((RETRY_AFTER, secs.max(1).to_string()));
        }

        response.json(ErrorResponse::new(self.0.client_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use summariser_common::GenerationError;

    #[test]
    fn test_rate_limited_response() {
        let err = ApiError(SummariserError::RateLimited {
            retry_after: Duration::from_millis(1500),
        });
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "2");
    }

    #[test]
    fn test_status_mapping() {
        let err = ApiError(GenerationError::Blocked("SAFETY".into()).into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError(SummariserError::UnsupportedMediaType);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err = ApiError(GenerationError::provider("timeout").into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
