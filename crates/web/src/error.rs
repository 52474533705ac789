use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stargaze_core::ingest::UpstreamError;

use crate::views;

/// Error shown to the viewer as an HTML page instead of a blank response.
#[derive(Debug)]
pub struct PageError {
    pub status: StatusCode,
    pub message: String,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(err: anyhow::Error) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("{err:#}"))
    }

    pub fn unconfigured() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "NASA_API_KEY is not configured on this server",
        )
    }

    /// A failed call to the data source. Reported to Sentry when enabled.
    pub fn upstream(err: anyhow::Error) -> Self {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %format!("{err:#}"), "data source call failed");

        let message = match err.downcast_ref::<UpstreamError>() {
            Some(e) if e.is_unauthorized() => {
                "The data source rejected the configured API key.".to_string()
            }
            Some(e) if e.is_rate_limited() => {
                "The data source rate limit was hit; try again later.".to_string()
            }
            Some(e) => format!("The data source answered with HTTP {}.", e.status),
            // Details stay in logs; bodies and causes may echo request urls.
            None => "The data source returned an unexpected response.".to_string(),
        };
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let page = views::error_page(self.status.as_u16(), &self.message);
        (self.status, page).into_response()
    }
}
