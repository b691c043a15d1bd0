//! Global error-to-response mapping.
//!
//! The single error-translation stage wrapping all handlers: domain
//! failures bubble up as `WebError` and turn into an error page here,
//! so no handler builds error responses by hand.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::domain::error::DomainError;
use crate::web::views;

pub struct WebError(pub DomainError);

impl From<DomainError> for WebError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match &self.0 {
            // Both "entity absent" failures render the generic error view
            // with the failure's message (id included).
            DomainError::OwnerNotFound { .. } | DomainError::PetNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Html(views::error_page(&self.0.to_string())),
            )
                .into_response(),
            DomainError::Database { .. } => {
                // Log the internal error details but don't expose them to the client
                tracing::error!(error = %self.0, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::error_page("An internal error occurred")),
                )
                    .into_response()
            }
        }
    }
}
