use crate::domain::service::ClinicService;
use crate::web::handlers;
use axum::{routing::get, Extension, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Assemble the clinic router with the service injected per-request.
pub fn router(service: Arc<ClinicService>) -> Router {
    Router::new()
        .route("/owners/{owner_id}", get(handlers::owner_detail))
        .route(
            "/owners/{owner_id}/pets/new",
            get(handlers::show_create_form).post(handlers::submit_create_form),
        )
        .route(
            "/owners/{owner_id}/pets/{pet_id}/edit",
            get(handlers::show_edit_form).post(handlers::submit_edit_form),
        )
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
}
