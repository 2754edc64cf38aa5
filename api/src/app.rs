//! Application factory
//!
//! Builds the Actix-web application around a shared settlement
//! orchestrator. The server binary and the integration tests both use it.

use actix_web::{web, App, HttpResponse};

use crate::handlers::extractor_error;
use crate::routes::worklogs::{
    audit_log::audit_log, list::list_worklogs, preview::preview, settle::settle,
    settle_all::settle_all, settle_batch::settle_batch, AppState,
};

use wr_core::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use wr_core::services::NotificationNotifier;
use wr_shared::error_codes;

/// Create and configure the application with all dependencies
pub fn create_app<W, A, U, N>(
    app_state: web::Data<AppState<W, A, U, N>>,
    max_payload_size: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    W: WorklogRepository + 'static,
    A: AuditLogRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationNotifier + 'static,
{
    App::new()
        // Add application state
        .app_data(app_state)
        // Extractor failures answer with the shared JSON error body
        .app_data(
            web::JsonConfig::default()
                .limit(max_payload_size)
                .error_handler(|err, _req| extractor_error(err)),
        )
        // Optional settle bodies are read as raw bytes
        .app_data(web::PayloadConfig::new(max_payload_size))
        .app_data(web::PathConfig::default().error_handler(|err, _req| extractor_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| extractor_error(err)))
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/worklogs")
                    .route("", web::get().to(list_worklogs::<W, A, U, N>))
                    // Fixed paths first so they never match `{id}`
                    .route("/settle-batch", web::post().to(settle_batch::<W, A, U, N>))
                    .route("/settle-all", web::post().to(settle_all::<W, A, U, N>))
                    .route("/{id}/settle", web::post().to(settle::<W, A, U, N>))
                    .route("/{id}/preview", web::get().to(preview::<W, A, U, N>))
                    .route("/{id}/audit-log", web::get().to(audit_log::<W, A, U, N>)),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "workremit-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": error_codes::NOT_FOUND,
        "message": "The requested resource was not found"
    }))
}
