use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use wr_core::domain::value_objects::SettleOptions;
use wr_core::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use wr_core::services::NotificationNotifier;

use super::AppState;
use crate::dto::SettleRequest;
use crate::handlers::{handle_domain_error, optional_json_body};

/// Handler for POST /api/v1/worklogs/{id}/settle
///
/// # Request Body (optional)
///
/// ```json
/// { "finalize": true }
/// ```
///
/// An empty body settles with the configured default. A body that is not
/// JSON of this shape is rejected before anything is settled.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "worklog_id": "8d0f...",
///     "remittance_id": "1c2a...",
///     "amount": "99.00",
///     "status": "SETTLED"
/// }
/// ```
///
/// ## Errors
/// - 404 Not Found: No such worklog
/// - 409 Conflict: Already settled or modified concurrently
/// - 400 Bad Request: Unreadable body, invalid segment or amount
/// - 503 Service Unavailable: Storage kept failing after retries
/// - 500 Internal Server Error: Audit log could not be written
pub async fn settle<W, A, U, N>(
    state: web::Data<AppState<W, A, U, N>>,
    req: HttpRequest,
    worklog_id: web::Path<Uuid>,
    body: web::Bytes,
) -> HttpResponse
where
    W: WorklogRepository + 'static,
    A: AuditLogRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationNotifier + 'static,
{
    let request: SettleRequest = match optional_json_body(&req, &body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let orchestrator = &state.orchestrator;
    let options = request
        .finalize
        .map(SettleOptions::new)
        .unwrap_or_else(|| orchestrator.default_options());

    // Detached so a client disconnect cannot interrupt the audit write
    match orchestrator
        .settle_one_detached(worklog_id.into_inner(), options)
        .await
    {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(error) => handle_domain_error(&error),
    }
}
