use actix_web::{web, HttpResponse};
use validator::Validate;

use wr_core::domain::value_objects::SettleOptions;
use wr_core::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use wr_core::services::{CancellationFlag, NotificationNotifier};

use super::AppState;
use crate::dto::SettleBatchRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/worklogs/settle-batch
///
/// Every id is settled in its own transaction. Per-item failures are part
/// of the 200 response; only a malformed request is rejected.
///
/// # Request Body
///
/// ```json
/// { "worklog_ids": ["8d0f...", "2b7e..."], "finalize": false }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "processed": 2,
///     "succeeded": 1,
///     "failed": 1,
///     "errors": [{ "worklog_id": "2b7e...", "kind": "invalid_segment", "message": "..." }],
///     "settled": [{ "worklog_id": "8d0f...", "remittance_id": "...", "amount": "90.00", "status": "SETTLED" }]
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Empty or oversized id list
pub async fn settle_batch<W, A, U, N>(
    state: web::Data<AppState<W, A, U, N>>,
    request: web::Json<SettleBatchRequest>,
) -> HttpResponse
where
    W: WorklogRepository + 'static,
    A: AuditLogRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationNotifier + 'static,
{
    if let Err(errors) = request.validate() {
        tracing::warn!("Validation failed for settle_batch request: {}", errors);
        return handle_validation_errors(&errors);
    }

    let request = request.into_inner();
    let orchestrator = &state.orchestrator;
    let options = request
        .finalize
        .map(SettleOptions::new)
        .unwrap_or_else(|| orchestrator.default_options());

    // Dropping this future cancels the rest of the batch; started items
    // still finish with their audit rows.
    match orchestrator
        .settle_batch_detached(request.worklog_ids, options, CancellationFlag::new())
        .await
    {
        Ok(batch) => HttpResponse::Ok().json(batch),
        Err(error) => handle_domain_error(&error),
    }
}
