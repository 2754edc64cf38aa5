use actix_web::{web, HttpRequest, HttpResponse};

use wr_core::domain::value_objects::SettleOptions;
use wr_core::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use wr_core::services::{CancellationFlag, NotificationNotifier};

use super::AppState;
use crate::dto::SettleAllRequest;
use crate::handlers::{handle_domain_error, optional_json_body};

/// Handler for POST /api/v1/worklogs/settle-all
///
/// Settles every open worklog of every active user. Responds with the same
/// batch result as `settle-batch`; nothing open yields an empty result.
/// The body is optional, as for a single settle.
pub async fn settle_all<W, A, U, N>(
    state: web::Data<AppState<W, A, U, N>>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse
where
    W: WorklogRepository + 'static,
    A: AuditLogRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationNotifier + 'static,
{
    let request: SettleAllRequest = match optional_json_body(&req, &body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let orchestrator = &state.orchestrator;
    let options = request
        .finalize
        .map(SettleOptions::new)
        .unwrap_or_else(|| orchestrator.default_options());

    match orchestrator
        .settle_all_open_detached(options, CancellationFlag::new())
        .await
    {
        Ok(batch) => HttpResponse::Ok().json(batch),
        Err(error) => handle_domain_error(&error),
    }
}
