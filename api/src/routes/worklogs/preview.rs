use actix_web::{web, HttpResponse};
use uuid::Uuid;

use wr_core::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use wr_core::services::NotificationNotifier;

use super::AppState;
use crate::dto::PreviewQuery;
use crate::handlers::handle_domain_error;

/// Handler for GET /api/v1/worklogs/{id}/preview?finalize=bool
///
/// Computes the amount without writing anything. A settled worklog reports
/// its committed amount.
pub async fn preview<W, A, U, N>(
    state: web::Data<AppState<W, A, U, N>>,
    worklog_id: web::Path<Uuid>,
    query: web::Query<PreviewQuery>,
) -> HttpResponse
where
    W: WorklogRepository + 'static,
    A: AuditLogRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationNotifier + 'static,
{
    let orchestrator = &state.orchestrator;
    let finalize = query
        .finalize
        .unwrap_or_else(|| orchestrator.default_options().finalize);

    match orchestrator.preview(worklog_id.into_inner(), finalize).await {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(error) => handle_domain_error(&error),
    }
}
