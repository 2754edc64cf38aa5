use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use wr_core::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use wr_core::services::NotificationNotifier;

use super::AppState;
use crate::dto::AuditLogQuery;
use crate::handlers::{handle_domain_error, handle_validation_errors};

/// Handler for GET /api/v1/worklogs/{id}/audit-log?limit=n
///
/// Returns the settlement audit entries of a worklog, newest first. An id
/// with no history yields an empty list.
pub async fn audit_log<W, A, U, N>(
    state: web::Data<AppState<W, A, U, N>>,
    worklog_id: web::Path<Uuid>,
    query: web::Query<AuditLogQuery>,
) -> HttpResponse
where
    W: WorklogRepository + 'static,
    A: AuditLogRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationNotifier + 'static,
{
    if let Err(errors) = query.validate() {
        return handle_validation_errors(&errors);
    }

    match state
        .orchestrator
        .audit_trail(worklog_id.into_inner(), query.limit())
        .await
    {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(error) => handle_domain_error(&error),
    }
}
