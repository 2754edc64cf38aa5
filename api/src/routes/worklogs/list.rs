use actix_web::{web, HttpResponse};

use wr_core::repositories::{AuditLogRepository, UserRepository, WorklogRepository};
use wr_core::services::NotificationNotifier;

use super::AppState;
use crate::dto::{ListWorklogsQuery, StatusFilter, WorklogListResponse};
use crate::handlers::handle_domain_error;

/// Handler for GET /api/v1/worklogs?status=open|settled&finalize=bool
///
/// Lists every worklog, oldest first. Settled rows carry their committed
/// amount, open rows the amount they would settle for now. An unrecognised
/// `status` matches nothing and yields an empty list.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "data": [{ "worklog_id": "8d0f...", "user_id": "...", "status": "OPEN", "amount": "90.00", "created_at": "..." }],
///     "count": 1
/// }
/// ```
pub async fn list_worklogs<W, A, U, N>(
    state: web::Data<AppState<W, A, U, N>>,
    query: web::Query<ListWorklogsQuery>,
) -> HttpResponse
where
    W: WorklogRepository + 'static,
    A: AuditLogRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationNotifier + 'static,
{
    let status = match query.status_filter() {
        StatusFilter::All => None,
        StatusFilter::Only(status) => Some(status),
        StatusFilter::Unknown => {
            tracing::debug!(status = ?query.status, "Unknown status filter");
            return HttpResponse::Ok().json(WorklogListResponse::from(Vec::new()));
        }
    };

    let orchestrator = &state.orchestrator;
    let finalize = query
        .finalize
        .unwrap_or_else(|| orchestrator.default_options().finalize);

    match orchestrator.list_worklogs(status, finalize).await {
        Ok(summaries) => HttpResponse::Ok().json(WorklogListResponse::from(summaries)),
        Err(error) => handle_domain_error(&error),
    }
}
