use actix_web::{error::InternalError, http::StatusCode, HttpResponse};
use validator::ValidationErrors;
use wr_core::errors::DomainError;
use wr_shared::{error_codes, ErrorResponse};

fn respond(status: StatusCode, body: ErrorResponse) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::AlreadySettled { .. } | DomainError::ConcurrentModification { .. } => {
            StatusCode::CONFLICT
        }
        DomainError::InvalidSegment { .. }
        | DomainError::InvalidAmount { .. }
        | DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::TransientStorage { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::AuditPersistence { .. } | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!(kind = error.kind(), "Request failed: {}", error);
    } else {
        tracing::debug!(kind = error.kind(), "Request rejected: {}", error);
    }

    // Infrastructure details stay in the logs
    let message = match error {
        DomainError::Internal { .. } => "An internal error occurred".to_string(),
        other => other.to_string(),
    };

    let mut response = ErrorResponse::new(error.kind(), message);
    match error {
        DomainError::AlreadySettled { worklog_id }
        | DomainError::ConcurrentModification { worklog_id } => {
            response = response.add_detail("worklog_id", worklog_id);
        }
        DomainError::InvalidSegment { segment_id, .. } => {
            response = response.add_detail("segment_id", segment_id);
        }
        DomainError::TransientStorage { .. } => {
            response = response.add_detail("retriable", true);
        }
        _ => {}
    }

    respond(status, response)
}

/// 400 response listing the failed fields of a request
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    respond(StatusCode::BAD_REQUEST, response)
}

/// Plain 400 with the shared `bad_request` code
pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    respond(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new(error_codes::BAD_REQUEST, message),
    )
}

/// Turn an extractor failure (bad JSON, path or query) into a JSON 400
pub fn extractor_error(err: impl std::fmt::Display + std::fmt::Debug + 'static) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}
