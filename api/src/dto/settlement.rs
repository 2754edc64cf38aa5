use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use wr_core::domain::entities::WorkLogStatus;
use wr_core::domain::value_objects::WorklogSummary;

/// Default page size for audit history
pub const DEFAULT_AUDIT_LIMIT: u32 = 50;

/// Body of `POST /worklogs/{id}/settle`; the whole body is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettleRequest {
    /// Apply the markup; falls back to the configured default
    #[serde(default)]
    pub finalize: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SettleBatchRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "worklog_ids must contain between 1 and 1000 ids"
    ))]
    pub worklog_ids: Vec<Uuid>,

    #[serde(default)]
    pub finalize: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettleAllRequest {
    #[serde(default)]
    pub finalize: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewQuery {
    pub finalize: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AuditLogQuery {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
}

impl AuditLogQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_AUDIT_LIMIT) as usize
    }
}

/// Query of `GET /worklogs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListWorklogsQuery {
    /// `open` or `settled`, any case; `unremitted` and `remitted` are
    /// accepted as aliases
    pub status: Option<String>,
    /// Markup used for the amounts of open worklogs
    pub finalize: Option<bool>,
}

/// How a listing is narrowed by its `status` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(WorkLogStatus),
    /// Matches no worklog
    Unknown,
}

impl ListWorklogsQuery {
    pub fn status_filter(&self) -> StatusFilter {
        let Some(raw) = self.status.as_deref() else {
            return StatusFilter::All;
        };

        match raw.trim().to_ascii_uppercase().as_str() {
            "OPEN" | "UNREMITTED" => StatusFilter::Only(WorkLogStatus::Open),
            "SETTLED" | "REMITTED" => StatusFilter::Only(WorkLogStatus::Settled),
            _ => StatusFilter::Unknown,
        }
    }
}

/// Body of a worklog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorklogListResponse {
    pub data: Vec<WorklogSummary>,
    pub count: usize,
}

impl From<Vec<WorklogSummary>> for WorklogListResponse {
    fn from(data: Vec<WorklogSummary>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}
