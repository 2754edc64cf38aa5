pub mod settlement;

pub use settlement::{
    AuditLogQuery, ListWorklogsQuery, PreviewQuery, SettleAllRequest, SettleBatchRequest,
    SettleRequest, StatusFilter, WorklogListResponse,
};
