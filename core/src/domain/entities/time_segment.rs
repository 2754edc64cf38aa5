//! Time segment entity: a span of billable work inside a worklog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a segment still counts towards its worklog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentStatus {
    Active,
    Removed,
}

impl SegmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Removed => "REMOVED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "REMOVED" => Some(Self::Removed),
            _ => None,
        }
    }
}

/// Read-only record of hours worked at a rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSegment {
    pub id: Uuid,
    pub worklog_id: Uuid,
    /// Hours worked, expected non-negative
    pub hours: Decimal,
    /// Rate per hour, expected non-negative
    pub rate: Decimal,
    pub status: SegmentStatus,
    pub created_at: DateTime<Utc>,
}

impl TimeSegment {
    /// Creates a new active segment
    pub fn new(worklog_id: Uuid, hours: Decimal, rate: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            worklog_id,
            hours,
            rate,
            status: SegmentStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Marks the segment removed so it no longer contributes
    pub fn removed(mut self) -> Self {
        self.status = SegmentStatus::Removed;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == SegmentStatus::Active
    }
}
