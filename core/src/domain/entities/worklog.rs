//! WorkLog entity: the unit of settlement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Settlement status of a worklog
///
/// `Open -> Settled` is the only transition; `Settled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkLogStatus {
    Open,
    Settled,
}

impl WorkLogStatus {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Settled => "SETTLED",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(Self::Open),
            "SETTLED" => Some(Self::Settled),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkLogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of time segments for one user that is settled as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLog {
    /// Unique identifier for the worklog
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Current settlement status
    pub status: WorkLogStatus,

    /// Final payable amount; `None` until settled
    pub amount: Option<Decimal>,

    /// Timestamp when the worklog was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the worklog was settled
    pub settled_at: Option<DateTime<Utc>>,

    /// Optimistic concurrency counter, bumped on every write
    pub version: i64,
}

impl WorkLog {
    /// Creates a new open worklog for a user
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: WorkLogStatus::Open,
            amount: None,
            created_at: Utc::now(),
            settled_at: None,
            version: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == WorkLogStatus::Open
    }

    pub fn is_settled(&self) -> bool {
        self.status == WorkLogStatus::Settled
    }

    /// Marks the worklog settled with its final amount
    ///
    /// Status and amount change together. Callers must check `is_open` first;
    /// storage adapters enforce the single transition under a row lock.
    pub fn settle(&mut self, amount: Decimal, settled_at: DateTime<Utc>) {
        self.status = WorkLogStatus::Settled;
        self.amount = Some(amount);
        self.settled_at = Some(settled_at);
        self.version += 1;
    }
}
