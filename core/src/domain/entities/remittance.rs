//! Remittance entity: the payable record produced by a settlement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payable amount owed to a user for one settled worklog.
///
/// Created only by the settlement flow and never mutated; storage keeps
/// `worklog_id` unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remittance {
    pub id: Uuid,
    pub worklog_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Remittance {
    pub fn new(worklog_id: Uuid, user_id: Uuid, amount: Decimal, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            worklog_id,
            user_id,
            amount,
            created_at,
        }
    }
}
