//! Adjustment entity: a signed correction applied to a worklog at settlement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signed amount subtracted from the aggregated base.
///
/// Positive values deduct, negative values credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: Uuid,
    pub worklog_id: Uuid,
    pub amount: Decimal,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Adjustment {
    pub fn new(worklog_id: Uuid, amount: Decimal, reason: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            worklog_id,
            amount,
            reason: reason.into(),
            created_at: Utc::now(),
        }
    }

    /// Net adjustment of a worklog; zero when there are none.
    ///
    /// `None` if the sum overflows.
    pub fn total(adjustments: &[Adjustment]) -> Option<Decimal> {
        adjustments
            .iter()
            .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a.amount))
    }
}
