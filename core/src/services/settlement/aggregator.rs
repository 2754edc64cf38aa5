use rust_decimal::Decimal;

use crate::domain::entities::TimeSegment;
use crate::errors::{DomainError, DomainResult};

/// Sums the billable value of a worklog's time segments
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentAggregator;

impl SegmentAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Sum of `hours * rate` over active segments, unrounded.
    ///
    /// Every segment is validated, removed ones included: negative hours or
    /// rate fails the whole aggregate with `InvalidSegment`.
    pub fn aggregate(&self, segments: &[TimeSegment]) -> DomainResult<Decimal> {
        for segment in segments {
            if segment.hours < Decimal::ZERO {
                return Err(DomainError::InvalidSegment {
                    segment_id: segment.id,
                    reason: format!("hours must be non-negative, got {}", segment.hours),
                });
            }
            if segment.rate < Decimal::ZERO {
                return Err(DomainError::InvalidSegment {
                    segment_id: segment.id,
                    reason: format!("rate must be non-negative, got {}", segment.rate),
                });
            }
        }

        segments
            .iter()
            .filter(|s| s.is_active())
            .try_fold(Decimal::ZERO, |total, segment| {
                segment
                    .hours
                    .checked_mul(segment.rate)
                    .and_then(|value| total.checked_add(value))
                    .ok_or_else(|| DomainError::InvalidSegment {
                        segment_id: segment.id,
                        reason: "segment value overflows".to_string(),
                    })
            })
    }
}
