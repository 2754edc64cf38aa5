use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::errors::{DomainError, DomainResult};

/// Markup applied to finalized settlements
pub const MARKUP_FACTOR: Decimal = dec!(1.10);

/// Decimal places of a payable amount
pub const CURRENCY_SCALE: u32 = 2;

/// Computes the final payable amount of a worklog
#[derive(Debug, Clone, Copy, Default)]
pub struct RemittanceCalculator;

impl RemittanceCalculator {
    pub fn new() -> Self {
        Self
    }

    /// `(base - adjustment)`, times [`MARKUP_FACTOR`] when finalizing.
    ///
    /// Intermediate values keep full precision; the result is rounded once,
    /// half away from zero, to [`CURRENCY_SCALE`] places. A negative total is
    /// rejected with `InvalidAmount`.
    pub fn calculate(
        &self,
        base: Decimal,
        adjustment: Decimal,
        finalize: bool,
    ) -> DomainResult<Decimal> {
        let mut total = base
            .checked_sub(adjustment)
            .ok_or_else(|| overflow(base))?;

        if finalize {
            total = total
                .checked_mul(MARKUP_FACTOR)
                .ok_or_else(|| overflow(total))?;
        }

        if total < Decimal::ZERO {
            return Err(DomainError::InvalidAmount {
                amount: total,
                reason: "settlement total may not be negative".to_string(),
            });
        }

        let mut amount =
            total.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(CURRENCY_SCALE);
        Ok(amount)
    }
}

fn overflow(amount: Decimal) -> DomainError {
    DomainError::InvalidAmount {
        amount,
        reason: "settlement total overflows".to_string(),
    }
}
