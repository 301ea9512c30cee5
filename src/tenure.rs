use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{PaymentFrequency, TenureSplit};

/// tenure as entered by the user, in whatever unit the calculator form shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tenure {
    Months(i64),
    YearsMonths { years: i64, months: i64 },
    Quarters(i64),
    YearsQuarters { years: i64, quarters: i64 },
    Weeks(i64),
    /// fractional years, converted at the product's frequency
    Years(Decimal),
}

/// canonical tenure handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTenure {
    pub frequency: PaymentFrequency,
    pub periods: u32,
}

impl NormalizedTenure {
    pub fn new(frequency: PaymentFrequency, periods: u32) -> Self {
        Self { frequency, periods }
    }

    pub fn periods_per_year(&self) -> u32 {
        self.frequency.periods_per_year()
    }

    /// tenure length in years
    pub fn years(&self) -> Decimal {
        Decimal::from(self.periods) / Decimal::from(self.periods_per_year())
    }
}

impl Tenure {
    /// reduce to a single period count.
    ///
    /// Units that name their own period (months, quarters, weeks) fix the frequency;
    /// `Years` uses `frequency` together with the product's `split` policy. A total
    /// at or below zero becomes zero periods, which the engine treats as "no loan".
    pub fn normalize(&self, frequency: PaymentFrequency, split: TenureSplit) -> NormalizedTenure {
        let (frequency, total) = match *self {
            Tenure::Months(months) => (PaymentFrequency::Monthly, months),
            Tenure::YearsMonths { years, months } => (
                PaymentFrequency::Monthly,
                years.saturating_mul(12).saturating_add(months),
            ),
            Tenure::Quarters(quarters) => (PaymentFrequency::Quarterly, quarters),
            Tenure::YearsQuarters { years, quarters } => (
                PaymentFrequency::Quarterly,
                years.saturating_mul(4).saturating_add(quarters),
            ),
            Tenure::Weeks(weeks) => (PaymentFrequency::Weekly, weeks),
            Tenure::Years(years) => (frequency, split_years(years, frequency.periods_per_year(), split)),
        };

        let periods = clamp_periods(total);
        if i64::from(periods) != total {
            tracing::debug!(total, periods, "tenure clamped to period range");
        }
        NormalizedTenure { frequency, periods }
    }
}

fn split_years(years: Decimal, periods_per_year: u32, split: TenureSplit) -> i64 {
    let per_year = Decimal::from(periods_per_year);
    let periods = match split {
        TenureSplit::FloorYears => {
            let whole = years.trunc();
            let remainder = (years - whole).checked_mul(per_year).map(|r| r.trunc());
            whole
                .checked_mul(per_year)
                .zip(remainder)
                .and_then(|(whole, remainder)| whole.checked_add(remainder))
        }
        TenureSplit::RoundTotal => years
            .checked_mul(per_year)
            .map(|total| total.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)),
    };
    let saturated = if years.is_sign_negative() { 0 } else { i64::MAX };
    periods.and_then(|p| p.to_i64()).unwrap_or(saturated)
}

fn clamp_periods(total: i64) -> u32 {
    if total <= 0 {
        0
    } else {
        u32::try_from(total).unwrap_or(u32::MAX)
    }
}
