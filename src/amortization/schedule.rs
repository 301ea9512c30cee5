use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{PaymentFrequency, PaymentScheme};

/// one row of an amortization schedule.
///
/// Interest is the opening balance times the periodic rate, except the first row of
/// an advance schedule: that installment is collected before any interest accrues,
/// so its interest portion is zero and the whole payment goes to principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEntry {
    pub period_index: u32,
    pub opening_balance: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub installment: Money,
    pub closing_balance: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// lazily generated schedule rows.
///
/// Rows are rounded to the currency sub-unit. The final row takes whatever balance
/// remains so the loan closes at exactly zero.
#[derive(Debug, Clone)]
pub struct ScheduleIter {
    installment: Money,
    periodic_rate: Rate,
    periods: u32,
    scheme: PaymentScheme,
    frequency: PaymentFrequency,
    start_date: Option<NaiveDate>,
    next_period: u32,
    balance: Money,
}

impl ScheduleIter {
    pub(crate) fn new(
        principal: Money,
        installment: Money,
        periodic_rate: Rate,
        periods: u32,
        scheme: PaymentScheme,
        frequency: PaymentFrequency,
        start_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            installment: installment.to_minor_units(),
            periodic_rate,
            periods,
            scheme,
            frequency,
            start_date,
            next_period: 1,
            balance: principal,
        }
    }

    fn interest_for(&self, period: u32, opening: Money) -> Money {
        // an advance installment is collected before any interest accrues
        if period == 1 && self.scheme == PaymentScheme::Advance {
            return Money::ZERO;
        }
        (opening * self.periodic_rate.as_decimal()).to_minor_units()
    }
}

impl Iterator for ScheduleIter {
    type Item = PeriodEntry;

    fn next(&mut self) -> Option<PeriodEntry> {
        if self.next_period > self.periods {
            return None;
        }
        let period = self.next_period;
        let opening = self.balance;
        let interest = self.interest_for(period, opening);

        let (principal_portion, installment) = if period == self.periods {
            (opening, interest + opening)
        } else {
            let scheduled = self.installment - interest;
            let portion = scheduled.max(Money::ZERO).min(opening);
            if portion == scheduled {
                (portion, self.installment)
            } else {
                (portion, interest + portion)
            }
        };

        let closing = if period == self.periods {
            Money::ZERO
        } else {
            (opening - principal_portion).max(Money::ZERO)
        };

        self.balance = closing;
        self.next_period += 1;

        Some(PeriodEntry {
            period_index: period,
            opening_balance: opening,
            interest_portion: interest,
            principal_portion,
            installment,
            closing_balance: closing,
            due_date: self
                .start_date
                .and_then(|start| due_date(start, self.frequency, self.scheme, period)),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.periods + 1).saturating_sub(self.next_period) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScheduleIter {}

/// due date of `period` for a loan starting on `start`.
///
/// Arrears installments fall due at the end of each period, advance ones at its start.
pub fn due_date(
    start: NaiveDate,
    frequency: PaymentFrequency,
    scheme: PaymentScheme,
    period: u32,
) -> Option<NaiveDate> {
    let offset = match scheme {
        PaymentScheme::Arrears => period,
        PaymentScheme::Advance => period.saturating_sub(1),
    };
    match frequency {
        PaymentFrequency::Monthly => start.checked_add_months(Months::new(offset)),
        PaymentFrequency::Quarterly => start.checked_add_months(Months::new(offset.checked_mul(3)?)),
        PaymentFrequency::Weekly => start.checked_add_days(Days::new(u64::from(offset) * 7)),
    }
}

/// year-wise totals of a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_paid: Money,
    pub closing_balance: Money,
}

/// group schedule rows into loan years of `periods_per_year` rows each
pub fn yearly_summary(schedule: &[PeriodEntry], periods_per_year: u32) -> Vec<YearlySummary> {
    let per_year = periods_per_year.max(1) as usize;
    schedule
        .chunks(per_year)
        .enumerate()
        .map(|(i, rows)| {
            let principal_paid: Money = rows.iter().map(|r| r.principal_portion).sum();
            let interest_paid: Money = rows.iter().map(|r| r.interest_portion).sum();
            YearlySummary {
                year: i as u32 + 1,
                principal_paid,
                interest_paid,
                total_paid: principal_paid + interest_paid,
                closing_balance: rows.last().map(|r| r.closing_balance).unwrap_or(Money::ZERO),
            }
        })
        .collect()
}
