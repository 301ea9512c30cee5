pub mod installment;
pub mod schedule;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::tenure::NormalizedTenure;
use crate::types::{InstallmentRounding, PaymentFrequency, PaymentScheme};

pub use schedule::{due_date, yearly_summary, PeriodEntry, ScheduleIter, YearlySummary};

/// rows shown when a caller asks for a preview only
pub const DEFAULT_PREVIEW_PERIODS: usize = 20;

/// a single calculation request, built fresh for every recalculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: Money,
    pub annual_rate: Rate,
    pub frequency: PaymentFrequency,
    pub tenure_periods: u32,
    pub payment_scheme: PaymentScheme,
    pub start_date: Option<NaiveDate>,
}

impl LoanRequest {
    /// arrears request without due dates
    pub fn new(
        principal: Money,
        annual_rate_percent: Decimal,
        frequency: PaymentFrequency,
        tenure_periods: u32,
    ) -> Self {
        Self {
            principal,
            annual_rate: Rate::from_percent(annual_rate_percent),
            frequency,
            tenure_periods,
            payment_scheme: PaymentScheme::Arrears,
            start_date: None,
        }
    }

    pub fn from_tenure(principal: Money, annual_rate_percent: Decimal, tenure: NormalizedTenure) -> Self {
        Self::new(principal, annual_rate_percent, tenure.frequency, tenure.periods)
    }

    pub fn with_scheme(mut self, scheme: PaymentScheme) -> Self {
        self.payment_scheme = scheme;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn periods_per_year(&self) -> u32 {
        self.frequency.periods_per_year()
    }

    /// annual percent / (periods per year * 100)
    pub fn periodic_rate(&self) -> Rate {
        self.annual_rate.periodic(self.periods_per_year())
    }
}

/// outcome of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub periodic_installment: Money,
    pub periodic_rate: Rate,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub schedule: Vec<PeriodEntry>,
}

impl AmortizationResult {
    /// first `periods` rows of the schedule
    pub fn preview(&self, periods: usize) -> &[PeriodEntry] {
        &self.schedule[..periods.min(self.schedule.len())]
    }

    pub fn principal_percentage(&self) -> Decimal {
        self.total_principal.percentage_of(self.total_payment)
    }

    pub fn interest_percentage(&self) -> Decimal {
        self.total_interest.percentage_of(self.total_payment)
    }

    pub fn yearly_summary(&self, periods_per_year: u32) -> Vec<YearlySummary> {
        yearly_summary(&self.schedule, periods_per_year)
    }

    /// tenure was zero, nothing to show
    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }
}

/// EMI amortization engine.
///
/// Pure and stateless apart from the display rounding policy, so one engine can
/// serve any number of concurrent calculations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmortizationEngine {
    rounding: InstallmentRounding,
}

impl AmortizationEngine {
    pub fn new(rounding: InstallmentRounding) -> Self {
        Self { rounding }
    }

    pub fn rounding(&self) -> InstallmentRounding {
        self.rounding
    }

    /// unrounded periodic installment, adjusted for the payment scheme
    pub fn compute_installment(&self, request: &LoanRequest) -> Money {
        installment::installment(
            request.principal,
            request.periodic_rate(),
            request.tenure_periods,
            request.payment_scheme,
        )
    }

    /// lazy schedule for the request
    pub fn schedule_iter(&self, request: &LoanRequest) -> ScheduleIter {
        ScheduleIter::new(
            request.principal,
            self.compute_installment(request),
            request.periodic_rate(),
            request.tenure_periods,
            request.payment_scheme,
            request.frequency,
            request.start_date,
        )
    }

    /// full schedule, one row per period
    pub fn compute_schedule(&self, request: &LoanRequest) -> Vec<PeriodEntry> {
        self.schedule_iter(request).collect()
    }

    /// installment, schedule and totals in one pass
    pub fn amortize(&self, request: &LoanRequest) -> AmortizationResult {
        let installment = self.compute_installment(request);
        let schedule = self.compute_schedule(request);

        let total_principal: Money = schedule.iter().map(|p| p.principal_portion).sum();
        let total_payment: Money = schedule.iter().map(|p| p.installment).sum();
        let total_interest = total_payment - total_principal;

        tracing::debug!(
            principal = %request.principal,
            rate = %request.annual_rate,
            periods = request.tenure_periods,
            scheme = ?request.payment_scheme,
            installment = %installment,
            "amortized loan"
        );

        AmortizationResult {
            periodic_installment: self.rounding.apply(installment),
            periodic_rate: request.periodic_rate(),
            total_principal,
            total_interest,
            total_payment,
            schedule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn engine() -> AmortizationEngine {
        AmortizationEngine::new(InstallmentRounding::MinorUnits)
    }

    /// fixtures covering all three frequencies, both schemes and a zero rate
    fn requests() -> Vec<LoanRequest> {
        let mut out = Vec::new();
        for (frequency, periods) in [
            (PaymentFrequency::Monthly, 1),
            (PaymentFrequency::Monthly, 84),
            (PaymentFrequency::Quarterly, 20),
            (PaymentFrequency::Weekly, 260),
        ] {
            for percent in [dec!(0), dec!(7.25), dec!(18)] {
                for scheme in [PaymentScheme::Arrears, PaymentScheme::Advance] {
                    out.push(
                        LoanRequest::new(Money::from_decimal(dec!(845123.45)), percent, frequency, periods)
                            .with_scheme(scheme),
                    );
                }
            }
        }
        out
    }

    #[test]
    fn test_monthly_scenario() {
        let request = LoanRequest::new(Money::from_major(1_000_000), dec!(10), PaymentFrequency::Monthly, 12);
        let result = engine().amortize(&request);

        assert!((request.periodic_rate().as_decimal() - dec!(0.008333)).abs() < dec!(0.000001));
        assert_eq!(result.periodic_installment.as_decimal(), dec!(87915.89));
        assert!((result.total_payment.as_decimal() - dec!(1054990.65)).abs() < dec!(0.10));
        assert!((result.total_interest.as_decimal() - dec!(54990.65)).abs() < dec!(0.10));
        assert_eq!(result.total_principal, Money::from_major(1_000_000));

        let whole = AmortizationEngine::new(InstallmentRounding::WholeUnits).amortize(&request);
        assert_eq!(whole.periodic_installment, Money::from_major(87916));
    }

    #[test]
    fn test_interest_free_quarterly_scenario() {
        let request = LoanRequest::new(Money::from_major(500_000), dec!(0), PaymentFrequency::Quarterly, 20);
        let result = engine().amortize(&request);
        assert_eq!(result.periodic_installment, Money::from_major(25_000));
        assert_eq!(result.total_interest, Money::ZERO);
        assert_eq!(result.total_payment, Money::from_major(500_000));
        assert!(result.schedule.iter().all(|r| r.installment == Money::from_major(25_000)));
    }

    #[test]
    fn test_zero_tenure_is_empty() {
        let request = LoanRequest::new(Money::from_major(50_000), dec!(12), PaymentFrequency::Monthly, 0);
        let result = engine().amortize(&request);
        assert_eq!(result.periodic_installment, Money::ZERO);
        assert!(result.is_empty());
        assert_eq!(result.total_payment, Money::ZERO);
        assert_eq!(result.total_interest, Money::ZERO);
        assert_eq!(result.principal_percentage(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_principal() {
        let request = LoanRequest::new(Money::ZERO, dec!(12), PaymentFrequency::Weekly, 10);
        let result = engine().amortize(&request);
        assert_eq!(result.schedule.len(), 10);
        assert_eq!(result.total_payment, Money::ZERO);
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        for request in requests().iter().filter(|r| r.annual_rate.is_zero()) {
            let emi = engine().compute_installment(request);
            let expected = request.principal.as_decimal() / Decimal::from(request.tenure_periods);
            assert!((emi.as_decimal() - expected).abs() < dec!(0.00000001));
            assert_eq!(engine().amortize(request).total_interest, Money::ZERO);
        }
    }

    #[test]
    fn test_schedule_properties_hold_across_requests() {
        for request in requests() {
            let result = engine().amortize(&request);
            let schedule = &result.schedule;
            assert_eq!(schedule.len(), request.tenure_periods as usize);
            assert_eq!(schedule.last().unwrap().closing_balance, Money::ZERO, "{request:?}");

            let repaid: Money = schedule.iter().map(|p| p.principal_portion).sum();
            let tolerance = Money::MINOR_UNIT.as_decimal() * Decimal::from(request.tenure_periods);
            assert!((repaid - request.principal).as_decimal().abs() <= tolerance, "{request:?}");

            for pair in schedule.windows(2) {
                assert!(pair[0].closing_balance >= pair[1].closing_balance, "{request:?}");
            }

            assert_eq!(result.total_payment - result.total_principal, result.total_interest);
        }
    }

    #[test]
    fn test_advance_relation() {
        for request in requests().into_iter().filter(|r| r.payment_scheme == PaymentScheme::Advance) {
            if request.annual_rate.is_zero() {
                continue;
            }
            let arrears = request.clone().with_scheme(PaymentScheme::Arrears);
            let advance_emi = engine().compute_installment(&request).as_decimal();
            let arrears_emi = engine().compute_installment(&arrears).as_decimal();
            let expected = arrears_emi / (Decimal::ONE + request.periodic_rate().as_decimal());
            assert!((advance_emi - expected).abs() < dec!(0.00000001), "{request:?}");
        }
    }

    #[test]
    fn test_preview_and_percentages() {
        let request = LoanRequest::new(Money::from_major(600_000), dec!(9.5), PaymentFrequency::Monthly, 60);
        let result = engine().amortize(&request);
        assert_eq!(result.preview(DEFAULT_PREVIEW_PERIODS).len(), 20);
        assert_eq!(result.preview(500).len(), 60);

        let total = result.principal_percentage() + result.interest_percentage();
        assert!((total - dec!(100)).abs() < dec!(0.0000001));
        assert!(result.principal_percentage() > result.interest_percentage());
    }

    #[test]
    fn test_request_is_reusable() {
        let request = LoanRequest::new(Money::from_major(250_000), dec!(11), PaymentFrequency::Monthly, 36)
            .with_start_date(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());
        let first = engine().amortize(&request);
        let second = engine().amortize(&request);
        assert_eq!(first, second);
        assert_eq!(first.schedule[0].due_date, NaiveDate::from_ymd_opt(2025, 5, 10));
    }
}
