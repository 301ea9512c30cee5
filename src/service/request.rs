use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::collateral::{GoldCollateral, Karat};
use crate::config::ProductConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::tenure::Tenure;
use crate::types::{LoanProduct, PaymentFrequency, PaymentScheme};

/// calculation request as posted by a calculator widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub product: LoanProduct,
    #[serde(default, alias = "loanAmount", alias = "amount")]
    pub principal: Option<Decimal>,
    /// annual rate in percent
    #[serde(default)]
    pub interest_rate: Option<Decimal>,
    #[serde(default)]
    pub years: Option<i64>,
    #[serde(default)]
    pub months: Option<i64>,
    #[serde(default)]
    pub quarters: Option<i64>,
    #[serde(default)]
    pub weeks: Option<i64>,
    /// fractional years from a single tenure slider
    #[serde(default)]
    pub tenure_years: Option<Decimal>,
    #[serde(default)]
    pub payment_scheme: Option<PaymentScheme>,
    #[serde(default)]
    pub include_schedule: bool,
    #[serde(default)]
    pub preview_periods: Option<usize>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub gold_weight: Option<Decimal>,
    #[serde(default)]
    pub gold_rate_per_gram: Option<Decimal>,
    #[serde(default)]
    pub purity: Option<Karat>,
    #[serde(default)]
    pub ltv_percent: Option<Decimal>,
}

impl CalculationRequest {
    pub fn new(product: LoanProduct) -> Self {
        Self {
            product,
            principal: None,
            interest_rate: None,
            years: None,
            months: None,
            quarters: None,
            weeks: None,
            tenure_years: None,
            payment_scheme: None,
            include_schedule: false,
            preview_periods: None,
            start_date: None,
            gold_weight: None,
            gold_rate_per_gram: None,
            purity: None,
            ltv_percent: None,
        }
    }

    pub fn annual_rate(&self) -> Result<Rate> {
        self.interest_rate
            .map(Rate::from_percent)
            .ok_or_else(|| missing("interestRate"))
    }

    /// tenure in the unit the product's form collects.
    ///
    /// Monthly products take years and months, quarterly ones years and quarters,
    /// weekly ones weeks or whole years. `tenureYears` works for all of them.
    pub fn tenure(&self, frequency: PaymentFrequency) -> Result<Tenure> {
        if let Some(years) = self.tenure_years {
            return Ok(Tenure::Years(years));
        }

        match frequency {
            PaymentFrequency::Monthly => {
                self.reject_field("quarters", self.quarters.is_some(), frequency)?;
                self.reject_field("weeks", self.weeks.is_some(), frequency)?;
                match (self.years, self.months) {
                    (None, None) => Err(missing("tenure")),
                    (years, months) => Ok(Tenure::YearsMonths {
                        years: years.unwrap_or(0),
                        months: months.unwrap_or(0),
                    }),
                }
            }
            PaymentFrequency::Quarterly => {
                self.reject_field("months", self.months.is_some(), frequency)?;
                self.reject_field("weeks", self.weeks.is_some(), frequency)?;
                match (self.years, self.quarters) {
                    (None, None) => Err(missing("tenure")),
                    (None, Some(quarters)) => Ok(Tenure::Quarters(quarters)),
                    (years, quarters) => Ok(Tenure::YearsQuarters {
                        years: years.unwrap_or(0),
                        quarters: quarters.unwrap_or(0),
                    }),
                }
            }
            PaymentFrequency::Weekly => {
                self.reject_field("months", self.months.is_some(), frequency)?;
                self.reject_field("quarters", self.quarters.is_some(), frequency)?;
                match (self.weeks, self.years) {
                    (Some(weeks), _) => Ok(Tenure::Weeks(weeks)),
                    (None, Some(years)) => Ok(Tenure::Years(Decimal::from(years))),
                    (None, None) => Err(missing("tenure")),
                }
            }
        }
    }

    /// principal as given, or the gold-loan eligible amount when only the pledge is described
    pub fn principal(&self, config: &ProductConfig) -> Result<Money> {
        if let Some(principal) = self.principal {
            return Ok(Money::from_decimal(principal));
        }
        match (&config.gold, self.gold_weight) {
            (Some(_), Some(_)) => Ok(self.gold_eligibility(config)?.1),
            (Some(_), None) => Err(missing("principal or goldWeight")),
            (None, _) => Err(missing("principal")),
        }
    }

    /// gold collateral and the amount it supports, `None` for non-gold requests
    pub fn gold_valuation(&self, config: &ProductConfig) -> Result<Option<(GoldCollateral, Money)>> {
        if config.gold.is_none() || self.gold_weight.is_none() {
            return Ok(None);
        }
        self.gold_eligibility(config).map(Some)
    }

    fn gold_eligibility(&self, config: &ProductConfig) -> Result<(GoldCollateral, Money)> {
        let defaults = config.gold.as_ref().ok_or_else(|| CalculatorError::InvalidConfiguration {
            message: format!("{:?} has no gold valuation settings", config.product),
        })?;
        let weight = self.gold_weight.ok_or_else(|| missing("goldWeight"))?;
        let price = self
            .gold_rate_per_gram
            .map(Money::from_decimal)
            .unwrap_or(defaults.price_per_gram);
        let ltv = self.ltv_percent.map(Rate::from_percent).unwrap_or(defaults.ltv);

        let gold = GoldCollateral::new(weight, price, self.purity.unwrap_or(defaults.purity))?;
        let eligible = gold.eligible_amount(ltv)?;
        Ok((gold, eligible))
    }

    fn reject_field(&self, field: &str, present: bool, frequency: PaymentFrequency) -> Result<()> {
        if present {
            return Err(CalculatorError::InvalidField {
                field: field.to_string(),
                message: format!("not accepted by {:?} calculators", frequency),
            });
        }
        Ok(())
    }
}

fn missing(field: &str) -> CalculatorError {
    CalculatorError::MissingField {
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parses_widget_payload() {
        let request: CalculationRequest = serde_json::from_value(json!({
            "product": "car_loan",
            "loanAmount": 800000,
            "interestRate": 9.5,
            "years": 5,
            "months": 6,
            "paymentScheme": "advance"
        }))
        .unwrap();

        assert_eq!(request.principal, Some(dec!(800000)));
        assert_eq!(request.interest_rate, Some(dec!(9.5)));
        assert_eq!(request.payment_scheme, Some(PaymentScheme::Advance));
        assert_eq!(
            request.tenure(PaymentFrequency::Monthly).unwrap(),
            Tenure::YearsMonths { years: 5, months: 6 }
        );
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let parsed = serde_json::from_value::<CalculationRequest>(json!({
            "product": "personal_loan",
            "principal": "lots",
            "interestRate": 12,
            "years": 2
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_tenure_by_frequency() {
        let mut request = CalculationRequest::new(LoanProduct::QuarterlyEmi);
        request.quarters = Some(20);
        assert_eq!(request.tenure(PaymentFrequency::Quarterly).unwrap(), Tenure::Quarters(20));

        request.years = Some(3);
        request.quarters = Some(2);
        assert_eq!(
            request.tenure(PaymentFrequency::Quarterly).unwrap(),
            Tenure::YearsQuarters { years: 3, quarters: 2 }
        );

        let mut weekly = CalculationRequest::new(LoanProduct::WeeklyEmi);
        weekly.years = Some(2);
        assert_eq!(weekly.tenure(PaymentFrequency::Weekly).unwrap(), Tenure::Years(dec!(2)));
        weekly.weeks = Some(30);
        assert_eq!(weekly.tenure(PaymentFrequency::Weekly).unwrap(), Tenure::Weeks(30));
    }

    #[test]
    fn test_mismatched_tenure_unit() {
        let mut request = CalculationRequest::new(LoanProduct::CarLoan);
        request.weeks = Some(10);
        assert!(matches!(
            request.tenure(PaymentFrequency::Monthly),
            Err(CalculatorError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_missing_fields() {
        let request = CalculationRequest::new(LoanProduct::PersonalLoan);
        assert!(matches!(request.annual_rate(), Err(CalculatorError::MissingField { .. })));
        assert!(matches!(
            request.tenure(PaymentFrequency::Monthly),
            Err(CalculatorError::MissingField { .. })
        ));
        assert!(matches!(
            request.principal(&ProductConfig::personal_loan()),
            Err(CalculatorError::MissingField { .. })
        ));
    }

    #[test]
    fn test_gold_principal_derived_from_pledge() {
        let config = ProductConfig::gold_loan();
        let mut request = CalculationRequest::new(LoanProduct::GoldLoan);
        request.gold_weight = Some(dec!(20));
        request.gold_rate_per_gram = Some(dec!(6500));
        request.ltv_percent = Some(dec!(75));

        assert_eq!(request.principal(&config).unwrap(), Money::from_major(97_500));

        let (gold, eligible) = request.gold_valuation(&config).unwrap().unwrap();
        assert_eq!(gold.market_value().unwrap(), Money::from_major(130_000));
        assert_eq!(eligible, Money::from_major(97_500));
    }

    #[test]
    fn test_gold_defaults_from_config() {
        let config = ProductConfig::gold_loan();
        let mut request = CalculationRequest::new(LoanProduct::GoldLoan);
        request.gold_weight = Some(dec!(10));
        // 10 g * 6500 * 75%
        assert_eq!(request.principal(&config).unwrap(), Money::from_major(48_750));
    }

    #[test]
    fn test_explicit_principal_wins_over_pledge() {
        let config = ProductConfig::gold_loan();
        let mut request = CalculationRequest::new(LoanProduct::GoldLoan);
        request.principal = Some(dec!(40000));
        request.gold_weight = Some(dec!(10));
        assert_eq!(request.principal(&config).unwrap(), Money::from_major(40_000));
    }
}
