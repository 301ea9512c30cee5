use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, DEFAULT_PREVIEW_PERIODS};
use crate::collateral::Karat;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::{InstallmentRounding, LoanProduct, PaymentFrequency, PaymentScheme, TenureSplit};

/// per-product calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub product: LoanProduct,
    pub frequency: PaymentFrequency,
    pub default_scheme: PaymentScheme,
    pub allowed_schemes: Vec<PaymentScheme>,
    pub limits: ProductLimits,
    #[serde(default)]
    pub tenure_split: TenureSplit,
    #[serde(default)]
    pub installment_rounding: InstallmentRounding,
    #[serde(default = "default_preview_periods")]
    pub preview_periods: usize,
    #[serde(default)]
    pub gold: Option<GoldLoanConfig>,
}

/// input bounds the calculator's sliders allow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLimits {
    pub min_principal: Money,
    pub max_principal: Money,
    pub min_rate: Rate,
    pub max_rate: Rate,
    pub min_tenure_periods: u32,
    pub max_tenure_periods: u32,
}

/// gold valuation defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldLoanConfig {
    pub price_per_gram: Money,
    pub ltv: Rate,
    #[serde(default)]
    pub purity: Karat,
}

fn default_preview_periods() -> usize {
    DEFAULT_PREVIEW_PERIODS
}

impl ProductConfig {
    fn base(product: LoanProduct, frequency: PaymentFrequency, limits: ProductLimits) -> Self {
        Self {
            product,
            frequency,
            default_scheme: PaymentScheme::Arrears,
            allowed_schemes: vec![PaymentScheme::Arrears],
            limits,
            tenure_split: TenureSplit::RoundTotal,
            installment_rounding: InstallmentRounding::WholeUnits,
            preview_periods: DEFAULT_PREVIEW_PERIODS,
            gold: None,
        }
    }

    /// new car loan, EMI in arrears or in advance
    pub fn car_loan() -> Self {
        Self {
            allowed_schemes: vec![PaymentScheme::Arrears, PaymentScheme::Advance],
            ..Self::base(
                LoanProduct::CarLoan,
                PaymentFrequency::Monthly,
                ProductLimits {
                    min_principal: Money::from_major(100_000),
                    max_principal: Money::from_major(10_000_000),
                    min_rate: Rate::ZERO,
                    max_rate: Rate::from_percentage(25),
                    min_tenure_periods: 12,
                    max_tenure_periods: 96,
                },
            )
        }
    }

    /// pre-owned car loan, shorter tenure and higher rate ceiling
    pub fn used_car_loan() -> Self {
        Self {
            allowed_schemes: vec![PaymentScheme::Arrears, PaymentScheme::Advance],
            ..Self::base(
                LoanProduct::UsedCarLoan,
                PaymentFrequency::Monthly,
                ProductLimits {
                    min_principal: Money::from_major(50_000),
                    max_principal: Money::from_major(5_000_000),
                    min_rate: Rate::ZERO,
                    max_rate: Rate::from_percentage(30),
                    min_tenure_periods: 12,
                    max_tenure_periods: 84,
                },
            )
        }
    }

    pub fn personal_loan() -> Self {
        Self {
            tenure_split: TenureSplit::FloorYears,
            ..Self::base(
                LoanProduct::PersonalLoan,
                PaymentFrequency::Monthly,
                ProductLimits {
                    min_principal: Money::from_major(50_000),
                    max_principal: Money::from_major(4_000_000),
                    min_rate: Rate::ZERO,
                    max_rate: Rate::from_percentage(36),
                    min_tenure_periods: 6,
                    max_tenure_periods: 84,
                },
            )
        }
    }

    /// gold loan, principal derived from pledged weight when not given
    pub fn gold_loan() -> Self {
        Self {
            gold: Some(GoldLoanConfig {
                price_per_gram: Money::from_major(6500),
                ltv: Rate::from_percentage(75),
                purity: Karat::K24,
            }),
            ..Self::base(
                LoanProduct::GoldLoan,
                PaymentFrequency::Monthly,
                ProductLimits {
                    min_principal: Money::from_major(10_000),
                    max_principal: Money::from_major(10_000_000),
                    min_rate: Rate::ZERO,
                    max_rate: Rate::from_percentage(30),
                    min_tenure_periods: 1,
                    max_tenure_periods: 36,
                },
            )
        }
    }

    pub fn quarterly_emi() -> Self {
        Self {
            allowed_schemes: vec![PaymentScheme::Arrears, PaymentScheme::Advance],
            ..Self::base(
                LoanProduct::QuarterlyEmi,
                PaymentFrequency::Quarterly,
                ProductLimits {
                    min_principal: Money::from_major(10_000),
                    max_principal: Money::from_major(100_000_000),
                    min_rate: Rate::ZERO,
                    max_rate: Rate::from_percentage(30),
                    min_tenure_periods: 1,
                    max_tenure_periods: 120,
                },
            )
        }
    }

    pub fn weekly_emi() -> Self {
        Self::base(
            LoanProduct::WeeklyEmi,
            PaymentFrequency::Weekly,
            ProductLimits {
                min_principal: Money::from_major(1_000),
                max_principal: Money::from_major(10_000_000),
                min_rate: Rate::ZERO,
                max_rate: Rate::from_percent(dec!(36)),
                min_tenure_periods: 1,
                max_tenure_periods: 520,
            },
        )
    }

    pub fn preset(product: LoanProduct) -> Self {
        match product {
            LoanProduct::CarLoan => Self::car_loan(),
            LoanProduct::UsedCarLoan => Self::used_car_loan(),
            LoanProduct::PersonalLoan => Self::personal_loan(),
            LoanProduct::GoldLoan => Self::gold_loan(),
            LoanProduct::QuarterlyEmi => Self::quarterly_emi(),
            LoanProduct::WeeklyEmi => Self::weekly_emi(),
        }
    }

    /// engine carrying this product's display rounding
    pub fn engine(&self) -> AmortizationEngine {
        AmortizationEngine::new(self.installment_rounding)
    }

    /// internal consistency of the configuration itself
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        let invalid = |message: String| -> Result<()> { Err(CalculatorError::InvalidConfiguration { message }) };

        if limits.min_principal.is_negative() || limits.min_principal > limits.max_principal {
            return invalid(format!(
                "{:?}: principal range {} to {} is invalid",
                self.product, limits.min_principal, limits.max_principal
            ));
        }
        if limits.min_rate.is_negative() || limits.min_rate > limits.max_rate {
            return invalid(format!(
                "{:?}: rate range {} to {} is invalid",
                self.product, limits.min_rate, limits.max_rate
            ));
        }
        if limits.min_tenure_periods > limits.max_tenure_periods {
            return invalid(format!(
                "{:?}: tenure range {} to {} is invalid",
                self.product, limits.min_tenure_periods, limits.max_tenure_periods
            ));
        }
        if !self.allowed_schemes.contains(&self.default_scheme) {
            return invalid(format!(
                "{:?}: default scheme {:?} is not an allowed scheme",
                self.product, self.default_scheme
            ));
        }
        if self.preview_periods == 0 {
            return invalid(format!("{:?}: preview must show at least one period", self.product));
        }
        if let Some(gold) = &self.gold {
            if gold.price_per_gram.is_negative() || gold.ltv.as_decimal() <= Decimal::ZERO || gold.ltv > Rate::ONE {
                return invalid(format!(
                    "{:?}: gold rate {} with ltv {} is invalid",
                    self.product, gold.price_per_gram, gold.ltv
                ));
            }
        }
        Ok(())
    }

    /// enforce the product bounds on one request.
    ///
    /// A zero principal or zero tenure is the calculator's empty state and skips the
    /// corresponding range check.
    pub fn check_request(
        &self,
        principal: Money,
        annual_rate: Rate,
        tenure_periods: u32,
        scheme: PaymentScheme,
    ) -> Result<()> {
        let limits = &self.limits;

        if principal.is_negative() {
            return Err(CalculatorError::NegativePrincipal { amount: principal });
        }
        if annual_rate.is_negative() {
            return Err(CalculatorError::NegativeInterestRate { rate: annual_rate });
        }
        if !principal.is_zero() && (principal < limits.min_principal || principal > limits.max_principal) {
            return Err(CalculatorError::PrincipalOutOfRange {
                amount: principal,
                min: limits.min_principal,
                max: limits.max_principal,
            });
        }
        if annual_rate < limits.min_rate || annual_rate > limits.max_rate {
            return Err(CalculatorError::InterestRateOutOfRange {
                rate: annual_rate,
                min: limits.min_rate,
                max: limits.max_rate,
            });
        }
        if tenure_periods != 0
            && (tenure_periods < limits.min_tenure_periods || tenure_periods > limits.max_tenure_periods)
        {
            return Err(CalculatorError::TenureOutOfRange {
                periods: tenure_periods,
                min: limits.min_tenure_periods,
                max: limits.max_tenure_periods,
            });
        }
        if !self.allowed_schemes.contains(&scheme) {
            return Err(CalculatorError::SchemeNotSupported {
                product: self.product,
                scheme,
            });
        }
        Ok(())
    }
}

/// configurations for every calculator served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<ProductConfig>,
}

impl ProductCatalog {
    /// all built-in presets
    pub fn standard() -> Self {
        Self {
            products: [
                LoanProduct::CarLoan,
                LoanProduct::UsedCarLoan,
                LoanProduct::PersonalLoan,
                LoanProduct::GoldLoan,
                LoanProduct::QuarterlyEmi,
                LoanProduct::WeeklyEmi,
            ]
            .into_iter()
            .map(ProductConfig::preset)
            .collect(),
        }
    }

    /// parse and validate a catalog
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: ProductCatalog = serde_json::from_str(json).map_err(|e| {
            CalculatorError::InvalidConfiguration {
                message: e.to_string(),
            }
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        for (i, config) in self.products.iter().enumerate() {
            config.validate()?;
            if self.products[..i].iter().any(|c| c.product == config.product) {
                return Err(CalculatorError::InvalidConfiguration {
                    message: format!("{:?} configured more than once", config.product),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, product: LoanProduct) -> Result<&ProductConfig> {
        self.products
            .iter()
            .find(|c| c.product == product)
            .ok_or(CalculatorError::UnknownProduct { product })
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        let catalog = ProductCatalog::standard();
        assert_eq!(catalog.products.len(), 6);
        catalog.validate().unwrap();
    }

    #[test]
    fn test_preset_frequencies() {
        assert_eq!(ProductConfig::quarterly_emi().frequency, PaymentFrequency::Quarterly);
        assert_eq!(ProductConfig::weekly_emi().frequency, PaymentFrequency::Weekly);
        assert_eq!(ProductConfig::gold_loan().frequency, PaymentFrequency::Monthly);
        assert!(ProductConfig::gold_loan().gold.is_some());
        assert_eq!(ProductConfig::personal_loan().tenure_split, TenureSplit::FloorYears);
        assert_eq!(ProductConfig::car_loan().tenure_split, TenureSplit::RoundTotal);
    }

    #[test]
    fn test_check_request_bounds() {
        let config = ProductConfig::car_loan();
        let rate = Rate::from_percentage(9);

        assert!(config.check_request(Money::from_major(800_000), rate, 60, PaymentScheme::Advance).is_ok());
        assert!(matches!(
            config.check_request(Money::from_major(10), rate, 60, PaymentScheme::Arrears),
            Err(CalculatorError::PrincipalOutOfRange { .. })
        ));
        assert!(matches!(
            config.check_request(Money::from_major(800_000), Rate::from_percentage(40), 60, PaymentScheme::Arrears),
            Err(CalculatorError::InterestRateOutOfRange { .. })
        ));
        assert!(matches!(
            config.check_request(Money::from_major(800_000), rate, 120, PaymentScheme::Arrears),
            Err(CalculatorError::TenureOutOfRange { .. })
        ));
    }

    #[test]
    fn test_check_request_negative_inputs() {
        let config = ProductConfig::personal_loan();
        assert!(matches!(
            config.check_request(Money::from_major(-1), Rate::from_percentage(9), 12, PaymentScheme::Arrears),
            Err(CalculatorError::NegativePrincipal { .. })
        ));
        assert!(matches!(
            config.check_request(Money::from_major(100_000), Rate::from_percent(Decimal::NEGATIVE_ONE), 12, PaymentScheme::Arrears),
            Err(CalculatorError::NegativeInterestRate { .. })
        ));
    }

    #[test]
    fn test_empty_state_skips_ranges() {
        let config = ProductConfig::personal_loan();
        assert!(config.check_request(Money::ZERO, Rate::from_percentage(12), 0, PaymentScheme::Arrears).is_ok());
    }

    #[test]
    fn test_scheme_not_offered() {
        let config = ProductConfig::personal_loan();
        assert!(matches!(
            config.check_request(Money::from_major(100_000), Rate::from_percentage(12), 24, PaymentScheme::Advance),
            Err(CalculatorError::SchemeNotSupported { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ProductConfig::weekly_emi();
        config.limits.min_tenure_periods = 600;
        assert!(config.validate().is_err());

        let mut config = ProductConfig::personal_loan();
        config.default_scheme = PaymentScheme::Advance;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = serde_json::to_string(&ProductCatalog::standard()).unwrap();
        let catalog = ProductCatalog::from_json(&json).unwrap();
        assert_eq!(catalog.get(LoanProduct::GoldLoan).unwrap(), &ProductConfig::gold_loan());

        let partial = ProductCatalog {
            products: vec![ProductConfig::weekly_emi()],
        };
        assert!(matches!(
            partial.get(LoanProduct::CarLoan),
            Err(CalculatorError::UnknownProduct { .. })
        ));

        let duplicated = ProductCatalog {
            products: vec![ProductConfig::weekly_emi(), ProductConfig::weekly_emi()],
        };
        assert!(duplicated.validate().is_err());
        assert!(ProductCatalog::from_json("{\"products\": 3}").is_err());
    }
}
