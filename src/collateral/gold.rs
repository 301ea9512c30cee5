use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};

/// gold fineness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Karat {
    #[default]
    #[serde(rename = "24k")]
    K24,
    #[serde(rename = "22k")]
    K22,
    #[serde(rename = "20k")]
    K20,
    #[serde(rename = "18k")]
    K18,
}

impl Karat {
    /// fraction of pure gold
    pub fn purity_factor(&self) -> Decimal {
        match self {
            Karat::K24 => Decimal::ONE,
            Karat::K22 => dec!(0.916),
            Karat::K20 => dec!(0.833),
            Karat::K18 => dec!(0.75),
        }
    }
}

/// pledged gold ornaments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldCollateral {
    pub weight_grams: Decimal,
    pub price_per_gram: Money,
    pub purity: Karat,
}

impl GoldCollateral {
    pub fn new(weight_grams: Decimal, price_per_gram: Money, purity: Karat) -> Result<Self> {
        if weight_grams < Decimal::ZERO {
            return Err(CalculatorError::InvalidCollateral {
                message: format!("gold weight cannot be negative: {weight_grams}"),
            });
        }
        if price_per_gram.is_negative() {
            return Err(CalculatorError::InvalidCollateral {
                message: format!("gold rate cannot be negative: {price_per_gram}"),
            });
        }
        Ok(Self {
            weight_grams,
            price_per_gram,
            purity,
        })
    }

    /// weight * rate * purity
    pub fn market_value(&self) -> Result<Money> {
        self.weight_grams
            .checked_mul(self.purity.purity_factor())
            .and_then(|grams| self.price_per_gram.checked_mul(grams))
            .ok_or_else(|| valuation_overflow(self))
    }

    /// loan amount available at the given loan-to-value ratio
    pub fn eligible_amount(&self, ltv: Rate) -> Result<Money> {
        check_ltv(ltv)?;
        self.market_value()?
            .checked_mul(ltv.as_decimal())
            .ok_or_else(|| valuation_overflow(self))
    }
}

fn valuation_overflow(gold: &GoldCollateral) -> CalculatorError {
    CalculatorError::InvalidCollateral {
        message: format!(
            "gold valuation out of range: {} g at {} per gram",
            gold.weight_grams, gold.price_per_gram
        ),
    }
}

fn check_ltv(ltv: Rate) -> Result<()> {
    if ltv.as_decimal() <= Decimal::ZERO || ltv > Rate::ONE {
        return Err(CalculatorError::InvalidCollateral {
            message: format!("loan-to-value must be above 0% and at most 100%, got {ltv}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_amount() {
        let gold = GoldCollateral::new(dec!(20), Money::from_major(6500), Karat::K24).unwrap();
        assert_eq!(gold.market_value().unwrap(), Money::from_major(130_000));

        let eligible = gold.eligible_amount(Rate::from_percentage(75)).unwrap();
        assert_eq!(eligible, Money::from_major(97_500));
    }

    #[test]
    fn test_purity_reduces_value() {
        let gold = GoldCollateral::new(dec!(10), Money::from_major(6000), Karat::K22).unwrap();
        assert_eq!(gold.market_value().unwrap(), Money::from_major(54_960));
    }

    #[test]
    fn test_ltv_bounds() {
        let gold = GoldCollateral::new(dec!(5), Money::from_major(6000), Karat::K24).unwrap();
        assert!(gold.eligible_amount(Rate::ZERO).is_err());
        assert!(gold.eligible_amount(Rate::from_percentage(101)).is_err());
        assert!(gold.eligible_amount(Rate::ONE).is_ok());
    }

    #[test]
    fn test_valuation_overflow_is_rejected() {
        let gold = GoldCollateral::new(Decimal::from_i128_with_scale(10i128.pow(28), 0), Money::from_major(6500), Karat::K24).unwrap();
        assert!(matches!(gold.market_value(), Err(CalculatorError::InvalidCollateral { .. })));
        assert!(matches!(
            gold.eligible_amount(Rate::from_percentage(75)),
            Err(CalculatorError::InvalidCollateral { .. })
        ));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(GoldCollateral::new(dec!(-1), Money::from_major(6500), Karat::K24).is_err());
        assert!(GoldCollateral::new(dec!(1), Money::from_major(-6500), Karat::K24).is_err());
    }

    #[test]
    fn test_karat_wire_names() {
        let k: Karat = serde_json::from_str("\"22k\"").unwrap();
        assert_eq!(k, Karat::K22);
    }
}
