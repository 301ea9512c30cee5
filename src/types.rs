use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// payment timing within each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentScheme {
    /// installment due at the end of the period (ordinary annuity)
    #[default]
    Arrears,
    /// installment due at the start of the period (annuity-due)
    Advance,
}

/// how often installments fall due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    Weekly,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Weekly => 52,
        }
    }
}

/// loan products served by the shared engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProduct {
    CarLoan,
    UsedCarLoan,
    PersonalLoan,
    GoldLoan,
    QuarterlyEmi,
    WeeklyEmi,
}

/// conversion of a fractional-year tenure into whole periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TenureSplit {
    /// whole years first, then the remainder truncated to whole periods
    FloorYears,
    /// total periods rounded half-up
    #[default]
    RoundTotal,
}

/// rounding applied to the headline installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentRounding {
    /// nearest whole currency unit (INR displays)
    WholeUnits,
    /// nearest sub-unit (2 dp)
    #[default]
    MinorUnits,
}

impl InstallmentRounding {
    pub fn apply(&self, amount: Money) -> Money {
        match self {
            InstallmentRounding::WholeUnits => amount.round_whole(),
            InstallmentRounding::MinorUnits => amount.to_minor_units(),
        }
    }
}
