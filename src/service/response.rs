use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amortization::{PeriodEntry, YearlySummary};
use crate::decimal::Money;
use crate::errors::CalculatorError;
use crate::types::{LoanProduct, PaymentScheme};

/// successful calculation, as rendered by the widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub calculation_id: Uuid,
    pub product: LoanProduct,
    pub emi: Money,
    pub principal_amount: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub principal_percentage: Decimal,
    pub interest_percentage: Decimal,
    pub periods_per_year: u32,
    pub tenure_periods: u32,
    pub payment_scheme: PaymentScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold_value: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PeriodEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_summary: Option<Vec<YearlySummary>>,
}

/// response envelope, `status` is either "success" or "error"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CalculationResponse {
    Success(LoanSummary),
    #[serde(rename_all = "camelCase")]
    Error {
        calculation_id: Uuid,
        error: String,
    },
}

impl CalculationResponse {
    pub fn error(calculation_id: Uuid, err: &CalculatorError) -> Self {
        CalculationResponse::Error {
            calculation_id,
            error: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CalculationResponse::Success(_))
    }

    pub fn summary(&self) -> Option<&LoanSummary> {
        match self {
            CalculationResponse::Success(summary) => Some(summary),
            CalculationResponse::Error { .. } => None,
        }
    }

    pub fn calculation_id(&self) -> Uuid {
        match self {
            CalculationResponse::Success(summary) => summary.calculation_id,
            CalculationResponse::Error { calculation_id, .. } => *calculation_id,
        }
    }
}
