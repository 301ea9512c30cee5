use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::{LoanProduct, PaymentScheme};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("invalid principal: {amount} must not be negative")]
    NegativePrincipal {
        amount: Money,
    },

    #[error("invalid interest rate: {rate} must not be negative")]
    NegativeInterestRate {
        rate: Rate,
    },

    #[error("loan amount {amount} outside allowed range {min} to {max}")]
    PrincipalOutOfRange {
        amount: Money,
        min: Money,
        max: Money,
    },

    #[error("interest rate {rate} outside allowed range {min} to {max}")]
    InterestRateOutOfRange {
        rate: Rate,
        min: Rate,
        max: Rate,
    },

    #[error("tenure of {periods} periods outside allowed range {min} to {max}")]
    TenureOutOfRange {
        periods: u32,
        min: u32,
        max: u32,
    },

    #[error("payment scheme {scheme:?} not offered for {product:?}")]
    SchemeNotSupported {
        product: LoanProduct,
        scheme: PaymentScheme,
    },

    #[error("missing field: {field}")]
    MissingField {
        field: String,
    },

    #[error("invalid value for {field}: {message}")]
    InvalidField {
        field: String,
        message: String,
    },

    #[error("invalid collateral: {message}")]
    InvalidCollateral {
        message: String,
    },

    #[error("no configuration for product {product:?}")]
    UnknownProduct {
        product: LoanProduct,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("malformed request: {message}")]
    MalformedRequest {
        message: String,
    },
}

impl From<serde_json::Error> for CalculatorError {
    fn from(err: serde_json::Error) -> Self {
        CalculatorError::MalformedRequest {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
