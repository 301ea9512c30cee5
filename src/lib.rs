pub mod amortization;
pub mod collateral;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod service;
pub mod tenure;
pub mod types;

// re-export key types
pub use amortization::{
    AmortizationEngine, AmortizationResult, LoanRequest, PeriodEntry, ScheduleIter, YearlySummary,
};
pub use collateral::{GoldCollateral, Karat};
pub use config::{GoldLoanConfig, ProductCatalog, ProductConfig, ProductLimits};
pub use decimal::{Money, Rate};
pub use errors::{CalculatorError, Result};
pub use service::{CalculationRequest, CalculationResponse, CalculationService, LoanSummary};
pub use tenure::{NormalizedTenure, Tenure};
pub use types::{InstallmentRounding, LoanProduct, PaymentFrequency, PaymentScheme, TenureSplit};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
