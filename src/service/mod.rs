pub mod request;
pub mod response;

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::amortization::LoanRequest;
use crate::config::ProductCatalog;
use crate::errors::{CalculatorError, Result};

pub use request::CalculationRequest;
pub use response::{CalculationResponse, LoanSummary};

/// decimal places of the percentage breakdown
const PERCENT_DP: u32 = 2;

const SERIALIZATION_FAILURE: &str = r#"{"status":"error","error":"response could not be serialized"}"#;

/// stateless request handler over a product catalog.
///
/// Validates a [`CalculationRequest`] against its product configuration, normalizes
/// the tenure and runs the engine. The [`CalculationResponse`] is either a full
/// success or an error message.
#[derive(Debug, Clone)]
pub struct CalculationService {
    catalog: ProductCatalog,
}

impl CalculationService {
    pub fn new(catalog: ProductCatalog) -> Result<Self> {
        catalog.validate()?;
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// answer one request, never a partial success
    pub fn handle(&self, request: &CalculationRequest) -> CalculationResponse {
        let calculation_id = Uuid::new_v4();
        let span = tracing::info_span!("emi_calculation", %calculation_id, product = ?request.product);
        let _guard = span.enter();

        match self.calculate(calculation_id, request) {
            Ok(summary) => {
                tracing::debug!(emi = %summary.emi, periods = summary.tenure_periods, "calculation complete");
                CalculationResponse::Success(summary)
            }
            Err(err) => {
                tracing::warn!(error = %err, "calculation rejected");
                CalculationResponse::error(calculation_id, &err)
            }
        }
    }

    /// JSON in, JSON out
    pub fn handle_json(&self, body: &str) -> String {
        let response = match serde_json::from_str::<CalculationRequest>(body) {
            Ok(request) => self.handle(&request),
            Err(err) => {
                let err = CalculatorError::from(err);
                tracing::warn!(error = %err, "unreadable calculation request");
                CalculationResponse::error(Uuid::new_v4(), &err)
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|_| SERIALIZATION_FAILURE.to_string())
    }

    fn calculate(&self, calculation_id: Uuid, request: &CalculationRequest) -> Result<LoanSummary> {
        let config = self.catalog.get(request.product)?;

        let principal = request.principal(config)?;
        let annual_rate = request.annual_rate()?;
        let tenure = request
            .tenure(config.frequency)?
            .normalize(config.frequency, config.tenure_split);
        let scheme = request.payment_scheme.unwrap_or(config.default_scheme);
        if request.include_schedule && request.preview_periods == Some(0) {
            return Err(CalculatorError::InvalidField {
                field: "previewPeriods".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        config.check_request(principal, annual_rate, tenure.periods, scheme)?;

        let mut loan = LoanRequest::from_tenure(principal, annual_rate.as_percentage(), tenure)
            .with_scheme(scheme);
        if let Some(start) = request.start_date {
            loan = loan.with_start_date(start);
        }

        let result = config.engine().amortize(&loan);
        let rounding = config.installment_rounding;

        let (schedule, yearly_summary) = if request.include_schedule {
            let preview = request.preview_periods.unwrap_or(config.preview_periods);
            (
                Some(result.preview(preview).to_vec()),
                Some(result.yearly_summary(tenure.periods_per_year())),
            )
        } else {
            (None, None)
        };

        Ok(LoanSummary {
            calculation_id,
            product: config.product,
            emi: result.periodic_installment,
            principal_amount: rounding.apply(result.total_principal),
            total_interest: rounding.apply(result.total_interest),
            total_payment: rounding.apply(result.total_payment),
            principal_percentage: round_percent(result.principal_percentage()),
            interest_percentage: round_percent(result.interest_percentage()),
            periods_per_year: tenure.periods_per_year(),
            tenure_periods: tenure.periods,
            payment_scheme: scheme,
            gold_value: request
                .gold_valuation(config)?
                .map(|(gold, _)| gold.market_value())
                .transpose()?,
            schedule,
            yearly_summary,
        })
    }
}

impl Default for CalculationService {
    fn default() -> Self {
        Self {
            catalog: ProductCatalog::standard(),
        }
    }
}

fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PERCENT_DP, RoundingStrategy::MidpointAwayFromZero)
}
