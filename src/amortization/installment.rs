use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::types::PaymentScheme;

/// installment for a loan paid in arrears
///
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), or P / n when r is zero.
/// Zero periods or a zero principal give a zero installment.
pub fn arrears_installment(principal: Money, periodic_rate: Rate, periods: u32) -> Money {
    if periods == 0 || principal.is_zero() {
        return Money::ZERO;
    }

    let n = Decimal::from(periods);
    if periodic_rate.is_zero() {
        return principal / n;
    }

    let r = periodic_rate.as_decimal();

    // (1+r)^n / ((1+r)^n - 1) tends to 1 once the factor is too large to represent
    let ratio = match periodic_rate.compound_factor(periods) {
        Some(compound) => {
            let growth = compound - Decimal::ONE;
            if growth.is_zero() {
                return principal / n;
            }
            match compound.checked_div(growth) {
                Some(ratio) => ratio,
                None => return principal / n,
            }
        }
        None => Decimal::ONE,
    };

    principal * (r * ratio)
}

/// installment under the given payment scheme.
///
/// Advance payments are the arrears installment discounted by one period.
pub fn installment(
    principal: Money,
    periodic_rate: Rate,
    periods: u32,
    scheme: PaymentScheme,
) -> Money {
    let arrears = arrears_installment(principal, periodic_rate, periods);
    match scheme {
        PaymentScheme::Arrears => arrears,
        PaymentScheme::Advance => {
            let discount = Decimal::ONE + periodic_rate.as_decimal();
            if discount.is_zero() {
                return arrears;
            }
            arrears / discount
        }
    }
}
