//! Level-payment annuity formulas shared by the loan calculators.
//!
//! Rates are per period (monthly), not percentages.

/// Converts a nominal annual percentage rate into a monthly rate.
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// Fixed payment that amortizes `principal` over `periods` at `rate`.
pub fn payment(principal: f64, rate: f64, periods: u64) -> f64 {
    if periods == 0 || principal == 0.0 {
        return 0.0;
    }
    if rate == 0.0 {
        return principal / periods as f64;
    }
    let growth = (1.0 + rate).powf(periods as f64);
    if !growth.is_finite() {
        // Limit as the compounding factor grows without bound.
        return principal * rate;
    }
    principal * rate * growth / (growth - 1.0)
}

/// Principal that a fixed `payment` services over `periods` at `rate`.
pub fn present_value(payment: f64, rate: f64, periods: u64) -> f64 {
    if periods == 0 || payment == 0.0 {
        return 0.0;
    }
    if rate == 0.0 {
        return payment * periods as f64;
    }
    let growth = (1.0 + rate).powf(periods as f64);
    if !growth.is_finite() {
        return payment / rate;
    }
    payment * (growth - 1.0) / (rate * growth)
}
